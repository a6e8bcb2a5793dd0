//! Pan/zoom transform shared by the node layer and the connection layer.
//!
//! Screen coordinates here are canvas-local: `(0, 0)` is the canvas's
//! top-left corner. A model point `p` is drawn at `p * zoom + offset`.

use diagram::{Node, Position};
use serde::{Deserialize, Serialize};

use crate::CanvasConfig;

/// Current pan offset and zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Pan translation in screen pixels.
    pub offset: Position,
    /// Scale factor, kept inside the configured zoom bounds.
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Position::ORIGIN,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn to_screen(&self, model: Position) -> Position {
        model * self.zoom + self.offset
    }

    pub fn to_model(&self, screen: Position) -> Position {
        (screen - self.offset) / self.zoom
    }

    /// Change zoom while keeping the model point under `cursor` fixed.
    pub fn zoom_around(&mut self, cursor: Position, new_zoom: f64) {
        let ratio = new_zoom / self.zoom;
        self.offset = cursor - (cursor - self.offset) * ratio;
        self.zoom = new_zoom;
    }

    /// Apply one wheel tick at `cursor`.
    ///
    /// Positive `delta_y` scrolls away and zooms out; negative zooms in; zero
    /// (a purely horizontal scroll) leaves the viewport untouched.
    pub fn apply_wheel(&mut self, cursor: Position, delta_y: f64, config: &CanvasConfig) {
        let factor = if delta_y > 0.0 {
            config.wheel_zoom_out_factor
        } else if delta_y < 0.0 {
            config.wheel_zoom_in_factor
        } else {
            return;
        };
        let new_zoom = config.clamp_zoom(self.zoom * factor);
        self.zoom_around(cursor, new_zoom);
    }

    /// CSS-style transform string for the node layer (origin at 0,0).
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.offset.x, self.offset.y, self.zoom
        )
    }
}

// ---------------------------------------------------------------------------
// Fit to screen
// ---------------------------------------------------------------------------

/// Model-space box enclosing every node card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ContentBounds {
    /// Bounds of all cards, or `None` for an empty diagram.
    pub fn of_nodes(nodes: &[Node], config: &CanvasConfig) -> Option<Self> {
        if nodes.is_empty() {
            return None;
        }
        let init = ContentBounds {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        Some(nodes.iter().fold(init, |acc, node| ContentBounds {
            min_x: acc.min_x.min(node.position.x),
            min_y: acc.min_y.min(node.position.y),
            max_x: acc.max_x.max(node.position.x + config.card_width),
            max_y: acc.max_y.max(node.position.y + config.card_height),
        }))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// Viewport that centers `bounds` in a `width` x `height` canvas.
///
/// The scale is `min(scaleX, scaleY, 1.0)` so fitting never zooms in past
/// 100%. It is additionally held at the configured minimum zoom, which only
/// matters when the content is huge or the canvas is smaller than its padding.
pub fn fit_viewport(
    bounds: &ContentBounds,
    width: f64,
    height: f64,
    config: &CanvasConfig,
) -> Viewport {
    let available_width = width - config.fit_padding * 2.0;
    let available_height = height - config.fit_padding * 2.0;

    let scale_x = available_width / bounds.width();
    let scale_y = available_height / bounds.height();
    let zoom = scale_x.min(scale_y).min(1.0).max(config.min_zoom);

    let canvas_center = Position::new(width / 2.0, height / 2.0);
    Viewport {
        offset: canvas_center - bounds.center() * zoom,
        zoom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram::NodeKind;

    const EPS: f64 = 1e-9;

    fn close(a: Position, b: Position) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn screen_and_model_are_inverse() {
        let viewport = Viewport { offset: Position::new(30.0, -12.0), zoom: 1.7 };
        let p = Position::new(123.0, 456.0);
        assert!(close(viewport.to_model(viewport.to_screen(p)), p));
    }

    #[test]
    fn wheel_keeps_point_under_cursor() {
        let config = CanvasConfig::default();
        let mut viewport = Viewport { offset: Position::new(40.0, 25.0), zoom: 1.0 };
        let cursor = Position::new(300.0, 200.0);
        let under = viewport.to_model(cursor);

        viewport.apply_wheel(cursor, 120.0, &config);
        assert!((viewport.zoom - 0.9).abs() < EPS);
        assert!(close(viewport.to_screen(under), cursor));

        viewport.apply_wheel(cursor, -120.0, &config);
        assert!((viewport.zoom - 0.99).abs() < EPS);
        assert!(close(viewport.to_screen(under), cursor));
    }

    #[test]
    fn zero_delta_wheel_is_a_no_op() {
        let config = CanvasConfig::default();
        let mut viewport = Viewport::default();
        viewport.apply_wheel(Position::new(10.0, 10.0), 0.0, &config);
        assert_eq!(viewport, Viewport::default());
    }

    #[test]
    fn wheel_zoom_is_clamped() {
        let config = CanvasConfig::default();
        let mut viewport = Viewport::default();
        for _ in 0..100 {
            viewport.apply_wheel(Position::ORIGIN, -1.0, &config);
        }
        assert_eq!(viewport.zoom, 3.0);
        for _ in 0..200 {
            viewport.apply_wheel(Position::ORIGIN, 1.0, &config);
        }
        assert_eq!(viewport.zoom, 0.1);
    }

    #[test]
    fn css_transform_format() {
        let viewport = Viewport { offset: Position::new(10.0, -5.5), zoom: 2.0 };
        assert_eq!(viewport.css_transform(), "translate(10px, -5.5px) scale(2)");
    }

    #[test]
    fn bounds_include_card_size() {
        let config = CanvasConfig::default();
        let nodes = vec![
            Node::new("a", "A", NodeKind::Trigger).at(100.0, 100.0),
            Node::new("b", "B", NodeKind::Action).at(800.0, 50.0),
        ];
        let bounds = ContentBounds::of_nodes(&nodes, &config).unwrap();
        assert_eq!(
            bounds,
            ContentBounds { min_x: 100.0, min_y: 50.0, max_x: 1056.0, max_y: 260.0 }
        );
        assert!(ContentBounds::of_nodes(&[], &config).is_none());
    }

    #[test]
    fn fit_never_zooms_past_one_and_centers_content() {
        let config = CanvasConfig::default();
        let bounds = ContentBounds { min_x: 0.0, min_y: 0.0, max_x: 256.0, max_y: 160.0 };
        let viewport = fit_viewport(&bounds, 1000.0, 800.0, &config);
        assert_eq!(viewport.zoom, 1.0);
        assert!(close(viewport.to_screen(bounds.center()), Position::new(500.0, 400.0)));
    }

    #[test]
    fn fit_uses_tighter_axis() {
        let config = CanvasConfig::default();
        let bounds = ContentBounds { min_x: 0.0, min_y: 0.0, max_x: 1800.0, max_y: 350.0 };
        let viewport = fit_viewport(&bounds, 1000.0, 800.0, &config);
        // scaleX = 900 / 1800 = 0.5, scaleY = 700 / 350 = 2.0
        assert!((viewport.zoom - 0.5).abs() < EPS);
    }

    #[test]
    fn fit_on_tiny_canvas_holds_minimum_zoom() {
        let config = CanvasConfig::default();
        let bounds = ContentBounds { min_x: 0.0, min_y: 0.0, max_x: 256.0, max_y: 160.0 };
        let viewport = fit_viewport(&bounds, 60.0, 60.0, &config);
        assert_eq!(viewport.zoom, config.min_zoom);
    }
}
