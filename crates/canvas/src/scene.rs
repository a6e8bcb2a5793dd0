//! Render output of a canvas frame.

use std::fmt::Write as _;

use diagram::Position;
use serde::Serialize;

use crate::{ConnectionPath, NodeCard, Viewport};

/// Background grid. Pans with the viewport but does not scale with zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridBackground {
    pub cell: f64,
    /// `offset % cell` on each axis.
    pub shift: Position,
}

impl GridBackground {
    pub fn for_viewport(viewport: &Viewport, cell: f64) -> Self {
        Self {
            cell,
            shift: Position::new(viewport.offset.x % cell, viewport.offset.y % cell),
        }
    }
}

/// Counters shown in the canvas corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasInfo {
    pub nodes: usize,
    pub connections: usize,
    pub zoom_percent: i64,
}

/// One fully resolved frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub viewport: Viewport,
    /// Transform of the node layer, e.g. `translate(10px, 0px) scale(1.2)`.
    pub layer_transform: String,
    pub grid: GridBackground,
    /// Drawable connections; dangling ones are already left out.
    pub connections: Vec<ConnectionPath>,
    /// Cards in input order; `z_index` says which is raised.
    pub nodes: Vec<NodeCard>,
    pub info: CanvasInfo,
}

impl Scene {
    /// Render the frame as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let cell = self.grid.cell;
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );
        let _ = writeln!(
            out,
            r##"<defs><pattern id="grid" width="{cell}" height="{cell}" patternUnits="userSpaceOnUse" patternTransform="translate({} {})"><path d="M {cell} 0 L 0 0 0 {cell}" fill="none" stroke="#e5e7eb" stroke-width="1"/></pattern></defs>"##,
            self.grid.shift.x, self.grid.shift.y
        );
        let _ = writeln!(out, r##"<rect width="100%" height="100%" fill="#f9fafb"/>"##);
        let _ = writeln!(out, r#"<rect width="100%" height="100%" fill="url(#grid)"/>"#);

        // Node layer: model coordinates under a single transform.
        let _ = writeln!(
            out,
            r#"<g transform="translate({} {}) scale({})">"#,
            self.viewport.offset.x, self.viewport.offset.y, self.viewport.zoom
        );
        let mut ordered: Vec<&NodeCard> = self.nodes.iter().collect();
        ordered.sort_by_key(|card| card.z_index);
        for card in ordered {
            write_card(&mut out, card);
        }
        let _ = writeln!(out, "</g>");

        // Connection layer: screen coordinates, drawn above the cards.
        for path in &self.connections {
            let _ = writeln!(
                out,
                r##"<g data-connection="{}"><path d="{}" stroke="#3b82f6" stroke-width="2" fill="none"/><polygon points="{}" fill="#3b82f6"/></g>"##,
                escape(&path.id),
                path.svg_path(),
                path.arrow_points()
            );
        }

        let _ = writeln!(
            out,
            r##"<text x="16" y="{}" font-size="12" fill="#4b5563">Nodes: {} | Connections: {} | Zoom: {}%</text>"##,
            self.height - 16.0,
            self.info.nodes,
            self.info.connections,
            self.info.zoom_percent
        );
        out.push_str("</svg>\n");
        out
    }
}

fn write_card(out: &mut String, card: &NodeCard) {
    // Card geometry is in model units inside the layer transform.
    let (width, height) = (card.width, card.height);
    let (x, y) = (card.position.x, card.position.y);
    let stroke = if card.selected { "#3b82f6" } else { card.palette.border };
    let stroke_width = if card.selected { 2 } else { 1 };

    let _ = writeln!(
        out,
        r#"<g data-node="{}"><rect x="{x}" y="{y}" width="{width}" height="{height}" rx="8" fill="{}" stroke="{stroke}" stroke-width="{stroke_width}"/>"#,
        escape(&card.id),
        card.palette.background
    );
    let _ = writeln!(
        out,
        r#"<circle cx="{}" cy="{}" r="6" fill="{}"/>"#,
        x + 18.0,
        y + 18.0,
        card.status_dot.color
    );
    let _ = writeln!(
        out,
        r##"<text x="{}" y="{}" font-size="11" fill="#374151">{}</text>"##,
        x + 32.0,
        y + 22.0,
        card.kind
    );
    let _ = writeln!(
        out,
        r##"<text x="{}" y="{}" font-size="14" font-weight="600" fill="#111827">{}</text>"##,
        x + 12.0,
        y + 50.0,
        escape(&card.title)
    );
    if let Some(description) = &card.description {
        let _ = writeln!(
            out,
            r##"<text x="{}" y="{}" font-size="12" fill="#4b5563">{}</text>"##,
            x + 12.0,
            y + 74.0,
            escape(description)
        );
    }
    let _ = writeln!(
        out,
        r##"<text x="{}" y="{}" font-size="12" fill="#6b7280">{}</text>"##,
        x + 12.0,
        y + height - 16.0,
        card.status_label
    );
    if card.input_port.is_some() {
        let _ = writeln!(
            out,
            r##"<circle cx="{x}" cy="{}" r="6" fill="#9ca3af"/>"##,
            y + height / 2.0
        );
    }
    if card.output_port.is_some() {
        let _ = writeln!(
            out,
            r##"<circle cx="{}" cy="{}" r="6" fill="#9ca3af"/>"##,
            x + width,
            y + height / 2.0
        );
    }
    let _ = writeln!(out, "</g>");
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_shift_wraps_by_cell_and_ignores_zoom() {
        let viewport = Viewport { offset: Position::new(47.0, -33.0), zoom: 2.5 };
        let grid = GridBackground::for_viewport(&viewport, 20.0);
        assert_eq!(grid.cell, 20.0);
        assert_eq!(grid.shift, Position::new(7.0, -13.0));
    }

    #[test]
    fn card_is_written_at_model_size_under_any_zoom() {
        use crate::CanvasConfig;
        use diagram::{Node, NodeKind};

        let node = Node::new("n1", "Send Email", NodeKind::Action).at(10.0, 20.0);
        let viewport = Viewport { offset: Position::new(3.0, 4.0), zoom: 1.1 };
        let card = NodeCard::build(&node, &viewport, &CanvasConfig::default(), false, false);

        let mut out = String::new();
        write_card(&mut out, &card);
        assert!(out.contains(r#"x="10" y="20" width="256" height="160""#));
    }

    #[test]
    fn escape_handles_markup() {
        assert_eq!(escape(r#"a<b & "c">"#), "a&lt;b &amp; &quot;c&quot;&gt;");
    }
}
