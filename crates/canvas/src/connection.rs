//! Screen-space geometry of connection curves.
//!
//! A connection runs from the right-center of the source card to the
//! left-center of the target card as a cubic Bézier whose control points sit
//! half the horizontal span away from each endpoint. Everything here is
//! computed with the same viewport as the node layer, so hit-testing matches
//! the drawn curve.

use diagram::{Connection, Node, Position};
use serde::Serialize;

use crate::{CanvasConfig, Viewport};

/// A resolved, drawable connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionPath {
    pub id: String,
    pub from_node_id: String,
    pub to_node_id: String,
    pub start: Position,
    pub control1: Position,
    pub control2: Position,
    pub end: Position,
    /// Arrowhead triangle; the middle point is the tip at `end`.
    pub arrow: [Position; 3],
}

impl ConnectionPath {
    /// Look up both endpoints in `nodes` and build the curve.
    ///
    /// Returns `None` when either endpoint is missing.
    pub fn resolve(
        connection: &Connection,
        nodes: &[Node],
        viewport: &Viewport,
        config: &CanvasConfig,
    ) -> Option<Self> {
        let from = nodes.iter().find(|n| n.id == connection.from_node_id)?;
        let to = nodes.iter().find(|n| n.id == connection.to_node_id)?;
        Some(Self::between(connection, from, to, viewport, config))
    }

    pub fn between(
        connection: &Connection,
        from: &Node,
        to: &Node,
        viewport: &Viewport,
        config: &CanvasConfig,
    ) -> Self {
        let mid = config.card_height / 2.0;
        let start = viewport.to_screen(from.position + Position::new(config.card_width, mid));
        let end = viewport.to_screen(to.position + Position::new(0.0, mid));

        let bend = (end.x - start.x).abs() * 0.5;
        let control1 = Position::new(start.x + bend, start.y);
        let control2 = Position::new(end.x - bend, end.y);

        let arrow = [
            Position::new(end.x - config.arrow_length, end.y - config.arrow_half_width),
            end,
            Position::new(end.x - config.arrow_length, end.y + config.arrow_half_width),
        ];

        Self {
            id: connection.id.clone(),
            from_node_id: connection.from_node_id.clone(),
            to_node_id: connection.to_node_id.clone(),
            start,
            control1,
            control2,
            end,
            arrow,
        }
    }

    /// Point on the curve at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Position {
        let u = 1.0 - t;
        self.start * (u * u * u)
            + self.control1 * (3.0 * u * u * t)
            + self.control2 * (3.0 * u * t * t)
            + self.end * (t * t * t)
    }

    /// Approximate distance from `point` to the curve using `samples` segments.
    pub fn distance_to(&self, point: Position, samples: usize) -> f64 {
        let samples = samples.max(1);
        let mut previous = self.start;
        let mut best = f64::INFINITY;
        for i in 1..=samples {
            let next = self.point_at(i as f64 / samples as f64);
            best = best.min(distance_to_segment(point, previous, next));
            previous = next;
        }
        best
    }

    pub fn hit(&self, point: Position, config: &CanvasConfig) -> bool {
        self.distance_to(point, config.curve_samples) <= config.connection_hit_tolerance
    }

    /// SVG path data: `M sx sy C c1x c1y, c2x c2y, ex ey`.
    pub fn svg_path(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        )
    }

    /// SVG polygon `points` attribute for the arrowhead.
    pub fn arrow_points(&self) -> String {
        self.arrow
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn distance_to_segment(p: Position, a: Position, b: Position) -> f64 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * ab.x + (p.y - a.y) * ab.y) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram::NodeKind;

    fn pair() -> Vec<Node> {
        vec![
            Node::new("1", "Source", NodeKind::Trigger).at(100.0, 100.0),
            Node::new("2", "Target", NodeKind::Action).at(450.0, 100.0),
        ]
    }

    #[test]
    fn endpoints_attach_to_card_edges() {
        let config = CanvasConfig::default();
        let path = ConnectionPath::resolve(
            &Connection::new("c", "1", "2"),
            &pair(),
            &Viewport::default(),
            &config,
        )
        .unwrap();

        assert_eq!(path.start, Position::new(356.0, 180.0));
        assert_eq!(path.end, Position::new(450.0, 180.0));
        assert_eq!(path.control1, Position::new(403.0, 180.0));
        assert_eq!(path.control2, Position::new(403.0, 180.0));
        assert_eq!(path.arrow[0], Position::new(442.0, 176.0));
        assert_eq!(path.arrow[2], Position::new(442.0, 184.0));
        assert_eq!(path.svg_path(), "M 356 180 C 403 180, 403 180, 450 180");
        assert_eq!(path.arrow_points(), "442,176 450,180 442,184");
    }

    #[test]
    fn endpoints_follow_viewport() {
        let config = CanvasConfig::default();
        let viewport = Viewport { offset: Position::new(10.0, 20.0), zoom: 0.5 };
        let connection = Connection::new("c", "1", "2");
        let path = ConnectionPath::resolve(&connection, &pair(), &viewport, &config).unwrap();
        assert_eq!(path.start, Position::new(188.0, 110.0));
        assert_eq!(path.end, Position::new(235.0, 110.0));
    }

    #[test]
    fn backwards_connection_bends_outward() {
        let config = CanvasConfig::default();
        let mut nodes = pair();
        nodes.reverse();
        let path = ConnectionPath::resolve(
            &Connection::new("c", "2", "1"),
            &nodes,
            &Viewport::default(),
            &config,
        )
        .unwrap();
        // start.x = 706, end.x = 100, bend = 303
        assert_eq!(path.control1.x, 1009.0);
        assert_eq!(path.control2.x, -203.0);
    }

    #[test]
    fn dangling_endpoint_does_not_resolve() {
        let config = CanvasConfig::default();
        let missing = Connection::new("c", "1", "ghost");
        let resolved = ConnectionPath::resolve(&missing, &pair(), &Viewport::default(), &config);
        assert!(resolved.is_none());
    }

    #[test]
    fn curve_endpoints_and_hit_testing() {
        let config = CanvasConfig::default();
        let path = ConnectionPath::resolve(
            &Connection::new("c", "1", "2"),
            &pair(),
            &Viewport::default(),
            &config,
        )
        .unwrap();

        assert_eq!(path.point_at(0.0), path.start);
        assert_eq!(path.point_at(1.0), path.end);
        assert!(path.hit(Position::new(400.0, 182.0), &config));
        assert!(!path.hit(Position::new(400.0, 200.0), &config));
    }

    #[test]
    fn segment_distance_handles_degenerate_segment() {
        let a = Position::new(1.0, 1.0);
        assert_eq!(distance_to_segment(Position::new(4.0, 5.0), a, a), 5.0);
    }
}
