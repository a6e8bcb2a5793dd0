//! Node View: one card, its styling, and its own drag gesture.
//!
//! The view never touches the diagram. It reports what happened as
//! [`NodeSignal`]s (select, drag, connect) and the controller turns them
//! into selection changes and host requests.

use diagram::{Node, NodeKind, NodeStatus, Position};
use serde::Serialize;
use tracing::debug;

use crate::listeners::{DocumentListeners, ListenerGuard};
use crate::{CanvasConfig, PointerButton, Viewport};

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

/// Callback invocations emitted by a node view.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSignal {
    /// `onSelect(node_id)`
    Select(String),
    /// `onDrag(node_id, position)`
    Drag { node_id: String, position: Position },
    /// `onConnect(from, to)`
    Connect { from_node_id: String, to_node_id: String },
}

// ---------------------------------------------------------------------------
// Drag state machine
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum DragState {
    Idle,
    Dragging {
        /// `pointer - node.position` at press time.
        anchor: Position,
        _listener: ListenerGuard,
    },
}

/// Per-node interaction state. Dropping it ends any drag in progress.
#[derive(Debug)]
pub struct NodeView {
    node_id: String,
    drag: DragState,
}

impl NodeView {
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            drag: DragState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Press on the card. Only the primary button starts a drag.
    ///
    /// `pointer` is in the same space the reported positions are in: a
    /// pointer delta of `(dx, dy)` moves the node by exactly `(dx, dy)`.
    pub fn pointer_down(
        &mut self,
        node: &Node,
        pointer: Position,
        button: PointerButton,
        listeners: &DocumentListeners,
    ) -> Option<NodeSignal> {
        if button != PointerButton::Primary || self.is_dragging() {
            return None;
        }
        debug!("node '{}' drag started", self.node_id);
        self.drag = DragState::Dragging {
            anchor: pointer - node.position,
            _listener: listeners.acquire(),
        };
        Some(NodeSignal::Select(self.node_id.clone()))
    }

    pub fn pointer_move(&mut self, pointer: Position) -> Option<NodeSignal> {
        match &self.drag {
            DragState::Dragging { anchor, .. } => Some(NodeSignal::Drag {
                node_id: self.node_id.clone(),
                position: pointer - *anchor,
            }),
            DragState::Idle => None,
        }
    }

    /// Release anywhere in the document. Returns whether a drag ended.
    pub fn pointer_up(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        if was_dragging {
            debug!("node '{}' drag ended", self.node_id);
        }
        self.drag = DragState::Idle;
        was_dragging
    }

    /// Request a connection from this node to `to_node_id`.
    pub fn connect_to(&self, to_node_id: impl Into<String>) -> NodeSignal {
        NodeSignal::Connect {
            from_node_id: self.node_id.clone(),
            to_node_id: to_node_id.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Styling
// ---------------------------------------------------------------------------

/// Card colors for one node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePalette {
    pub background: &'static str,
    pub border: &'static str,
    pub hover_border: &'static str,
}

pub fn palette(kind: NodeKind) -> NodePalette {
    match kind {
        NodeKind::Trigger => NodePalette {
            background: "#f0fdf4",
            border: "#bbf7d0",
            hover_border: "#86efac",
        },
        NodeKind::Action => NodePalette {
            background: "#eff6ff",
            border: "#bfdbfe",
            hover_border: "#93c5fd",
        },
        NodeKind::Condition => NodePalette {
            background: "#fefce8",
            border: "#fef08a",
            hover_border: "#fde047",
        },
        NodeKind::Webhook => NodePalette {
            background: "#faf5ff",
            border: "#e9d5ff",
            hover_border: "#d8b4fe",
        },
    }
}

/// The small status indicator in the card header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusDot {
    pub color: &'static str,
    pub pulsing: bool,
}

pub fn status_dot(status: NodeStatus) -> StatusDot {
    match status {
        NodeStatus::Active => StatusDot { color: "#22c55e", pulsing: false },
        NodeStatus::Inactive => StatusDot { color: "#9ca3af", pulsing: false },
        NodeStatus::Error => StatusDot { color: "#ef4444", pulsing: false },
        NodeStatus::Running => StatusDot { color: "#3b82f6", pulsing: true },
    }
}

pub fn status_label(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Active => "Active",
        NodeStatus::Inactive => "Inactive",
        NodeStatus::Error => "Error",
        NodeStatus::Running => "Running...",
    }
}

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// Everything needed to draw one node card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCard {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: NodeKind,
    pub status: NodeStatus,
    /// Card top-left in model space (inside the node layer transform).
    pub position: Position,
    /// Card size in model space.
    pub width: f64,
    pub height: f64,
    /// Card top-left on screen.
    pub screen_origin: Position,
    /// Card size on screen.
    pub screen_width: f64,
    pub screen_height: f64,
    pub palette: NodePalette,
    pub status_dot: StatusDot,
    pub status_label: &'static str,
    /// Screen anchor of the input port, if the node has inputs.
    pub input_port: Option<Position>,
    /// Screen anchor of the output port, if the node has outputs.
    pub output_port: Option<Position>,
    pub selected: bool,
    pub dragging: bool,
    pub z_index: u8,
}

impl NodeCard {
    pub fn build(
        node: &Node,
        viewport: &Viewport,
        config: &CanvasConfig,
        selected: bool,
        dragging: bool,
    ) -> Self {
        let mid = config.card_height / 2.0;
        let input_port = node
            .has_input_port()
            .then(|| viewport.to_screen(node.position + Position::new(0.0, mid)));
        let output_port = node
            .has_output_port()
            .then(|| viewport.to_screen(node.position + Position::new(config.card_width, mid)));

        Self {
            id: node.id.clone(),
            title: node.title.clone(),
            description: node.description.clone().filter(|d| !d.is_empty()),
            kind: node.kind,
            status: node.status,
            position: node.position,
            width: config.card_width,
            height: config.card_height,
            screen_origin: viewport.to_screen(node.position),
            screen_width: config.card_width * viewport.zoom,
            screen_height: config.card_height * viewport.zoom,
            palette: palette(node.kind),
            status_dot: status_dot(node.status),
            status_label: status_label(node.status),
            input_port,
            output_port,
            selected,
            dragging,
            z_index: if selected { 10 } else { 1 },
        }
    }

    /// Whether a canvas-local point falls on this card.
    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.screen_origin.x
            && point.x <= self.screen_origin.x + self.screen_width
            && point.y >= self.screen_origin.y
            && point.y <= self.screen_origin.y + self.screen_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> Node {
        Node::new("n1", "Process Data", NodeKind::Action)
            .at(450.0, 100.0)
            .with_ports(1, 0)
    }

    #[test]
    fn primary_press_selects_and_starts_drag() {
        let listeners = DocumentListeners::new();
        let mut view = NodeView::new("n1");

        let press = Position::new(500.0, 130.0);
        let signal = view.pointer_down(&node(), press, PointerButton::Primary, &listeners);
        assert_eq!(signal, Some(NodeSignal::Select("n1".into())));
        assert!(view.is_dragging());
        assert_eq!(listeners.active(), 1);
    }

    #[test]
    fn secondary_press_is_ignored() {
        let listeners = DocumentListeners::new();
        let mut view = NodeView::new("n1");
        let signal =
            view.pointer_down(&node(), Position::ORIGIN, PointerButton::Secondary, &listeners);
        assert!(signal.is_none());
        assert!(!view.is_dragging());
        assert_eq!(listeners.active(), 0);
    }

    #[test]
    fn move_reports_position_offset_by_pointer_delta() {
        let listeners = DocumentListeners::new();
        let mut view = NodeView::new("n1");
        view.pointer_down(&node(), Position::new(500.0, 130.0), PointerButton::Primary, &listeners);

        let signal = view.pointer_move(Position::new(530.0, 110.0));
        assert_eq!(
            signal,
            Some(NodeSignal::Drag { node_id: "n1".into(), position: Position::new(480.0, 80.0) })
        );
    }

    #[test]
    fn release_ends_drag_and_drops_listener() {
        let listeners = DocumentListeners::new();
        let mut view = NodeView::new("n1");
        view.pointer_down(&node(), Position::ORIGIN, PointerButton::Primary, &listeners);

        assert!(view.pointer_up());
        assert!(!view.is_dragging());
        assert_eq!(listeners.active(), 0);
        assert!(view.pointer_move(Position::new(1.0, 1.0)).is_none());
        assert!(!view.pointer_up());
    }

    #[test]
    fn dropping_a_dragging_view_releases_listener() {
        let listeners = DocumentListeners::new();
        let mut view = NodeView::new("n1");
        view.pointer_down(&node(), Position::ORIGIN, PointerButton::Primary, &listeners);
        drop(view);
        assert_eq!(listeners.active(), 0);
    }

    #[test]
    fn connect_signal_names_both_ends() {
        let view = NodeView::new("a");
        assert_eq!(
            view.connect_to("b"),
            NodeSignal::Connect { from_node_id: "a".into(), to_node_id: "b".into() }
        );
    }

    #[test]
    fn card_ports_follow_port_counts() {
        let config = CanvasConfig::default();
        let card = NodeCard::build(&node(), &Viewport::default(), &config, false, false);
        assert_eq!(card.input_port, Some(Position::new(450.0, 180.0)));
        assert!(card.output_port.is_none());
        assert_eq!(card.z_index, 1);
        assert_eq!(card.palette, palette(NodeKind::Action));
    }

    #[test]
    fn selected_card_is_raised_and_scaled() {
        let config = CanvasConfig::default();
        let viewport = Viewport { offset: Position::new(5.0, 5.0), zoom: 0.5 };
        let card = NodeCard::build(&node(), &viewport, &config, true, true);
        assert_eq!(card.z_index, 10);
        assert_eq!(card.screen_origin, Position::new(230.0, 55.0));
        assert_eq!(card.screen_width, 128.0);
        assert_eq!(card.screen_height, 80.0);
        assert!(card.contains(Position::new(300.0, 100.0)));
        assert!(!card.contains(Position::new(400.0, 100.0)));
    }

    #[test]
    fn every_kind_has_a_distinct_palette() {
        let backgrounds: std::collections::HashSet<_> =
            NodeKind::ALL.iter().map(|k| palette(*k).background).collect();
        assert_eq!(backgrounds.len(), 4);
    }

    #[test]
    fn only_running_status_pulses() {
        for status in NodeStatus::ALL {
            assert_eq!(status_dot(status).pulsing, status == NodeStatus::Running);
        }
        assert_eq!(status_label(NodeStatus::Running), "Running...");
    }
}
