//! Canvas Controller.
//!
//! `CanvasController` owns the viewport, the current selection, one
//! [`NodeView`] per rendered node, and the interaction state machine:
//!
//! - background press → `Panning` until release; clears selection.
//! - node press → the node's view drags it; the controller selects it.
//! - connection press + release on the same curve → delete request.
//! - wheel → zoom around the cursor, in any state.
//!
//! Node and connection slices are read-only snapshots supplied with every
//! call. Changes to them leave the controller as [`CanvasRequest`]s.

use std::collections::HashMap;

use diagram::{Connection, Node, NodePatch, Position};
use serde::Serialize;
use tracing::{debug, info};

use crate::connection::ConnectionPath;
use crate::listeners::{DocumentListeners, ListenerGuard};
use crate::node_view::{NodeCard, NodeSignal, NodeView};
use crate::scene::{CanvasInfo, GridBackground, Scene};
use crate::viewport::{fit_viewport, ContentBounds};
use crate::{
    CanvasConfig, CanvasError, CanvasHost, CanvasRequest, PointerButton, PointerEvent, Viewport,
};

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// The canvas rectangle in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasBounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, client: Position) -> bool {
        client.x >= self.x
            && client.x <= self.x + self.width
            && client.y >= self.y
            && client.y <= self.y + self.height
    }

    /// Client point relative to the canvas's top-left corner.
    pub fn to_local(&self, client: Position) -> Position {
        client - Position::new(self.x, self.y)
    }
}

impl Default for CanvasBounds {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1280.0, 720.0)
    }
}

// ---------------------------------------------------------------------------
// Interaction state
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum Gesture {
    Idle,
    /// Offset follows `start_offset + (pointer - press)`.
    Panning {
        press: Position,
        start_offset: Position,
        _listener: ListenerGuard,
    },
    /// The node's view owns the listener for this gesture.
    DraggingNode { node_id: String },
    PressingConnection {
        connection_id: String,
        _listener: ListenerGuard,
    },
}

/// Public view of the interaction state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Idle,
    Panning,
    DraggingNode(String),
    PressingConnection(String),
}

/// What lies under a canvas-local point, top-most first.
#[derive(Debug, Clone, PartialEq)]
pub enum Hit {
    Connection(String),
    Node(String),
    Background,
}

// ---------------------------------------------------------------------------
// CanvasController
// ---------------------------------------------------------------------------

pub struct CanvasController {
    config: CanvasConfig,
    bounds: CanvasBounds,
    viewport: Viewport,
    selected_node_id: Option<String>,
    gesture: Gesture,
    node_views: HashMap<String, NodeView>,
    listeners: DocumentListeners,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::with_valid_config(CanvasConfig::default())
    }
}

impl CanvasController {
    /// Create a controller after validating `config`.
    pub fn new(config: CanvasConfig) -> Result<Self, CanvasError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: CanvasConfig) -> Self {
        Self {
            config,
            bounds: CanvasBounds::default(),
            viewport: Viewport::default(),
            selected_node_id: None,
            gesture: Gesture::Idle,
            node_views: HashMap::new(),
            listeners: DocumentListeners::new(),
        }
    }

    pub fn with_bounds(mut self, bounds: CanvasBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn bounds(&self) -> CanvasBounds {
        self.bounds
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    pub fn offset(&self) -> Position {
        self.viewport.offset
    }

    pub fn selected_node_id(&self) -> Option<&str> {
        self.selected_node_id.as_deref()
    }

    pub fn interaction(&self) -> Interaction {
        match &self.gesture {
            Gesture::Idle => Interaction::Idle,
            Gesture::Panning { .. } => Interaction::Panning,
            Gesture::DraggingNode { node_id } => Interaction::DraggingNode(node_id.clone()),
            Gesture::PressingConnection { connection_id, .. } => {
                Interaction::PressingConnection(connection_id.clone())
            }
        }
    }

    /// Number of document pointer listeners currently registered.
    pub fn active_document_listeners(&self) -> usize {
        self.listeners.active()
    }

    // -----------------------------------------------------------------------
    // Event entry points
    // -----------------------------------------------------------------------

    /// Process one event against the host's snapshot, then deliver the
    /// resulting requests to the host.
    pub fn handle<H: CanvasHost + ?Sized>(&mut self, event: &PointerEvent, host: &mut H) {
        let requests = self.process(event, host.nodes(), host.connections());
        for request in requests {
            request.dispatch(host);
        }
    }

    /// Process one event and return the callback requests it produced.
    pub fn process(
        &mut self,
        event: &PointerEvent,
        nodes: &[Node],
        connections: &[Connection],
    ) -> Vec<CanvasRequest> {
        self.sync_views(nodes);

        let mut requests = Vec::new();
        match *event {
            PointerEvent::Down { button, .. } => {
                let client = event.position();
                if self.bounds.contains(client) {
                    self.pointer_down(client, button, nodes, connections, &mut requests);
                }
            }
            PointerEvent::Move { .. } => {
                if self.listeners.is_listening() {
                    self.pointer_move(event.position(), &mut requests);
                }
            }
            PointerEvent::Up { .. } => {
                if self.listeners.is_listening() {
                    self.pointer_up(event.position(), nodes, connections, &mut requests);
                }
            }
            PointerEvent::Wheel { delta_y, .. } => {
                let client = event.position();
                if self.bounds.contains(client) {
                    let cursor = self.bounds.to_local(client);
                    self.viewport.apply_wheel(cursor, delta_y, &self.config);
                    debug!(zoom = self.viewport.zoom, "wheel zoom");
                }
            }
        }
        requests
    }

    /// Drop views of nodes that are no longer in the snapshot.
    fn sync_views(&mut self, nodes: &[Node]) {
        self.node_views
            .retain(|id, _| nodes.iter().any(|n| &n.id == id));

        if let Gesture::DraggingNode { node_id } = &self.gesture {
            if !self.node_views.contains_key(node_id) {
                debug!("dragged node '{node_id}' disappeared; ending drag");
                self.gesture = Gesture::Idle;
            }
        }
        if let Some(selected) = &self.selected_node_id {
            if !nodes.iter().any(|n| &n.id == selected) {
                self.selected_node_id = None;
            }
        }
    }

    fn pointer_down(
        &mut self,
        client: Position,
        button: PointerButton,
        nodes: &[Node],
        connections: &[Connection],
        requests: &mut Vec<CanvasRequest>,
    ) {
        if !matches!(self.gesture, Gesture::Idle) {
            return;
        }

        match self.hit_test(self.bounds.to_local(client), nodes, connections) {
            Hit::Connection(connection_id) => {
                debug!("pressing connection '{connection_id}'");
                self.gesture = Gesture::PressingConnection {
                    connection_id,
                    _listener: self.listeners.acquire(),
                };
            }
            Hit::Node(node_id) => {
                let Some(node) = nodes.iter().find(|n| n.id == node_id) else {
                    return;
                };
                let view = self
                    .node_views
                    .entry(node_id.clone())
                    .or_insert_with(|| NodeView::new(node_id.clone()));
                if let Some(signal) = view.pointer_down(node, client, button, &self.listeners) {
                    self.gesture = Gesture::DraggingNode { node_id };
                    self.apply_signal(signal, requests);
                }
            }
            Hit::Background => {
                self.selected_node_id = None;
                debug!("panning started");
                self.gesture = Gesture::Panning {
                    press: client,
                    start_offset: self.viewport.offset,
                    _listener: self.listeners.acquire(),
                };
            }
        }
    }

    fn pointer_move(&mut self, client: Position, requests: &mut Vec<CanvasRequest>) {
        match &self.gesture {
            Gesture::Panning { press, start_offset, .. } => {
                self.viewport.offset = *start_offset + (client - *press);
            }
            Gesture::DraggingNode { node_id } => {
                let signal = self
                    .node_views
                    .get_mut(node_id)
                    .and_then(|view| view.pointer_move(client));
                if let Some(signal) = signal {
                    self.apply_signal(signal, requests);
                }
            }
            Gesture::PressingConnection { .. } | Gesture::Idle => {}
        }
    }

    fn pointer_up(
        &mut self,
        client: Position,
        nodes: &[Node],
        connections: &[Connection],
        requests: &mut Vec<CanvasRequest>,
    ) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Panning { .. } => {
                debug!(
                    offset_x = self.viewport.offset.x,
                    offset_y = self.viewport.offset.y,
                    "panning ended"
                );
            }
            Gesture::DraggingNode { node_id } => {
                if let Some(view) = self.node_views.get_mut(&node_id) {
                    view.pointer_up();
                }
            }
            Gesture::PressingConnection { connection_id, .. } => {
                let released_on = self.hit_test(self.bounds.to_local(client), nodes, connections);
                if released_on == Hit::Connection(connection_id.clone()) {
                    info!("deleting connection '{connection_id}'");
                    requests.push(CanvasRequest::DeleteConnection { connection_id });
                }
            }
            Gesture::Idle => {}
        }
    }

    fn apply_signal(&mut self, signal: NodeSignal, requests: &mut Vec<CanvasRequest>) {
        match signal {
            NodeSignal::Select(node_id) => {
                self.selected_node_id = Some(node_id);
            }
            NodeSignal::Drag { node_id, position } => {
                requests.push(CanvasRequest::UpdateNode {
                    node_id,
                    patch: NodePatch::position(position),
                });
            }
            NodeSignal::Connect { from_node_id, to_node_id } => {
                requests.push(CanvasRequest::CreateConnection { from_node_id, to_node_id });
            }
        }
    }

    // -----------------------------------------------------------------------
    // Hit-testing
    // -----------------------------------------------------------------------

    /// Find what is drawn at a canvas-local point.
    ///
    /// Connections are on top, then the selected card, then later cards over
    /// earlier ones.
    pub fn hit_test(&self, local: Position, nodes: &[Node], connections: &[Connection]) -> Hit {
        for connection in connections.iter().rev() {
            let path = ConnectionPath::resolve(connection, nodes, &self.viewport, &self.config);
            if path.is_some_and(|path| path.hit(local, &self.config)) {
                return Hit::Connection(connection.id.clone());
            }
        }

        let on_card = |node: &Node| {
            NodeCard::build(node, &self.viewport, &self.config, false, false).contains(local)
        };
        if let Some(selected) = self.selected_node_id.as_deref() {
            if let Some(node) = nodes.iter().find(|n| n.id == selected) {
                if on_card(node) {
                    return Hit::Node(node.id.clone());
                }
            }
        }
        nodes
            .iter()
            .rev()
            .find(|node| on_card(node))
            .map_or(Hit::Background, |node| Hit::Node(node.id.clone()))
    }

    // -----------------------------------------------------------------------
    // View commands
    // -----------------------------------------------------------------------

    pub fn zoom_in(&mut self) {
        self.viewport.zoom = self
            .config
            .clamp_zoom(self.viewport.zoom * self.config.button_zoom_in_factor);
        info!(zoom = self.viewport.zoom, "zoom in");
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom = self
            .config
            .clamp_zoom(self.viewport.zoom * self.config.button_zoom_out_factor);
        info!(zoom = self.viewport.zoom, "zoom out");
    }

    pub fn reset_view(&mut self) {
        self.viewport = Viewport::default();
        info!("view reset");
    }

    /// Zoom and pan so every node is visible and centered. No-op without nodes.
    pub fn fit_to_screen(&mut self, nodes: &[Node]) {
        let Some(bounds) = ContentBounds::of_nodes(nodes, &self.config) else {
            return;
        };
        self.viewport = fit_viewport(&bounds, self.bounds.width, self.bounds.height, &self.config);
        info!(
            zoom = self.viewport.zoom,
            offset_x = self.viewport.offset.x,
            offset_y = self.viewport.offset.y,
            "fit to screen"
        );
    }

    /// Ask the host for a new connection, as a node's `onConnect` would.
    ///
    /// No pointer gesture produces this; it is exposed for hosts.
    pub fn connect<H: CanvasHost + ?Sized>(
        &mut self,
        from_node_id: &str,
        to_node_id: &str,
        host: &mut H,
    ) {
        let signal = NodeView::new(from_node_id).connect_to(to_node_id);
        let mut requests = Vec::new();
        self.apply_signal(signal, &mut requests);
        for request in requests {
            request.dispatch(host);
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// Resolve a frame for the given snapshot.
    pub fn scene(&self, nodes: &[Node], connections: &[Connection]) -> Scene {
        let paths: Vec<ConnectionPath> = connections
            .iter()
            .filter_map(|connection| {
                let path = ConnectionPath::resolve(connection, nodes, &self.viewport, &self.config);
                if path.is_none() {
                    debug!("skipping connection '{}': endpoint not found", connection.id);
                }
                path
            })
            .collect();

        let cards: Vec<NodeCard> = nodes
            .iter()
            .map(|node| {
                let selected = self.selected_node_id.as_deref() == Some(node.id.as_str());
                let dragging = self
                    .node_views
                    .get(&node.id)
                    .is_some_and(NodeView::is_dragging);
                NodeCard::build(node, &self.viewport, &self.config, selected, dragging)
            })
            .collect();

        Scene {
            width: self.bounds.width,
            height: self.bounds.height,
            viewport: self.viewport,
            layer_transform: self.viewport.css_transform(),
            grid: GridBackground::for_viewport(&self.viewport, self.config.grid_cell),
            connections: paths,
            nodes: cards,
            info: CanvasInfo {
                nodes: nodes.len(),
                connections: connections.len(),
                zoom_percent: (self.viewport.zoom * 100.0).round() as i64,
            },
        }
    }
}
