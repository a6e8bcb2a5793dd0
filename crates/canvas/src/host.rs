//! The `CanvasHost` trait: the contract between a canvas and whoever owns
//! the diagram data.

use diagram::{Connection, Diagram, Node, NodePatch};
use tracing::warn;

/// Owner of the node and connection arrays a canvas renders.
///
/// The canvas reads the snapshot through [`nodes`](CanvasHost::nodes) and
/// [`connections`](CanvasHost::connections) and never mutates it; every change
/// goes through one of the `on_*` callbacks. The host decides whether and how
/// to apply, merge, or persist it.
pub trait CanvasHost {
    fn nodes(&self) -> &[Node];

    fn connections(&self) -> &[Connection];

    /// A node's fields (usually its position) should change.
    fn on_node_update(&mut self, node_id: &str, patch: NodePatch);

    /// A new connection from `from_node_id` to `to_node_id` is requested.
    fn on_connection_create(&mut self, from_node_id: &str, to_node_id: &str);

    /// The connection with `connection_id` should be removed.
    fn on_connection_delete(&mut self, connection_id: &str);
}

/// A callback invocation produced by the canvas, not yet delivered.
///
/// The controller computes requests against a borrowed snapshot and only
/// then hands them to the host, so a host can be both the snapshot source
/// and the mutable callback target.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasRequest {
    UpdateNode { node_id: String, patch: NodePatch },
    CreateConnection { from_node_id: String, to_node_id: String },
    DeleteConnection { connection_id: String },
}

impl CanvasRequest {
    pub fn dispatch<H: CanvasHost + ?Sized>(self, host: &mut H) {
        match self {
            Self::UpdateNode { node_id, patch } => host.on_node_update(&node_id, patch),
            Self::CreateConnection { from_node_id, to_node_id } => {
                host.on_connection_create(&from_node_id, &to_node_id)
            }
            Self::DeleteConnection { connection_id } => host.on_connection_delete(&connection_id),
        }
    }
}

// ---------------------------------------------------------------------------
// Diagram as host
// ---------------------------------------------------------------------------

impl CanvasHost for Diagram {
    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn connections(&self) -> &[Connection] {
        &self.connections
    }

    fn on_node_update(&mut self, node_id: &str, patch: NodePatch) {
        if let Err(e) = self.apply_patch(node_id, &patch) {
            warn!("ignoring node update: {e}");
        }
    }

    fn on_connection_create(&mut self, from_node_id: &str, to_node_id: &str) {
        self.create_connection(from_node_id, to_node_id);
    }

    fn on_connection_delete(&mut self, connection_id: &str) {
        if let Err(e) = self.delete_connection(connection_id) {
            warn!("ignoring connection delete: {e}");
        }
    }
}
