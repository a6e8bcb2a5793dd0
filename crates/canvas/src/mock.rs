//! `MockHost`: a test double for `CanvasHost`.
//!
//! Holds a fixed snapshot and records every callback without applying it,
//! so tests can assert exactly what the canvas asked for.

use diagram::{Connection, Node, NodePatch, Position};

use crate::CanvasHost;

/// One recorded callback.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    NodeUpdate { node_id: String, patch: NodePatch },
    ConnectionCreate { from_node_id: String, to_node_id: String },
    ConnectionDelete(String),
}

/// A host that records every call it receives.
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    /// All callbacks seen, in call order.
    pub calls: Vec<HostCall>,
}

impl MockHost {
    pub fn new(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
        Self {
            nodes,
            connections,
            calls: Vec::new(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// Positions reported for `node_id`, in order.
    pub fn reported_positions(&self, node_id: &str) -> Vec<Position> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::NodeUpdate { node_id: id, patch } if id == node_id => patch.position,
                _ => None,
            })
            .collect()
    }

    /// Connection ids passed to `on_connection_delete`, in order.
    pub fn deleted_connections(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::ConnectionDelete(id) => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl CanvasHost for MockHost {
    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn connections(&self) -> &[Connection] {
        &self.connections
    }

    fn on_node_update(&mut self, node_id: &str, patch: NodePatch) {
        self.calls.push(HostCall::NodeUpdate {
            node_id: node_id.to_owned(),
            patch,
        });
    }

    fn on_connection_create(&mut self, from_node_id: &str, to_node_id: &str) {
        self.calls.push(HostCall::ConnectionCreate {
            from_node_id: from_node_id.to_owned(),
            to_node_id: to_node_id.to_owned(),
        });
    }

    fn on_connection_delete(&mut self, connection_id: &str) {
        self.calls.push(HostCall::ConnectionDelete(connection_id.to_owned()));
    }
}
