//! `Diagram`, the owner of node and connection data.
//!
//! A canvas never mutates the slices it renders. It asks the owner to merge
//! node patches and to add or remove connections; `Diagram` is the reference
//! owner that does so in memory and serializes the result as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::models::{Connection, Node, NodePatch, NodeStatus, Position};
use crate::templates::NodeTemplate;
use crate::validate::{dangling_connections, validate};
use crate::DiagramError;

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Counts shown in the editor sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramStats {
    pub total_nodes: usize,
    pub connections: usize,
    pub active_nodes: usize,
}

// ---------------------------------------------------------------------------
// Diagram
// ---------------------------------------------------------------------------

/// A complete workflow diagram.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Diagram {
    /// An empty diagram.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            nodes: Vec::new(),
            connections: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Build a diagram from parts, rejecting duplicate ids.
    pub fn from_parts(
        name: impl Into<String>,
        nodes: Vec<Node>,
        connections: Vec<Connection>,
    ) -> Result<Self, DiagramError> {
        validate(&nodes, &connections)?;
        Ok(Self {
            nodes,
            connections,
            ..Self::new(name)
        })
    }

    /// Parse and validate a serialized diagram.
    pub fn from_json(raw: &str) -> Result<Self, DiagramError> {
        let diagram: Diagram = serde_json::from_str(raw)?;
        validate(&diagram.nodes, &diagram.connections)?;
        for dangling in diagram.dangling_connections() {
            warn!(
                "connection '{}' references a missing node ({} -> {})",
                dangling.id, dangling.from_node_id, dangling.to_node_id
            );
        }
        Ok(diagram)
    }

    pub fn to_json_pretty(&self) -> Result<String, DiagramError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // -----------------------------------------------------------------------
    // Nodes
    // -----------------------------------------------------------------------

    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    /// Append a node, rejecting an id that is already in use.
    pub fn add_node(&mut self, node: Node) -> Result<&Node, DiagramError> {
        if self.node(&node.id).is_some() {
            return Err(DiagramError::DuplicateNodeId(node.id));
        }
        let index = self.nodes.len();
        self.nodes.push(node);
        Ok(&self.nodes[index])
    }

    /// Append a fresh inactive node built from `template` at `position`.
    #[instrument(skip(self, template), fields(template = template.title))]
    pub fn add_from_template(&mut self, template: &NodeTemplate, position: Position) -> &Node {
        let (inputs, outputs) = template.default_ports();
        let node = Node {
            id: format!("node_{}", Uuid::new_v4().simple()),
            title: template.title.to_owned(),
            description: Some(template.description.to_owned()),
            kind: template.kind,
            status: NodeStatus::Inactive,
            position,
            inputs,
            outputs,
        };
        debug!("adding node '{}'", node.id);
        let index = self.nodes.len();
        self.nodes.push(node);
        &self.nodes[index]
    }

    /// Merge `patch` into the node with `node_id`.
    pub fn apply_patch(&mut self, node_id: &str, patch: &NodePatch) -> Result<(), DiagramError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == node_id)
            .ok_or_else(|| DiagramError::NodeNotFound(node_id.to_owned()))?;
        if patch.is_empty() {
            debug!("empty patch for node '{node_id}'");
            return Ok(());
        }
        node.apply(patch);
        Ok(())
    }

    /// Remove a node. Connections that referenced it are left in place and
    /// become dangling; see [`Diagram::prune_dangling`].
    pub fn remove_node(&mut self, node_id: &str) -> Result<Node, DiagramError> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == node_id)
            .ok_or_else(|| DiagramError::NodeNotFound(node_id.to_owned()))?;
        Ok(self.nodes.remove(index))
    }

    // -----------------------------------------------------------------------
    // Connections
    // -----------------------------------------------------------------------

    /// Append a connection with a generated id.
    ///
    /// Endpoints are weak references and are not checked.
    pub fn create_connection(&mut self, from_node_id: &str, to_node_id: &str) -> &Connection {
        let connection = Connection::new(
            format!("conn_{}", Uuid::new_v4().simple()),
            from_node_id,
            to_node_id,
        );
        debug!("adding connection '{}' ({from_node_id} -> {to_node_id})", connection.id);
        let index = self.connections.len();
        self.connections.push(connection);
        &self.connections[index]
    }

    pub fn delete_connection(&mut self, connection_id: &str) -> Result<Connection, DiagramError> {
        let index = self
            .connections
            .iter()
            .position(|c| c.id == connection_id)
            .ok_or_else(|| DiagramError::ConnectionNotFound(connection_id.to_owned()))?;
        Ok(self.connections.remove(index))
    }

    pub fn dangling_connections(&self) -> Vec<&Connection> {
        dangling_connections(&self.nodes, &self.connections)
    }

    /// Drop every dangling connection and return how many were removed.
    pub fn prune_dangling(&mut self) -> usize {
        let before = self.connections.len();
        let nodes = &self.nodes;
        self.connections.retain(|c| {
            let has = |id: &str| nodes.iter().any(|n| n.id == id);
            has(&c.from_node_id) && has(&c.to_node_id)
        });
        before - self.connections.len()
    }

    pub fn stats(&self) -> DiagramStats {
        DiagramStats {
            total_nodes: self.nodes.len(),
            connections: self.connections.len(),
            active_nodes: self
                .nodes
                .iter()
                .filter(|n| n.status == NodeStatus::Active)
                .count(),
        }
    }

    // -----------------------------------------------------------------------
    // Starter content
    // -----------------------------------------------------------------------

    /// The four-node starter flow the editor opens with.
    pub fn sample() -> Self {
        use crate::models::NodeKind::{Action, Trigger};

        let nodes = vec![
            Node::new("1", "Input Webhook", Trigger)
                .with_description("Receives sales data")
                .with_status(NodeStatus::Active)
                .at(100.0, 100.0)
                .with_ports(0, 1),
            Node::new("2", "Process Data", Action)
                .with_description("Validates and formats data")
                .with_status(NodeStatus::Active)
                .at(450.0, 100.0)
                .with_ports(1, 2),
            Node::new("3", "Save to Database", Action)
                .with_description("Stores in database")
                .with_status(NodeStatus::Active)
                .at(800.0, 50.0)
                .with_ports(1, 0),
            Node::new("4", "Send Notification", Action)
                .with_description("Notifies via email")
                .with_status(NodeStatus::Active)
                .at(800.0, 200.0)
                .with_ports(1, 0),
        ];
        let connections = vec![
            Connection::new("conn1", "1", "2"),
            Connection::new("conn2", "2", "3"),
            Connection::new("conn3", "2", "4"),
        ];

        Self {
            nodes,
            connections,
            ..Self::new("Automation Workflow")
        }
    }
}
