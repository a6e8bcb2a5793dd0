//! Core domain models for workflow diagrams.
//!
//! These types are the source of truth for what a diagram looks like in
//! memory. The serialized form uses camelCase keys and lowercase enum
//! strings, so a diagram saved by the editor page round-trips unchanged.

use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::DiagramError;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A 2D coordinate.
///
/// Used both for model-space node anchors and for screen-space points once
/// a viewport transform has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Position {
    type Output = Position;
    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;
    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Position {
    type Output = Position;
    fn mul(self, rhs: f64) -> Position {
        Position::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Position {
    type Output = Position;
    fn div(self, rhs: f64) -> Position {
        Position::new(self.x / rhs, self.y / rhs)
    }
}

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// What role a node plays in the workflow. Affects styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Trigger,
    Action,
    Condition,
    Webhook,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Trigger,
        NodeKind::Action,
        NodeKind::Condition,
        NodeKind::Webhook,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trigger   => "trigger",
            Self::Action    => "action",
            Self::Condition => "condition",
            Self::Webhook   => "webhook",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeKind {
    type Err = DiagramError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trigger"   => Ok(Self::Trigger),
            "action"    => Ok(Self::Action),
            "condition" => Ok(Self::Condition),
            "webhook"   => Ok(Self::Webhook),
            other       => Err(DiagramError::UnknownKind(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// NodeStatus
// ---------------------------------------------------------------------------

/// Runtime badge shown on a node card. Affects styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Active,
    #[default]
    Inactive,
    Error,
    Running,
}

impl NodeStatus {
    pub const ALL: [NodeStatus; 4] = [
        NodeStatus::Active,
        NodeStatus::Inactive,
        NodeStatus::Error,
        NodeStatus::Running,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active   => "active",
            Self::Inactive => "inactive",
            Self::Error    => "error",
            Self::Running  => "running",
        }
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeStatus {
    type Err = DiagramError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active"   => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "error"    => Ok(Self::Error),
            "running"  => Ok(Self::Running),
            other      => Err(DiagramError::UnknownStatus(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A single step in the workflow diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier within this diagram (referenced by connections).
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub status: NodeStatus,
    /// Top-left corner of the card in model space.
    pub position: Position,
    /// Input port count. Only "zero vs positive" matters for rendering.
    #[serde(default)]
    pub inputs: u32,
    /// Output port count. Only "zero vs positive" matters for rendering.
    #[serde(default)]
    pub outputs: u32,
}

impl Node {
    /// An inactive node at the origin with no ports.
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            kind,
            status: NodeStatus::default(),
            position: Position::ORIGIN,
            inputs: 0,
            outputs: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: NodeStatus) -> Self {
        self.status = status;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_ports(mut self, inputs: u32, outputs: u32) -> Self {
        self.inputs = inputs;
        self.outputs = outputs;
        self
    }

    pub fn has_input_port(&self) -> bool {
        self.inputs > 0
    }

    pub fn has_output_port(&self) -> bool {
        self.outputs > 0
    }

    /// Merge every field present in `patch` into this node.
    ///
    /// The node's `id` is never part of a patch.
    pub fn apply(&mut self, patch: &NodePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(inputs) = patch.inputs {
            self.inputs = inputs;
        }
        if let Some(outputs) = patch.outputs {
            self.outputs = outputs;
        }
    }
}

// ---------------------------------------------------------------------------
// NodePatch
// ---------------------------------------------------------------------------

/// Partial node fields carried by an update request.
///
/// `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<u32>,
}

impl NodePatch {
    /// A patch that only moves the node.
    pub fn position(position: Position) -> Self {
        Self { position: Some(position), ..Self::default() }
    }

    /// A patch that only changes the status badge.
    pub fn status(status: NodeStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// Directed edge from one node to another, referenced weakly by id.
///
/// Either endpoint may name a node that no longer exists; consumers skip
/// such connections instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub from_node_id: String,
    pub to_node_id: String,
}

impl Connection {
    pub fn new(
        id: impl Into<String>,
        from_node_id: impl Into<String>,
        to_node_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from_node_id: from_node_id.into(),
            to_node_id: to_node_id.into(),
        }
    }

    /// Whether either endpoint references `node_id`.
    pub fn involves_node(&self, node_id: &str) -> bool {
        self.from_node_id == node_id || self.to_node_id == node_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_and_status_strings_are_rejected() {
        assert!(matches!(
            "loop".parse::<NodeKind>(),
            Err(DiagramError::UnknownKind(s)) if s == "loop"
        ));
        assert!(matches!(
            "paused".parse::<NodeStatus>(),
            Err(DiagramError::UnknownStatus(s)) if s == "paused"
        ));
        for kind in NodeKind::ALL {
            assert_eq!(kind.as_str().parse::<NodeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn node_json_rejects_unknown_type() {
        let raw = r#"{"id":"1","title":"x","type":"loop","position":{"x":0,"y":0}}"#;
        assert!(serde_json::from_str::<Node>(raw).is_err());
    }

    #[test]
    fn node_json_uses_type_key_and_defaults_ports() {
        let raw = r#"{"id":"1","title":"Input Webhook","type":"trigger",
                      "status":"active","position":{"x":100,"y":100},"outputs":1}"#;
        let node: Node = serde_json::from_str(raw).unwrap();
        assert_eq!(node.kind, NodeKind::Trigger);
        assert_eq!(node.inputs, 0);
        assert!(!node.has_input_port());
        assert!(node.has_output_port());
    }

    #[test]
    fn connection_json_is_camel_case_and_ignores_legacy_points() {
        let raw = r#"{"id":"conn1","fromNodeId":"1","toNodeId":"2",
                      "fromPoint":{"x":0,"y":0},"toPoint":{"x":0,"y":0}}"#;
        let conn: Connection = serde_json::from_str(raw).unwrap();
        assert_eq!(conn, Connection::new("conn1", "1", "2"));
        assert!(conn.involves_node("2"));
        assert!(!conn.involves_node("3"));
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut node = Node::new("n", "Filter", NodeKind::Condition)
            .with_description("keeps rows")
            .at(10.0, 20.0)
            .with_ports(1, 1);

        node.apply(&NodePatch::position(Position::new(30.0, 40.0)));
        assert_eq!(node.position, Position::new(30.0, 40.0));
        assert_eq!(node.title, "Filter");
        assert_eq!(node.description.as_deref(), Some("keeps rows"));

        node.apply(&NodePatch::status(NodeStatus::Running));
        assert_eq!(node.status, NodeStatus::Running);
        assert_eq!(node.position, Position::new(30.0, 40.0));
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(NodePatch::default().is_empty());
        assert!(!NodePatch::position(Position::ORIGIN).is_empty());
    }

    #[test]
    fn position_arithmetic() {
        let a = Position::new(3.0, 4.0);
        assert_eq!(a + a, Position::new(6.0, 8.0));
        assert_eq!(a - a, Position::ORIGIN);
        assert_eq!(a * 2.0, Position::new(6.0, 8.0));
        assert_eq!(a / 2.0, Position::new(1.5, 2.0));
        assert_eq!(Position::ORIGIN.distance(a), 5.0);
    }
}
