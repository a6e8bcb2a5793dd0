//! Structural validation. Run this before handing a diagram to a canvas.
//!
//! Rules enforced:
//! 1. Node IDs must be unique within the diagram.
//! 2. Connection IDs must be unique within the diagram.
//!
//! Connections whose endpoints name missing nodes are *not* an error: they
//! are reported by [`dangling_connections`] and skipped when rendering.

use std::collections::HashSet;

use crate::models::{Connection, Node};
use crate::DiagramError;

/// Validate id uniqueness across nodes and connections.
///
/// # Errors
/// - [`DiagramError::DuplicateNodeId`] if two nodes share an ID.
/// - [`DiagramError::DuplicateConnectionId`] if two connections share an ID.
pub fn validate(nodes: &[Node], connections: &[Connection]) -> Result<(), DiagramError> {
    // -----------------------------------------------------------------------
    // 1. Ensure node IDs are unique
    // -----------------------------------------------------------------------
    let mut seen_nodes: HashSet<&str> = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !seen_nodes.insert(node.id.as_str()) {
            return Err(DiagramError::DuplicateNodeId(node.id.clone()));
        }
    }

    // -----------------------------------------------------------------------
    // 2. Ensure connection IDs are unique
    // -----------------------------------------------------------------------
    let mut seen_connections: HashSet<&str> = HashSet::with_capacity(connections.len());
    for connection in connections {
        if !seen_connections.insert(connection.id.as_str()) {
            return Err(DiagramError::DuplicateConnectionId(connection.id.clone()));
        }
    }

    Ok(())
}

/// Connections with at least one endpoint that matches no node, in input order.
pub fn dangling_connections<'a>(
    nodes: &[Node],
    connections: &'a [Connection],
) -> Vec<&'a Connection> {
    let node_set: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    connections
        .iter()
        .filter(|c| {
            !node_set.contains(c.from_node_id.as_str()) || !node_set.contains(c.to_node_id.as_str())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeKind;

    fn make_node(id: &str) -> Node {
        Node::new(id, id.to_uppercase(), NodeKind::Action)
    }

    #[test]
    fn unique_ids_are_valid() {
        let nodes = vec![make_node("a"), make_node("b")];
        let connections = vec![Connection::new("c1", "a", "b")];
        assert!(validate(&nodes, &connections).is_ok());
    }

    #[test]
    fn duplicate_node_id_is_rejected() {
        let nodes = vec![make_node("a"), make_node("a")];
        assert!(matches!(
            validate(&nodes, &[]),
            Err(DiagramError::DuplicateNodeId(id)) if id == "a"
        ));
    }

    #[test]
    fn duplicate_connection_id_is_rejected() {
        let nodes = vec![make_node("a"), make_node("b")];
        let connections = vec![
            Connection::new("c1", "a", "b"),
            Connection::new("c1", "b", "a"),
        ];
        assert!(matches!(
            validate(&nodes, &connections),
            Err(DiagramError::DuplicateConnectionId(id)) if id == "c1"
        ));
    }

    #[test]
    fn dangling_references_are_reported_not_rejected() {
        let nodes = vec![make_node("a")];
        let connections = vec![
            Connection::new("ok", "a", "a"),
            Connection::new("to-ghost", "a", "ghost"),
            Connection::new("from-ghost", "ghost", "a"),
        ];
        assert!(validate(&nodes, &connections).is_ok());

        let dangling: Vec<&str> = dangling_connections(&nodes, &connections)
            .into_iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(dangling, vec!["to-ghost", "from-ghost"]);
    }
}
