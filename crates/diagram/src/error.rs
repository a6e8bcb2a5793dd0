//! Diagram-level error types.

use thiserror::Error;

/// Errors produced while building, parsing, or editing a diagram.
#[derive(Debug, Error)]
pub enum DiagramError {
    // ------ Structural errors ------

    /// Two or more nodes share the same ID.
    #[error("duplicate node ID: '{0}'")]
    DuplicateNodeId(String),

    /// Two or more connections share the same ID.
    #[error("duplicate connection ID: '{0}'")]
    DuplicateConnectionId(String),

    // ------ Closed enumerations ------

    /// A node `type` string outside {trigger, action, condition, webhook}.
    #[error("unknown node type: '{0}'")]
    UnknownKind(String),

    /// A node `status` string outside {active, inactive, error, running}.
    #[error("unknown node status: '{0}'")]
    UnknownStatus(String),

    // ------ Lookups ------

    #[error("node not found: '{0}'")]
    NodeNotFound(String),

    #[error("connection not found: '{0}'")]
    ConnectionNotFound(String),

    /// The serialized diagram could not be parsed.
    #[error("invalid diagram JSON: {0}")]
    Json(#[from] serde_json::Error),
}
