//! `diagram` crate: workflow diagram models, validation, and the in-memory
//! owner that a canvas sends its update requests to.

pub mod models;
pub mod error;
pub mod validate;
pub mod templates;
pub mod store;

pub use models::{Connection, Node, NodeKind, NodePatch, NodeStatus, Position};
pub use error::DiagramError;
pub use validate::{dangling_connections, validate};
pub use templates::{NodeTemplate, TEMPLATES};
pub use store::{Diagram, DiagramStats};
