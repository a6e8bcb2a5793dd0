//! `canvas` crate: the interactive workflow-diagram canvas.
//!
//! [`CanvasController`] turns pointer events into viewport changes, node
//! drags, and connection deletions, and resolves a [`Scene`] for drawing.
//! It never owns diagram data: a [`CanvasHost`] supplies the snapshot and
//! receives every requested change.

pub mod config;
pub mod error;
pub mod event;
pub mod listeners;
pub mod viewport;
pub mod connection;
pub mod node_view;
pub mod scene;
pub mod host;
pub mod controller;
pub mod mock;

pub use config::CanvasConfig;
pub use error::CanvasError;
pub use event::{PointerButton, PointerEvent};
pub use viewport::{ContentBounds, Viewport};
pub use connection::ConnectionPath;
pub use node_view::{NodeCard, NodeSignal, NodeView};
pub use scene::Scene;
pub use host::{CanvasHost, CanvasRequest};
pub use controller::{CanvasBounds, CanvasController, Hit, Interaction};
