//! Canvas-level error type.

use thiserror::Error;

/// Errors returned when a [`CanvasConfig`](crate::CanvasConfig) is rejected.
///
/// Gestures and rendering never fail; a bad config is the only thing that
/// can stop a canvas from being built.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CanvasError {
    /// Zoom bounds must satisfy `0 < min <= max`.
    #[error("invalid zoom bounds: min {min}, max {max}")]
    InvalidZoomBounds { min: f64, max: f64 },

    /// A size, factor, or tolerance that must be strictly positive.
    #[error("config field '{field}' must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    /// The config file could not be parsed.
    #[error("invalid canvas config: {0}")]
    Parse(String),
}
