//! Pointer input delivered to the canvas.
//!
//! Coordinates are client-space (relative to the host window), matching what
//! a browser or windowing toolkit reports. The controller converts to
//! canvas-local coordinates using its bounds.

use diagram::Position;
use serde::{Deserialize, Serialize};

/// Mouse button that produced a press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// One pointer event.
///
/// `Down` and `Wheel` are canvas events: they only count when they land
/// inside the canvas. `Move` and `Up` are document events: they reach the
/// canvas wherever they happen, but only while a gesture holds a listener.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        button: PointerButton,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up {
        x: f64,
        y: f64,
        #[serde(default)]
        button: PointerButton,
    },
    Wheel {
        x: f64,
        y: f64,
        delta_y: f64,
    },
}

impl PointerEvent {
    /// Primary-button press.
    pub fn down(x: f64, y: f64) -> Self {
        Self::Down { x, y, button: PointerButton::Primary }
    }

    pub fn move_to(x: f64, y: f64) -> Self {
        Self::Move { x, y }
    }

    /// Primary-button release.
    pub fn up(x: f64, y: f64) -> Self {
        Self::Up { x, y, button: PointerButton::Primary }
    }

    pub fn wheel(x: f64, y: f64, delta_y: f64) -> Self {
        Self::Wheel { x, y, delta_y }
    }

    pub fn position(&self) -> Position {
        match *self {
            Self::Down { x, y, .. }
            | Self::Move { x, y }
            | Self::Up { x, y, .. }
            | Self::Wheel { x, y, .. } => Position::new(x, y),
        }
    }
}
