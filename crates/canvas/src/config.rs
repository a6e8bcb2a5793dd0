//! Tuning knobs for the canvas.

use serde::{Deserialize, Serialize};

use crate::CanvasError;

/// Geometry and interaction constants used by [`CanvasController`](crate::CanvasController).
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    /// Lower zoom bound (inclusive).
    pub min_zoom: f64,
    /// Upper zoom bound (inclusive).
    pub max_zoom: f64,
    /// Multiplier for a wheel tick scrolling away from the user.
    pub wheel_zoom_out_factor: f64,
    /// Multiplier for a wheel tick scrolling toward the user.
    pub wheel_zoom_in_factor: f64,
    /// Multiplier applied by the zoom-in button.
    pub button_zoom_in_factor: f64,
    /// Multiplier applied by the zoom-out button.
    pub button_zoom_out_factor: f64,
    /// Node card width in model units.
    pub card_width: f64,
    /// Node card height in model units. Connections attach at half height.
    pub card_height: f64,
    /// Screen padding kept around the content by fit-to-screen.
    pub fit_padding: f64,
    /// Background grid cell size in screen pixels.
    pub grid_cell: f64,
    /// Arrowhead length along the x axis, in screen pixels.
    pub arrow_length: f64,
    /// Arrowhead half height, in screen pixels.
    pub arrow_half_width: f64,
    /// Max screen distance from a curve that still counts as a click on it.
    pub connection_hit_tolerance: f64,
    /// Line segments used to approximate a curve for hit-testing.
    pub curve_samples: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 3.0,
            wheel_zoom_out_factor: 0.9,
            wheel_zoom_in_factor: 1.1,
            button_zoom_in_factor: 1.2,
            button_zoom_out_factor: 0.8,
            card_width: 256.0,
            card_height: 160.0,
            fit_padding: 50.0,
            grid_cell: 20.0,
            arrow_length: 8.0,
            arrow_half_width: 4.0,
            connection_hit_tolerance: 4.0,
            curve_samples: 32,
        }
    }
}

impl CanvasConfig {
    /// Parse a JSON config, filling missing keys with defaults, and validate it.
    pub fn from_json(raw: &str) -> Result<Self, CanvasError> {
        let config: CanvasConfig =
            serde_json::from_str(raw).map_err(|e| CanvasError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every bound, size, and factor is usable.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(CanvasError::InvalidZoomBounds {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }

        let positive = [
            ("wheelZoomOutFactor", self.wheel_zoom_out_factor),
            ("wheelZoomInFactor", self.wheel_zoom_in_factor),
            ("buttonZoomInFactor", self.button_zoom_in_factor),
            ("buttonZoomOutFactor", self.button_zoom_out_factor),
            ("cardWidth", self.card_width),
            ("cardHeight", self.card_height),
            ("gridCell", self.grid_cell),
            ("connectionHitTolerance", self.connection_hit_tolerance),
            ("curveSamples", self.curve_samples as f64),
        ];
        for (field, value) in positive {
            // `!(v > 0)` also catches NaN.
            if !(value > 0.0) {
                return Err(CanvasError::NonPositive { field, value });
            }
        }
        if self.fit_padding < 0.0 {
            return Err(CanvasError::NonPositive {
                field: "fitPadding",
                value: self.fit_padding,
            });
        }
        Ok(())
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(CanvasConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_overrides_only_given_keys() {
        let config = CanvasConfig::from_json(r#"{"maxZoom": 5.0, "gridCell": 24}"#).unwrap();
        assert_eq!(config.max_zoom, 5.0);
        assert_eq!(config.grid_cell, 24.0);
        assert_eq!(config.min_zoom, 0.1);
        assert_eq!(config.card_width, 256.0);
    }

    #[test]
    fn inverted_zoom_bounds_are_rejected() {
        let config = CanvasConfig { min_zoom: 2.0, max_zoom: 1.0, ..CanvasConfig::default() };
        assert_eq!(
            config.validate(),
            Err(CanvasError::InvalidZoomBounds { min: 2.0, max: 1.0 })
        );
    }

    #[test]
    fn zero_card_width_is_rejected() {
        let err = CanvasConfig::from_json(r#"{"cardWidth": 0}"#).unwrap_err();
        assert!(matches!(err, CanvasError::NonPositive { field: "cardWidth", .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            CanvasConfig::from_json("{ nope"),
            Err(CanvasError::Parse(_))
        ));
    }

    #[test]
    fn clamp_zoom_respects_bounds() {
        let config = CanvasConfig::default();
        assert_eq!(config.clamp_zoom(0.01), 0.1);
        assert_eq!(config.clamp_zoom(10.0), 3.0);
        assert_eq!(config.clamp_zoom(1.5), 1.5);
    }
}
