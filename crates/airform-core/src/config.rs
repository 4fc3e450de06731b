//! Tunable constants for sampling, gesture timing and rendering.

use crate::color::{SerializableColor, default_palette};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Interpolation used to turn sampled points into a visible curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveStyle {
    /// Catmull-Rom spline (tension 0.5) sampled into short segments.
    #[default]
    CatmullRom,
    /// Quadratic Bezier segments through consecutive midpoints.
    QuadraticMidpoint,
}

/// Interaction constants supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Minimum distance (px) between accepted stroke points.
    pub min_point_spacing: f64,
    /// Minimum total path length (px) for a stroke to close.
    pub min_stroke_length: f64,
    /// Palm hold (ms) required to close the current stroke.
    pub palm_hold_ms: u64,
    /// Fist hold (ms) required to clear everything.
    pub fist_hold_ms: u64,
    /// Fist hold (ms) after which clear progress is reported.
    pub fist_progress_delay_ms: u64,
    /// Duration (ms) of the closing pulse before solidification.
    pub closing_animation_ms: u64,
    /// Stroke width (px).
    pub stroke_width: f64,
    /// EMA factor applied to raw points (1.0 = no smoothing).
    pub smoothing_factor: f64,
    /// Opacity of completed strokes awaiting solidification.
    pub completed_stroke_opacity: f64,
    /// Radians of object rotation per pixel of pinch displacement.
    pub grab_rotation_factor: f64,
    /// Camera zoom delta per wheel line.
    pub wheel_zoom_factor: f64,
    /// Camera zoom delta per pixel of two-finger spread.
    pub touch_zoom_factor: f64,
    /// Curve interpolation for stroke rendering.
    pub curve_style: CurveStyle,
    /// Drawing colors, cycled after each solidified shape.
    pub palette: Vec<SerializableColor>,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_point_spacing: 3.0,
            min_stroke_length: 100.0,
            palm_hold_ms: 500,
            fist_hold_ms: 1000,
            fist_progress_delay_ms: 200,
            closing_animation_ms: 400,
            stroke_width: 4.0,
            smoothing_factor: 0.7,
            completed_stroke_opacity: 0.5,
            grab_rotation_factor: 0.01,
            wheel_zoom_factor: 0.1,
            touch_zoom_factor: 0.01,
            curve_style: CurveStyle::default(),
            palette: default_palette(),
        }
    }
}

impl InteractionConfig {
    pub fn palm_hold(&self) -> Duration {
        Duration::from_millis(self.palm_hold_ms)
    }

    pub fn fist_hold(&self) -> Duration {
        Duration::from_millis(self.fist_hold_ms)
    }

    pub fn fist_progress_delay(&self) -> Duration {
        Duration::from_millis(self.fist_progress_delay_ms)
    }

    pub fn closing_animation(&self) -> Duration {
        Duration::from_millis(self.closing_animation_ms)
    }

    /// Palette entry for a cyclic index.
    pub fn palette_color(&self, index: usize) -> SerializableColor {
        if self.palette.is_empty() {
            return SerializableColor::white();
        }
        self.palette[index % self.palette.len()]
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &str) -> ConfigError {
            ConfigError::Invalid { field, reason: reason.to_string() }
        }

        if !(self.min_point_spacing >= 0.0) {
            return Err(invalid("min_point_spacing", "must be non-negative"));
        }
        if !(self.min_stroke_length >= 0.0) {
            return Err(invalid("min_stroke_length", "must be non-negative"));
        }
        if !(self.stroke_width > 0.0) {
            return Err(invalid("stroke_width", "must be positive"));
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(invalid("smoothing_factor", "must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.completed_stroke_opacity) {
            return Err(invalid("completed_stroke_opacity", "must be in [0, 1]"));
        }
        if self.fist_progress_delay_ms > self.fist_hold_ms {
            return Err(invalid("fist_progress_delay_ms", "must not exceed fist_hold_ms"));
        }
        if self.palette.is_empty() {
            return Err(invalid("palette", "must contain at least one color"));
        }
        Ok(())
    }
}
