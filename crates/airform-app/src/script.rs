//! Recorded interaction scripts for headless replay.
//!
//! A script is a JSON document with timed events: hand frames carrying a
//! gesture label and fingertip/pinch positions, hand-absent frames, pointer
//! events and bare scheduler ticks.

use airform_core::config::InteractionConfig;
use airform_core::gesture::{
    GestureClassifier, GestureKind, GestureState, HandLandmarks, INDEX_TIP, LANDMARK_COUNT, THUMB_TIP, WRIST,
};
use airform_core::input::PointerEvent;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Script loading errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Event {index} at {at_ms} ms is earlier than the previous event")]
    OutOfOrder { index: usize, at_ms: u64 },
    #[error("Invalid script config: {0}")]
    Config(#[from] airform_core::config::ConfigError),
}

/// One timed script event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// A tracked hand classified as `gesture`.
    Hand {
        at_ms: u64,
        gesture: GestureKind,
        tip: Point,
        /// Defaults to the fingertip.
        #[serde(default)]
        pinch: Option<Point>,
    },
    /// A tracker frame with no hand.
    NoHand { at_ms: u64 },
    /// Mouse or touch input.
    Pointer { at_ms: u64, event: PointerEvent },
    /// Render tick without input.
    Tick { at_ms: u64 },
}

impl ScriptEvent {
    pub fn at_ms(&self) -> u64 {
        match self {
            ScriptEvent::Hand { at_ms, .. }
            | ScriptEvent::NoHand { at_ms }
            | ScriptEvent::Pointer { at_ms, .. }
            | ScriptEvent::Tick { at_ms } => *at_ms,
        }
    }
}

/// A replayable session recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Interaction overrides; defaults when absent.
    #[serde(default)]
    pub config: Option<InteractionConfig>,
    /// Viewport size.
    #[serde(default = "default_viewport")]
    pub viewport: Size,
    pub events: Vec<ScriptEvent>,
}

fn default_viewport() -> Size {
    Size::new(1280.0, 720.0)
}

impl Script {
    /// Parse and validate a script.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let script: Self = serde_json::from_str(json)?;
        script.validate()?;
        Ok(script)
    }

    /// Load a script file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Events must be in time order; an embedded config must be valid.
    pub fn validate(&self) -> Result<(), ScriptError> {
        if let Some(config) = &self.config {
            config.validate()?;
        }
        let mut last = 0;
        for (index, event) in self.events.iter().enumerate() {
            let at_ms = event.at_ms();
            if at_ms < last {
                return Err(ScriptError::OutOfOrder { index, at_ms });
            }
            last = at_ms;
        }
        Ok(())
    }

    /// Timestamp of the last event.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.events.last().map_or(0, ScriptEvent::at_ms))
    }
}

/// Build landmarks whose index tip is `tip` and whose thumb/index midpoint is
/// `pinch`. The remaining joints are spread between the wrist and the tip.
pub fn synthetic_hand(tip: Point, pinch: Point) -> HandLandmarks {
    let wrist = tip + Vec2::new(0.0, 160.0);
    let mut points = [wrist; LANDMARK_COUNT];
    for (i, p) in points.iter_mut().enumerate().skip(WRIST + 1) {
        let finger = ((i - 1) / 4) as f64;
        let joint = ((i - 1) % 4 + 1) as f64 / 4.0;
        let knuckle = wrist + Vec2::new((finger - 2.0) * 20.0, -60.0);
        *p = knuckle.lerp(knuckle + Vec2::new(0.0, -60.0), joint);
    }
    points[INDEX_TIP] = tip;
    points[THUMB_TIP] = pinch + (pinch - tip);
    HandLandmarks::new(points)
}

/// Classifier that replays recorded gesture labels.
#[derive(Debug, Clone, Default)]
pub struct ScriptedClassifier {
    next: GestureKind,
    current: GestureKind,
    since: Option<Instant>,
    last_tip: Option<(Point, Instant)>,
}

impl ScriptedClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label reported for the next frame.
    pub fn set_next(&mut self, kind: GestureKind) {
        self.next = kind;
    }
}

impl GestureClassifier for ScriptedClassifier {
    fn detect(&mut self, landmarks: &HandLandmarks, now: Instant) -> GestureState {
        let previous = self.current;
        if self.next != self.current || self.since.is_none() {
            self.since = Some(now);
        }
        self.current = self.next;

        let tip = self.index_tip(landmarks);
        let velocity = match self.last_tip {
            Some((last, at)) => {
                let dt = now.saturating_duration_since(at).as_secs_f64();
                if dt > 0.0 { (tip - last) / dt } else { Vec2::ZERO }
            }
            None => Vec2::ZERO,
        };
        self.last_tip = Some((tip, now));

        GestureState {
            current: self.current,
            previous,
            duration: self.since.map_or(Duration::ZERO, |t| now.saturating_duration_since(t)),
            velocity,
            confidence: 1.0,
        }
    }
}
