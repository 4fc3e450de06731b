//! Wall-clock timers: gesture hold confirmation and the closing pulse.

use crate::stroke::Stroke;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Measures how long a gesture has been held continuously.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoldTimer {
    started: Option<Instant>,
}

impl HoldTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the timer if unset, returning the time held so far.
    pub fn hold(&mut self, now: Instant) -> Duration {
        let started = *self.started.get_or_insert(now);
        now.saturating_duration_since(started)
    }

    pub fn reset(&mut self) {
        self.started = None;
    }

    pub fn started(&self) -> Option<Instant> {
        self.started
    }

    pub fn is_set(&self) -> bool {
        self.started.is_some()
    }
}

/// Timed pulse played over a closed stroke before it is solidified.
///
/// Progress is derived from elapsed wall-clock time, so frame-rate variance
/// only changes how many intermediate values are observed.
#[derive(Debug, Clone)]
pub struct ClosingAnimation {
    stroke: Stroke,
    started: Instant,
    duration: Duration,
    progress: f64,
}

impl ClosingAnimation {
    pub fn new(stroke: Stroke, started: Instant, duration: Duration) -> Self {
        Self { stroke, started, duration, progress: 0.0 }
    }

    /// Advance to `now`. Progress never decreases and stops at exactly 1.
    pub fn advance(&mut self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started);
        let target = if self.duration.is_zero() || elapsed >= self.duration {
            1.0
        } else {
            elapsed.as_secs_f64() / self.duration.as_secs_f64()
        };
        self.progress = self.progress.max(target.min(1.0));
        self.progress
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }

    pub fn stroke(&self) -> &Stroke {
        &self.stroke
    }

    pub fn into_stroke(self) -> Stroke {
        self.stroke
    }
}
