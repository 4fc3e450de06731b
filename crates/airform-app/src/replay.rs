//! Headless replay of a recorded script against the simulated world.

use crate::script::{Script, ScriptEvent, ScriptedClassifier, synthetic_hand};
use crate::session::Session;
use crate::sim::{SimulatedObjects, SimulatedScene, simulated_world};
use airform_core::config::InteractionConfig;
use airform_core::feedback::Feedback;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Summary of a finished replay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayReport {
    /// Tracker frames delivered (with or without a hand).
    pub tracker_frames: usize,
    /// Pointer events delivered.
    pub pointer_events: usize,
    /// Objects alive at the end.
    pub objects: usize,
    /// Strokes still closed and awaiting solidification at the end.
    pub pending_strokes: usize,
    /// Whether a stroke was still being drawn at the end.
    pub stroke_in_progress: bool,
    /// Every notice raised, in order.
    pub feedback: Vec<Feedback>,
}

impl ReplayReport {
    pub fn errors(&self) -> impl Iterator<Item = &Feedback> {
        self.feedback.iter().filter(|f| f.is_error())
    }
}

/// Replay `script`, rendering after every event. `config` is used when the
/// script carries none. After the last event the session keeps rendering
/// until closing pulses and pending object operations have settled.
pub fn replay(script: &Script, config: InteractionConfig) -> ReplayReport {
    let config = script.config.clone().unwrap_or(config);
    let settle = config.closing_animation() + Duration::from_millis(100);
    let (objects, scene, _world) = simulated_world();
    let t0 = Instant::now();
    let mut session: Session<ScriptedClassifier, SimulatedObjects, SimulatedScene> =
        Session::new(ScriptedClassifier::new(), objects, scene, config, script.viewport, t0);
    let mut report = ReplayReport::default();

    for event in &script.events {
        let now = t0 + Duration::from_millis(event.at_ms());
        match event {
            ScriptEvent::Hand { gesture, tip, pinch, .. } => {
                session.interpreter_mut().classifier_mut().set_next(*gesture);
                let hand = synthetic_hand(*tip, pinch.unwrap_or(*tip));
                session.on_tracker_frame(Some(hand), now);
                report.tracker_frames += 1;
            }
            ScriptEvent::NoHand { .. } => {
                session.on_tracker_frame(None, now);
                report.tracker_frames += 1;
            }
            ScriptEvent::Pointer { event, .. } => {
                session.on_pointer_event(event.clone());
                report.pointer_events += 1;
            }
            ScriptEvent::Tick { .. } => {}
        }
        session.render_frame(now);
        report.feedback.extend(session.drain_feedback());
    }

    let end = t0 + script.duration() + settle;
    session.render_frame(end);
    report.feedback.extend(session.drain_feedback());

    report.objects = session.bridge().object_count();
    report.pending_strokes = session.strokes().completed().len();
    report.stroke_in_progress = session.strokes().has_current();
    log::info!(
        "Replayed {} tracker frames and {} pointer events: {} objects",
        report.tracker_frames,
        report.pointer_events,
        report.objects
    );
    report
}
