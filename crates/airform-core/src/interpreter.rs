//! Gesture interpreter: turns per-frame gestures into drawing and object actions.
//!
//! The interpreter keeps one previous gesture kind, two hold timers and an
//! explicit interaction mode. Drawing and grabbing are variants of the same
//! enum, so they can never be active at once.

use crate::animation::{ClosingAnimation, HoldTimer};
use crate::bridge::{InteractionBridge, ObjectId, ObjectManager, SceneSurface, TaskOutcome};
use crate::color::SerializableColor;
use crate::config::InteractionConfig;
use crate::feedback::Feedback;
use crate::gesture::{GestureClassifier, GestureKind, GestureState, HandLandmarks};
use crate::stroke::{StrokeId, StrokeStore};
use kurbo::Point;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// What the hand is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    /// Extending the store's current stroke.
    Drawing(StrokeId),
    /// Holding an object with a pinch.
    Grabbing(ObjectId),
}

/// Stateful dispatcher from classified gestures to actions.
pub struct GestureInterpreter<C> {
    classifier: C,
    config: InteractionConfig,
    mode: InteractionMode,
    /// Gesture kind of the previous tracked frame.
    last_gesture: GestureKind,
    /// Most recent classifier output.
    last_state: Option<GestureState>,
    /// Whether a hand was present on the last frame (`None` before the first).
    hand_visible: Option<bool>,
    palm_hold: HoldTimer,
    fist_hold: HoldTimer,
    /// Pinch center on the previous frame, for rotation deltas.
    last_pinch: Option<Point>,
    /// Index into the palette for new strokes.
    color_index: usize,
    /// Closed strokes pulsing before solidification.
    closing: Vec<ClosingAnimation>,
    feedback: Vec<Feedback>,
}

impl<C: GestureClassifier> GestureInterpreter<C> {
    pub fn new(classifier: C, config: InteractionConfig) -> Self {
        Self {
            classifier,
            config,
            mode: InteractionMode::Idle,
            last_gesture: GestureKind::None,
            last_state: None,
            hand_visible: None,
            palm_hold: HoldTimer::new(),
            fist_hold: HoldTimer::new(),
            last_pinch: None,
            color_index: 0,
            closing: Vec::new(),
            feedback: Vec::new(),
        }
    }

    /// Tracker callback: classify the hand (if any) and dispatch.
    pub fn on_frame<O, S>(
        &mut self,
        landmarks: Option<&HandLandmarks>,
        now: Instant,
        strokes: &mut StrokeStore,
        bridge: &mut InteractionBridge<O, S>,
    ) where
        O: ObjectManager,
        S: SceneSurface,
    {
        let Some(hand) = landmarks else {
            self.on_hand_lost(strokes, bridge);
            return;
        };

        if self.hand_visible != Some(true) {
            if self.hand_visible.is_some() {
                self.feedback.push(Feedback::HandDetected);
            }
            self.hand_visible = Some(true);
        }

        let state = self.classifier.detect(hand, now);
        let tip = self.classifier.index_tip(hand);
        let pinch = self.classifier.pinch_center(hand);
        self.handle_gesture(state, tip, pinch, now, strokes, bridge);
    }

    /// Dispatch one classified gesture.
    pub fn handle_gesture<O, S>(
        &mut self,
        state: GestureState,
        tip: Point,
        pinch_center: Point,
        now: Instant,
        strokes: &mut StrokeStore,
        bridge: &mut InteractionBridge<O, S>,
    ) where
        O: ObjectManager,
        S: SceneSurface,
    {
        let kind = state.current;
        let mut released = false;

        if kind != self.last_gesture {
            log::debug!("Gesture {} -> {}", self.last_gesture.as_str(), kind.as_str());
            self.palm_hold.reset();
            self.fist_hold.reset();
            if kind != GestureKind::Pinch {
                released = self.release_grab(bridge);
            }
        }
        self.last_gesture = kind;
        self.last_state = Some(state);

        match kind {
            GestureKind::Draw => {
                if !released {
                    self.handle_draw(tip, strokes, bridge);
                }
            }
            GestureKind::Pinch => self.handle_pinch(pinch_center, strokes, bridge),
            GestureKind::Palm => self.handle_palm(now, strokes, bridge),
            GestureKind::Fist => self.handle_fist(now, strokes, bridge),
            GestureKind::Swipe => self.handle_swipe(tip, bridge),
            GestureKind::None => {
                self.release_grab(bridge);
            }
        }
    }

    /// Scheduler tick: advance closing pulses and collect async results.
    pub fn tick<O, S>(&mut self, now: Instant, strokes: &mut StrokeStore, bridge: &mut InteractionBridge<O, S>)
    where
        O: ObjectManager,
        S: SceneSurface,
    {
        for animation in &mut self.closing {
            animation.advance(now);
        }
        let (finished, running): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.closing).into_iter().partition(ClosingAnimation::is_finished);
        self.closing = running;

        for animation in finished {
            let stroke = animation.into_stroke();
            if !strokes.completed().iter().any(|s| s.id() == stroke.id()) {
                log::debug!("Stroke {} was cleared before solidification", stroke.id());
                continue;
            }
            log::info!("Solidifying stroke {} ({} points)", stroke.id(), stroke.len());
            bridge.solidify(&stroke);
            strokes.remove_completed_stroke(stroke.id());
            self.color_index = (self.color_index + 1) % self.config.palette.len().max(1);
        }

        for outcome in bridge.poll_pending() {
            match outcome {
                TaskOutcome::Solidified { stroke, object } => {
                    log::info!("Stroke {stroke} became object {object}");
                    self.feedback.push(Feedback::ShapeCreated(object));
                }
                TaskOutcome::SolidifyFailed { stroke, error } => {
                    log::warn!("Failed to solidify stroke {stroke}: {error}");
                    self.feedback.push(Feedback::Error(format!("Could not create shape: {error}")));
                }
                TaskOutcome::Cleared => self.feedback.push(Feedback::Cleared),
                TaskOutcome::ClearFailed(error) => {
                    log::warn!("Failed to clear objects: {error}");
                    self.feedback.push(Feedback::Error(format!("Could not clear objects: {error}")));
                }
            }
        }
    }

    fn handle_draw<O: ObjectManager, S: SceneSurface>(
        &mut self,
        tip: Point,
        strokes: &mut StrokeStore,
        bridge: &mut InteractionBridge<O, S>,
    ) {
        if let Some(id) = bridge.hit_test(tip) {
            bridge.poke(id, tip);
            return;
        }

        match self.mode {
            InteractionMode::Drawing(_) if strokes.has_current() => {
                strokes.add_point(tip);
            }
            _ => {
                // A paused stroke is resumed rather than replaced.
                let resumed = strokes.current().map(|s| s.id());
                let id = match resumed {
                    Some(id) => {
                        strokes.resume_stroke();
                        strokes.add_point(tip);
                        log::debug!("Resuming stroke {id}");
                        id
                    }
                    None => {
                        let id = strokes.start_stroke(tip, self.active_color());
                        log::debug!("Starting stroke {id}");
                        id
                    }
                };
                self.mode = InteractionMode::Drawing(id);
            }
        }
    }

    fn handle_pinch<O: ObjectManager, S: SceneSurface>(
        &mut self,
        center: Point,
        strokes: &mut StrokeStore,
        bridge: &mut InteractionBridge<O, S>,
    ) {
        if let InteractionMode::Drawing(_) = self.mode {
            strokes.pause_stroke();
            self.mode = InteractionMode::Idle;
        }

        match self.mode {
            InteractionMode::Grabbing(id) => {
                bridge.move_grabbed(id, center);
                if let Some(last) = self.last_pinch {
                    let displacement = center - last;
                    if displacement.hypot2() > 0.0 {
                        bridge.rotate(id, displacement);
                    }
                }
            }
            _ => {
                if let Some(id) = bridge.hit_test(center) {
                    if bridge.grab(id, center) {
                        self.mode = InteractionMode::Grabbing(id);
                    }
                }
            }
        }
        self.last_pinch = Some(center);
    }

    fn handle_palm<O: ObjectManager, S: SceneSurface>(
        &mut self,
        now: Instant,
        strokes: &mut StrokeStore,
        bridge: &mut InteractionBridge<O, S>,
    ) {
        self.release_grab(bridge);

        if self.palm_hold.hold(now) >= self.config.palm_hold() {
            self.palm_hold.reset();
            self.close_current(now, strokes);
        }
    }

    fn handle_fist<O: ObjectManager, S: SceneSurface>(
        &mut self,
        now: Instant,
        strokes: &mut StrokeStore,
        bridge: &mut InteractionBridge<O, S>,
    ) {
        let held = self.fist_hold.hold(now);
        let required = self.config.fist_hold();

        if held >= required {
            self.fist_hold.reset();
            log::info!("Clearing all strokes and objects");
            strokes.clear_all();
            self.mode = InteractionMode::Idle;
            bridge.clear_objects();
        } else if held >= self.config.fist_progress_delay() {
            let percent = (held.as_secs_f64() / required.as_secs_f64() * 100.0) as u8;
            self.feedback.push(Feedback::ClearProgress(percent));
        }
    }

    fn handle_swipe<O: ObjectManager, S: SceneSurface>(&mut self, tip: Point, bridge: &mut InteractionBridge<O, S>) {
        if let Some(id) = bridge.hit_test(tip) {
            bridge.remove(id);
        }
    }

    /// Close the current stroke and start its pulse, or report it as too small.
    fn close_current(&mut self, now: Instant, strokes: &mut StrokeStore) {
        let had_stroke = strokes.has_current();
        if let InteractionMode::Drawing(_) = self.mode {
            self.mode = InteractionMode::Idle;
        }

        match strokes.close_stroke() {
            Some(stroke) => {
                log::info!("Closed stroke {} ({} points)", stroke.id(), stroke.len());
                self.closing.push(ClosingAnimation::new(stroke, now, self.config.closing_animation()));
            }
            None if had_stroke => {
                self.feedback.push(Feedback::Hint("Shape too small, draw a larger closed shape".to_string()));
            }
            None => {}
        }
    }

    fn on_hand_lost<O: ObjectManager, S: SceneSurface>(
        &mut self,
        strokes: &mut StrokeStore,
        bridge: &mut InteractionBridge<O, S>,
    ) {
        if self.hand_visible != Some(false) {
            log::debug!("Hand lost");
            self.feedback.push(Feedback::ShowHand);
            self.hand_visible = Some(false);
        }

        if let InteractionMode::Drawing(_) = self.mode {
            strokes.pause_stroke();
            self.mode = InteractionMode::Idle;
        }
        self.release_grab(bridge);
        self.palm_hold.reset();
        self.fist_hold.reset();
        self.last_gesture = GestureKind::None;
    }

    /// Release a gesture-grabbed object. Returns true if one was held.
    fn release_grab<O: ObjectManager, S: SceneSurface>(&mut self, bridge: &mut InteractionBridge<O, S>) -> bool {
        self.last_pinch = None;
        match self.mode {
            InteractionMode::Grabbing(id) => {
                bridge.release(id);
                self.mode = InteractionMode::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn grabbed(&self) -> Option<ObjectId> {
        match self.mode {
            InteractionMode::Grabbing(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.mode, InteractionMode::Drawing(_))
    }

    pub fn last_gesture(&self) -> GestureKind {
        self.last_gesture
    }

    pub fn last_state(&self) -> Option<&GestureState> {
        self.last_state.as_ref()
    }

    pub fn palm_hold_started(&self) -> Option<Instant> {
        self.palm_hold.started()
    }

    pub fn fist_hold_started(&self) -> Option<Instant> {
        self.fist_hold.started()
    }

    /// Time the fist has been held, if a fist hold is in progress.
    pub fn fist_hold_elapsed(&self, now: Instant) -> Option<Duration> {
        self.fist_hold.started().map(|t| now.saturating_duration_since(t))
    }

    pub fn color_index(&self) -> usize {
        self.color_index
    }

    /// Color given to the next stroke.
    pub fn active_color(&self) -> SerializableColor {
        self.config.palette_color(self.color_index)
    }

    /// Closing pulses currently playing.
    pub fn closing_animations(&self) -> &[ClosingAnimation] {
        &self.closing
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn classifier_mut(&mut self) -> &mut C {
        &mut self.classifier
    }

    /// Take all queued notices.
    pub fn drain_feedback(&mut self) -> Vec<Feedback> {
        std::mem::take(&mut self.feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::testing::{Call, RecordingObjects, RecordingScene};
    use crate::gesture::{INDEX_TIP, LANDMARK_COUNT, THUMB_TIP};
    use crate::input::{MouseButton, PointerEvent};
    use kurbo::Rect;

    /// Classifier that returns whatever kind the test sets.
    struct Scripted(GestureKind);

    impl GestureClassifier for Scripted {
        fn detect(&mut self, _landmarks: &HandLandmarks, _now: Instant) -> GestureState {
            GestureState::new(self.0)
        }
    }

    struct Harness {
        interpreter: GestureInterpreter<Scripted>,
        strokes: StrokeStore,
        bridge: InteractionBridge<RecordingObjects, RecordingScene>,
        t0: Instant,
    }

    impl Harness {
        fn new(objects: RecordingObjects) -> Self {
            let config = InteractionConfig::default();
            Self {
                strokes: StrokeStore::from_config(&config),
                bridge: InteractionBridge::with_config(objects, RecordingScene::default(), &config),
                interpreter: GestureInterpreter::new(Scripted(GestureKind::None), config),
                t0: Instant::now(),
            }
        }

        fn at(&self, ms: u64) -> Instant {
            self.t0 + Duration::from_millis(ms)
        }

        fn gesture(&mut self, kind: GestureKind, x: f64, y: f64, ms: u64) {
            let now = self.at(ms);
            let p = Point::new(x, y);
            self.interpreter
                .handle_gesture(GestureState::new(kind), p, p, now, &mut self.strokes, &mut self.bridge);
        }

        fn tick(&mut self, ms: u64) {
            let now = self.at(ms);
            self.interpreter.tick(now, &mut self.strokes, &mut self.bridge);
        }

        /// Draw a 100px square outline starting at (200, 200), ending at `ms`.
        fn draw_square(&mut self, start_ms: u64) -> u64 {
            let corners = [(200.0, 200.0), (300.0, 200.0), (300.0, 300.0), (200.0, 300.0), (200.0, 250.0)];
            let mut ms = start_ms;
            for (x, y) in corners {
                self.gesture(GestureKind::Draw, x, y, ms);
                ms += 30;
            }
            ms
        }

        fn calls(&self) -> &[Call] {
            &self.bridge.objects().calls
        }
    }

    fn object_at_origin() -> (RecordingObjects, ObjectId) {
        RecordingObjects::with_object(Rect::new(0.0, 0.0, 100.0, 100.0))
    }

    #[test]
    fn test_draw_starts_and_extends_stroke() {
        let mut h = Harness::new(RecordingObjects::default());
        h.draw_square(0);

        assert!(h.interpreter.is_drawing());
        assert_eq!(h.strokes.current().unwrap().len(), 5);
        assert_eq!(h.strokes.current().unwrap().color, h.interpreter.active_color());
    }

    #[test]
    fn test_draw_over_object_pokes() {
        let (objects, id) = object_at_origin();
        let mut h = Harness::new(objects);

        h.gesture(GestureKind::Draw, 50.0, 50.0, 0);
        assert_eq!(h.calls(), &[Call::Poke(id)]);
        assert!(!h.strokes.has_current());
        assert_eq!(h.interpreter.mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_palm_hold_closes_and_solidifies() {
        let mut h = Harness::new(RecordingObjects::default());
        let mut ms = h.draw_square(0);

        // Palm for 600 ms, one frame every 100 ms.
        for _ in 0..=6 {
            h.gesture(GestureKind::Palm, 250.0, 250.0, ms);
            h.tick(ms);
            ms += 100;
        }
        assert!(!h.strokes.has_current());
        assert_eq!(h.interpreter.mode(), InteractionMode::Idle);

        // Let the closing pulse finish.
        h.tick(ms + 400);

        assert_eq!(h.bridge.objects().count(|c| matches!(c, Call::Create(_))), 1);
        assert!(h.strokes.completed().is_empty());
        assert!(h.interpreter.closing_animations().is_empty());
        assert_eq!(h.interpreter.color_index(), 1);
        assert_eq!(h.bridge.object_count(), 1);
        assert!(h.interpreter.drain_feedback().iter().any(|f| matches!(f, Feedback::ShapeCreated(_))));
    }

    #[test]
    fn test_stroke_stays_completed_while_pulsing() {
        let mut h = Harness::new(RecordingObjects::default());
        let ms = h.draw_square(0);
        h.gesture(GestureKind::Palm, 0.0, 0.0, ms);
        h.gesture(GestureKind::Palm, 0.0, 0.0, ms + 500);

        h.tick(ms + 700);
        assert_eq!(h.strokes.completed().len(), 1);
        assert_eq!(h.interpreter.closing_animations().len(), 1);
        assert!(h.bridge.objects().calls.is_empty());
    }

    #[test]
    fn test_short_palm_hold_does_not_close() {
        let mut h = Harness::new(RecordingObjects::default());
        let ms = h.draw_square(0);

        h.gesture(GestureKind::Palm, 0.0, 0.0, ms);
        h.gesture(GestureKind::Palm, 0.0, 0.0, ms + 300);
        assert!(h.interpreter.palm_hold_started().is_some());

        h.gesture(GestureKind::Draw, 210.0, 260.0, ms + 350);
        assert!(h.interpreter.palm_hold_started().is_none());

        // Palm again: the timer restarts from zero.
        h.gesture(GestureKind::Palm, 0.0, 0.0, ms + 400);
        h.gesture(GestureKind::Palm, 0.0, 0.0, ms + 800);
        assert!(h.strokes.has_current());
        assert!(h.interpreter.closing_animations().is_empty());
    }

    #[test]
    fn test_small_stroke_rejected_with_hint() {
        let mut h = Harness::new(RecordingObjects::default());
        h.gesture(GestureKind::Draw, 0.0, 0.0, 0);
        h.gesture(GestureKind::Draw, 10.0, 0.0, 30);
        h.gesture(GestureKind::Palm, 0.0, 0.0, 60);
        h.gesture(GestureKind::Palm, 0.0, 0.0, 600);

        assert!(!h.strokes.has_current());
        assert!(h.interpreter.closing_animations().is_empty());
        let feedback = h.interpreter.drain_feedback();
        assert!(matches!(feedback.as_slice(), [Feedback::Hint(_)]));
    }

    #[test]
    fn test_fist_short_hold_then_none() {
        let (objects, _) = object_at_origin();
        let mut h = Harness::new(objects);
        h.draw_square(0);

        h.gesture(GestureKind::Fist, 0.0, 0.0, 1000);
        h.gesture(GestureKind::Fist, 0.0, 0.0, 1150);
        h.gesture(GestureKind::Fist, 0.0, 0.0, 1300);
        h.gesture(GestureKind::None, 0.0, 0.0, 1350);

        assert!(h.interpreter.fist_hold_started().is_none());
        assert_eq!(h.bridge.objects().count(|c| *c == Call::ClearAll), 0);
        assert!(h.strokes.has_current());
        assert_eq!(h.bridge.object_count(), 1);

        let progress: Vec<_> = h
            .interpreter
            .drain_feedback()
            .into_iter()
            .filter_map(|f| match f {
                Feedback::ClearProgress(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![30]);
    }

    #[test]
    fn test_fist_full_hold_clears_everything() {
        let (objects, _) = object_at_origin();
        let mut h = Harness::new(objects);
        h.draw_square(0);

        h.gesture(GestureKind::Fist, 0.0, 0.0, 1000);
        h.gesture(GestureKind::Fist, 0.0, 0.0, 1500);
        h.gesture(GestureKind::Fist, 0.0, 0.0, 2000);
        h.tick(2000);

        assert_eq!(h.bridge.objects().count(|c| *c == Call::ClearAll), 1);
        assert!(!h.strokes.has_current());
        assert_eq!(h.bridge.object_count(), 0);
        assert!(h.interpreter.fist_hold_started().is_none());
        assert!(h.interpreter.drain_feedback().contains(&Feedback::Cleared));
    }

    #[test]
    fn test_swipe_removes_object_once() {
        let (objects, id) = object_at_origin();
        let mut h = Harness::new(objects);

        h.gesture(GestureKind::Swipe, 40.0, 40.0, 0);
        h.gesture(GestureKind::Swipe, 45.0, 40.0, 30);

        assert_eq!(h.calls(), &[Call::Remove(id)]);
        assert_eq!(h.bridge.object_count(), 0);
    }

    #[test]
    fn test_swipe_on_empty_space_does_nothing() {
        let mut h = Harness::new(RecordingObjects::default());
        h.gesture(GestureKind::Swipe, 40.0, 40.0, 0);
        assert!(h.calls().is_empty());
    }

    #[test]
    fn test_pinch_grabs_moves_and_rotates() {
        let (objects, id) = object_at_origin();
        let mut h = Harness::new(objects);

        h.gesture(GestureKind::Pinch, 50.0, 50.0, 0);
        assert_eq!(h.interpreter.grabbed(), Some(id));

        h.gesture(GestureKind::Pinch, 60.0, 50.0, 30);
        assert_eq!(h.calls()[0], Call::Grab(id));
        assert_eq!(h.calls()[1], Call::Move(id, Point::new(60.0, 50.0)));
        assert!(matches!(h.calls()[2], Call::Rotate(rid, d) if rid == id && d.x > 0.0 && d.y == 0.0));

        h.gesture(GestureKind::None, 60.0, 50.0, 60);
        assert_eq!(h.calls().last(), Some(&Call::Release(id)));
        assert_eq!(h.interpreter.mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_pinch_over_pointer_held_object_stays_idle() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (objects, id) = RecordingObjects::with_object(rect);
        let mut h = Harness::new(RecordingObjects::default());
        let scene = RecordingScene { target: Some((id, rect)), ..Default::default() };
        h.bridge = InteractionBridge::with_config(objects, scene, &InteractionConfig::default());
        h.bridge.handle_pointer_event(PointerEvent::Down { position: Point::new(50.0, 50.0), button: MouseButton::Left });
        assert!(h.bridge.pointer_grabbed().is_some());

        h.gesture(GestureKind::Pinch, 50.0, 50.0, 0);
        assert_eq!(h.interpreter.mode(), InteractionMode::Idle);
        assert!(h.bridge.gesture_grabbed().is_none());
    }

    #[test]
    fn test_palm_releases_grab() {
        let (objects, id) = object_at_origin();
        let mut h = Harness::new(objects);

        h.gesture(GestureKind::Pinch, 50.0, 50.0, 0);
        h.gesture(GestureKind::Palm, 50.0, 50.0, 30);
        assert_eq!(h.calls().last(), Some(&Call::Release(id)));
        assert!(h.interpreter.grabbed().is_none());
    }

    #[test]
    fn test_grab_blocks_drawing_until_released() {
        let (objects, id) = object_at_origin();
        let mut h = Harness::new(objects);

        h.gesture(GestureKind::Pinch, 50.0, 50.0, 0);
        h.gesture(GestureKind::Pinch, 55.0, 50.0, 30);

        // Draw over empty canvas: the frame only releases the object.
        h.gesture(GestureKind::Draw, 400.0, 400.0, 60);
        assert!(!h.strokes.has_current());
        assert_eq!(h.calls().last(), Some(&Call::Release(id)));
        assert_eq!(h.interpreter.mode(), InteractionMode::Idle);

        h.gesture(GestureKind::Draw, 410.0, 400.0, 90);
        assert!(h.strokes.has_current());
        assert!(h.interpreter.is_drawing());
    }

    #[test]
    fn test_pinch_pauses_and_draw_resumes_stroke() {
        let mut h = Harness::new(RecordingObjects::default());
        let ms = h.draw_square(0);
        let id = h.strokes.current().unwrap().id();

        h.gesture(GestureKind::Pinch, 500.0, 500.0, ms);
        assert!(h.strokes.is_paused());
        assert_eq!(h.interpreter.mode(), InteractionMode::Idle);

        h.gesture(GestureKind::Draw, 200.0, 150.0, ms + 30);
        assert_eq!(h.interpreter.mode(), InteractionMode::Drawing(id));
        assert!(!h.strokes.is_paused());
        assert_eq!(h.strokes.current().unwrap().len(), 6);
    }

    #[test]
    fn test_new_stroke_during_pending_solidification() {
        let mut h = Harness::new(RecordingObjects::default());
        let ms = h.draw_square(0);
        h.gesture(GestureKind::Palm, 0.0, 0.0, ms);
        h.gesture(GestureKind::Palm, 0.0, 0.0, ms + 500);

        // Draw and close a second shape while the first is still pulsing.
        let ms2 = h.draw_square(ms + 530);
        h.gesture(GestureKind::Palm, 0.0, 0.0, ms2);
        h.gesture(GestureKind::Palm, 0.0, 0.0, ms2 + 500);
        assert_eq!(h.strokes.completed().len(), 2);

        h.tick(ms2 + 1000);
        assert_eq!(h.bridge.objects().count(|c| matches!(c, Call::Create(_))), 2);
        assert_eq!(h.interpreter.color_index(), 2);
        assert!(h.strokes.completed().is_empty());
    }

    #[test]
    fn test_clear_during_pulse_skips_solidification() {
        let mut h = Harness::new(RecordingObjects::default());
        let ms = h.draw_square(0);
        h.gesture(GestureKind::Palm, 0.0, 0.0, ms);
        h.gesture(GestureKind::Palm, 0.0, 0.0, ms + 500);
        h.gesture(GestureKind::Fist, 0.0, 0.0, ms + 510);
        h.gesture(GestureKind::Fist, 0.0, 0.0, ms + 1510);

        h.tick(ms + 2000);
        assert_eq!(h.bridge.objects().count(|c| matches!(c, Call::Create(_))), 0);
        assert_eq!(h.interpreter.color_index(), 0);
    }

    #[test]
    fn test_solidify_failure_reported() {
        let mut h = Harness::new(RecordingObjects::default());
        // A zig-zag along one line: long enough, but zero area.
        let mut ms = 0;
        for x in [0.0, 100.0, 0.0, 100.0, 0.0] {
            h.gesture(GestureKind::Draw, x, 0.0, ms);
            ms += 30;
        }
        h.gesture(GestureKind::Palm, 0.0, 0.0, ms);
        h.gesture(GestureKind::Palm, 0.0, 0.0, ms + 500);
        h.tick(ms + 1000);

        assert!(h.strokes.completed().is_empty());
        assert_eq!(h.bridge.object_count(), 0);
        assert!(h.interpreter.drain_feedback().iter().any(Feedback::is_error));
    }

    #[test]
    fn test_tracking_loss_pauses_stroke() {
        let config = InteractionConfig::default();
        let mut strokes = StrokeStore::from_config(&config);
        let mut bridge = InteractionBridge::with_config(RecordingObjects::default(), RecordingScene::default(), &config);
        let mut interpreter = GestureInterpreter::new(Scripted(GestureKind::Draw), config);
        let t0 = Instant::now();

        let mut points = [Point::ZERO; LANDMARK_COUNT];
        points[INDEX_TIP] = Point::new(100.0, 100.0);
        points[THUMB_TIP] = Point::new(80.0, 120.0);
        let hand = HandLandmarks::new(points);

        interpreter.on_frame(Some(&hand), t0, &mut strokes, &mut bridge);
        assert!(interpreter.is_drawing());

        interpreter.on_frame(None, t0 + Duration::from_millis(30), &mut strokes, &mut bridge);
        interpreter.on_frame(None, t0 + Duration::from_millis(60), &mut strokes, &mut bridge);
        assert!(strokes.has_current());
        assert!(strokes.is_paused());
        assert_eq!(interpreter.mode(), InteractionMode::Idle);
        assert_eq!(interpreter.drain_feedback(), vec![Feedback::ShowHand]);

        interpreter.on_frame(Some(&hand), t0 + Duration::from_millis(90), &mut strokes, &mut bridge);
        assert!(interpreter.is_drawing());
        assert_eq!(interpreter.drain_feedback(), vec![Feedback::HandDetected]);
    }
}
