//! One interactive session: stroke store, interpreter, bridge and renderers.

use airform_core::bridge::{InteractionBridge, ObjectManager, SceneSurface};
use airform_core::config::InteractionConfig;
use airform_core::feedback::Feedback;
use airform_core::gesture::{GestureClassifier, HandLandmarks};
use airform_core::input::PointerEvent;
use airform_core::interpreter::GestureInterpreter;
use airform_core::stroke::StrokeStore;
use airform_render::{DrawList, HandOverlayRenderer, RenderContext, Renderer, StrokeLayerRenderer};
use kurbo::Size;
use peniko::Color;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Owns all per-session state and exposes the tracker and render callbacks.
pub struct Session<C, O, S> {
    interpreter: GestureInterpreter<C>,
    strokes: StrokeStore,
    bridge: InteractionBridge<O, S>,
    stroke_layer: StrokeLayerRenderer,
    overlay: HandOverlayRenderer,
    /// Hand from the latest tracker frame.
    hand: Option<HandLandmarks>,
    viewport: Size,
    started: Instant,
    last_render: Option<Instant>,
}

impl<C, O, S> Session<C, O, S>
where
    C: GestureClassifier,
    O: ObjectManager,
    S: SceneSurface,
{
    pub fn new(classifier: C, objects: O, scene: S, config: InteractionConfig, viewport: Size, now: Instant) -> Self {
        let mut bridge = InteractionBridge::with_config(objects, scene, &config);
        bridge.resize(viewport);
        Self {
            strokes: StrokeStore::from_config(&config),
            interpreter: GestureInterpreter::new(classifier, config),
            bridge,
            stroke_layer: StrokeLayerRenderer::new(),
            overlay: HandOverlayRenderer::new(),
            hand: None,
            viewport,
            started: now,
            last_render: None,
        }
    }

    /// Tracker callback.
    pub fn on_tracker_frame(&mut self, landmarks: Option<HandLandmarks>, now: Instant) {
        self.interpreter
            .on_frame(landmarks.as_ref(), now, &mut self.strokes, &mut self.bridge);
        self.hand = landmarks;
    }

    /// Mouse and touch input.
    pub fn on_pointer_event(&mut self, event: PointerEvent) {
        self.bridge.handle_pointer_event(event);
    }

    pub fn resize(&mut self, size: Size) {
        self.viewport = size;
        self.bridge.resize(size);
    }

    /// Render callback: advance timed work, step physics, draw the 3D scene,
    /// then the stroke layer, then the hand overlay.
    pub fn render_frame(&mut self, now: Instant) {
        self.interpreter.tick(now, &mut self.strokes, &mut self.bridge);

        let delta = self
            .last_render
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f64());
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        self.last_render = Some(now);
        self.bridge.update_physics(delta, elapsed);
        self.bridge.render_scene();

        let config = self.interpreter.config();
        let ctx = RenderContext::new(&self.strokes, self.viewport)
            .with_closing(self.interpreter.closing_animations())
            .with_hand(self.hand.as_ref())
            .with_active_color(Color::from(self.interpreter.active_color()))
            .with_curve_style(config.curve_style)
            .with_completed_opacity(config.completed_stroke_opacity);
        self.stroke_layer.build_scene(&ctx);
        self.overlay.build_scene(&ctx);
    }

    /// Stroke layer commands from the last frame.
    pub fn stroke_layer(&self) -> &DrawList {
        self.stroke_layer.draw_list()
    }

    /// Hand overlay commands from the last frame.
    pub fn overlay(&self) -> &DrawList {
        self.overlay.draw_list()
    }

    pub fn strokes(&self) -> &StrokeStore {
        &self.strokes
    }

    pub fn interpreter(&self) -> &GestureInterpreter<C> {
        &self.interpreter
    }

    pub fn interpreter_mut(&mut self) -> &mut GestureInterpreter<C> {
        &mut self.interpreter
    }

    pub fn bridge(&self) -> &InteractionBridge<O, S> {
        &self.bridge
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Take queued user notices.
    pub fn drain_feedback(&mut self) -> Vec<Feedback> {
        self.interpreter.drain_feedback()
    }
}
