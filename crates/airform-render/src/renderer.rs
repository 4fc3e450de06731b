//! Renderer trait abstraction and the 2D stroke layer.

use crate::curve::{StrokeCurve, build_curve};
use airform_core::animation::ClosingAnimation;
use airform_core::config::CurveStyle;
use airform_core::gesture::HandLandmarks;
use airform_core::stroke::{Stroke, StrokeStore};
use kurbo::{BezPath, Circle, Size};
use peniko::Color;
use std::f64::consts::PI;

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Stroke a path.
    Stroke {
        path: BezPath,
        color: Color,
        width: f64,
        /// Gaussian blur radius, 0 for a sharp stroke.
        blur: f64,
    },
    /// Fill a circle.
    FillCircle { circle: Circle, color: Color },
}

/// Command buffer for one 2D overlay frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn stroke(&mut self, path: BezPath, color: Color, width: f64) {
        self.commands.push(DrawCommand::Stroke { path, color, width, blur: 0.0 });
    }

    pub fn stroke_blurred(&mut self, path: BezPath, color: Color, width: f64, blur: f64) {
        self.commands.push(DrawCommand::Stroke { path, color, width, blur });
    }

    pub fn fill_circle(&mut self, circle: Circle, color: Color) {
        self.commands.push(DrawCommand::FillCircle { circle, color });
    }

    /// Record a stroke curve in the given color.
    pub fn curve(&mut self, curve: StrokeCurve, color: Color, width: f64) {
        match curve {
            StrokeCurve::Empty => {}
            StrokeCurve::Dot(circle) => self.fill_circle(circle, color),
            StrokeCurve::Path(path) => self.stroke(path, color, width),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// Strokes to draw.
    pub strokes: &'a StrokeStore,
    /// Closed strokes currently pulsing.
    pub closing: &'a [ClosingAnimation],
    /// Tracked hand, if visible.
    pub hand: Option<&'a HandLandmarks>,
    /// Viewport size in pixels.
    pub viewport_size: Size,
    /// Color of the next stroke, used for the fingertip marker.
    pub active_color: Color,
    /// Curve interpolation.
    pub curve_style: CurveStyle,
    /// Opacity of completed strokes awaiting solidification.
    pub completed_opacity: f64,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(strokes: &'a StrokeStore, viewport_size: Size) -> Self {
        Self {
            strokes,
            closing: &[],
            hand: None,
            viewport_size,
            active_color: Color::WHITE,
            curve_style: CurveStyle::default(),
            completed_opacity: 0.5,
        }
    }

    /// Set the closing animations to draw.
    pub fn with_closing(mut self, closing: &'a [ClosingAnimation]) -> Self {
        self.closing = closing;
        self
    }

    /// Set the tracked hand for the overlay.
    pub fn with_hand(mut self, hand: Option<&'a HandLandmarks>) -> Self {
        self.hand = hand;
        self
    }

    /// Set the active drawing color.
    pub fn with_active_color(mut self, color: Color) -> Self {
        self.active_color = color;
        self
    }

    /// Set the curve style.
    pub fn with_curve_style(mut self, style: CurveStyle) -> Self {
        self.curve_style = style;
        self
    }

    /// Set the completed stroke opacity.
    pub fn with_completed_opacity(mut self, opacity: f64) -> Self {
        self.completed_opacity = opacity;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the command buffer for a frame.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Commands recorded by the last `build_scene`.
    fn draw_list(&self) -> &DrawList;
}

/// Width factor and alpha of the closing pulse at `progress` in [0, 1].
pub fn closing_pulse(progress: f64) -> (f64, f64) {
    let pulse = 1.0 + (progress * PI).sin() * 0.1;
    let alpha = 0.5 + (progress * 2.0 * PI).sin() * 0.5;
    (pulse, alpha.clamp(0.0, 1.0))
}

/// Record the closing pulse for one stroke: a blurred glow that swells with
/// the pulse first, then the sharp stroke at its normal width on top.
pub fn render_closing_animation(list: &mut DrawList, stroke: &Stroke, progress: f64, style: CurveStyle) {
    let (pulse, alpha) = closing_pulse(progress);
    let color = Color::from(stroke.color);
    let width = stroke.width * pulse;

    match build_curve(&stroke.points, true, width, style) {
        StrokeCurve::Empty => {}
        StrokeCurve::Dot(circle) => list.fill_circle(circle, color.multiply_alpha(alpha as f32)),
        StrokeCurve::Path(path) => {
            list.stroke_blurred(path.clone(), color.multiply_alpha(alpha as f32), width * 2.0, width);
            list.stroke(path, color, stroke.width);
        }
    }
}

/// Draws the stroke layer: completed strokes, closing pulses and the stroke
/// in progress with its live point.
#[derive(Debug, Default)]
pub struct StrokeLayerRenderer {
    list: DrawList,
}

impl StrokeLayerRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn render_completed(&mut self, ctx: &RenderContext) {
        let pulsing = |stroke: &Stroke| ctx.closing.iter().any(|a| a.stroke().id() == stroke.id());
        for stroke in ctx.strokes.completed().iter().filter(|s| !pulsing(s)) {
            let color = Color::from(stroke.color).multiply_alpha(ctx.completed_opacity as f32);
            let curve = build_curve(&stroke.points, stroke.closed, stroke.width, ctx.curve_style);
            self.list.curve(curve, color, stroke.width);
        }
    }

    fn render_current(&mut self, ctx: &RenderContext) {
        let Some(current) = ctx.strokes.current() else {
            return;
        };
        let points = ctx.strokes.current_render_points();
        let curve = build_curve(&points, false, current.width, ctx.curve_style);
        self.list.curve(curve, Color::from(current.color), current.width);
    }
}

impl Renderer for StrokeLayerRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.list.clear();
        self.render_completed(ctx);
        for animation in ctx.closing {
            render_closing_animation(&mut self.list, animation.stroke(), animation.progress(), ctx.curve_style);
        }
        self.render_current(ctx);
    }

    fn draw_list(&self) -> &DrawList {
        &self.list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airform_core::color::SerializableColor;
    use kurbo::Point;
    use std::time::{Duration, Instant};

    fn store_with_strokes() -> StrokeStore {
        let mut store = StrokeStore::new(3.0, 1.0, 4.0, 100.0);
        store.start_stroke(Point::new(0.0, 0.0), SerializableColor::rgb(255, 0, 0));
        for p in [(100.0, 0.0), (100.0, 100.0), (0.0, 100.0)] {
            store.add_point(Point::new(p.0, p.1));
        }
        store.close_stroke();
        store.start_stroke(Point::new(200.0, 200.0), SerializableColor::rgb(0, 255, 0));
        store.add_point(Point::new(250.0, 200.0));
        store
    }

    #[test]
    fn test_closing_pulse_curve() {
        let (pulse, alpha) = closing_pulse(0.0);
        assert!((pulse - 1.0).abs() < f64::EPSILON);
        assert!((alpha - 0.5).abs() < f64::EPSILON);

        let (pulse, alpha) = closing_pulse(0.5);
        assert!((pulse - 1.1).abs() < 1e-12);
        assert!((alpha - 0.5).abs() < 1e-12);

        let (_, alpha) = closing_pulse(0.25);
        assert!((alpha - 1.0).abs() < 1e-12);

        let (pulse, alpha) = closing_pulse(0.75);
        assert!(pulse > 1.0);
        assert!(alpha.abs() < 1e-12);
    }

    #[test]
    fn test_closing_animation_glow_then_sharp() {
        let stroke = Stroke::from_points(
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(50.0, 80.0)],
            SerializableColor::rgb(0, 255, 255),
            4.0,
        );
        let mut list = DrawList::new();
        render_closing_animation(&mut list, &stroke, 0.5, CurveStyle::CatmullRom);

        let [glow, sharp] = list.commands() else {
            panic!("expected two commands, got {}", list.len());
        };
        let DrawCommand::Stroke { width: glow_width, blur, .. } = glow else {
            panic!("glow should be a stroke");
        };
        let DrawCommand::Stroke { width: sharp_width, blur: sharp_blur, .. } = sharp else {
            panic!("sharp should be a stroke");
        };
        assert!(*blur > 0.0);
        assert_eq!(*sharp_blur, 0.0);
        assert!((sharp_width - 4.0).abs() < 1e-12);
        assert!((glow_width - 8.8).abs() < 1e-12);
        assert!((blur - 4.4).abs() < 1e-12);
    }

    #[test]
    fn test_stroke_layer_opacity() {
        let store = store_with_strokes();
        let ctx = RenderContext::new(&store, Size::new(800.0, 600.0)).with_completed_opacity(0.5);
        let mut renderer = StrokeLayerRenderer::new();
        renderer.build_scene(&ctx);

        let commands = renderer.draw_list().commands();
        assert_eq!(commands.len(), 2);
        let DrawCommand::Stroke { color: completed, .. } = &commands[0] else {
            panic!("completed stroke should be stroked");
        };
        let DrawCommand::Stroke { color: current, .. } = &commands[1] else {
            panic!("current stroke should be stroked");
        };
        assert!((completed.components[3] - 0.5).abs() < 1e-6);
        assert!((current.components[3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_pulsing_stroke_not_drawn_twice() {
        let store = store_with_strokes();
        let stroke = store.completed()[0].clone();
        let closing = vec![ClosingAnimation::new(stroke, Instant::now(), Duration::from_millis(400))];
        let ctx = RenderContext::new(&store, Size::new(800.0, 600.0)).with_closing(&closing);
        let mut renderer = StrokeLayerRenderer::new();
        renderer.build_scene(&ctx);

        // Glow + sharp for the pulse, then the current stroke.
        assert_eq!(renderer.draw_list().len(), 3);
    }

    #[test]
    fn test_single_point_stroke_is_dot() {
        let mut store = StrokeStore::new(3.0, 1.0, 6.0, 100.0);
        store.start_stroke(Point::new(10.0, 10.0), SerializableColor::white());
        let ctx = RenderContext::new(&store, Size::new(800.0, 600.0));
        let mut renderer = StrokeLayerRenderer::new();
        renderer.build_scene(&ctx);

        let commands = renderer.draw_list().commands();
        assert_eq!(commands.len(), 1);
        let DrawCommand::FillCircle { circle, .. } = &commands[0] else {
            panic!("single point should be a disc");
        };
        assert_eq!(circle.center, Point::new(10.0, 10.0));
        assert!((circle.radius - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_build_scene_replaces_previous_frame() {
        let store = store_with_strokes();
        let ctx = RenderContext::new(&store, Size::new(800.0, 600.0));
        let mut renderer = StrokeLayerRenderer::new();
        renderer.build_scene(&ctx);
        renderer.build_scene(&ctx);
        assert_eq!(renderer.draw_list().len(), 2);
    }
}
