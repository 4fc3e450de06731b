//! Hand skeleton overlay, drawn above everything else.

use crate::renderer::{DrawList, RenderContext, Renderer};
use airform_core::gesture::{HAND_CONNECTIONS, HandLandmarks, INDEX_TIP};
use kurbo::{BezPath, Circle};
use peniko::Color;

/// Bone line width.
pub const BONE_WIDTH: f64 = 2.0;
/// Landmark dot radius.
pub const JOINT_RADIUS: f64 = 3.0;
/// Index fingertip marker radius.
pub const TIP_RADIUS: f64 = 8.0;

/// Draws the tracked hand's landmarks and bones.
#[derive(Debug)]
pub struct HandOverlayRenderer {
    list: DrawList,
    /// Color for bones and joints.
    pub skeleton_color: Color,
}

impl Default for HandOverlayRenderer {
    fn default() -> Self {
        Self {
            list: DrawList::new(),
            skeleton_color: Color::from_rgba8(255, 255, 255, 160),
        }
    }
}

impl HandOverlayRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn render_hand(&mut self, hand: &HandLandmarks, tip_color: Color) {
        let mut bones = BezPath::new();
        for &(a, b) in HAND_CONNECTIONS.iter() {
            bones.move_to(hand.get(a));
            bones.line_to(hand.get(b));
        }
        self.list.stroke(bones, self.skeleton_color, BONE_WIDTH);

        for (i, point) in hand.points.iter().enumerate() {
            if i != INDEX_TIP {
                self.list.fill_circle(Circle::new(*point, JOINT_RADIUS), self.skeleton_color);
            }
        }
        self.list.fill_circle(Circle::new(hand.get(INDEX_TIP), TIP_RADIUS), tip_color);
    }
}

impl Renderer for HandOverlayRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.list.clear();
        if let Some(hand) = ctx.hand {
            self.render_hand(hand, ctx.active_color);
        }
    }

    fn draw_list(&self) -> &DrawList {
        &self.list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawCommand;
    use airform_core::gesture::LANDMARK_COUNT;
    use airform_core::stroke::StrokeStore;
    use kurbo::{PathEl, Point, Size};

    fn hand() -> HandLandmarks {
        let mut points = [Point::ZERO; LANDMARK_COUNT];
        for (i, p) in points.iter_mut().enumerate() {
            *p = Point::new(100.0 + i as f64 * 5.0, 300.0 - i as f64 * 10.0);
        }
        HandLandmarks::new(points)
    }

    #[test]
    fn test_no_hand_draws_nothing() {
        let store = StrokeStore::new(3.0, 0.7, 4.0, 100.0);
        let ctx = RenderContext::new(&store, Size::new(640.0, 480.0));
        let mut overlay = HandOverlayRenderer::new();
        overlay.build_scene(&ctx);
        assert!(overlay.draw_list().is_empty());
    }

    #[test]
    fn test_skeleton_and_highlighted_tip() {
        let store = StrokeStore::new(3.0, 0.7, 4.0, 100.0);
        let hand = hand();
        let tip_color = Color::from_rgba8(0, 255, 255, 255);
        let ctx = RenderContext::new(&store, Size::new(640.0, 480.0))
            .with_hand(Some(&hand))
            .with_active_color(tip_color);
        let mut overlay = HandOverlayRenderer::new();
        overlay.build_scene(&ctx);

        let commands = overlay.draw_list().commands();
        // Bones, 20 joints, then the fingertip.
        assert_eq!(commands.len(), 1 + LANDMARK_COUNT);

        let DrawCommand::Stroke { path, .. } = &commands[0] else {
            panic!("bones should be one stroked path");
        };
        let moves = path.elements().iter().filter(|el| matches!(el, PathEl::MoveTo(_))).count();
        assert_eq!(moves, HAND_CONNECTIONS.len());

        let Some(DrawCommand::FillCircle { circle, color }) = commands.last() else {
            panic!("fingertip should be drawn last");
        };
        assert_eq!(circle.center, hand.get(INDEX_TIP));
        assert_eq!(*color, tip_color);
        assert!((circle.radius - TIP_RADIUS).abs() < f64::EPSILON);
    }
}
