//! Hand-drawn strokes and the store that owns them.

use crate::color::SerializableColor;
use crate::sampler::PointSampler;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for strokes.
pub type StrokeId = Uuid;

/// One hand-drawn path, in progress or completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub(crate) id: StrokeId,
    /// Points in temporal order.
    pub points: Vec<Point>,
    /// Stroke color.
    pub color: SerializableColor,
    /// Stroke width.
    pub width: f64,
    /// Whether the stroke has been closed into a shape.
    pub closed: bool,
}

impl Stroke {
    /// Start a stroke at `point`.
    pub fn new(point: Point, color: SerializableColor, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: vec![point],
            color,
            width,
            closed: false,
        }
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>, color: SerializableColor, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            color,
            width,
            closed: false,
        }
    }

    pub fn id(&self) -> StrokeId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of consecutive segment lengths.
    pub fn path_length(&self) -> f64 {
        path_length(&self.points)
    }

    /// Absolute area of the polygon implied by the points.
    pub fn area(&self) -> f64 {
        polygon_area(&self.points).abs()
    }

    /// Axis-aligned bounds of the points.
    pub fn bounds(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::ZERO;
        }
        self.points
            .iter()
            .skip(1)
            .fold(Rect::from_points(self.points[0], self.points[0]), |rect, p| {
                rect.union_pt(*p)
            })
    }
}

/// Sum of distances between consecutive points.
pub fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Signed polygon area (shoelace), implicitly closing the ring.
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    twice / 2.0
}

/// The in-progress stroke and its sampler state.
#[derive(Debug, Clone)]
struct CurrentStroke {
    stroke: Stroke,
    paused: bool,
}

/// Owns the current stroke and completed strokes awaiting solidification.
#[derive(Debug, Clone)]
pub struct StrokeStore {
    current: Option<CurrentStroke>,
    completed: Vec<Stroke>,
    sampler: PointSampler,
    /// Width given to new strokes.
    stroke_width: f64,
    /// Minimum path length for closure.
    min_length: f64,
}

impl StrokeStore {
    /// Create an empty store.
    pub fn new(min_spacing: f64, smoothing: f64, stroke_width: f64, min_length: f64) -> Self {
        Self {
            current: None,
            completed: Vec::new(),
            sampler: PointSampler::new(min_spacing, smoothing),
            stroke_width,
            min_length,
        }
    }

    /// Create a store from interaction config.
    pub fn from_config(config: &crate::config::InteractionConfig) -> Self {
        Self::new(
            config.min_point_spacing,
            config.smoothing_factor,
            config.stroke_width,
            config.min_stroke_length,
        )
    }

    /// Begin a new stroke at `point`, dropping any unfinished one.
    pub fn start_stroke(&mut self, point: Point, color: SerializableColor) -> StrokeId {
        if let Some(old) = self.current.take() {
            log::debug!("Discarding unfinished stroke {} ({} points)", old.stroke.id, old.stroke.len());
        }
        let stroke = Stroke::new(point, color, self.stroke_width);
        let id = stroke.id;
        self.sampler.reset();
        self.sampler.seed(point);
        self.current = Some(CurrentStroke { stroke, paused: false });
        id
    }

    /// Feed a raw fingertip position. Returns true if a point was appended.
    pub fn add_point(&mut self, point: Point) -> bool {
        let Some(current) = self.current.as_mut() else {
            return false;
        };
        match self.sampler.intake(point) {
            Some(accepted) => {
                current.stroke.points.push(accepted);
                true
            }
            None => false,
        }
    }

    /// Stop extending the current stroke without discarding it.
    pub fn pause_stroke(&mut self) {
        if let Some(current) = self.current.as_mut() {
            current.paused = true;
        }
    }

    /// Allow a paused stroke to be extended again.
    pub fn resume_stroke(&mut self) {
        if let Some(current) = self.current.as_mut() {
            current.paused = false;
        }
    }

    /// Validate and close the current stroke.
    ///
    /// Returns the closed snapshot, which stays in the completed set until
    /// [`remove_completed_stroke`](Self::remove_completed_stroke). Short strokes
    /// (or strokes with two points or fewer) are discarded and `None` is returned.
    pub fn close_stroke(&mut self) -> Option<Stroke> {
        let CurrentStroke { mut stroke, .. } = self.current.take()?;
        self.sampler.reset();

        let length = stroke.path_length();
        if stroke.len() <= 2 || length < self.min_length {
            log::debug!(
                "Rejected stroke {}: {} points, length {:.1} (min {:.1})",
                stroke.id,
                stroke.len(),
                length,
                self.min_length
            );
            return None;
        }

        stroke.closed = true;
        self.completed.push(stroke.clone());
        Some(stroke)
    }

    /// Drop the current stroke without validation.
    pub fn discard_stroke(&mut self) {
        self.current = None;
        self.sampler.reset();
    }

    /// Remove a completed stroke by identity. Returns false if it was not present.
    pub fn remove_completed_stroke(&mut self, id: StrokeId) -> bool {
        let before = self.completed.len();
        self.completed.retain(|s| s.id != id);
        self.completed.len() != before
    }

    /// Drop the current stroke and all completed strokes.
    pub fn clear_all(&mut self) {
        self.discard_stroke();
        self.completed.clear();
    }

    /// The in-progress stroke, if any.
    pub fn current(&self) -> Option<&Stroke> {
        self.current.as_ref().map(|c| &c.stroke)
    }

    /// Check if there is an in-progress stroke.
    pub fn has_current(&self) -> bool {
        self.current.is_some()
    }

    /// Check if the in-progress stroke is paused.
    pub fn is_paused(&self) -> bool {
        self.current.as_ref().is_some_and(|c| c.paused)
    }

    /// Closed strokes awaiting solidification.
    pub fn completed(&self) -> &[Stroke] {
        &self.completed
    }

    /// Latest raw fingertip position while a stroke is being extended.
    pub fn live_point(&self) -> Option<Point> {
        match &self.current {
            Some(current) if !current.paused => self.sampler.live_point(),
            _ => None,
        }
    }

    /// Points of the current stroke plus the live point, for preview rendering.
    pub fn current_render_points(&self) -> Vec<Point> {
        let Some(current) = self.current() else {
            return Vec::new();
        };
        let mut points = current.points.clone();
        if let Some(live) = self.live_point() {
            if points.last() != Some(&live) {
                points.push(live);
            }
        }
        points
    }
}
