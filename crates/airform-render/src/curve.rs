//! Smooth curves through sampled stroke points.

use airform_core::config::CurveStyle;
use kurbo::{BezPath, Circle, Point};

/// Catmull-Rom samples per span.
pub const CATMULL_ROM_SUBDIVISIONS: usize = 8;

/// Catmull-Rom tension.
pub const CATMULL_ROM_TENSION: f64 = 0.5;

/// Geometry produced for one stroke.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeCurve {
    /// Nothing to draw.
    Empty,
    /// A single point, drawn as a filled disc.
    Dot(Circle),
    /// A path to be stroked.
    Path(BezPath),
}

impl StrokeCurve {
    pub fn is_empty(&self) -> bool {
        matches!(self, StrokeCurve::Empty)
    }
}

/// Build the visible curve for a point sequence.
///
/// Closed strokes repeat their first point at the end so the curve returns to
/// its origin. Output depends only on the inputs.
pub fn build_curve(points: &[Point], closed: bool, width: f64, style: CurveStyle) -> StrokeCurve {
    match points {
        [] => StrokeCurve::Empty,
        [p] => StrokeCurve::Dot(Circle::new(*p, width / 2.0)),
        _ => {
            let mut points = points.to_vec();
            if closed {
                points.push(points[0]);
            }
            let path = match style {
                CurveStyle::CatmullRom => catmull_rom_path(&points, CATMULL_ROM_SUBDIVISIONS),
                CurveStyle::QuadraticMidpoint => quadratic_midpoint_path(&points),
            };
            StrokeCurve::Path(path)
        }
    }
}

/// Polyline through Catmull-Rom samples, `subdiv` segments per span.
pub fn catmull_rom_path(points: &[Point], subdiv: usize) -> BezPath {
    let mut path = BezPath::new();
    let samples = catmull_rom_samples(points, subdiv.max(1));
    let mut iter = samples.into_iter();
    if let Some(first) = iter.next() {
        path.move_to(first);
        for p in iter {
            path.line_to(p);
        }
    }
    path
}

/// Quadratic Bezier segments using each point as control and the midpoint to
/// the next point as end, finishing with a straight segment to the last point.
pub fn quadratic_midpoint_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(&first) = points.first() else {
        return path;
    };
    path.move_to(first);
    if points.len() > 2 {
        for w in points[1..].windows(2) {
            path.quad_to(w[0], w[0].midpoint(w[1]));
        }
    }
    if let Some(&last) = points.last() {
        if points.len() > 1 {
            path.line_to(last);
        }
    }
    path
}

fn catmull_rom_samples(points: &[Point], subdiv: usize) -> Vec<Point> {
    if points.len() < 2 {
        return points.to_vec();
    }

    // Endpoints are duplicated for the boundary spans.
    let get = |i: isize| -> Point {
        let clamped = i.clamp(0, points.len() as isize - 1);
        points[clamped as usize]
    };

    let mut out = Vec::with_capacity((points.len() - 1) * subdiv + 1);
    for i in 0..(points.len() - 1) as isize {
        let (p0, p1, p2, p3) = (get(i - 1), get(i), get(i + 1), get(i + 2));
        for s in 0..subdiv {
            let t = s as f64 / subdiv as f64;
            out.push(catmull_rom(p0, p1, p2, p3, t));
        }
    }
    out.push(points[points.len() - 1]);
    out
}

fn catmull_rom(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;
    let k = CATMULL_ROM_TENSION;

    let axis = |a: f64, b: f64, c: f64, d: f64| {
        k * ((2.0 * b)
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };

    Point::new(axis(p0.x, p1.x, p2.x, p3.x), axis(p0.y, p1.y, p2.y, p3.y))
}
