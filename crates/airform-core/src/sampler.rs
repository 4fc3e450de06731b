//! Fingertip point sampling.
//!
//! Raw tracker positions arrive at the tracker's cadence and jitter by a few
//! pixels. The sampler lightly smooths them with an exponential moving average
//! and only accepts a point once it has moved far enough from the last accepted
//! one, so stroke density does not depend on frame rate.

use kurbo::Point;

/// Filters raw positions into a de-duplicated, smoothed point sequence.
#[derive(Debug, Clone)]
pub struct PointSampler {
    /// Minimum distance from the last accepted point.
    min_spacing: f64,
    /// EMA factor (1.0 = raw input).
    smoothing: f64,
    /// Smoothed position (EMA state).
    smoothed: Option<Point>,
    /// Last accepted point.
    last_accepted: Option<Point>,
    /// Latest raw position, never persisted.
    live: Option<Point>,
}

impl PointSampler {
    /// Create a sampler with the given spacing and smoothing factor.
    pub fn new(min_spacing: f64, smoothing: f64) -> Self {
        Self {
            min_spacing,
            smoothing: smoothing.clamp(f64::EPSILON, 1.0),
            smoothed: None,
            last_accepted: None,
            live: None,
        }
    }

    /// Forget all state, ready for a new stroke.
    pub fn reset(&mut self) {
        self.smoothed = None;
        self.last_accepted = None;
        self.live = None;
    }

    /// Seed the sampler with a point that is already part of the stroke.
    pub fn seed(&mut self, point: Point) {
        self.smoothed = Some(point);
        self.last_accepted = Some(point);
        self.live = Some(point);
    }

    /// Feed a raw position. Returns the point to append, if any.
    pub fn intake(&mut self, raw: Point) -> Option<Point> {
        self.live = Some(raw);

        let smoothed = match self.smoothed {
            Some(prev) => prev.lerp(raw, self.smoothing),
            None => raw,
        };
        self.smoothed = Some(smoothed);

        match self.last_accepted {
            Some(last) if last.distance(smoothed) <= self.min_spacing => None,
            _ => {
                self.last_accepted = Some(smoothed);
                Some(smoothed)
            }
        }
    }

    /// Latest raw position, for zero-latency preview.
    pub fn live_point(&self) -> Option<Point> {
        self.live
    }

    /// Last point accepted into the stroke.
    pub fn last_accepted(&self) -> Option<Point> {
        self.last_accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jittery_stream() -> Vec<Point> {
        (0..40)
            .map(|i| {
                let t = i as f64;
                let jitter = if i % 2 == 0 { 0.4 } else { -0.4 };
                Point::new(t * 2.5, 50.0 + jitter)
            })
            .collect()
    }

    #[test]
    fn test_first_point_accepted() {
        let mut sampler = PointSampler::new(3.0, 1.0);
        assert_eq!(sampler.intake(Point::new(10.0, 10.0)), Some(Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_rejects_points_within_spacing() {
        let mut sampler = PointSampler::new(3.0, 1.0);
        sampler.seed(Point::new(0.0, 0.0));

        assert_eq!(sampler.intake(Point::new(1.0, 1.0)), None);
        assert_eq!(sampler.intake(Point::new(3.0, 0.0)), None); // exactly at spacing
        assert_eq!(sampler.intake(Point::new(3.5, 0.0)), Some(Point::new(3.5, 0.0)));
    }

    #[test]
    fn test_live_point_tracks_raw_input() {
        let mut sampler = PointSampler::new(10.0, 0.5);
        sampler.seed(Point::new(0.0, 0.0));
        sampler.intake(Point::new(2.0, 2.0));

        assert_eq!(sampler.live_point(), Some(Point::new(2.0, 2.0)));
        assert_eq!(sampler.last_accepted(), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_smoothing_lags_raw_input() {
        let mut sampler = PointSampler::new(0.0, 0.5);
        sampler.seed(Point::new(0.0, 0.0));

        let accepted = sampler.intake(Point::new(10.0, 0.0)).unwrap();
        assert!((accepted.x - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_accepted_points_respect_spacing() {
        let mut sampler = PointSampler::new(3.0, 0.7);
        let accepted: Vec<Point> = jittery_stream().into_iter().filter_map(|p| sampler.intake(p)).collect();

        assert!(accepted.len() > 2);
        for pair in accepted.windows(2) {
            assert!(pair[0].distance(pair[1]) > 3.0);
        }
    }

    #[test]
    fn test_resampling_is_deterministic() {
        let run = || {
            let mut sampler = PointSampler::new(3.0, 0.7);
            jittery_stream().into_iter().filter_map(|p| sampler.intake(p)).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_reset_clears_state() {
        let mut sampler = PointSampler::new(3.0, 1.0);
        sampler.intake(Point::new(5.0, 5.0));
        sampler.reset();

        assert!(sampler.live_point().is_none());
        assert!(sampler.last_accepted().is_none());
    }
}
