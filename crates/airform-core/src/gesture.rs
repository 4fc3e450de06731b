//! Hand landmarks and classified gestures.
//!
//! The tracker and classifier are external; this module only fixes the shape
//! of their output. Landmarks are already mirrored and mapped into viewport
//! pixel coordinates.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Bone connections for drawing the hand skeleton.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (WRIST, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (WRIST, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (WRIST, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (INDEX_MCP, MIDDLE_MCP),
];

/// One tracked hand: 21 viewport points plus optional metric world points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    pub points: [Point; LANDMARK_COUNT],
    #[serde(default)]
    pub world: Option<[[f64; 3]; LANDMARK_COUNT]>,
}

impl HandLandmarks {
    pub fn new(points: [Point; LANDMARK_COUNT]) -> Self {
        Self { points, world: None }
    }

    pub fn get(&self, index: usize) -> Point {
        self.points[index]
    }
}

/// Classified hand pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    /// No hand pose recognized.
    #[default]
    None,
    /// Index finger extended: draw or poke.
    Draw,
    /// Thumb and index together: grab and move.
    Pinch,
    /// Open palm: close the current stroke.
    Palm,
    /// Closed fist: clear everything.
    Fist,
    /// Fast lateral motion: delete an object.
    Swipe,
}

impl GestureKind {
    /// String representation for logs and status text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Draw => "draw",
            Self::Pinch => "pinch",
            Self::Palm => "palm",
            Self::Fist => "fist",
            Self::Swipe => "swipe",
        }
    }
}

/// Classifier output for one tracked frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    pub current: GestureKind,
    pub previous: GestureKind,
    /// How long `current` has been held.
    pub duration: Duration,
    /// Fingertip velocity (px/s).
    pub velocity: Vec2,
    /// Classifier confidence (0..1).
    pub confidence: f64,
}

impl GestureState {
    pub fn new(current: GestureKind) -> Self {
        Self {
            current,
            previous: GestureKind::None,
            duration: Duration::ZERO,
            velocity: Vec2::ZERO,
            confidence: 1.0,
        }
    }
}

/// Turns landmarks into gestures and interaction points.
pub trait GestureClassifier {
    /// Classify the hand pose for this frame.
    fn detect(&mut self, landmarks: &HandLandmarks, now: Instant) -> GestureState;

    /// Drawing position.
    fn index_tip(&self, landmarks: &HandLandmarks) -> Point {
        landmarks.get(INDEX_TIP)
    }

    /// Grab position: midway between thumb and index tips.
    fn pinch_center(&self, landmarks: &HandLandmarks) -> Point {
        landmarks.get(THUMB_TIP).midpoint(landmarks.get(INDEX_TIP))
    }
}
