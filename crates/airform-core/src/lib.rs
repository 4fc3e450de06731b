//! Airform Core Library
//!
//! Platform-agnostic gesture interpretation and stroke handling for Airform,
//! where shapes drawn in the air with an index finger become 3D objects.

pub mod animation;
pub mod bridge;
pub mod color;
pub mod config;
pub mod feedback;
pub mod gesture;
pub mod input;
pub mod interpreter;
pub mod sampler;
pub mod stroke;

pub use animation::{ClosingAnimation, HoldTimer};
pub use bridge::{
    BoxFuture, InteractionBridge, ObjectError, ObjectId, ObjectManager, ObjectResult, PointerDrag, SceneSurface,
    TaskOutcome,
};
pub use color::SerializableColor;
pub use config::{ConfigError, CurveStyle, InteractionConfig};
pub use feedback::Feedback;
pub use gesture::{GestureClassifier, GestureKind, GestureState, HandLandmarks};
pub use input::{InputState, PointerAction, PointerEvent};
pub use interpreter::{GestureInterpreter, InteractionMode};
pub use sampler::PointSampler;
pub use stroke::{Stroke, StrokeId, StrokeStore};
