//! Transient user-facing notices raised by the interpreter.

use crate::bridge::ObjectId;

/// Something the host should show the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    /// Tracking lost: ask the user to show their hand.
    ShowHand,
    /// Tracking reacquired.
    HandDetected,
    /// Advisory message, e.g. a rejected stroke.
    Hint(String),
    /// Fist hold progress towards clearing, in percent.
    ClearProgress(u8),
    /// A stroke became a 3D object.
    ShapeCreated(ObjectId),
    /// All strokes and objects were cleared.
    Cleared,
    /// An object operation failed.
    Error(String),
}

impl Feedback {
    /// Status text for this notice.
    pub fn message(&self) -> String {
        match self {
            Feedback::ShowHand => "Show your hand to the camera".to_string(),
            Feedback::HandDetected => "Hand detected".to_string(),
            Feedback::Hint(text) | Feedback::Error(text) => text.clone(),
            Feedback::ClearProgress(percent) => format!("Hold fist to clear... {percent}%"),
            Feedback::ShapeCreated(_) => "Shape created".to_string(),
            Feedback::Cleared => "Cleared".to_string(),
        }
    }

    /// Whether this notice reports a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, Feedback::Error(_))
    }
}
