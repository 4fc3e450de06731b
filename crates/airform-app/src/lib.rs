//! Airform Application
//!
//! The session shell wiring the stroke store, gesture interpreter, object
//! bridge and renderers, plus an in-memory world and script replay for
//! running without a camera or GPU.

pub mod replay;
pub mod script;
mod session;
pub mod sim;

pub use replay::{ReplayReport, replay};
pub use script::{Script, ScriptError, ScriptEvent, ScriptedClassifier};
pub use session::Session;
