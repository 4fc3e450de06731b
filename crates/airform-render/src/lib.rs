//! Airform Render Library
//!
//! Stroke curves, the closing pulse and the hand overlay, recorded into a
//! backend-neutral draw list.

pub mod curve;
pub mod overlay;
mod renderer;

pub use curve::{StrokeCurve, build_curve};
pub use overlay::HandOverlayRenderer;
pub use renderer::{
    DrawCommand, DrawList, RenderContext, Renderer, StrokeLayerRenderer, closing_pulse, render_closing_animation,
};
