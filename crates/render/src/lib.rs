//! Rendering Adapter: renderer-agnostic interface and the frame loop.
//!
//! # Invariants
//! - Renderers read the orbit system; they never mutate it.
//! - Each frame advances the simulation at most once, then renders.

mod driver;
mod renderer;
mod style;

pub use driver::{FrameDriver, FrameHost};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use style::{BodyStyle, PointLight, SceneStyle};

pub fn crate_info() -> &'static str {
    "orrery-render v0.1.0"
}
