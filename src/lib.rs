//! # Scene Change
//!
//! **Two scenes, four full-screen transition effects.**
//!
//! Scenes are registered by name and switched with a duration. While the
//! switch runs, a transition effect covers the screen for the first half,
//! the new scene is built at the midpoint, and the effect uncovers it in the
//! second half. The effects are:
//!
//! - **Box**: a 4×4 grid of boxes growing in a diagonal sweep
//! - **Circle**: a lattice of circles swelling until they overlap
//! - **Line**: one line per pixel row sliding in from the right
//! - **Cut**: a freeze-frame of the old scene cut into shrinking tiles
//!
//! ## Quick Start
//!
//! ```no_run
//! use scene_change::*;
//!
//! fn main() -> Result<(), AppError> {
//!     run(AppConfig::new(), |scenes| {
//!         demo::register(scenes);
//!         scenes.change_scene(demo::SQUARES, 0.0)
//!     })
//! }
//! ```
//!
//! Scenes and effects only produce a [`DrawList`]; nothing outside
//! [`run`] touches the GPU, so both can be driven headless.

mod app;
mod capture;
pub mod demo;
mod draw2d;
pub mod effect;
mod gpu;
mod input;
mod logging;
mod present_pass;
mod render_target;
pub mod scene;
mod shape;
mod texture;

pub use app::{AppConfig, AppError, run};
pub use capture::{FrameCapture, FrameId, ScreenCapture};
pub use draw2d::{Batch, BatchKind, Draw2d, Tessellation, Vertex2d};
pub use effect::{Effect, EffectContext, EffectKind, EffectSet};
pub use gpu::{GpuContext, GpuError};
pub use input::Input;
pub use logging::{LOG_ENV, init_logging};
pub use present_pass::PresentPass;
pub use render_target::RenderTarget;
pub use scene::{
    PendingTransition, Scene, SceneContext, SceneError, SceneId, SceneManager, TransitionBindings,
    TransitionPhase,
};
pub use shape::{Color, DrawList, Rect, Shape};
pub use texture::Texture;

// Re-export glam math types for convenience
pub use glam::{UVec2, Vec2};

// Re-export commonly used winit types for convenience
pub use winit::keyboard::KeyCode;
