//! Scene management.
//!
//! A scene is one application mode with its own update and draw logic.
//! Scenes are registered by name with a factory, and exactly one of them is
//! active at a time. Switching takes a duration: the outgoing scene runs its
//! fade-out hooks for the first half, a fresh instance of the target is built
//! at the midpoint, and it runs its fade-in hooks for the second half.
//!
//! Transition effects are not drawn by the manager. A scene that wants one
//! starts it through [`SceneContext::add_effect`] alongside
//! [`SceneContext::change_scene`], which is what [`TransitionBindings`] does.
//!
//! # Example
//!
//! ```ignore
//! use scene_change::*;
//!
//! struct Title { bindings: TransitionBindings }
//!
//! impl Scene for Title {
//!     fn update(&mut self, ctx: &mut SceneContext<'_>) {
//!         self.bindings.poll(ctx, &SceneId::from("game"), 2.0);
//!     }
//!
//!     fn draw(&self, draw: &mut DrawList, screen: Vec2) {
//!         draw.rect(Rect::new(0.0, 0.0, screen.x, 40.0), Color::WHITE);
//!     }
//! }
//!
//! let mut scenes = SceneManager::new();
//! scenes.add("title", || Title { bindings: TransitionBindings::digits() });
//! scenes.change_scene("title", 0.0)?;
//! ```

mod bindings;
mod context;
mod manager;
pub mod scene;

pub use bindings::TransitionBindings;
pub use context::SceneContext;
pub use manager::{PendingTransition, SceneManager, TransitionPhase};
pub use scene::{Scene, SceneId};

use thiserror::Error;

/// Why a scene change could not be started.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SceneError {
    #[error("no scene registered as '{0}'")]
    UnknownScene(SceneId),
    #[error("a change to '{target}' is already in progress")]
    TransitionInProgress { target: SceneId },
    #[error("no scene is active")]
    NoActiveScene,
}
