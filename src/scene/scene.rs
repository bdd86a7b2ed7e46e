//! Scene trait and identifier types.

use glam::Vec2;

use super::SceneContext;
use crate::shape::{Color, DrawList};

/// Unique identifier for a scene.
///
/// Scene IDs are strings that uniquely identify scenes within a
/// [`SceneManager`](super::SceneManager). They're used when switching between
/// scenes via [`SceneManager::change_scene`](super::SceneManager::change_scene)
/// and [`SceneContext::change_scene`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SceneId(pub(crate) String);

impl SceneId {
    /// Create a new scene ID from a string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the scene ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SceneId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SceneId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for SceneId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SceneId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One application mode with its own input handling and drawing.
///
/// A fresh instance is built by the scene's factory every time the scene is
/// entered, so state does not survive leaving and coming back.
///
/// While a transition runs, the outgoing scene gets the `*_fade_out` hooks
/// for the first half and the incoming scene gets the `*_fade_in` hooks for
/// the second half, with `progress` going from 0 to 1 across each half.
pub trait Scene {
    /// Per-frame logic while the scene is fully active.
    fn update(&mut self, ctx: &mut SceneContext<'_>);

    /// Draw the scene's normal frame.
    fn draw(&self, draw: &mut DrawList, screen: Vec2);

    /// Per-frame logic while the scene is being entered.
    fn update_fade_in(&mut self, _ctx: &mut SceneContext<'_>, _progress: f32) {}

    /// Per-frame logic while the scene is being left.
    fn update_fade_out(&mut self, _ctx: &mut SceneContext<'_>, _progress: f32) {}

    /// Draw while being entered. Defaults to a fade up from black.
    fn draw_fade_in(&self, draw: &mut DrawList, screen: Vec2, progress: f32) {
        self.draw(draw, screen);
        draw.fill(Color::BLACK.with_alpha(1.0 - progress));
    }

    /// Draw while being left. Defaults to a fade down to black.
    fn draw_fade_out(&self, draw: &mut DrawList, screen: Vec2, progress: f32) {
        self.draw(draw, screen);
        draw.fill(Color::BLACK.with_alpha(progress));
    }
}
