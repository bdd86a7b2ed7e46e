use glam::Vec2;

use super::SceneId;
use crate::effect::{EffectKind, EffectSet};
use crate::input::Input;

/// Something a scene asked the manager to do once its update returns.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SceneRequest {
    Change { target: SceneId, duration: f32 },
    Exit,
}

/// Per-frame context passed to scene update hooks.
///
/// Holds the input state and the running transition effects, and collects a
/// scene change or exit request for the manager to act on after the hook.
pub struct SceneContext<'a> {
    /// Keyboard state for this frame.
    pub input: &'a Input,
    /// Transition effects drawn over the scenes.
    pub effects: &'a mut EffectSet,
    /// Client-area size in pixels.
    pub screen: Vec2,
    /// Seconds since the previous frame.
    pub dt: f32,
    request: Option<SceneRequest>,
}

impl<'a> SceneContext<'a> {
    pub fn new(input: &'a Input, effects: &'a mut EffectSet, screen: Vec2, dt: f32) -> Self {
        Self {
            input,
            effects,
            screen,
            dt,
            request: None,
        }
    }

    /// Switch to `target` over `duration` seconds once this update returns.
    ///
    /// A later request in the same frame replaces an earlier one.
    pub fn change_scene(&mut self, target: impl Into<SceneId>, duration: f32) {
        self.request = Some(SceneRequest::Change {
            target: target.into(),
            duration,
        });
    }

    /// Ask the application to close.
    pub fn exit(&mut self) {
        self.request = Some(SceneRequest::Exit);
    }

    /// Start a transition effect sized to the current screen.
    pub fn add_effect(&mut self, kind: EffectKind, duration: f32) {
        self.effects.create(kind, duration, self.screen);
    }

    pub(crate) fn take_request(&mut self) -> Option<SceneRequest> {
        self.request.take()
    }
}
