//! Scene manager for storing and switching between scenes.

use std::collections::HashMap;

use glam::Vec2;
use tracing::{debug, info, warn};

use super::context::SceneRequest;
use super::scene::{Scene, SceneId};
use super::{SceneContext, SceneError};
use crate::effect::EffectSet;
use crate::input::Input;
use crate::shape::DrawList;

type SceneFactory = Box<dyn Fn() -> Box<dyn Scene>>;

/// Which half of a transition is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionPhase {
    /// The outgoing scene is still active.
    FadeOut,
    /// The target scene has been built and is being entered.
    FadeIn,
}

/// A scene change in progress.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingTransition {
    /// Scene being switched to.
    pub target: SceneId,
    /// Total length in seconds; the swap happens at the midpoint.
    pub duration: f32,
    /// Seconds since the change was requested.
    pub elapsed: f32,
    pub phase: TransitionPhase,
}

impl PendingTransition {
    fn half(&self) -> f32 {
        self.duration * 0.5
    }

    /// Progress through the current half, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        let half = self.half();
        let t = match self.phase {
            TransitionPhase::FadeOut => self.elapsed,
            TransitionPhase::FadeIn => self.elapsed - half,
        };
        (t / half).clamp(0.0, 1.0)
    }
}

/// Manages named scenes and the transitions between them.
///
/// The scene manager is responsible for:
/// - Storing a factory per registered scene
/// - Tracking the active scene
/// - Running timed scene changes, swapping scenes at the midpoint
/// - Dispatching update and draw calls to the right scene hooks
///
/// # Example
///
/// ```ignore
/// let mut scenes = SceneManager::new();
/// scenes.add("title", TitleScene::new);
/// scenes.add("game", GameScene::new);
/// scenes.change_scene("title", 0.0)?;
/// ```
pub struct SceneManager {
    /// Scene factories by name.
    factories: HashMap<SceneId, SceneFactory>,

    /// Currently active scene and its name.
    active: Option<(SceneId, Box<dyn Scene>)>,

    /// Active transition state (if any).
    transition: Option<PendingTransition>,
}

impl SceneManager {
    /// Create a new empty scene manager.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            active: None,
            transition: None,
        }
    }

    /// Register a scene under `name`.
    ///
    /// `factory` builds a fresh instance every time the scene is entered.
    /// Registering a name again replaces the previous factory.
    pub fn add<S, F>(&mut self, name: impl Into<SceneId>, factory: F) -> &mut Self
    where
        S: Scene + 'static,
        F: Fn() -> S + 'static,
    {
        let id = name.into();
        info!(scene = %id, "scene registered");
        self.factories
            .insert(id, Box::new(move || Box::new(factory()) as Box<dyn Scene>));
        self
    }

    /// Whether a scene is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&SceneId::from(name))
    }

    /// Get the name of the currently active scene.
    pub fn active_scene(&self) -> Option<&SceneId> {
        self.active.as_ref().map(|(id, _)| id)
    }

    /// The scene change in progress, if any.
    pub fn pending(&self) -> Option<&PendingTransition> {
        self.transition.as_ref()
    }

    /// Check if a transition is currently in progress.
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Start switching to `name` over `duration` seconds.
    ///
    /// With no active scene, or a duration of zero or less, the target is
    /// built and entered at once. Otherwise the current scene keeps running
    /// for the first half and the target takes over at the midpoint.
    ///
    /// Fails if the name is unknown or another change is still running; the
    /// running change is left untouched.
    pub fn change_scene(
        &mut self,
        name: impl Into<SceneId>,
        duration: f32,
    ) -> Result<(), SceneError> {
        let target = name.into();
        if !self.factories.contains_key(&target) {
            return Err(SceneError::UnknownScene(target));
        }
        if let Some(running) = &self.transition {
            return Err(SceneError::TransitionInProgress {
                target: running.target.clone(),
            });
        }

        let immediate = duration.is_nan() || duration <= 0.0;
        if immediate || self.active.is_none() {
            self.enter(target.clone())?;
            if !immediate {
                // Nothing to leave, so only the fade-in half is shown
                self.transition = Some(PendingTransition {
                    target,
                    duration,
                    elapsed: duration * 0.5,
                    phase: TransitionPhase::FadeIn,
                });
            }
            return Ok(());
        }

        info!(
            from = %self.active_scene().map(SceneId::as_str).unwrap_or_default(),
            to = %target,
            duration,
            "scene change started"
        );
        self.transition = Some(PendingTransition {
            target,
            duration,
            elapsed: 0.0,
            phase: TransitionPhase::FadeOut,
        });
        Ok(())
    }

    /// Build a fresh instance of `target` and make it active.
    fn enter(&mut self, target: SceneId) -> Result<(), SceneError> {
        let factory = self
            .factories
            .get(&target)
            .ok_or_else(|| SceneError::UnknownScene(target.clone()))?;
        info!(scene = %target, "scene entered");
        self.active = Some((target, factory()));
        Ok(())
    }

    /// Advance the transition clock, then run the active scene's update hook.
    fn advance_transition(&mut self, dt: f32) -> Result<(), SceneError> {
        let Some(transition) = &mut self.transition else {
            return Ok(());
        };
        transition.elapsed += dt;

        if transition.phase == TransitionPhase::FadeOut && transition.elapsed >= transition.half()
        {
            transition.phase = TransitionPhase::FadeIn;
            let target = transition.target.clone();
            self.enter(target)?;
        }

        if let Some(transition) = &self.transition {
            if transition.elapsed >= transition.duration {
                debug!(scene = %transition.target, "scene change finished");
                self.transition = None;
            }
        }
        Ok(())
    }

    /// Run one frame of scene logic.
    ///
    /// Returns `false` once a scene has asked the application to exit.
    pub fn update(
        &mut self,
        input: &Input,
        effects: &mut EffectSet,
        screen: Vec2,
        dt: f32,
    ) -> bool {
        if let Err(err) = self.advance_transition(dt) {
            warn!(error = %err, "scene change abandoned");
            self.transition = None;
        }

        let progress = self.transition.as_ref().map(|t| (t.phase, t.progress()));
        let Some((_, scene)) = &mut self.active else {
            return true;
        };

        let mut ctx = SceneContext::new(input, effects, screen, dt);
        match progress {
            None => scene.update(&mut ctx),
            Some((TransitionPhase::FadeOut, p)) => scene.update_fade_out(&mut ctx, p),
            Some((TransitionPhase::FadeIn, p)) => scene.update_fade_in(&mut ctx, p),
        }

        match ctx.take_request() {
            Some(SceneRequest::Change { target, duration }) => {
                if let Err(err) = self.change_scene(target, duration) {
                    warn!(error = %err, "scene change request ignored");
                }
                true
            }
            Some(SceneRequest::Exit) => {
                info!("exit requested by scene");
                false
            }
            None => true,
        }
    }

    /// Draw the active scene through the hook matching the transition state.
    pub fn draw(&self, draw: &mut DrawList, screen: Vec2) {
        let Some((_, scene)) = &self.active else {
            return;
        };
        match &self.transition {
            None => scene.draw(draw, screen),
            Some(t) => match t.phase {
                TransitionPhase::FadeOut => scene.draw_fade_out(draw, screen, t.progress()),
                TransitionPhase::FadeIn => scene.draw_fade_in(draw, screen, t.progress()),
            },
        }
    }
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Color, Shape};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records which hooks ran, tagged with the scene name.
    struct Probe {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Scene for Probe {
        fn update(&mut self, _ctx: &mut SceneContext<'_>) {
            self.log.borrow_mut().push(format!("{}:update", self.name));
        }

        fn draw(&self, draw: &mut DrawList, _screen: Vec2) {
            draw.fill(Color::WHITE);
        }

        fn update_fade_in(&mut self, _ctx: &mut SceneContext<'_>, _progress: f32) {
            self.log.borrow_mut().push(format!("{}:fade_in", self.name));
        }

        fn update_fade_out(&mut self, _ctx: &mut SceneContext<'_>, _progress: f32) {
            self.log.borrow_mut().push(format!("{}:fade_out", self.name));
        }
    }

    fn manager() -> (SceneManager, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scenes = SceneManager::new();
        for name in ["a", "b"] {
            let log = log.clone();
            scenes.add(name, move || Probe {
                name,
                log: log.clone(),
            });
        }
        (scenes, log)
    }

    fn step(scenes: &mut SceneManager, dt: f32) -> bool {
        let input = Input::new();
        let mut effects = EffectSet::with_seed(0);
        scenes.update(&input, &mut effects, Vec2::new(800.0, 600.0), dt)
    }

    #[test]
    fn zero_duration_enters_immediately() {
        let (mut scenes, _) = manager();
        scenes.change_scene("a", 0.0).unwrap();
        assert_eq!(scenes.active_scene().unwrap(), "a");
        assert!(!scenes.is_transitioning());
    }

    #[test]
    fn unknown_scene_is_rejected() {
        let (mut scenes, _) = manager();
        let err = scenes.change_scene("nope", 1.0).unwrap_err();
        assert_eq!(err, SceneError::UnknownScene(SceneId::from("nope")));
        assert!(scenes.active_scene().is_none());
    }

    #[test]
    fn swaps_at_midpoint_and_finishes_at_duration() {
        let (mut scenes, log) = manager();
        scenes.change_scene("a", 0.0).unwrap();
        scenes.change_scene("b", 2.0).unwrap();

        step(&mut scenes, 0.5);
        assert_eq!(scenes.active_scene().unwrap(), "a");
        step(&mut scenes, 0.5);
        assert_eq!(scenes.active_scene().unwrap(), "b");
        assert_eq!(scenes.pending().unwrap().phase, TransitionPhase::FadeIn);
        step(&mut scenes, 0.5);
        step(&mut scenes, 0.5);
        assert!(!scenes.is_transitioning());
        step(&mut scenes, 0.5);

        assert_eq!(
            *log.borrow(),
            vec!["a:fade_out", "b:fade_in", "b:fade_in", "b:update", "b:update"]
        );
    }

    #[test]
    fn second_change_during_transition_is_rejected() {
        let (mut scenes, _) = manager();
        scenes.change_scene("a", 0.0).unwrap();
        scenes.change_scene("b", 2.0).unwrap();

        let err = scenes.change_scene("a", 2.0).unwrap_err();
        assert_eq!(
            err,
            SceneError::TransitionInProgress {
                target: SceneId::from("b")
            }
        );
        assert_eq!(scenes.pending().unwrap().target, "b");
    }

    #[test]
    fn first_scene_with_duration_fades_in() {
        let (mut scenes, _) = manager();
        scenes.change_scene("a", 2.0).unwrap();
        assert_eq!(scenes.active_scene().unwrap(), "a");
        let pending = scenes.pending().unwrap();
        assert_eq!(pending.phase, TransitionPhase::FadeIn);
        assert_eq!(pending.progress(), 0.0);
    }

    #[test]
    fn default_fade_draws_black_overlay() {
        let (mut scenes, _) = manager();
        scenes.change_scene("a", 0.0).unwrap();
        scenes.change_scene("b", 2.0).unwrap();
        step(&mut scenes, 0.5);

        let mut draw = DrawList::new();
        scenes.draw(&mut draw, Vec2::new(800.0, 600.0));
        assert_eq!(draw.len(), 2);
        assert_eq!(
            draw.shapes()[1],
            Shape::Fill {
                color: Color::BLACK.with_alpha(0.5)
            }
        );
    }

    #[test]
    fn exit_request_stops_the_loop() {
        struct Quitter;
        impl Scene for Quitter {
            fn update(&mut self, ctx: &mut SceneContext<'_>) {
                ctx.exit();
            }
            fn draw(&self, _draw: &mut DrawList, _screen: Vec2) {}
        }

        let mut scenes = SceneManager::new();
        scenes.add("quit", || Quitter);
        scenes.change_scene("quit", 0.0).unwrap();
        assert!(!step(&mut scenes, 0.016));
    }
}
