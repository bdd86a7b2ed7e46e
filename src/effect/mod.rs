//! Transition effects drawn over the scenes while they switch.
//!
//! Every effect is created with a total duration and is driven purely by the
//! time elapsed since it was created. The first half of the duration covers
//! the screen, the second half uncovers it; the scene manager swaps scenes at
//! the midpoint, hidden underneath.
//!
//! # Example
//!
//! ```ignore
//! let mut effects = EffectSet::new();
//! effects.create(EffectKind::Circle, 2.0, screen);
//!
//! // Once per frame, after the scene has been drawn:
//! effects.advance_all(dt, &mut EffectContext {
//!     screen,
//!     draw: &mut draw_list,
//!     capture: &mut capture,
//! });
//! ```

mod box_wipe;
mod circle_wipe;
mod cut;
mod line_wipe;
mod timing;

pub use box_wipe::BoxWipe;
pub use circle_wipe::CircleWipe;
pub use cut::Cut;
pub use line_wipe::LineWipe;
pub use timing::{Phase, Timing, coverage};

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::capture::{FrameId, ScreenCapture};
use crate::shape::DrawList;

/// The catalog of transition effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Staggered 4×4 grid of growing, then shrinking boxes.
    Box,
    /// Lattice of circles that swell to cover the screen.
    Circle,
    /// One line per pixel row sweeping in from the right.
    Line,
    /// Freeze-frame cut into tiles that collapse toward their centers.
    Cut,
}

impl EffectKind {
    /// All kinds, in binding order.
    pub const ALL: [EffectKind; 4] = [
        EffectKind::Box,
        EffectKind::Circle,
        EffectKind::Line,
        EffectKind::Cut,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Box => "box",
            EffectKind::Circle => "circle",
            EffectKind::Line => "line",
            EffectKind::Cut => "cut",
        }
    }

    /// Build an effect of this kind for a screen of the given size.
    pub fn build(self, duration: f32, screen: Vec2, rng: &mut impl Rng) -> Box<dyn Effect> {
        match self {
            EffectKind::Box => Box::new(BoxWipe::new(duration)),
            EffectKind::Circle => Box::new(CircleWipe::new(duration)),
            EffectKind::Line => Box::new(LineWipe::new(duration, screen, rng)),
            EffectKind::Cut => Box::new(Cut::new(duration)),
        }
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What an effect gets to work with each frame.
pub struct EffectContext<'a> {
    /// Client-area size in pixels.
    pub screen: Vec2,
    /// Overlay shapes are appended here, after the scene's own shapes.
    pub draw: &'a mut DrawList,
    /// Frame capture provider, for effects that reuse the rendered image.
    pub capture: &'a mut dyn ScreenCapture,
}

/// A time-bounded visual overlay.
pub trait Effect {
    /// Draw the effect as it looks `t` seconds after creation.
    ///
    /// Returns `false` once the effect has finished; it draws nothing then.
    fn advance(&mut self, t: f32, ctx: &mut EffectContext<'_>) -> bool;

    fn kind(&self) -> EffectKind;

    /// Total duration in seconds.
    fn duration(&self) -> f32;

    /// Captured frame this effect still needs, if any.
    fn captured_frame(&self) -> Option<FrameId> {
        None
    }
}

struct ActiveEffect {
    effect: Box<dyn Effect>,
    elapsed: f32,
}

/// The running effects, in creation order.
///
/// Owned by the application loop and handed to scenes (to add effects) and to
/// the overlay step (to advance them).
pub struct EffectSet {
    active: Vec<ActiveEffect>,
    rng: StdRng,
}

impl EffectSet {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_rng(&mut rand::rng()))
    }

    /// Deterministic randomness, for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            active: Vec::new(),
            rng,
        }
    }

    /// Create an effect of `kind` lasting `duration` seconds and start it.
    pub fn create(&mut self, kind: EffectKind, duration: f32, screen: Vec2) {
        let effect = kind.build(duration, screen, &mut self.rng);
        self.add(effect);
    }

    /// Start an already-built effect.
    pub fn add(&mut self, effect: Box<dyn Effect>) {
        debug!(
            kind = %effect.kind(),
            duration = effect.duration(),
            running = self.active.len() + 1,
            "effect started"
        );
        self.active.push(ActiveEffect { effect, elapsed: 0.0 });
    }

    /// Advance every effect by one frame of `dt` seconds.
    ///
    /// Each effect sees its own elapsed time, starting at zero on its first
    /// frame. Finished effects are dropped in the same pass.
    pub fn advance_all(&mut self, dt: f32, ctx: &mut EffectContext<'_>) {
        self.active.retain_mut(|entry| {
            let t = entry.elapsed;
            entry.elapsed += dt;
            let running = entry.effect.advance(t, ctx);
            if !running {
                debug!(kind = %entry.effect.kind(), elapsed = t, "effect finished");
            }
            running
        });
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Kinds of the running effects, in creation order.
    pub fn kinds(&self) -> impl Iterator<Item = EffectKind> + '_ {
        self.active.iter().map(|e| e.effect.kind())
    }

    /// Captured frames still referenced by running effects.
    pub fn live_frames(&self) -> impl Iterator<Item = FrameId> + '_ {
        self.active.iter().filter_map(|e| e.effect.captured_frame())
    }
}

impl Default for EffectSet {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn every_kind_runs_for_exactly_its_duration() {
        let mut rng = StdRng::seed_from_u64(1);
        for kind in EffectKind::ALL {
            let mut effect = kind.build(2.0, SCREEN, &mut rng);
            for t in [0.0, 0.5, 1.0, 1.0001, 1.5, 1.999] {
                assert!(draw_at(effect.as_mut(), t).0, "{kind} inactive at {t}");
            }
            for t in [2.0, 2.5, 100.0] {
                let (running, draw) = draw_at(effect.as_mut(), t);
                assert!(!running, "{kind} still active at {t}");
                assert!(draw.is_empty());
            }
        }
    }

    #[test]
    fn non_positive_duration_is_immediately_inactive() {
        let mut rng = StdRng::seed_from_u64(1);
        for kind in EffectKind::ALL {
            for duration in [0.0, -2.0] {
                let mut effect = kind.build(duration, SCREEN, &mut rng);
                assert!(!draw_at(effect.as_mut(), 0.0).0, "{kind} ran with {duration}");
            }
        }
    }

    #[test]
    fn same_time_draws_same_geometry() {
        let mut rng = StdRng::seed_from_u64(9);
        for kind in [EffectKind::Box, EffectKind::Circle, EffectKind::Line] {
            let mut effect = kind.build(2.0, SCREEN, &mut rng);
            for t in [0.3, 1.0, 1.7] {
                let (_, first) = draw_at(effect.as_mut(), t);
                let (_, second) = draw_at(effect.as_mut(), t);
                assert_eq!(first, second, "{kind} at {t}");
            }
        }
    }

    #[test]
    fn set_advances_in_order_and_drops_finished() {
        let mut effects = EffectSet::with_seed(3);
        effects.create(EffectKind::Box, 1.0, SCREEN);
        effects.create(EffectKind::Circle, 2.0, SCREEN);
        effects.create(EffectKind::Box, 0.0, SCREEN);
        assert_eq!(effects.len(), 3);

        let mut draw = DrawList::new();
        let mut capture = StubCapture::default();
        let mut ctx = EffectContext {
            screen: SCREEN,
            draw: &mut draw,
            capture: &mut capture,
        };

        // Zero-duration effect goes on its first frame
        effects.advance_all(0.5, &mut ctx);
        assert_eq!(
            effects.kinds().collect::<Vec<_>>(),
            vec![EffectKind::Box, EffectKind::Circle]
        );

        // t = 0.5 for both
        effects.advance_all(0.5, &mut ctx);
        assert_eq!(effects.len(), 2);

        // t = 1.0: the box has run out
        effects.advance_all(0.5, &mut ctx);
        assert_eq!(effects.kinds().collect::<Vec<_>>(), vec![EffectKind::Circle]);

        effects.advance_all(0.5, &mut ctx);
        effects.advance_all(0.5, &mut ctx);
        assert!(effects.is_empty());
    }

    #[test]
    fn overlay_follows_creation_order() {
        let mut effects = EffectSet::with_seed(3);
        effects.create(EffectKind::Circle, 2.0, SCREEN);
        effects.create(EffectKind::Box, 2.0, SCREEN);

        let mut draw = DrawList::new();
        let mut capture = StubCapture::default();
        effects.advance_all(
            0.0,
            &mut EffectContext {
                screen: SCREEN,
                draw: &mut draw,
                capture: &mut capture,
            },
        );

        let first = draw.shapes().first().cloned();
        let last = draw.shapes().last().cloned();
        assert!(matches!(first, Some(crate::shape::Shape::Circle { .. })));
        assert!(matches!(last, Some(crate::shape::Shape::Rect { .. })));
    }
}
