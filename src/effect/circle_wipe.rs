use glam::{UVec2, Vec2};

use super::{Effect, EffectContext, EffectKind, Phase, Timing, coverage};
use crate::shape::Color;

/// Distance between neighboring circle centers, in pixels.
const SPACING: Vec2 = Vec2::new(100.0, 100.0);

/// Lattice of circles that grow until they overlap into a solid cover, then
/// shrink back to nothing.
pub struct CircleWipe {
    timing: Timing,
}

impl CircleWipe {
    pub fn new(duration: f32) -> Self {
        Self {
            timing: Timing::new(duration),
        }
    }

    /// Largest radius: a little over half a tile's diagonal, so neighbors
    /// overlap with no gaps.
    pub fn max_radius() -> f32 {
        SPACING.length() / 2.0 * 1.1
    }

    /// Circle radius at elapsed time `t`, or `None` once finished.
    pub fn radius(&self, t: f32) -> Option<f32> {
        let r = Self::max_radius();
        self.timing.phase(t).map(|phase| match phase {
            Phase::FadeIn(p) => coverage(p) * r,
            Phase::FadeOut(p) => r - coverage(p) * r,
        })
    }
}

impl Effect for CircleWipe {
    fn advance(&mut self, t: f32, ctx: &mut EffectContext<'_>) -> bool {
        let Some(radius) = self.radius(t) else {
            return false;
        };

        // One spare row and column past the edge
        let grid = (ctx.screen / SPACING).floor().as_uvec2() + UVec2::splat(2);

        for y in 0..grid.y {
            for x in 0..grid.x {
                let center = UVec2::new(x, y).as_vec2() * SPACING;
                ctx.draw.circle(center, radius, Color::BLACK);
            }
        }

        true
    }

    fn kind(&self) -> EffectKind {
        EffectKind::Circle
    }

    fn duration(&self) -> f32 {
        self.timing.duration()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[test]
    fn radius_rises_then_falls() {
        let effect = CircleWipe::new(2.0);
        let samples: Vec<f32> = (0..=40)
            .map(|i| effect.radius(i as f32 * 0.05).unwrap_or(0.0))
            .collect();

        let (rising, falling) = samples.split_at(21);
        assert!(rising.windows(2).all(|w| w[0] <= w[1]));
        assert!(falling.windows(2).all(|w| w[0] >= w[1]));
        assert!(samples[20] >= falling[0]);
    }

    #[test]
    fn peaks_at_midpoint() {
        let effect = CircleWipe::new(2.0);
        let r = CircleWipe::max_radius();
        assert!((r - 77.781_746).abs() < 1e-3);
        assert!((effect.radius(1.0).unwrap() - r).abs() < 1e-4);
        assert_eq!(effect.radius(0.0), Some(0.0));
        assert_eq!(effect.radius(2.0), None);
    }

    #[test]
    fn lattice_covers_screen_with_margin() {
        let mut effect = CircleWipe::new(2.0);
        let (running, draw) = draw_at(&mut effect, 0.5);
        assert!(running);
        // 800x600 gives 8x6 cells, plus two on each axis
        assert_eq!(draw.len(), 10 * 8);
    }
}
