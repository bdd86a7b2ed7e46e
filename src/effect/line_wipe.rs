use glam::Vec2;
use rand::Rng;

use super::{Effect, EffectContext, EffectKind, Timing};
use crate::shape::Color;

/// One line per pixel row, each starting a random distance past the right
/// edge, all sliding left at the same speed.
///
/// Lines cover the screen `2 * width` pixels into the sweep (a third of the
/// way through) and trail a `4 * width` tail, so the screen stays covered
/// across the midpoint and clears again near the end.
pub struct LineWipe {
    timing: Timing,
    /// Start and end point of each row's line before any movement.
    lines: Vec<(Vec2, Vec2)>,
    speed: f32,
}

impl LineWipe {
    pub fn new(duration: f32, screen: Vec2, rng: &mut impl Rng) -> Self {
        let width = screen.x.max(0.0) as u32;
        let rows = screen.y.max(0.0) as u32;

        let lines = (0..rows)
            .map(|row| {
                let y = row as f32;
                let start_x = (width + rng.random_range(width / 2..=width)) as f32;
                let end_x = start_x + width as f32 * 4.0;
                (Vec2::new(start_x, y), Vec2::new(end_x, y))
            })
            .collect();

        let speed = if duration > 0.0 {
            width as f32 * 2.0 / (duration / 3.0)
        } else {
            0.0
        };

        Self {
            timing: Timing::new(duration),
            lines,
            speed,
        }
    }

    /// Leftward speed in pixels per second.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// How far every line has moved left after `t` seconds.
    pub fn offset(&self, t: f32) -> f32 {
        self.speed * t
    }

    /// Unmoved line for each pixel row, top to bottom.
    pub fn lines(&self) -> &[(Vec2, Vec2)] {
        &self.lines
    }
}

impl Effect for LineWipe {
    fn advance(&mut self, t: f32, ctx: &mut EffectContext<'_>) -> bool {
        if self.timing.phase(t).is_none() {
            return false;
        }

        let shift = Vec2::new(self.offset(t), 0.0);
        for &(from, to) in &self.lines {
            ctx.draw.line(from - shift, to - shift, 1.0, Color::WHITE);
        }

        true
    }

    fn kind(&self) -> EffectKind {
        EffectKind::Line
    }

    fn duration(&self) -> f32 {
        self.timing.duration()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn wipe() -> LineWipe {
        LineWipe::new(2.0, SCREEN, &mut StdRng::seed_from_u64(42))
    }

    #[test]
    fn one_line_per_row_starting_off_screen() {
        let effect = wipe();
        assert_eq!(effect.lines().len(), 600);
        for (row, (from, to)) in effect.lines().iter().enumerate() {
            assert_eq!(from.y, row as f32);
            assert_eq!(to.y, row as f32);
            assert!(from.x >= 800.0 + 400.0 && from.x <= 800.0 + 800.0);
            assert_eq!(to.x - from.x, 3200.0);
        }
    }

    #[test]
    fn sweep_distance_is_bounded() {
        let effect = wipe();
        assert!((effect.speed() - 2400.0).abs() < 1e-2);
        assert_eq!(effect.offset(0.0), 0.0);
        assert_eq!(effect.offset(2.0), effect.speed() * 2.0);
    }

    #[test]
    fn lines_move_left_over_time() {
        let mut effect = wipe();
        let (_, early) = draw_at(&mut effect, 0.0);
        let (_, late) = draw_at(&mut effect, 0.5);
        assert_eq!(early.len(), 600);

        let x_of = |draw: &crate::shape::DrawList| match &draw.shapes()[0] {
            crate::shape::Shape::Line { from, .. } => from.x,
            other => panic!("unexpected shape {other:?}"),
        };
        assert!((x_of(&early) - x_of(&late) - 1200.0).abs() < 1e-2);
    }

    #[test]
    fn zero_width_screen_has_no_speed() {
        let effect = LineWipe::new(2.0, Vec2::ZERO, &mut StdRng::seed_from_u64(1));
        assert!(effect.lines().is_empty());
        assert_eq!(effect.speed(), 0.0);
    }
}
