use glam::{UVec2, Vec2};

use super::{Effect, EffectContext, EffectKind, Phase, Timing, coverage};
use crate::shape::{Color, Rect};

/// Cells across and down.
const GRID: UVec2 = UVec2::new(4, 4);

/// Grid of boxes that grow from each cell's top-left corner, sweeping from
/// the top-left of the screen to the bottom-right, then shrink away toward
/// the bottom-right in the same order.
pub struct BoxWipe {
    timing: Timing,
    /// Per-cell start offset in seconds, row-major. Zero or negative.
    stagger: Vec<f32>,
}

impl BoxWipe {
    pub fn new(duration: f32) -> Self {
        let timing = Timing::new(duration);
        let span = timing.half() - Self::ramp_time(&timing);
        let steps = (GRID.x + GRID.y) as f32;

        let stagger = (0..GRID.y)
            .flat_map(|y| (0..GRID.x).map(move |x| -((x + y) as f32) * span / steps))
            .collect();

        Self { timing, stagger }
    }

    /// Seconds one cell takes to go from empty to full.
    fn ramp_time(timing: &Timing) -> f32 {
        timing.half() / 2.0
    }

    /// Stagger offset for cell (`x`, `y`).
    pub fn stagger(&self, x: u32, y: u32) -> f32 {
        self.stagger[(y * GRID.x + x) as usize]
    }

    /// Cell size for a given screen, in whole pixels.
    fn cell_size(screen: Vec2) -> Vec2 {
        (screen / GRID.as_vec2()).floor()
    }
}

impl Effect for BoxWipe {
    fn advance(&mut self, t: f32, ctx: &mut EffectContext<'_>) -> bool {
        let Some(phase) = self.timing.phase(t) else {
            return false;
        };

        let half = self.timing.half();
        let limit = Self::ramp_time(&self.timing);
        let cell = Self::cell_size(ctx.screen);

        for y in 0..GRID.y {
            for x in 0..GRID.x {
                let pos = cell * UVec2::new(x, y).as_vec2();
                let offset = self.stagger(x, y);

                match phase {
                    Phase::FadeIn(_) => {
                        let p = (offset + t).clamp(0.0, limit) / limit;
                        let s = (coverage(p) * cell).floor();
                        ctx.draw
                            .rect(Rect::new(pos.x, pos.y, s.x, s.y), Color::BLACK);
                    }
                    Phase::FadeOut(_) => {
                        let p = (offset + t - half).clamp(0.0, limit) / limit;
                        if p < 1.0 {
                            let s = (coverage(p) * cell).floor();
                            // One extra pixel so neighboring cells leave no seam
                            ctx.draw.rect(
                                Rect::new(
                                    pos.x + s.x,
                                    pos.y + s.y,
                                    cell.x - s.x + 1.0,
                                    cell.y - s.y + 1.0,
                                ),
                                Color::BLACK,
                            );
                        }
                    }
                }
            }
        }

        true
    }

    fn kind(&self) -> EffectKind {
        EffectKind::Box
    }

    fn duration(&self) -> f32 {
        self.timing.duration()
    }
}
