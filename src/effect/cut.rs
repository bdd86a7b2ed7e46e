use glam::{UVec2, Vec2};
use tracing::debug;

use super::{Effect, EffectContext, EffectKind, Phase, Timing, coverage};
use crate::capture::FrameId;
use crate::shape::{Color, Rect};

/// Tiles across and down the captured frame.
const GRID: UVec2 = UVec2::new(4, 4);

/// Freeze-frame cut.
///
/// During the first half it grabs the frame on screen and draws guide lines
/// along the future tile seams. During the second half the frozen frame is
/// cut into tiles that shrink about their centers, revealing the new scene.
pub struct Cut {
    timing: Timing,
    frame: Option<FrameId>,
    // Asked for a frame that has not been taken yet
    awaiting: bool,
}

impl Cut {
    pub fn new(duration: f32) -> Self {
        Self {
            timing: Timing::new(duration),
            frame: None,
            awaiting: false,
        }
    }

    /// Scale applied to each tile during the fade-out, from 1 at the
    /// midpoint down to 0 at the end.
    pub fn tile_scale(&self, t: f32) -> f32 {
        let half = self.timing.half();
        1.0 - coverage((t - half) / half)
    }

    /// Tile (`x`, `y`) of the grid over a screen of the given size.
    fn tile(screen: Vec2, x: u32, y: u32) -> Rect {
        let cells = GRID.as_vec2();
        let min = (screen * UVec2::new(x, y).as_vec2() / cells).floor();
        let max = (screen * UVec2::new(x + 1, y + 1).as_vec2() / cells).floor();
        Rect::from_corners(min, max)
    }

    fn draw_guides(progress: f32, ctx: &mut EffectContext<'_>) {
        let extent = coverage(progress) * ctx.screen;
        for i in 1..GRID.y {
            let y = (ctx.screen.y * i as f32 / GRID.y as f32).floor();
            ctx.draw
                .line(Vec2::new(0.0, y), Vec2::new(extent.x, y), 1.0, Color::WHITE);
        }
        for i in 1..GRID.x {
            let x = (ctx.screen.x * i as f32 / GRID.x as f32).floor();
            ctx.draw
                .line(Vec2::new(x, 0.0), Vec2::new(x, extent.y), 1.0, Color::WHITE);
        }
    }
}

impl Effect for Cut {
    fn advance(&mut self, t: f32, ctx: &mut EffectContext<'_>) -> bool {
        let Some(phase) = self.timing.phase(t) else {
            return false;
        };

        match phase {
            Phase::FadeIn(p) => match self.frame {
                Some(_) => Self::draw_guides(p, ctx),
                None => {
                    if ctx.capture.has_new_frame() {
                        self.frame = ctx.capture.get_frame();
                        if let Some(frame) = self.frame {
                            debug!(frame = frame.0, elapsed = t, "cut took captured frame");
                        }
                    }
                    self.awaiting = self.frame.is_none();
                    if self.awaiting {
                        ctx.capture.request_current_frame();
                    }
                }
            },
            Phase::FadeOut(_) => {
                // Without a frame there is nothing to cut up
                let Some(frame) = self.frame else {
                    // A capture that lands too late must not be left for the
                    // next cut to pick up
                    if self.awaiting && ctx.capture.has_new_frame() {
                        if let Some(late) = ctx.capture.get_frame() {
                            debug!(frame = late.0, elapsed = t, "cut dropped late capture");
                        }
                        self.awaiting = false;
                    }
                    return true;
                };
                let scale = self.tile_scale(t);
                for y in 0..GRID.y {
                    for x in 0..GRID.x {
                        let src = Self::tile(ctx.screen, x, y);
                        let dst = src.scaled(scale);
                        ctx.draw.image(frame, src, dst);
                        ctx.draw.frame(dst, 1.0, Color::WHITE);
                    }
                }
            }
        }

        true
    }

    fn kind(&self) -> EffectKind {
        EffectKind::Cut
    }

    fn duration(&self) -> f32 {
        self.timing.duration()
    }

    fn captured_frame(&self) -> Option<FrameId> {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::capture::ScreenCapture;
    use crate::shape::{DrawList, Shape};

    fn step(cut: &mut Cut, t: f32, capture: &mut StubCapture) -> DrawList {
        let mut draw = DrawList::new();
        cut.advance(
            t,
            &mut EffectContext {
                screen: SCREEN,
                draw: &mut draw,
                capture,
            },
        );
        draw
    }

    #[test]
    fn captures_exactly_once() {
        let mut cut = Cut::new(2.0);
        let mut capture = StubCapture {
            ready_after: 3,
            ..Default::default()
        };

        let mut t = 0.0;
        while t <= 1.0 {
            step(&mut cut, t, &mut capture);
            t += 0.05;
        }

        assert_eq!(capture.taken, 1);
        assert_eq!(cut.captured_frame(), Some(FrameId(7)));
        // Requests stop once the frame is in hand
        assert_eq!(capture.requests, 4);
    }

    #[test]
    fn guides_grow_once_captured() {
        let mut cut = Cut::new(2.0);
        let mut capture = StubCapture::default();

        // Frame 0 requests, frame 1 takes it, frame 2 draws
        assert!(step(&mut cut, 0.0, &mut capture).is_empty());
        assert!(step(&mut cut, 0.1, &mut capture).is_empty());
        let draw = step(&mut cut, 0.5, &mut capture);
        assert_eq!(draw.len(), 6);

        let Shape::Line { from, to, .. } = &draw.shapes()[0] else {
            panic!("expected guide line");
        };
        assert_eq!(*from, Vec2::new(0.0, 150.0));
        assert!(to.x > 0.0 && to.x < 800.0);
    }

    #[test]
    fn tiles_collapse_over_fade_out() {
        let cut = Cut::new(2.0);
        assert!((cut.tile_scale(1.0) - 1.0).abs() < 1e-6);
        assert!(cut.tile_scale(2.0).abs() < 1e-6);
        assert!(cut.tile_scale(1.5) < 1.0 && cut.tile_scale(1.5) > 0.0);
    }

    #[test]
    fn fade_out_draws_framed_tiles() {
        let mut cut = Cut::new(2.0);
        let mut capture = StubCapture::default();
        step(&mut cut, 0.0, &mut capture);
        step(&mut cut, 0.1, &mut capture);

        let draw = step(&mut cut, 1.5, &mut capture);
        assert_eq!(draw.len(), 32);
        assert_eq!(draw.frames().count(), 16);

        let Shape::Image { src, dst, .. } = &draw.shapes()[0] else {
            panic!("expected image tile");
        };
        assert_eq!(*src, Rect::new(0.0, 0.0, 200.0, 150.0));
        assert!((dst.center() - src.center()).length() < 1e-3);
        assert!(dst.width < src.width);
    }

    #[test]
    fn fade_out_without_capture_draws_nothing() {
        let mut cut = Cut::new(2.0);
        let mut capture = StubCapture::default();
        let draw = step(&mut cut, 1.5, &mut capture);
        assert!(draw.is_empty());
        assert_eq!(capture.taken, 0);
    }

    #[test]
    fn late_capture_is_taken_and_dropped() {
        let mut cut = Cut::new(2.0);
        let mut capture = StubCapture::default();

        // The request goes out on the last fade-in frame, then dt jumps past
        // the midpoint before the frame is ready
        step(&mut cut, 0.99, &mut capture);
        assert_eq!(capture.requests, 1);
        assert!(capture.has_new_frame());

        let draw = step(&mut cut, 1.5, &mut capture);
        assert!(draw.is_empty());
        assert_eq!(capture.taken, 1);
        assert!(!capture.has_new_frame());
        assert_eq!(cut.captured_frame(), None);

        // Nothing more is asked for or drawn
        assert!(step(&mut cut, 1.8, &mut capture).is_empty());
        assert_eq!(capture.requests, 1);
    }
}
