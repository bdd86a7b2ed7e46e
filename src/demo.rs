//! The two demo scenes: spinning squares and swinging circles.
//!
//! Each one switches to the other when one of the digit keys 1 to 4 is
//! pressed, covering the swap with the matching transition effect.

use glam::Vec2;

use crate::scene::{Scene, SceneContext, SceneId, SceneManager, TransitionBindings};
use crate::shape::{Color, DrawList};

/// Length of every scene change, in seconds.
pub const TRANSITION_SECONDS: f32 = 2.0;

pub const SQUARES: &str = "Scene01";
pub const CIRCLES: &str = "Scene02";

/// Rotation per frame of the square scene, in degrees.
pub const SQUARES_STEP_DEGREES: f32 = 2.0;
/// Rotation per frame of the circle scene, in degrees.
pub const CIRCLES_STEP_DEGREES: f32 = 4.0;

pub const SQUARE_COLOR: Color = Color::YELLOW_GREEN;
pub const CIRCLE_COLOR: Color = Color::GREEN;

/// Register both demo scenes.
pub fn register(scenes: &mut SceneManager) {
    scenes
        .add(SQUARES, || RotatingSquares::new(CIRCLES))
        .add(CIRCLES, || SwingingCircles::new(SQUARES));
}

/// Two yellow-green squares turning in place.
pub struct RotatingSquares {
    angle: f32,
    next: SceneId,
    bindings: TransitionBindings,
}

impl RotatingSquares {
    pub fn new(next: impl Into<SceneId>) -> Self {
        Self {
            angle: 0.0,
            next: next.into(),
            bindings: TransitionBindings::digits(),
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    fn spin(&mut self) {
        self.angle += SQUARES_STEP_DEGREES.to_radians();
    }
}

impl Scene for RotatingSquares {
    fn update(&mut self, ctx: &mut SceneContext<'_>) {
        self.bindings.poll(ctx, &self.next, TRANSITION_SECONDS);
        self.spin();
    }

    fn draw(&self, draw: &mut DrawList, _screen: Vec2) {
        let r = self.angle;
        draw.rotated_square(240.0, 120.0, 150.0, r, SQUARE_COLOR);
        draw.rotated_square(480.0, 400.0, 300.0, r + 45f32.to_radians(), SQUARE_COLOR);
    }

    fn update_fade_in(&mut self, _ctx: &mut SceneContext<'_>, _progress: f32) {
        self.spin();
    }

    fn update_fade_out(&mut self, _ctx: &mut SceneContext<'_>, _progress: f32) {
        self.spin();
    }

    // The overlay effect is the only visible transition
    fn draw_fade_in(&self, draw: &mut DrawList, screen: Vec2, _progress: f32) {
        self.draw(draw, screen);
    }

    fn draw_fade_out(&self, draw: &mut DrawList, screen: Vec2, _progress: f32) {
        self.draw(draw, screen);
    }
}

/// Two green circles swinging side to side, one of them lopsided.
pub struct SwingingCircles {
    angle: f32,
    next: SceneId,
    bindings: TransitionBindings,
}

impl SwingingCircles {
    pub fn new(next: impl Into<SceneId>) -> Self {
        Self {
            angle: 0.0,
            next: next.into(),
            bindings: TransitionBindings::digits(),
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    fn spin(&mut self) {
        self.angle += CIRCLES_STEP_DEGREES.to_radians();
    }

    /// Horizontal centers of the upper and lower circle.
    pub fn centers_x(&self) -> (f32, f32) {
        let r = self.angle;
        let upper = 400.0 + r.sin().clamp(-0.8, 0.8) / 0.8 * 200.0;
        let lower = 400.0 + (r + 22.5f32.to_radians()).sin().clamp(-0.1, 0.8) / 0.8 * 200.0;
        (upper, lower)
    }
}

impl Scene for SwingingCircles {
    fn update(&mut self, ctx: &mut SceneContext<'_>) {
        self.bindings.poll(ctx, &self.next, TRANSITION_SECONDS);
        self.spin();
    }

    fn draw(&self, draw: &mut DrawList, _screen: Vec2) {
        let (upper, lower) = self.centers_x();
        draw.circle(Vec2::new(upper, 120.0), 60.0, CIRCLE_COLOR);
        draw.circle(Vec2::new(lower, 400.0), 80.0, CIRCLE_COLOR);
    }

    fn update_fade_in(&mut self, _ctx: &mut SceneContext<'_>, _progress: f32) {
        self.spin();
    }

    fn update_fade_out(&mut self, _ctx: &mut SceneContext<'_>, _progress: f32) {
        self.spin();
    }

    fn draw_fade_in(&self, draw: &mut DrawList, screen: Vec2, _progress: f32) {
        self.draw(draw, screen);
    }

    fn draw_fade_out(&self, draw: &mut DrawList, screen: Vec2, _progress: f32) {
        self.draw(draw, screen);
    }
}
