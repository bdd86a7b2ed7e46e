//! Display-list primitives shared by scenes, effects and the renderer.
//!
//! Scenes and transition effects never talk to the GPU directly. They push
//! [`Shape`]s into a [`DrawList`] each frame, and [`Draw2d`](crate::Draw2d)
//! turns that list into triangles. Keeping the list as plain data means the
//! geometry an effect produces can be inspected without a window.

use glam::Vec2;

use crate::capture::FrameId;

/// A rectangle in screen-space pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning `min` to `max`.
    pub fn from_corners(min: Vec2, max: Vec2) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.position() + self.size() * 0.5
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Scale about the center, keeping the center fixed.
    pub fn scaled(&self, s: f32) -> Self {
        let size = self.size() * s;
        let min = self.center() - size * 0.5;
        Self::new(min.x, min.y, size.x, size.y)
    }
}

/// RGBA color with straight alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Color from 8-bit sRGB channels.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub(crate) fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::rgb8(0, 128, 0);
    pub const YELLOW_GREEN: Color = Color::rgb8(154, 205, 50);
    pub const LIGHT_BLUE: Color = Color::rgb8(173, 216, 230);
}

/// One drawable primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned filled rectangle.
    Rect { rect: Rect, color: Color },
    /// Arbitrary filled quad, corners in winding order.
    Quad { corners: [Vec2; 4], color: Color },
    /// Filled circle.
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// Line segment with a pixel thickness.
    Line {
        from: Vec2,
        to: Vec2,
        thickness: f32,
        color: Color,
    },
    /// Rectangle outline centered on the rectangle's edges.
    Frame {
        rect: Rect,
        thickness: f32,
        color: Color,
    },
    /// Region `src` of a captured frame, stretched over `dst`.
    Image { frame: FrameId, src: Rect, dst: Rect },
    /// Whole-screen overlay.
    Fill { color: Color },
}

/// Ordered list of shapes for the current frame.
///
/// Shapes are drawn in push order: later shapes cover earlier ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    shapes: Vec<Shape>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every shape, keeping the allocation.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn rect(&mut self, rect: Rect, color: Color) {
        self.push(Shape::Rect { rect, color });
    }

    /// Square of side `size` with its top-left at (`x`, `y`), rotated by
    /// `angle` radians about its center.
    pub fn rotated_square(&mut self, x: f32, y: f32, size: f32, angle: f32, color: Color) {
        let half = size * 0.5;
        let center = Vec2::new(x + half, y + half);
        let rot = Vec2::from_angle(angle);
        let corners = [
            Vec2::new(-half, -half),
            Vec2::new(half, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ]
        .map(|c| center + rot.rotate(c));
        self.push(Shape::Quad { corners, color });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.push(Shape::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        self.push(Shape::Line {
            from,
            to,
            thickness,
            color,
        });
    }

    pub fn frame(&mut self, rect: Rect, thickness: f32, color: Color) {
        self.push(Shape::Frame {
            rect,
            thickness,
            color,
        });
    }

    pub fn image(&mut self, frame: FrameId, src: Rect, dst: Rect) {
        self.push(Shape::Image { frame, src, dst });
    }

    pub fn fill(&mut self, color: Color) {
        self.push(Shape::Fill { color });
    }

    /// Captured frames referenced by this list.
    pub fn frames(&self) -> impl Iterator<Item = FrameId> + '_ {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Image { frame, .. } => Some(*frame),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_rect_keeps_center() {
        let r = Rect::new(100.0, 50.0, 200.0, 100.0);
        let s = r.scaled(0.5);
        assert_eq!(s.center(), r.center());
        assert_eq!(s.size(), Vec2::new(100.0, 50.0));
        assert_eq!(r.scaled(0.0).area(), 0.0);
    }

    #[test]
    fn rotated_square_is_centered() {
        let mut list = DrawList::new();
        list.rotated_square(240.0, 120.0, 150.0, 0.3, Color::YELLOW_GREEN);

        let Shape::Quad { corners, .. } = &list.shapes()[0] else {
            panic!("expected a quad");
        };
        let center = corners.iter().copied().sum::<Vec2>() / 4.0;
        assert!((center - Vec2::new(315.0, 195.0)).length() < 1e-3);
        assert!((corners[0].distance(corners[1]) - 150.0).abs() < 1e-3);
    }

    #[test]
    fn frames_lists_image_references() {
        let mut list = DrawList::new();
        list.fill(Color::BLACK);
        list.image(FrameId(3), Rect::default(), Rect::default());
        list.rect(Rect::default(), Color::WHITE);
        assert_eq!(list.frames().collect::<Vec<_>>(), vec![FrameId(3)]);
    }
}
