//! Axis-aligned overlap tests
//!
//! The only geometry in the game: rectangles falling past rectangles.
//! Hitbox forgiveness is expressed by insetting one side of the test,
//! never by changing the overlap rule itself.

use glam::Vec2;

/// An axis-aligned rectangle (top-left origin, screen coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Shrink the rectangle by `pad` on all four sides.
    pub fn inset(self, pad: f32) -> Self {
        Self {
            pos: self.pos + Vec2::splat(pad),
            size: self.size - Vec2::splat(2.0 * pad),
        }
    }

    /// Strict overlap test. Edge-touching rectangles do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }
}
