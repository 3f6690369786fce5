//! Collision detection between the player and tube blocks
//!
//! The player is a circle, each tube block an axis-aligned rectangle. Both are
//! rebuilt from game state every frame and never stored.

use glam::Vec2;

/// A circle collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// An axis-aligned rectangle, anchored at its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Point inside (or on the edge of) the rectangle closest to `point`
    #[inline]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max())
    }
}

/// Check whether a circle touches or overlaps a rectangle.
///
/// Touching counts: a circle whose edge lies exactly on the rectangle overlaps.
pub fn circle_rect_overlap(circle: &Circle, rect: &Rect) -> bool {
    let closest = rect.closest_point(circle.center);
    circle.center.distance_squared(closest) <= circle.radius * circle.radius
}
