use glam::Vec2;

use crate::resources::GameRng;
use crate::scale::Scale;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Box inset by `inset` on every side
    pub fn shrink(&self, inset: f32) -> Self {
        let center = (self.min + self.max) * 0.5;
        let size = (self.max - self.min - Vec2::splat(inset * 2.0)).max(Vec2::ZERO);
        Self::from_center_size(center, size)
    }

    /// Strict overlap; boxes that only touch do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// The visible play area in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Centre of the top-left cell of a new spawn, just past the right edge
    ///
    /// The row is drawn from `0..=rows - height_in_rows` so the whole
    /// cluster stays inside the viewport vertically.
    pub fn spawn_point(&self, height_in_rows: u32, rows: u32, scale: &Scale, rng: &mut GameRng) -> Vec2 {
        let last_row = rows.saturating_sub(height_in_rows);
        let row = rng.up_to(last_row);
        Vec2::new(
            self.width,
            row as f32 * scale.sprite_height + scale.sprite_height / 2.0,
        )
    }

    /// Whether something whose top edge is at `top` has fallen out of view
    pub fn is_below(&self, top: f32) -> bool {
        top > self.height
    }
}
