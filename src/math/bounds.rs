//! Axis-aligned 2D bounding box in canvas coordinates

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// Axis-aligned box defined by min and max corners (y grows downwards)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Create bounds from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Degenerate box at a single point, grown with [`expand`](Self::expand)
    pub fn at_point(point: Vec2) -> Self {
        Self { min: point, max: point }
    }

    /// Get center point
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get size (max - min)
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Check if point is inside, edges included
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y
    }

    /// Grow to include point
    pub fn expand(&mut self, point: Vec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grow every side outwards by `margin`
    pub fn padded(&self, margin: f32) -> Bounds {
        Bounds {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }
}
