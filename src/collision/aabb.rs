// Axis-aligned bounding boxes for the broad phase.

use crate::math::vec2::Vec2;

/// An Axis-Aligned Bounding Box defined by its minimum and maximum corner points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec2,
    pub max: Vec2,
}

impl AABB {
    /// Creates a new AABB, normalising the corners so `min <= max`.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        AABB {
            min: Vec2::new(min.x.min(max.x), min.y.min(max.y)),
            max: Vec2::new(min.x.max(max.x), min.y.max(max.y)),
        }
    }

    /// Smallest box enclosing all points, or `None` for an empty slice.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points.iter().skip(1).fold((first, first), |(min, max), p| {
            (
                Vec2::new(min.x.min(p.x), min.y.min(p.y)),
                Vec2::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Some(AABB { min, max })
    }

    /// Touching boxes count as overlapping.
    pub fn overlaps(&self, other: &AABB) -> bool {
        self.overlaps_with_margin(other, 0.0)
    }

    /// Overlap test with `self` grown by `margin` on every side.
    pub fn overlaps_with_margin(&self, other: &AABB, margin: f64) -> bool {
        !(self.max.x + margin < other.min.x
            || self.min.x - margin > other.max.x
            || self.max.y + margin < other.min.y
            || self.min.y - margin > other.max.y)
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}
