use serde::{Deserialize, Serialize};

use super::{Collider, ShapeDescription};
use crate::math::vec2::Vec2;

/// Static thick segment. Collision treats it as a slab extending
/// `thickness / 2` to either side of the centreline from `start` to `end`.
/// Walls are never integrated and have no mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub start: Vec2,
    pub end: Vec2,
    pub thickness: f64,
    /// Unit direction along the segment.
    pub direction: Vec2,
}

impl Wall {
    pub const DEFAULT_THICKNESS: f64 = 10.0;

    pub fn new(start: Vec2, end: Vec2, thickness: f64) -> Self {
        assert!(
            thickness > 0.0 && thickness.is_finite(),
            "Wall thickness must be positive, got {}",
            thickness
        );
        assert!(
            start.is_finite() && end.is_finite() && start != end,
            "Wall needs two distinct finite endpoints, got {:?} and {:?}",
            start,
            end
        );
        Wall {
            start,
            end,
            thickness,
            direction: (end - start).normalize(),
        }
    }

    /// A wall with an explicit direction instead of the one implied by the
    /// endpoints. The normal follows this direction.
    pub fn with_direction(start: Vec2, end: Vec2, thickness: f64, direction: Vec2) -> Self {
        Wall {
            direction: direction.normalize(),
            ..Wall::new(start, end, thickness)
        }
    }

    /// Fixed unit normal, perpendicular to the wall direction.
    pub fn normal(&self) -> Vec2 {
        self.direction.perpendicular().normalize()
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).magnitude()
    }

    pub fn half_thickness(&self) -> f64 {
        self.thickness / 2.0
    }
}

impl Collider for Wall {
    /// The four slab corners.
    fn vertices(&self) -> Vec<Vec2> {
        let offset = self.normal() * self.half_thickness();
        vec![
            self.start + offset,
            self.end + offset,
            self.end - offset,
            self.start - offset,
        ]
    }

    fn describe(&self) -> ShapeDescription {
        ShapeDescription::Wall {
            start: self.start,
            end: self.end,
            thickness: self.thickness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_wall_normal_is_perpendicular() {
        let wall = Wall::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), 10.0);
        let n = wall.normal();
        assert!((n.magnitude() - 1.0).abs() < EPSILON);
        assert!(n.dot(wall.direction).abs() < EPSILON);
        assert!((n.y - 1.0).abs() < EPSILON);
        assert!((wall.length() - 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_wall_slab_vertices_and_bounds() {
        let wall = Wall::new(Vec2::new(0.0, 1000.0), Vec2::new(1000.0, 1000.0), 50.0);
        let verts = wall.vertices();
        assert_eq!(verts.len(), 4);
        let aabb = wall.bounding_box();
        assert!((aabb.min.y - 975.0).abs() < EPSILON);
        assert!((aabb.max.y - 1025.0).abs() < EPSILON);
        assert!((aabb.min.x - 0.0).abs() < EPSILON);
        assert!((aabb.max.x - 1000.0).abs() < EPSILON);
    }

    #[test]
    #[should_panic(expected = "distinct finite endpoints")]
    fn test_wall_rejects_zero_length() {
        Wall::new(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 10.0);
    }

    #[test]
    fn test_wall_explicit_direction() {
        let wall = Wall::with_direction(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Wall::DEFAULT_THICKNESS,
            Vec2::new(0.0, 5.0),
        );
        assert_eq!(wall.direction, Vec2::new(0.0, 1.0));
        assert!((wall.normal().x + 1.0).abs() < EPSILON);
    }
}
