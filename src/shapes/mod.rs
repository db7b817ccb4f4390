pub mod box_shape;
pub mod ngon;
pub mod wall;

pub use box_shape::BoxShape;
pub use ngon::NGon;
pub use wall::Wall;

use serde::{Deserialize, Serialize};

use crate::collision::AABB;
use crate::math::{Transform, Vec2};

/// Geometry of a dynamic body. Walls are separate static colliders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Box(BoxShape),
    NGon(NGon),
}

impl Shape {
    pub fn rect(width: f64, height: f64) -> Self {
        Shape::Box(BoxShape::new(width, height))
    }

    pub fn ngon(radius: f64, sides: usize) -> Self {
        Shape::NGon(NGon::new(radius, sides))
    }

    pub fn local_vertices(&self) -> Vec<Vec2> {
        match self {
            Shape::Box(b) => b.local_vertices(),
            Shape::NGon(n) => n.local_vertices(),
        }
    }

    pub fn moment_of_inertia(&self, mass: f64) -> f64 {
        match self {
            Shape::Box(b) => b.moment_of_inertia(mass),
            Shape::NGon(n) => n.moment_of_inertia(mass),
        }
    }

    /// Single length used to size collision sounds and UI markers:
    /// the larger box extent, or the n-gon diameter.
    pub fn characteristic_size(&self) -> f64 {
        match self {
            Shape::Box(b) => b.width.max(b.height),
            Shape::NGon(n) => n.radius * 2.0,
        }
    }

    /// Point containment for hit-testing, given the body pose.
    pub fn contains(&self, pose: Transform, point: Vec2) -> bool {
        match self {
            Shape::Box(b) => b.contains_local(pose.apply_inverse(point)),
            Shape::NGon(n) => ngon::point_in_polygon(&pose.apply_all(&n.local_vertices()), point),
        }
    }

    pub fn describe(&self) -> ShapeDescription {
        match *self {
            Shape::Box(b) => ShapeDescription::Box {
                width: b.width,
                height: b.height,
            },
            Shape::NGon(n) => ShapeDescription::NGon {
                radius: n.radius,
                sides: n.sides,
            },
        }
    }
}

/// Plain-data shape description handed to rendering collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeDescription {
    Box { width: f64, height: f64 },
    NGon { radius: f64, sides: usize },
    Wall { start: Vec2, end: Vec2, thickness: f64 },
}

/// Anything the narrow phase can test: a closed, ordered list of
/// world-space vertices and the bounds derived from it.
pub trait Collider {
    fn vertices(&self) -> Vec<Vec2>;

    fn describe(&self) -> ShapeDescription;

    fn bounding_box(&self) -> AABB {
        let vertices = self.vertices();
        AABB::from_points(&vertices).unwrap_or_else(|| AABB::new(Vec2::ZERO, Vec2::ZERO))
    }

    /// Outward-or-inward unit normals of each edge, in vertex order.
    fn edge_normals(&self) -> Vec<Vec2> {
        let vertices = self.vertices();
        let n = vertices.len();
        (0..n)
            .map(|i| (vertices[(i + 1) % n] - vertices[i]).perpendicular().normalize())
            .collect()
    }
}
