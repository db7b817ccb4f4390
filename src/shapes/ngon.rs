use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::math::vec2::Vec2;

/// Regular polygon with `sides` vertices evenly spaced on a circle of
/// `radius`. Circles are approximated by many-sided n-gons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NGon {
    pub radius: f64,
    pub sides: usize,
}

impl NGon {
    /// Panics if fewer than 3 sides are requested or the radius is not
    /// strictly positive.
    pub fn new(radius: f64, sides: usize) -> Self {
        if sides < 3 {
            panic!("NGon must have at least 3 sides, got {}", sides);
        }
        assert!(
            radius > 0.0 && radius.is_finite(),
            "NGon radius must be positive and finite, got {}",
            radius
        );
        NGon { radius, sides }
    }

    /// Vertices in local space, starting on the +x axis.
    pub fn local_vertices(&self) -> Vec<Vec2> {
        let step = 2.0 * PI / self.sides as f64;
        (0..self.sides)
            .map(|i| {
                let angle = i as f64 * step;
                Vec2::new(angle.cos() * self.radius, angle.sin() * self.radius)
            })
            .collect()
    }

    /// Disc approximation: I = m r^2 / 2.
    pub fn moment_of_inertia(&self, mass: f64) -> f64 {
        0.5 * mass * self.radius * self.radius
    }
}

/// Even-odd ray crossing test against a closed polygon.
pub fn point_in_polygon(points: &[Vec2], point: Vec2) -> bool {
    let mut inside = false;
    let n = points.len();
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let pi = points[i];
        let pj = points[j];
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_ngon_vertices_on_circle() {
        let hex = NGon::new(30.0, 6);
        let verts = hex.local_vertices();
        assert_eq!(verts.len(), 6);
        for v in &verts {
            assert!((v.magnitude() - 30.0).abs() < EPSILON);
        }
        assert!((verts[0].x - 30.0).abs() < EPSILON);
        assert!(verts[0].y.abs() < EPSILON);
    }

    #[test]
    fn test_ngon_inertia() {
        let tri = NGon::new(10.0, 3);
        assert!((tri.moment_of_inertia(2.0) - 100.0).abs() < EPSILON);
    }

    #[test]
    #[should_panic(expected = "at least 3 sides")]
    fn test_ngon_rejects_two_sides() {
        NGon::new(10.0, 2);
    }

    #[test]
    fn test_point_in_polygon() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(&square, Vec2::new(5.0, 5.0)));
        assert!(!point_in_polygon(&square, Vec2::new(15.0, 5.0)));
        assert!(!point_in_polygon(&square, Vec2::new(5.0, -1.0)));
        assert!(!point_in_polygon(&[], Vec2::ZERO));
    }
}
