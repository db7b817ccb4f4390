use serde::{Deserialize, Serialize};

use crate::math::vec2::Vec2;

/// Axis-aligned rectangle in the body's local frame, centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxShape {
    pub width: f64,
    pub height: f64,
}

impl BoxShape {
    /// Panics if either extent is not strictly positive.
    pub fn new(width: f64, height: f64) -> Self {
        assert!(
            width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite(),
            "Box extents must be positive and finite, got {}x{}",
            width,
            height
        );
        BoxShape { width, height }
    }

    /// Corners in local space, ordered top-left, top-right, bottom-right,
    /// bottom-left (y grows downward).
    pub fn local_vertices(&self) -> Vec<Vec2> {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ]
    }

    /// Moment of inertia of a solid rectangle about its centre.
    pub fn moment_of_inertia(&self, mass: f64) -> f64 {
        (1.0 / 12.0) * mass * (self.width * self.width + self.height * self.height)
    }

    /// Half-extent comparison against a point already in the local frame.
    pub fn contains_local(&self, local: Vec2) -> bool {
        local.x.abs() <= self.width / 2.0 && local.y.abs() <= self.height / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_box_local_vertices() {
        let b = BoxShape::new(80.0, 50.0);
        let v = b.local_vertices();
        assert_eq!(v.len(), 4);
        assert_eq!(v[0], Vec2::new(-40.0, -25.0));
        assert_eq!(v[2], Vec2::new(40.0, 25.0));
    }

    #[test]
    fn test_box_inertia() {
        let b = BoxShape::new(60.0, 60.0);
        let expected = (1.0 / 12.0) * 2.0 * (3600.0 + 3600.0);
        assert!((b.moment_of_inertia(2.0) - expected).abs() < EPSILON);
    }

    #[test]
    fn test_box_contains_local() {
        let b = BoxShape::new(10.0, 4.0);
        assert!(b.contains_local(Vec2::new(4.9, 1.9)));
        assert!(b.contains_local(Vec2::new(5.0, -2.0)));
        assert!(!b.contains_local(Vec2::new(5.1, 0.0)));
        assert!(!b.contains_local(Vec2::new(0.0, -2.1)));
    }

    #[test]
    #[should_panic]
    fn test_box_rejects_zero_width() {
        BoxShape::new(0.0, 10.0);
    }
}
