use crate::math::vec2::Vec2;

/// Geometry of a single representative contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Contact point in world coordinates.
    pub point: Vec2,
    /// Unit normal pointing from the second participant toward the first.
    pub normal: Vec2,
    /// Non-negative penetration (body pairs: closest-feature distance).
    pub penetration: f64,
}

/// What the first body collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactTarget {
    /// Index of the other body in the world's body list.
    Body(usize),
    /// Index of the wall in the world's wall list.
    Wall(usize),
}

/// A detected collision, valid for the substep that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// Index of the first (dynamic) body.
    pub body: usize,
    pub target: ContactTarget,
    pub contact: Contact,
}

impl CollisionInfo {
    pub fn is_wall(&self) -> bool {
        matches!(self.target, ContactTarget::Wall(_))
    }
}
