use serde::{Deserialize, Serialize};
use std::fmt;

use crate::math::{Transform, Vec2};
use crate::shapes::{Collider, Shape, ShapeDescription};

/// Stable identity of a body inside a world. Assigned once on insertion and
/// never reused, so bookkeeping keyed by it survives removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u64);

impl BodyId {
    /// Placeholder carried by bodies that have not been added to a world.
    pub const UNASSIGNED: BodyId = BodyId(0);
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    id: BodyId,

    // Geometry
    pub shape: Shape,

    // Primary state
    pub position: Vec2,
    pub rotation: f64, // Radians
    pub velocity: Vec2,
    pub angular_velocity: f64, // Radians per second

    // Accumulators, cleared after every integration step
    pub force: Vec2,
    pub torque: f64,

    // Physical properties, strictly positive for the body's lifetime
    mass: f64,
    inertia: f64,

    // Presentation
    pub debug: bool,
    pub contact_points: Vec<Vec2>,
}

impl RigidBody {
    /// Creates a body at rest. The moment of inertia is derived from the shape.
    ///
    /// Panics if `mass` is not strictly positive and finite.
    pub fn new(shape: Shape, mass: f64, position: Vec2) -> Self {
        assert!(
            mass > 0.0 && mass.is_finite(),
            "Body mass must be positive and finite, got {}",
            mass
        );
        let inertia = shape.moment_of_inertia(mass);
        assert!(inertia > 0.0 && inertia.is_finite(), "Degenerate moment of inertia");

        Self {
            id: BodyId::UNASSIGNED,
            shape,
            position,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            mass,
            inertia,
            debug: false,
            contact_points: Vec::new(),
        }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: f64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: BodyId) {
        self.id = id;
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn inv_mass(&self) -> f64 {
        1.0 / self.mass
    }

    pub fn inv_inertia(&self) -> f64 {
        1.0 / self.inertia
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation)
    }

    /// Maps a body-local point to world space.
    pub fn world_point(&self, local: Vec2) -> Vec2 {
        self.transform().apply(local)
    }

    /// Velocity of a world-space point rigidly attached to the body: v + w x r.
    pub fn point_velocity(&self, world_point: Vec2) -> Vec2 {
        let r = world_point - self.position;
        self.velocity + r.cross_scalar(self.angular_velocity)
    }

    /// Accumulates a force through the centre of mass.
    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Accumulates a force at a world point; the offset from the centre adds torque.
    pub fn apply_force_at_point(&mut self, force: Vec2, point: Vec2) {
        self.force += force;
        let r = point - self.position;
        self.torque += r.cross(force);
    }

    pub fn apply_torque(&mut self, torque: f64) {
        self.torque += torque;
    }

    /// Instantaneous change of momentum at a world point. Only collision
    /// resolution uses this; continuous forces go through the accumulators.
    pub fn apply_impulse_at_point(&mut self, impulse: Vec2, point: Vec2) {
        self.velocity += impulse * self.inv_mass();
        let r = point - self.position;
        self.angular_velocity += r.cross(impulse) * self.inv_inertia();
    }

    pub fn clear_accumulators(&mut self) {
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }

    /// Teleports the body and stops all motion.
    pub fn reset_to(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.angular_velocity = 0.0;
    }

    pub fn characteristic_size(&self) -> f64 {
        self.shape.characteristic_size()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.shape.contains(self.transform(), point)
    }

    pub fn linear_momentum(&self) -> Vec2 {
        self.velocity * self.mass
    }

    pub fn angular_momentum(&self) -> f64 {
        self.inertia * self.angular_velocity
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.magnitude_squared()
            + 0.5 * self.inertia * self.angular_velocity * self.angular_velocity
    }
}

impl Collider for RigidBody {
    fn vertices(&self) -> Vec<Vec2> {
        self.transform().apply_all(&self.shape.local_vertices())
    }

    fn describe(&self) -> ShapeDescription {
        self.shape.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    const EPSILON: f64 = 1e-10;

    fn test_box() -> RigidBody {
        RigidBody::new(Shape::rect(2.0, 2.0), 2.0, Vec2::ZERO)
    }

    #[test]
    fn test_rigidbody_new_box() {
        let rb = RigidBody::new(Shape::rect(80.0, 50.0), 2.0, Vec2::new(200.0, 200.0));
        assert_eq!(rb.id(), BodyId::UNASSIGNED);
        assert!((rb.mass() - 2.0).abs() < EPSILON);
        assert!((rb.inertia() - (1.0 / 12.0) * 2.0 * (6400.0 + 2500.0)).abs() < EPSILON);
        assert!((rb.inv_mass() - 0.5).abs() < EPSILON);
        assert_eq!(rb.velocity, Vec2::ZERO);
        assert!(!rb.debug);
    }

    #[test]
    #[should_panic(expected = "mass must be positive")]
    fn test_rigidbody_zero_mass_panics() {
        RigidBody::new(Shape::rect(1.0, 1.0), 0.0, Vec2::ZERO);
    }

    #[test]
    fn test_apply_force() {
        let mut rb = test_box();
        rb.apply_force(Vec2::new(10.0, 5.0));
        rb.apply_force(Vec2::new(-2.0, 1.0));
        assert_eq!(rb.force, Vec2::new(8.0, 6.0));
        assert_eq!(rb.torque, 0.0);
    }

    #[test]
    fn test_apply_force_at_point() {
        let mut rb = test_box();
        rb.position = Vec2::new(1.0, 1.0);
        // r = (1, 0), f = (0, 10) -> torque = 10
        rb.apply_force_at_point(Vec2::new(0.0, 10.0), Vec2::new(2.0, 1.0));
        assert_eq!(rb.force, Vec2::new(0.0, 10.0));
        assert!((rb.torque - 10.0).abs() < EPSILON);
        rb.apply_torque(-4.0);
        assert!((rb.torque - 6.0).abs() < EPSILON);
    }

    #[test]
    fn test_apply_impulse_at_point() {
        let mut rb = test_box();
        let inertia = rb.inertia();
        rb.apply_impulse_at_point(Vec2::new(0.0, 4.0), Vec2::new(1.0, 0.0));
        assert!((rb.velocity.y - 2.0).abs() < EPSILON);
        assert!((rb.angular_velocity - 4.0 / inertia).abs() < EPSILON);
        // Impulses bypass the accumulators.
        assert_eq!(rb.force, Vec2::ZERO);
    }

    #[test]
    fn test_point_velocity() {
        let mut rb = test_box();
        rb.velocity = Vec2::new(1.0, 0.0);
        rb.angular_velocity = 2.0;
        let v = rb.point_velocity(Vec2::new(0.0, 1.0));
        // w x r = 2 * (-1, 0)
        assert!((v.x - -1.0).abs() < EPSILON);
        assert!(v.y.abs() < EPSILON);
    }

    #[test]
    fn test_clear_accumulators() {
        let mut rb = test_box();
        rb.apply_force_at_point(Vec2::new(3.0, 3.0), Vec2::new(1.0, -1.0));
        rb.clear_accumulators();
        assert_eq!(rb.force, Vec2::ZERO);
        assert_eq!(rb.torque, 0.0);
    }

    #[test]
    fn test_vertices_follow_pose() {
        let rb = RigidBody::new(Shape::rect(2.0, 2.0), 1.0, Vec2::new(10.0, 10.0))
            .with_rotation(PI / 4.0);
        let verts = rb.vertices();
        assert_eq!(verts.len(), 4);
        let half_diag = 2.0_f64.sqrt();
        for v in &verts {
            assert!((v.distance(rb.position) - half_diag).abs() < 1e-9);
        }
        let aabb = rb.bounding_box();
        assert!((aabb.width() - 2.0 * half_diag).abs() < 1e-9);
    }

    #[test]
    fn test_energy_and_momentum() {
        let rb = test_box()
            .with_velocity(Vec2::new(3.0, 4.0))
            .with_angular_velocity(2.0);
        assert!((rb.linear_momentum().magnitude() - 10.0).abs() < EPSILON);
        assert!((rb.angular_momentum() - rb.inertia() * 2.0).abs() < EPSILON);
        let expected = 0.5 * 2.0 * 25.0 + 0.5 * rb.inertia() * 4.0;
        assert!((rb.kinetic_energy() - expected).abs() < EPSILON);
    }

    #[test]
    fn test_reset_to() {
        let mut rb = test_box().with_velocity(Vec2::new(5.0, 5.0)).with_angular_velocity(1.0);
        rb.reset_to(Vec2::new(500.0, 500.0));
        assert_eq!(rb.position, Vec2::new(500.0, 500.0));
        assert_eq!(rb.velocity, Vec2::ZERO);
        assert_eq!(rb.angular_velocity, 0.0);
    }
}
