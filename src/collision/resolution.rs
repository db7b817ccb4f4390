use tracing::trace;

use crate::collision::info::{CollisionInfo, Contact, ContactTarget};
use crate::common::{EngineLimits, PhysicsConfig};
use crate::objects::{get_mutable_body_pair, RigidBody};

/// Material and correction constants for one resolution pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionParams {
    pub restitution: f64,
    pub friction: f64,
    /// Tangential speed below which no friction impulse is applied.
    pub friction_velocity_threshold: f64,
    pub penetration_slop: f64,
    pub percent_correction: f64,
}

impl ResolutionParams {
    pub fn new(config: &PhysicsConfig, limits: &EngineLimits) -> Self {
        ResolutionParams {
            restitution: config.restitution,
            friction: config.friction,
            friction_velocity_threshold: limits.friction_velocity_threshold,
            penetration_slop: limits.penetration_slop,
            percent_correction: limits.percent_correction,
        }
    }
}

impl Default for ResolutionParams {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default(), &EngineLimits::default())
    }
}

/// Resolves one detected collision against the world's bodies.
/// Returns `false` when the participants were already separating.
pub fn resolve_collision(bodies: &mut [RigidBody], info: &CollisionInfo, params: &ResolutionParams) -> bool {
    match info.target {
        ContactTarget::Wall(_) => resolve_wall_collision(&mut bodies[info.body], &info.contact, params),
        ContactTarget::Body(other) => {
            let (body_a, body_b) = get_mutable_body_pair(bodies, info.body, other);
            resolve_body_collision(body_a, body_b, &info.contact, params)
        }
    }
}

/// Impulse response of a dynamic body against an immovable wall. The wall
/// contributes no mass terms and is never moved.
pub fn resolve_wall_collision(body: &mut RigidBody, contact: &Contact, params: &ResolutionParams) -> bool {
    let normal = contact.normal;
    let r = contact.point - body.position;
    let point_velocity = body.point_velocity(contact.point);

    let velocity_along_normal = point_velocity.dot(normal);
    if velocity_along_normal > 0.0 {
        return false;
    }

    let r_cross_n = r.cross(normal);
    let inv_effective_mass = body.inv_mass() + r_cross_n * r_cross_n * body.inv_inertia();

    let j = -(1.0 + params.restitution) * velocity_along_normal / inv_effective_mass;
    body.apply_impulse_at_point(normal * j, contact.point);

    let tangent = normal.perpendicular();
    let tangent_velocity = point_velocity.dot(tangent);
    if tangent_velocity.abs() > params.friction_velocity_threshold {
        let friction_j = -tangent_velocity * params.friction / inv_effective_mass;
        body.apply_impulse_at_point(tangent * friction_j, contact.point);
    }

    if contact.penetration > params.penetration_slop {
        let correction = (contact.penetration - params.penetration_slop) * params.percent_correction;
        body.position += normal * correction;
    }

    trace!(body = %body.id(), impulse = j, "wall impulse");
    true
}

/// Impulse response between two dynamic bodies. `contact.normal` must point
/// from `b` toward `a`; `a` receives `+impulse`, `b` receives `-impulse`.
pub fn resolve_body_collision(
    a: &mut RigidBody,
    b: &mut RigidBody,
    contact: &Contact,
    params: &ResolutionParams,
) -> bool {
    let normal = contact.normal;
    let r_a = contact.point - a.position;
    let r_b = contact.point - b.position;

    let relative_velocity = a.point_velocity(contact.point) - b.point_velocity(contact.point);
    let velocity_along_normal = relative_velocity.dot(normal);
    if velocity_along_normal > 0.0 {
        return false;
    }

    let ra_cross_n = r_a.cross(normal);
    let rb_cross_n = r_b.cross(normal);
    let inv_effective_mass = a.inv_mass()
        + b.inv_mass()
        + ra_cross_n * ra_cross_n * a.inv_inertia()
        + rb_cross_n * rb_cross_n * b.inv_inertia();

    let j = -(1.0 + params.restitution) * velocity_along_normal / inv_effective_mass;
    let impulse = normal * j;
    a.apply_impulse_at_point(impulse, contact.point);
    b.apply_impulse_at_point(-impulse, contact.point);

    // Velocity-proportional friction, not capped by the normal impulse.
    let tangent = normal.perpendicular();
    let tangent_velocity = relative_velocity.dot(tangent);
    if tangent_velocity.abs() > params.friction_velocity_threshold {
        let friction_j = -tangent_velocity * params.friction / inv_effective_mass;
        let friction_impulse = tangent * friction_j;
        a.apply_impulse_at_point(friction_impulse, contact.point);
        b.apply_impulse_at_point(-friction_impulse, contact.point);
    }

    if contact.penetration > params.penetration_slop {
        let total_inv_mass = a.inv_mass() + b.inv_mass();
        let amount = (contact.penetration - params.penetration_slop) * params.percent_correction;
        let correction = normal * (amount / total_inv_mass);
        a.position += correction * a.inv_mass();
        b.position -= correction * b.inv_mass();
    }

    trace!(body_a = %a.id(), body_b = %b.id(), impulse = j, "body impulse");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2::Vec2;
    use crate::shapes::Shape;
    const EPSILON: f64 = 1e-9;

    fn elastic() -> ResolutionParams {
        ResolutionParams {
            restitution: 1.0,
            friction: 0.0,
            ..ResolutionParams::default()
        }
    }

    fn head_on_pair() -> (RigidBody, RigidBody, Contact) {
        let a = RigidBody::new(Shape::rect(10.0, 10.0), 2.0, Vec2::new(0.0, 0.0)).with_velocity(Vec2::new(50.0, 0.0));
        let b = RigidBody::new(Shape::rect(10.0, 10.0), 3.0, Vec2::new(10.5, 0.0)).with_velocity(Vec2::new(-20.0, 0.0));
        let contact = Contact {
            point: Vec2::new(5.0, 0.0),
            normal: Vec2::new(-1.0, 0.0),
            penetration: 0.0,
        };
        (a, b, contact)
    }

    fn momentum(a: &RigidBody, b: &RigidBody) -> Vec2 {
        a.linear_momentum() + b.linear_momentum()
    }

    #[test]
    fn test_elastic_collision_conserves_momentum() {
        let (mut a, mut b, contact) = head_on_pair();
        let before = momentum(&a, &b);
        let relative_before = (a.velocity - b.velocity).dot(contact.normal);

        assert!(resolve_body_collision(&mut a, &mut b, &contact, &elastic()));

        let after = momentum(&a, &b);
        assert!((before.x - after.x).abs() < EPSILON);
        assert!((before.y - after.y).abs() < EPSILON);

        // Perfectly elastic: the normal relative velocity is reversed.
        let relative_after = (a.velocity - b.velocity).dot(contact.normal);
        assert!((relative_after + relative_before).abs() < EPSILON);
        assert_eq!(a.position, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_off_centre_collision_conserves_momentum() {
        let (mut a, mut b, mut contact) = head_on_pair();
        contact.point = Vec2::new(5.0, 3.0);
        b.angular_velocity = 0.7;
        let before = momentum(&a, &b);

        let params = ResolutionParams {
            friction: 0.5,
            ..elastic()
        };
        resolve_body_collision(&mut a, &mut b, &contact, &params);

        let after = momentum(&a, &b);
        assert!((before.x - after.x).abs() < EPSILON);
        assert!((before.y - after.y).abs() < EPSILON);
    }

    #[test]
    fn test_separating_bodies_are_untouched() {
        let (mut a, mut b, contact) = head_on_pair();
        a.velocity = Vec2::new(-10.0, 4.0);
        b.velocity = Vec2::new(10.0, 0.0);
        let (a_before, b_before) = (a.clone(), b.clone());

        let deep = Contact {
            penetration: 5.0,
            ..contact
        };
        assert!(!resolve_body_collision(&mut a, &mut b, &deep, &ResolutionParams::default()));
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
    }

    #[test]
    fn test_no_energy_injection() {
        for &restitution in &[0.0, 0.3, 0.7, 1.0] {
            for &friction in &[0.0, 0.4, 1.5] {
                let (mut a, mut b, contact) = head_on_pair();
                // Tangential sliding on top of the approach.
                a.velocity.y = 15.0;
                let params = ResolutionParams {
                    restitution,
                    friction,
                    ..ResolutionParams::default()
                };
                let pre = (a.point_velocity(contact.point) - b.point_velocity(contact.point)).dot(contact.normal);

                resolve_body_collision(&mut a, &mut b, &contact, &params);

                let post = (a.point_velocity(contact.point) - b.point_velocity(contact.point)).dot(contact.normal);
                assert!(post.abs() <= restitution * pre.abs() + EPSILON);
            }
        }
    }

    #[test]
    fn test_positional_correction_split_by_inverse_mass() {
        let (mut a, mut b, contact) = head_on_pair();
        let deep = Contact {
            penetration: 2.5,
            ..contact
        };
        let params = ResolutionParams {
            penetration_slop: 0.5,
            percent_correction: 0.5,
            ..elastic()
        };
        resolve_body_collision(&mut a, &mut b, &deep, &params);

        // total push = (2.5 - 0.5) * 0.5 = 1.0, split 3:2 toward the lighter body
        let a_shift = a.position.x - 0.0;
        let b_shift = b.position.x - 10.5;
        assert!((a_shift - -0.6).abs() < EPSILON);
        assert!((b_shift - 0.4).abs() < EPSILON);
    }

    #[test]
    fn test_wall_bounce_reverses_normal_velocity() {
        let mut body = RigidBody::new(Shape::rect(10.0, 10.0), 2.0, Vec2::new(50.0, 90.0))
            .with_velocity(Vec2::new(0.0, 40.0));
        // Floor below the body, contact straight under the centre.
        let contact = Contact {
            point: Vec2::new(50.0, 95.0),
            normal: Vec2::new(0.0, -1.0),
            penetration: 0.2,
        };
        let params = ResolutionParams {
            restitution: 0.8,
            ..ResolutionParams::default()
        };
        assert!(resolve_wall_collision(&mut body, &contact, &params));
        assert!((body.velocity.y - -32.0).abs() < EPSILON);
        assert!(body.angular_velocity.abs() < EPSILON);
        // Below the slop: no positional push.
        assert_eq!(body.position, Vec2::new(50.0, 90.0));
    }

    #[test]
    fn test_wall_correction_moves_only_the_body() {
        let mut body = RigidBody::new(Shape::rect(10.0, 10.0), 2.0, Vec2::new(50.0, 90.0))
            .with_velocity(Vec2::new(0.0, 1.0));
        let contact = Contact {
            point: Vec2::new(50.0, 95.0),
            normal: Vec2::new(0.0, -1.0),
            penetration: 3.0,
        };
        let params = ResolutionParams {
            penetration_slop: 0.5,
            percent_correction: 0.4,
            ..ResolutionParams::default()
        };
        resolve_wall_collision(&mut body, &contact, &params);
        assert!((body.position.y - (90.0 - 1.0)).abs() < EPSILON);
    }

    #[test]
    fn test_wall_friction_slows_sliding() {
        let mut body = RigidBody::new(Shape::rect(10.0, 10.0), 2.0, Vec2::new(50.0, 90.0))
            .with_velocity(Vec2::new(30.0, 5.0));
        let contact = Contact {
            point: Vec2::new(50.0, 95.0),
            normal: Vec2::new(0.0, -1.0),
            penetration: 0.0,
        };
        let params = ResolutionParams {
            restitution: 0.5,
            friction: 0.4,
            ..ResolutionParams::default()
        };
        resolve_wall_collision(&mut body, &contact, &params);
        assert!(body.velocity.x < 30.0);
        assert!(body.velocity.x > 0.0);
    }

    #[test]
    fn test_resolve_collision_dispatch() {
        let (a, b, contact) = head_on_pair();
        let mut bodies = vec![a, b];
        let info = CollisionInfo {
            body: 0,
            target: ContactTarget::Body(1),
            contact,
        };
        assert!(resolve_collision(&mut bodies, &info, &elastic()));
        assert!(bodies[0].velocity.x < 0.0);
        assert!(bodies[1].velocity.x > 0.0);

        // The same pair listed in the other order resolves symmetrically.
        let (a, b, contact) = head_on_pair();
        let mut swapped = vec![b, a];
        let info = CollisionInfo {
            body: 1,
            target: ContactTarget::Body(0),
            contact,
        };
        assert!(resolve_collision(&mut swapped, &info, &elastic()));
        assert!((swapped[1].velocity.x - bodies[0].velocity.x).abs() < EPSILON);
    }
}
