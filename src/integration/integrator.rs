use crate::common::{EngineLimits, PhysicsConfig};
use crate::objects::rigid_body::RigidBody;

/// Everything a single integration step needs, resolved from the world's
/// tunables and limits once per substep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationParams {
    pub max_dt: f64,
    pub force_scale: f64,
    pub torque_scale: f64,
    /// Velocity retained per 1/60 s.
    pub linear_damping: f64,
    pub angular_damping: f64,
    pub max_velocity: f64,
    pub max_angular_velocity: f64,
}

impl IntegrationParams {
    pub fn new(config: &PhysicsConfig, limits: &EngineLimits) -> Self {
        IntegrationParams {
            max_dt: limits.max_integration_dt,
            force_scale: limits.force_scale,
            torque_scale: limits.torque_scale,
            linear_damping: config.air_resistance,
            angular_damping: config.angular_damping,
            max_velocity: limits.max_velocity,
            max_angular_velocity: limits.max_angular_velocity,
        }
    }
}

impl Default for IntegrationParams {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default(), &EngineLimits::default())
    }
}

/// Integrates the body's state forward in time using semi-implicit Euler.
pub fn integrate(body: &mut RigidBody, dt: f64, params: &IntegrationParams) {
    let dt = dt.min(params.max_dt);
    if dt.is_nan() || dt <= 0.0 {
        body.clear_accumulators();
        return;
    }

    // --- Linear Motion --- //
    let linear_acceleration = body.force * (params.force_scale * body.inv_mass());
    body.velocity += linear_acceleration * dt;
    body.position += body.velocity * dt;

    // --- Angular Motion --- //
    let angular_acceleration = body.torque * params.torque_scale * body.inv_inertia();
    body.angular_velocity += angular_acceleration * dt;
    body.rotation = wrap_angle(body.rotation + body.angular_velocity * dt);

    // Damping is expressed per 1/60 s so the effective decay does not depend on the substep size.
    let frames = dt * 60.0;
    body.velocity *= params.linear_damping.powf(frames);
    body.angular_velocity *= params.angular_damping.powf(frames);

    let speed = body.velocity.magnitude();
    if speed > params.max_velocity {
        body.velocity *= params.max_velocity / speed;
    }
    body.angular_velocity = body
        .angular_velocity
        .clamp(-params.max_angular_velocity, params.max_angular_velocity);

    body.clear_accumulators();
}

/// Wraps an angle in radians to the range [-PI, PI].
fn wrap_angle(angle: f64) -> f64 {
    angle.sin().atan2(angle.cos())
}
