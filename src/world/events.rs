use serde::{Deserialize, Serialize};

use crate::math::vec2::Vec2;
use crate::objects::{BodyId, RigidBody};
use crate::shapes::{Collider, ShapeDescription};

/// Who the body hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionKind {
    Wall { wall: usize },
    Body { other: BodyId },
}

/// A collision notification for audio and UI collaborators. At most one is
/// emitted per wall/body or body pair per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub body: BodyId,
    pub kind: CollisionKind,
    pub contact_point: Vec2,
    /// Body speed for walls, relative speed for body pairs.
    pub impact_speed: f64,
    /// Characteristic size; averaged for body pairs.
    pub size: f64,
    /// Mass; averaged for body pairs.
    pub mass: f64,
}

impl CollisionEvent {
    pub fn wall(body: &RigidBody, wall: usize, contact_point: Vec2) -> Self {
        CollisionEvent {
            body: body.id(),
            kind: CollisionKind::Wall { wall },
            contact_point,
            impact_speed: body.velocity.magnitude(),
            size: body.characteristic_size(),
            mass: body.mass(),
        }
    }

    pub fn pair(a: &RigidBody, b: &RigidBody, contact_point: Vec2) -> Self {
        CollisionEvent {
            body: a.id(),
            kind: CollisionKind::Body { other: b.id() },
            contact_point,
            impact_speed: (a.velocity - b.velocity).magnitude(),
            size: (a.characteristic_size() + b.characteristic_size()) / 2.0,
            mass: (a.mass() + b.mass()) / 2.0,
        }
    }

    pub fn is_wall(&self) -> bool {
        matches!(self.kind, CollisionKind::Wall { .. })
    }
}

/// Fire-and-forget receiver of collision events, called from inside the
/// tick. It gets a shared reference only and cannot touch physics state.
pub trait CollisionObserver: Send {
    fn on_collision(&mut self, event: &CollisionEvent);
}

impl<F> CollisionObserver for F
where
    F: FnMut(&CollisionEvent) + Send,
{
    fn on_collision(&mut self, event: &CollisionEvent) {
        self(event)
    }
}

/// Plain-data view of a body for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub position: Vec2,
    pub rotation: f64,
    pub velocity: Vec2,
    pub angular_velocity: f64,
    pub mass: f64,
    pub inertia: f64,
    pub shape: ShapeDescription,
    pub vertices: Vec<Vec2>,
    pub contact_points: Vec<Vec2>,
    pub debug: bool,
}

impl From<&RigidBody> for BodySnapshot {
    fn from(body: &RigidBody) -> Self {
        BodySnapshot {
            id: body.id(),
            position: body.position,
            rotation: body.rotation,
            velocity: body.velocity,
            angular_velocity: body.angular_velocity,
            mass: body.mass(),
            inertia: body.inertia(),
            shape: body.describe(),
            vertices: body.vertices(),
            contact_points: body.contact_points.clone(),
            debug: body.debug,
        }
    }
}
