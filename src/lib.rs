//! Core of a 2D rigid-body sandbox: boxes and regular polygons tumbling
//! inside a walled arena, with impulse-based collision response.

pub mod collision;
pub mod common;
pub mod integration;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use common::{ConfigError, EngineLimits, PhysicsConfig, WorldError};
pub use math::{Transform, Vec2};
pub use objects::{BodyId, RigidBody};
pub use shapes::{Collider, Shape, ShapeDescription, Wall};
pub use world::{
    CollisionEvent, CollisionKind, CollisionObserver, SpawnKind, SpawnSettings, World, WorldStats,
};
