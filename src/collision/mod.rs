pub mod aabb;
pub mod detection;
pub mod info;
pub mod resolution;
pub mod spatial_grid;

pub use aabb::AABB;
pub use detection::{
    check_bounding_box_collision, check_collision, check_polygon_collision, check_wall_collision,
    closest_point_on_segment, DetectionParams,
};
pub use info::{CollisionInfo, Contact, ContactTarget};
pub use resolution::{resolve_body_collision, resolve_collision, resolve_wall_collision, ResolutionParams};
pub use spatial_grid::{BroadPhase, SpatialGrid};
