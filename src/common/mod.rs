pub mod config;
pub mod error;

pub use config::{EngineLimits, PhysicsConfig};
pub use error::{ConfigError, WorldError};
