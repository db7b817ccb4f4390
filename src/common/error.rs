use thiserror::Error;

use crate::objects::BodyId;

/// Rejected configuration or parameter updates.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("min_timestep {min} exceeds max_timestep {max}")]
    TimestepOrder { min: f64, max: f64 },
    #[error("screen size must be positive, got {width}x{height}")]
    InvalidScreenSize { width: f64, height: f64 },
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("no body with id {0}")]
    UnknownBody(BodyId),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
