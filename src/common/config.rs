//! Simulation tunables and fixed engine constants.
//!
//! [`PhysicsConfig`] holds the parameters a UI adjusts at runtime; the world
//! validates every update before applying it. [`EngineLimits`] holds the
//! numerical constants that keep the solver stable and are rarely touched.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::ConfigError;
use crate::math::vec2::Vec2;

/// Runtime-adjustable physical parameters. Changes take effect on the next substep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Coefficient of restitution. 0 = no bounce, 1 = perfectly elastic.
    pub restitution: f64,
    /// Velocity-proportional friction coefficient applied at contacts.
    pub friction: f64,
    /// Fraction of linear velocity kept per 1/60 s.
    pub air_resistance: f64,
    /// Fraction of angular velocity kept per 1/60 s.
    pub angular_damping: f64,
    pub wind: Vec2,
    pub wind_enabled: bool,
    /// Multiplier applied to the wall-clock frame delta.
    pub time_speed: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            restitution: 0.7,
            friction: 0.4,
            air_resistance: 0.995,
            angular_damping: 0.995,
            wind: Vec2::new(0.0, 0.05),
            wind_enabled: true,
            time_speed: 1.0,
        }
    }
}

impl PhysicsConfig {
    pub const MAX_FRICTION: f64 = 2.0;
    pub const MAX_TIME_SPEED: f64 = 10.0;

    /// Elastic, frictionless and undamped.
    pub fn bouncy() -> Self {
        PhysicsConfig {
            restitution: 1.0,
            friction: 0.0,
            air_resistance: 1.0,
            angular_damping: 1.0,
            ..Self::default()
        }
    }

    pub fn realistic() -> Self {
        PhysicsConfig {
            restitution: 0.7,
            friction: 0.4,
            air_resistance: 0.995,
            angular_damping: 0.995,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("restitution", self.restitution, 0.0, 1.0)?;
        check_range("friction", self.friction, 0.0, Self::MAX_FRICTION)?;
        check_positive("air_resistance", self.air_resistance)?;
        check_range("air_resistance", self.air_resistance, 0.0, 1.0)?;
        check_positive("angular_damping", self.angular_damping)?;
        check_range("angular_damping", self.angular_damping, 0.0, 1.0)?;
        check_range("time_speed", self.time_speed, 0.0, Self::MAX_TIME_SPEED)?;
        if !self.wind.is_finite() {
            return Err(ConfigError::NonFinite { field: "wind" });
        }
        Ok(())
    }

    /// Wind force for this substep, if enabled.
    pub fn wind_force(&self) -> Option<Vec2> {
        self.wind_enabled.then_some(self.wind)
    }

    /// Parses and validates a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: PhysicsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

/// Fixed numerical constants of the solver and the simulation loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineLimits {
    // Time stepping
    pub max_timestep: f64,
    pub min_timestep: f64,
    pub max_integration_dt: f64,

    // Integration
    pub force_scale: f64,
    pub torque_scale: f64,
    pub max_velocity: f64,
    pub max_angular_velocity: f64,

    // Collision
    pub bounding_box_margin: f64,
    pub proximity_threshold: f64,
    pub friction_velocity_threshold: f64,
    pub penetration_slop: f64,
    pub percent_correction: f64,

    // World
    pub world_size: f64,
    pub bounds_margin: f64,
    pub skip_population: usize,
    pub grid_population: usize,
    pub grid_cell_size: f64,

    // Anti-entanglement, measured in wall-clock time
    pub collision_window: Duration,
    pub collision_threshold: u32,
    pub suppression_duration: Duration,
    pub separation_speed: f64,
    pub separation_distance: f64,
    pub separation_strength: f64,
}

impl Default for EngineLimits {
    fn default() -> Self {
        EngineLimits {
            max_timestep: 1.0 / 30.0,
            min_timestep: 1.0 / 1000.0,
            max_integration_dt: 1.0 / 30.0,

            force_scale: 1000.0,
            torque_scale: 1000.0,
            max_velocity: 2000.0,
            max_angular_velocity: 30.0,

            bounding_box_margin: 5.0,
            proximity_threshold: 1.0,
            friction_velocity_threshold: 0.01,
            penetration_slop: 0.5,
            percent_correction: 0.4,

            world_size: 1000.0,
            bounds_margin: 50.0,
            skip_population: 25,
            grid_population: 15,
            grid_cell_size: 150.0,

            collision_window: Duration::from_millis(2000),
            collision_threshold: 5,
            suppression_duration: Duration::from_millis(1000),
            separation_speed: 100.0,
            separation_distance: 80.0,
            separation_strength: 0.5,
        }
    }
}

impl EngineLimits {
    /// Rejects constants that would stall the loop or break the solver:
    /// timesteps, scales, sizes and speed caps must be positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("max_timestep", self.max_timestep)?;
        check_positive("min_timestep", self.min_timestep)?;
        check_positive("max_integration_dt", self.max_integration_dt)?;
        if self.min_timestep > self.max_timestep {
            return Err(ConfigError::TimestepOrder {
                min: self.min_timestep,
                max: self.max_timestep,
            });
        }

        check_positive("force_scale", self.force_scale)?;
        check_positive("torque_scale", self.torque_scale)?;
        check_positive("max_velocity", self.max_velocity)?;
        check_positive("max_angular_velocity", self.max_angular_velocity)?;

        check_range("bounding_box_margin", self.bounding_box_margin, 0.0, f64::MAX)?;
        check_range("proximity_threshold", self.proximity_threshold, 0.0, f64::MAX)?;
        check_range("friction_velocity_threshold", self.friction_velocity_threshold, 0.0, f64::MAX)?;
        check_range("penetration_slop", self.penetration_slop, 0.0, f64::MAX)?;
        check_range("percent_correction", self.percent_correction, 0.0, 1.0)?;

        check_positive("world_size", self.world_size)?;
        check_range("bounds_margin", self.bounds_margin, 0.0, f64::MAX)?;
        check_positive("grid_cell_size", self.grid_cell_size)?;

        check_range("separation_speed", self.separation_speed, 0.0, f64::MAX)?;
        check_range("separation_distance", self.separation_distance, 0.0, f64::MAX)?;
        check_range("separation_strength", self.separation_strength, 0.0, f64::MAX)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_default_config_is_valid() {
        let config = PhysicsConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.wind_enabled);
        assert_eq!(config.wind, Vec2::new(0.0, 0.05));
    }

    #[test]
    fn test_presets() {
        let bouncy = PhysicsConfig::bouncy();
        assert!((bouncy.restitution - 1.0).abs() < EPSILON);
        assert!(bouncy.friction.abs() < EPSILON);
        assert!((bouncy.air_resistance - 1.0).abs() < EPSILON);

        let realistic = PhysicsConfig::realistic();
        assert!((realistic.restitution - 0.7).abs() < EPSILON);
        assert!((realistic.friction - 0.4).abs() < EPSILON);
        assert!((realistic.air_resistance - 0.995).abs() < EPSILON);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = PhysicsConfig {
            restitution: 1.5,
            ..PhysicsConfig::default()
        };
        match config.validate() {
            Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, "restitution"),
            other => panic!("unexpected result: {:?}", other),
        }

        let config = PhysicsConfig {
            time_speed: f64::NAN,
            ..PhysicsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { field: "time_speed" })
        ));
    }

    #[test]
    fn test_wind_force_respects_toggle() {
        let mut config = PhysicsConfig::default();
        assert_eq!(config.wind_force(), Some(Vec2::new(0.0, 0.05)));
        config.wind_enabled = false;
        assert_eq!(config.wind_force(), None);
    }

    #[test]
    fn test_json_partial_document_uses_defaults() {
        let config = PhysicsConfig::from_json_str(r#"{ "restitution": 0.9, "wind_enabled": false }"#)
            .unwrap();
        assert!((config.restitution - 0.9).abs() < EPSILON);
        assert!(!config.wind_enabled);
        assert!((config.friction - 0.4).abs() < EPSILON);

        let json = config.to_json_string().unwrap();
        assert_eq!(PhysicsConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_json_rejects_invalid_values() {
        assert!(matches!(
            PhysicsConfig::from_json_str(r#"{ "friction": -1.0 }"#),
            Err(ConfigError::OutOfRange { field: "friction", .. })
        ));
        assert!(matches!(
            PhysicsConfig::from_json_str("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_engine_limits_defaults() {
        let limits = EngineLimits::default();
        assert!(limits.min_timestep < limits.max_timestep);
        assert_eq!(limits.grid_population, 15);
        assert_eq!(limits.skip_population, 25);
        assert_eq!(limits.collision_threshold, 5);
        assert_eq!(limits.collision_window, Duration::from_secs(2));
        assert!(limits.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_damping() {
        for config in [
            PhysicsConfig {
                air_resistance: 0.0,
                ..PhysicsConfig::default()
            },
            PhysicsConfig {
                angular_damping: 0.0,
                ..PhysicsConfig::default()
            },
        ] {
            assert!(matches!(config.validate(), Err(ConfigError::NotPositive { .. })));
        }
        let config = PhysicsConfig {
            air_resistance: 1.0,
            angular_damping: 1e-3,
            ..PhysicsConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_engine_limits_validation() {
        let zero_cell = EngineLimits {
            grid_cell_size: 0.0,
            ..EngineLimits::default()
        };
        assert!(matches!(
            zero_cell.validate(),
            Err(ConfigError::NotPositive { field: "grid_cell_size", .. })
        ));

        let zero_step = EngineLimits {
            min_timestep: 0.0,
            ..EngineLimits::default()
        };
        assert!(matches!(
            zero_step.validate(),
            Err(ConfigError::NotPositive { field: "min_timestep", .. })
        ));

        let inverted = EngineLimits {
            min_timestep: 0.1,
            max_timestep: 0.05,
            ..EngineLimits::default()
        };
        assert!(matches!(inverted.validate(), Err(ConfigError::TimestepOrder { .. })));

        let infinite_world = EngineLimits {
            world_size: f64::INFINITY,
            ..EngineLimits::default()
        };
        assert!(matches!(
            infinite_world.validate(),
            Err(ConfigError::NonFinite { field: "world_size" })
        ));

        let overcorrecting = EngineLimits {
            percent_correction: 1.5,
            ..EngineLimits::default()
        };
        assert!(matches!(
            overcorrecting.validate(),
            Err(ConfigError::OutOfRange { field: "percent_correction", .. })
        ));
    }
}
