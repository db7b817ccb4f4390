use crate::common::ConfigError;
use crate::math::vec2::Vec2;

/// Linear mapping between world units and screen pixels, per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    world_width: f64,
    world_height: f64,
    screen_width: f64,
    screen_height: f64,
}

impl CoordinateMapper {
    /// Starts with a screen the same size as the world.
    pub fn new(world_width: f64, world_height: f64) -> Self {
        CoordinateMapper {
            world_width,
            world_height,
            screen_width: world_width,
            screen_height: world_height,
        }
    }

    pub fn set_screen_size(&mut self, width: f64, height: f64) -> Result<(), ConfigError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ConfigError::InvalidScreenSize { width, height });
        }
        self.screen_width = width;
        self.screen_height = height;
        Ok(())
    }

    pub fn screen_size(&self) -> (f64, f64) {
        (self.screen_width, self.screen_height)
    }

    pub fn world_size(&self) -> (f64, f64) {
        (self.world_width, self.world_height)
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(
            world.x / self.world_width * self.screen_width,
            world.y / self.world_height * self.screen_height,
        )
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            screen.x / self.screen_width * self.world_width,
            screen.y / self.screen_height * self.world_height,
        )
    }
}
