use super::vec2::Vec2;

/// Pose of a body: translation of its centre plus rotation in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f64,
}

impl Transform {
    pub fn new(position: Vec2, rotation: f64) -> Self {
        Self { position, rotation }
    }

    /// Maps a body-local point to world space (rotate, then translate).
    pub fn apply(self, local: Vec2) -> Vec2 {
        local.rotate(self.rotation) + self.position
    }

    /// Maps a world-space point back into the body's local frame.
    pub fn apply_inverse(self, world: Vec2) -> Vec2 {
        (world - self.position).rotate(-self.rotation)
    }

    /// Maps every local point to world space.
    pub fn apply_all(self, locals: &[Vec2]) -> Vec<Vec2> {
        let (sin_a, cos_a) = self.rotation.sin_cos();
        locals
            .iter()
            .map(|p| {
                Vec2::new(
                    p.x * cos_a - p.y * sin_a + self.position.x,
                    p.x * sin_a + p.y * cos_a + self.position.y,
                )
            })
            .collect()
    }
}
