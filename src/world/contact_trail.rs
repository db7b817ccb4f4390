use serde::{Deserialize, Serialize};

use crate::math::vec2::Vec2;

/// Points closer than this to a recent trail point are merged into it.
const MERGE_DISTANCE: f64 = 3.0;
/// How recent, in simulation seconds, a point must be to absorb a new one.
const MERGE_AGE: f64 = 0.1;

/// A contact point kept for drawing after the contact itself is gone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FadingContact {
    pub position: Vec2,
    pub created_at: f64,
}

/// Recently touched points, aged in simulation time.
#[derive(Debug, Clone)]
pub struct ContactTrail {
    points: Vec<FadingContact>,
    lifetime: f64,
}

impl ContactTrail {
    pub fn new(lifetime: f64) -> Self {
        ContactTrail {
            points: Vec::new(),
            lifetime,
        }
    }

    pub fn lifetime(&self) -> f64 {
        self.lifetime
    }

    /// Adds `position` unless a point within 3 units was added in the last 0.1 s.
    pub fn add(&mut self, position: Vec2, now: f64) {
        let duplicate = self
            .points
            .iter()
            .any(|p| p.position.distance(position) < MERGE_DISTANCE && now - p.created_at < MERGE_AGE);
        if !duplicate {
            self.points.push(FadingContact {
                position,
                created_at: now,
            });
        }
    }

    /// Drops points older than the lifetime.
    pub fn expire(&mut self, now: f64) {
        let lifetime = self.lifetime;
        self.points.retain(|p| now - p.created_at < lifetime);
    }

    /// Opacity in `[0, 1]`: 1 when fresh, 0 at the end of the lifetime.
    pub fn alpha(&self, point: &FadingContact, now: f64) -> f64 {
        (1.0 - (now - point.created_at) / self.lifetime).clamp(0.0, 1.0)
    }

    pub fn points(&self) -> &[FadingContact] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl Default for ContactTrail {
    fn default() -> Self {
        Self::new(1.0)
    }
}
