use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::math::Vec2;
use crate::objects::RigidBody;

const HISTORY_LEN: usize = 20;
const AVERAGE_SPAN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyLevel {
    Low,
    Moderate,
    High,
}

impl EnergyLevel {
    pub fn from_kinetic_energy(energy: f64) -> Self {
        if energy < 5000.0 {
            EnergyLevel::Low
        } else if energy < 30000.0 {
            EnergyLevel::Moderate
        } else {
            EnergyLevel::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Stable,
    Dynamic,
    Turbulent,
}

impl ActivityLevel {
    pub fn classify(recent_collisions: usize, momentum_change: f64) -> Self {
        if recent_collisions > 3 || momentum_change > 100.0 {
            ActivityLevel::Turbulent
        } else if recent_collisions > 1 || momentum_change > 50.0 {
            ActivityLevel::Dynamic
        } else {
            ActivityLevel::Stable
        }
    }
}

/// Rolling record of total momentum magnitude, one sample per frame.
#[derive(Debug, Clone, Default)]
pub struct MomentumHistory {
    samples: VecDeque<f64>,
}

impl MomentumHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, momentum: f64) {
        if self.samples.len() == HISTORY_LEN {
            self.samples.pop_front();
        }
        self.samples.push_back(momentum);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Difference between the mean of the last five samples and the mean of
    /// the five before them. Zero while there is no older window.
    pub fn momentum_change(&self) -> f64 {
        let n = self.samples.len();
        if n == 0 {
            return 0.0;
        }
        let recent_start = n.saturating_sub(AVERAGE_SPAN);
        let older_start = recent_start.saturating_sub(AVERAGE_SPAN);

        let recent = mean(self.samples.range(recent_start..n));
        let older = if older_start == recent_start {
            recent
        } else {
            mean(self.samples.range(older_start..recent_start))
        };
        (recent - older).abs()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

fn mean<'a>(values: impl ExactSizeIterator<Item = &'a f64>) -> f64 {
    let count = values.len();
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

/// Aggregate figures for the overlay, recomputed after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldStats {
    pub body_count: usize,
    pub total_momentum: f64,
    pub angular_momentum: f64,
    pub kinetic_energy: f64,
    pub energy_level: EnergyLevel,
    pub activity_level: ActivityLevel,
    pub recent_collisions: usize,
    pub momentum_change: f64,
}

impl Default for WorldStats {
    fn default() -> Self {
        WorldStats {
            body_count: 0,
            total_momentum: 0.0,
            angular_momentum: 0.0,
            kinetic_energy: 0.0,
            energy_level: EnergyLevel::Low,
            activity_level: ActivityLevel::Stable,
            recent_collisions: 0,
            momentum_change: 0.0,
        }
    }
}

impl WorldStats {
    /// Samples the bodies, pushes the momentum into `history` and classifies
    /// the frame from the resulting trend and the number of collision events.
    pub fn compute(bodies: &[RigidBody], recent_collisions: usize, history: &mut MomentumHistory) -> Self {
        let linear = bodies
            .iter()
            .fold(Vec2::ZERO, |acc, b| acc + b.linear_momentum());
        let angular_momentum: f64 = bodies.iter().map(RigidBody::angular_momentum).sum();
        let kinetic_energy: f64 = bodies.iter().map(RigidBody::kinetic_energy).sum();

        let total_momentum = linear.magnitude();
        history.push(total_momentum);
        let momentum_change = history.momentum_change();

        WorldStats {
            body_count: bodies.len(),
            total_momentum,
            angular_momentum,
            kinetic_energy,
            energy_level: EnergyLevel::from_kinetic_energy(kinetic_energy),
            activity_level: ActivityLevel::classify(recent_collisions, momentum_change),
            recent_collisions,
            momentum_change,
        }
    }
}
