//! Scene building on top of [`World`]: the object factory, the arena walls,
//! the two-box demo and hit-testing for pointer input.

use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::math::vec2::Vec2;
use crate::objects::{BodyId, RigidBody};
use crate::shapes::{Shape, Wall};

use super::physics_world::World;

/// Closest a new body may be placed to an existing one, centre to centre.
const MIN_SPAWN_DISTANCE: f64 = 60.0;
const SPAWN_ATTEMPTS: usize = 50;
/// Random spawns land within this distance of the world centre on each axis.
const SPAWN_SPREAD: f64 = 150.0;
/// Fallback pick radius when no body contains the point.
const PICK_RADIUS: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    Box,
    Triangle,
    Pentagon,
    Hexagon,
    /// Approximated by a 10-gon.
    Circle,
}

impl SpawnKind {
    /// Side count of the polygon variants; `None` for boxes.
    pub fn sides(&self) -> Option<usize> {
        match self {
            SpawnKind::Box => None,
            SpawnKind::Triangle => Some(3),
            SpawnKind::Pentagon => Some(5),
            SpawnKind::Hexagon => Some(6),
            SpawnKind::Circle => Some(10),
        }
    }
}

/// Template for bodies created by the factory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    pub kind: SpawnKind,
    pub mass: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub velocity: Vec2,
    pub angular_velocity: f64,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        SpawnSettings {
            kind: SpawnKind::Box,
            mass: 2.0,
            width: 60.0,
            height: 60.0,
            radius: 30.0,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
        }
    }
}

impl SpawnSettings {
    pub fn shape(&self) -> Shape {
        match self.kind.sides() {
            None => Shape::rect(self.width, self.height),
            Some(sides) => Shape::ngon(self.radius, sides),
        }
    }

    pub fn build(&self, position: Vec2) -> RigidBody {
        RigidBody::new(self.shape(), self.mass, position)
            .with_velocity(self.velocity)
            .with_angular_velocity(self.angular_velocity)
    }
}

impl World {
    /// Builds the two-box collision demo inside a walled arena.
    pub fn demo() -> Self {
        let mut world = World::new();
        world.add_arena_walls(50.0);
        for index in 0..2 {
            let mut body = RigidBody::new(demo_shape(index), 2.0, Vec2::ZERO);
            place_demo_body(&mut body, index);
            world.add_body(body);
        }
        world
    }

    /// Four walls whose centrelines run along the edges of the square world.
    pub fn add_arena_walls(&mut self, thickness: f64) {
        let size = self.limits().world_size;
        let corners = [
            Vec2::new(0.0, 0.0),
            Vec2::new(size, 0.0),
            Vec2::new(size, size),
            Vec2::new(0.0, size),
        ];
        for i in 0..corners.len() {
            self.add_wall(Wall::new(corners[i], corners[(i + 1) % corners.len()], thickness));
        }
    }

    /// Restores the demo: keeps the first two bodies, puts them back in
    /// their starting poses and forgets all contact history.
    pub fn reset_demo_scene(&mut self) {
        let bodies = self.bodies_mut();
        bodies.truncate(2);
        for (index, body) in bodies.iter_mut().enumerate() {
            place_demo_body(body, index);
        }

        self.clear_transients();
        info!("demo scene reset");
    }

    /// Whether a body could be placed at `position` without crowding another.
    pub fn is_spawn_clear(&self, position: Vec2) -> bool {
        self.bodies()
            .iter()
            .all(|b| b.position.distance(position) >= MIN_SPAWN_DISTANCE)
    }

    /// Creates a body from `settings` at `position`, unless the spot is taken.
    pub fn spawn_at(&mut self, position: Vec2, settings: &SpawnSettings) -> Option<BodyId> {
        if !self.is_spawn_clear(position) {
            debug!(x = position.x, y = position.y, "spawn rejected, too close to another body");
            return None;
        }
        Some(self.add_body(settings.build(position)))
    }

    /// Tries random spots around the world centre until one is free.
    pub fn spawn_random(&mut self, settings: &SpawnSettings, rng: &mut impl Rng) -> Option<BodyId> {
        let half = self.limits().world_size / 2.0;
        let centre = Vec2::new(half, half);

        for _ in 0..SPAWN_ATTEMPTS {
            let offset = Vec2::new(
                rng.gen_range(-SPAWN_SPREAD..SPAWN_SPREAD),
                rng.gen_range(-SPAWN_SPREAD..SPAWN_SPREAD),
            );
            let position = centre + offset;
            if self.is_spawn_clear(position) {
                return Some(self.add_body(settings.build(position)));
            }
        }
        debug!(attempts = SPAWN_ATTEMPTS, "no free spot for a random spawn");
        None
    }

    /// The first body containing `point`, else the first one whose centre is
    /// within the pick radius.
    pub fn body_at(&self, point: Vec2) -> Option<BodyId> {
        let bodies = self.bodies();
        bodies
            .iter()
            .find(|b| b.contains(point))
            .or_else(|| bodies.iter().find(|b| b.position.distance(point) < PICK_RADIUS))
            .map(RigidBody::id)
    }

    /// Flips every body's debug flag.
    pub fn toggle_debug(&mut self) {
        for body in self.bodies_mut().iter_mut() {
            body.debug = !body.debug;
        }
    }
}

fn demo_shape(index: usize) -> Shape {
    match index {
        0 => Shape::rect(80.0, 50.0),
        _ => Shape::rect(60.0, 60.0),
    }
}

/// Starting pose of the demo's first two bodies: the 80x50 box launched
/// toward the left wall with a slow spin, and the tilted box at rest.
fn place_demo_body(body: &mut RigidBody, index: usize) {
    let (position, velocity, angular_velocity, rotation) = match index {
        0 => (Vec2::new(200.0, 200.0), Vec2::new(-500.0, 0.0), PI / 64.0, 0.0),
        _ => (Vec2::new(750.0, 200.0), Vec2::ZERO, 0.0, PI / 8.0),
    };
    body.position = position;
    body.velocity = velocity;
    body.angular_velocity = angular_velocity;
    body.rotation = rotation;
    body.clear_accumulators();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Collider, ShapeDescription};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_spawn_kinds() {
        let mut settings = SpawnSettings::default();
        assert_eq!(settings.shape().describe(), ShapeDescription::Box { width: 60.0, height: 60.0 });

        for (kind, sides) in [
            (SpawnKind::Triangle, 3),
            (SpawnKind::Pentagon, 5),
            (SpawnKind::Hexagon, 6),
            (SpawnKind::Circle, 10),
        ] {
            settings.kind = kind;
            let body = settings.build(Vec2::ZERO);
            assert_eq!(body.vertices().len(), sides);
            assert!((body.mass() - 2.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_spawn_at_rejects_crowded_spot() {
        let mut world = World::new();
        let settings = SpawnSettings {
            velocity: Vec2::new(5.0, 0.0),
            angular_velocity: 1.0,
            ..SpawnSettings::default()
        };
        let id = world.spawn_at(Vec2::new(300.0, 300.0), &settings).unwrap();
        let body = world.body(id).unwrap();
        assert_eq!(body.velocity, Vec2::new(5.0, 0.0));
        assert!((body.angular_velocity - 1.0).abs() < EPSILON);

        assert!(world.spawn_at(Vec2::new(340.0, 300.0), &settings).is_none());
        assert!(world.spawn_at(Vec2::new(360.0, 300.0), &settings).is_some());
    }

    #[test]
    fn test_spawn_random_stays_near_centre() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(7);
        let settings = SpawnSettings::default();
        let mut spawned = 0;
        for _ in 0..10 {
            if let Some(id) = world.spawn_random(&settings, &mut rng) {
                let p = world.body(id).unwrap().position;
                assert!((p.x - 500.0).abs() <= 150.0);
                assert!((p.y - 500.0).abs() <= 150.0);
                spawned += 1;
            }
        }
        assert!(spawned > 0);

        let bodies = world.bodies();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                assert!(bodies[i].position.distance(bodies[j].position) >= 60.0);
            }
        }
    }

    #[test]
    fn test_demo_scene() {
        let world = World::demo();
        assert_eq!(world.walls().len(), 4);
        assert_eq!(world.bodies().len(), 2);
        assert_eq!(world.bodies()[0].velocity, Vec2::new(-500.0, 0.0));
        assert!((world.bodies()[1].rotation - PI / 8.0).abs() < EPSILON);
        assert!(world.walls().iter().all(|w| (w.thickness - 50.0).abs() < EPSILON));
    }

    #[test]
    fn test_demo_matches_reset_state() {
        let fresh = World::demo();
        let mut reset = World::demo();
        for _ in 0..30 {
            reset.update(1.0 / 60.0);
        }
        reset.reset_demo_scene();

        assert!((fresh.bodies()[0].angular_velocity - PI / 64.0).abs() < EPSILON);
        for (a, b) in fresh.bodies().iter().zip(reset.bodies()) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.velocity, b.velocity);
            assert_eq!(a.angular_velocity, b.angular_velocity);
            assert_eq!(a.rotation, b.rotation);
            assert_eq!(a.describe(), b.describe());
        }
    }

    #[test]
    fn test_reset_demo_scene() {
        let mut world = World::demo();
        world.add_body(RigidBody::new(Shape::ngon(20.0, 5), 1.0, Vec2::new(500.0, 500.0)));
        for _ in 0..30 {
            world.update(1.0 / 60.0);
        }

        world.reset_demo_scene();
        let bodies = world.bodies();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0].position, Vec2::new(200.0, 200.0));
        assert_eq!(bodies[0].velocity, Vec2::new(-500.0, 0.0));
        assert!((bodies[0].angular_velocity - PI / 64.0).abs() < EPSILON);
        assert_eq!(bodies[1].position, Vec2::new(750.0, 200.0));
        assert_eq!(bodies[1].velocity, Vec2::ZERO);
        assert!((bodies[1].rotation - PI / 8.0).abs() < EPSILON);
        assert!(world.trail().is_empty());
        assert_eq!(world.pair_tracker().suppressed_pairs(), 0);
    }

    #[test]
    fn test_body_at() {
        let world = World::demo();
        let first = world.bodies()[0].id();
        let second = world.bodies()[1].id();

        // Inside the 80x50 box.
        assert_eq!(world.body_at(Vec2::new(235.0, 220.0)), Some(first));
        // Outside both shapes but within the pick radius of the second.
        assert_eq!(world.body_at(Vec2::new(750.0, 245.0)), Some(second));
        assert_eq!(world.body_at(Vec2::new(500.0, 800.0)), None);
    }

    #[test]
    fn test_toggle_debug() {
        let mut world = World::demo();
        world.toggle_debug();
        assert!(world.bodies().iter().all(|b| b.debug));
        world.toggle_debug();
        assert!(world.bodies().iter().all(|b| !b.debug));
    }
}
