use std::env;

use rand::rngs::StdRng;
use rand::SeedableRng;
use sandbox_physics::world::{CollisionKind, SpawnKind, SpawnSettings};
use sandbox_physics::{PhysicsConfig, RigidBody, Shape, Vec2, Wall, World};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DT: f64 = 1.0 / 60.0;

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().collect();
    let scenario = args.get(1).map(String::as_str).unwrap_or("collision");
    info!(scenario, "running scenario");

    match scenario {
        "collision" => run_collision(),
        "pile" => run_pile(args.get(2).and_then(|n| n.parse().ok()).unwrap_or(30)),
        "settle" => run_settle(),
        _ => warn!(scenario, "unknown scenario, available: collision, pile, settle"),
    }
}

/// The two-box demo, reported up to the first impact between the boxes.
fn run_collision() {
    let mut world = World::demo();

    for frame in 0..600 {
        world.update(DT);
        for event in world.events() {
            match event.kind {
                CollisionKind::Wall { wall } => info!(
                    frame,
                    body = %event.body,
                    wall,
                    speed = event.impact_speed,
                    "wall hit"
                ),
                CollisionKind::Body { other } => {
                    info!(
                        frame,
                        body = %event.body,
                        other = %other,
                        x = event.contact_point.x,
                        y = event.contact_point.y,
                        speed = event.impact_speed,
                        "boxes collided"
                    );
                    log_bodies(&world);
                    return;
                }
            }
        }
    }
    warn!("no collision between the boxes within 10 s");
}

/// A crowd of random shapes dropped in the arena.
fn run_pile(count: usize) {
    let mut world = World::new();
    world.add_arena_walls(50.0);
    let mut rng = StdRng::seed_from_u64(7);

    let kinds = [
        SpawnKind::Box,
        SpawnKind::Triangle,
        SpawnKind::Pentagon,
        SpawnKind::Hexagon,
        SpawnKind::Circle,
    ];
    let mut spawned = 0;
    for i in 0..count {
        let settings = SpawnSettings {
            kind: kinds[i % kinds.len()],
            width: 40.0,
            height: 40.0,
            radius: 20.0,
            ..SpawnSettings::default()
        };
        if world.spawn_random(&settings, &mut rng).is_some() {
            spawned += 1;
        }
    }
    info!(requested = count, spawned, "pile built");

    for frame in 1..=600 {
        world.update(DT);
        if frame % 60 == 0 {
            let stats = world.stats();
            info!(
                second = frame / 60,
                bodies = stats.body_count,
                momentum = stats.total_momentum,
                energy = stats.kinetic_energy,
                energy_level = ?stats.energy_level,
                activity = ?stats.activity_level,
                suppressed = world.pair_tracker().suppressed_pairs(),
                "pile"
            );
        }
    }
}

/// One box coming to rest on a floor under a strong downward wind.
fn run_settle() {
    let config = PhysicsConfig {
        restitution: 0.8,
        wind: Vec2::new(0.0, 0.5),
        ..PhysicsConfig::default()
    };
    let mut world = match World::with_config(config, Default::default()) {
        Ok(world) => world,
        Err(e) => {
            warn!(error = %e, "rejected config");
            return;
        }
    };
    world.add_wall(Wall::new(Vec2::new(0.0, 600.0), Vec2::new(1000.0, 600.0), 20.0));
    world.add_body(RigidBody::new(Shape::rect(40.0, 40.0), 2.0, Vec2::new(500.0, 500.0)));

    for frame in 1..=600 {
        world.update(DT);
        if frame % 60 == 0 {
            log_bodies(&world);
        }
    }
}

fn log_bodies(world: &World) {
    for snapshot in world.snapshots() {
        info!(
            body = %snapshot.id,
            x = snapshot.position.x,
            y = snapshot.position.y,
            vx = snapshot.velocity.x,
            vy = snapshot.velocity.y,
            omega = snapshot.angular_velocity,
            "body"
        );
    }
}
