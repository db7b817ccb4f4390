use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::collision::{
    check_collision, check_wall_collision, resolve_collision, BroadPhase, CollisionInfo, Contact,
    ContactTarget, DetectionParams, ResolutionParams, SpatialGrid,
};
use crate::common::{ConfigError, EngineLimits, PhysicsConfig, WorldError};
use crate::integration::{integrate, IntegrationParams};
use crate::math::vec2::Vec2;
use crate::objects::{get_mutable_body_pair, BodyId, RigidBody};
use crate::shapes::Wall;

use super::contact_trail::ContactTrail;
use super::coords::CoordinateMapper;
use super::events::{BodySnapshot, CollisionEvent, CollisionObserver};
use super::pair_tracker::{Clock, PairKey, PairTracker, SystemClock};
use super::stats::{MomentumHistory, WorldStats};

/// Seconds of simulated time a contact stays on the trail.
const TRAIL_LIFETIME: f64 = 1.0;

/// Deduplication key for collision events within one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EventKey {
    Wall(BodyId, usize),
    Pair(PairKey),
}

/// The simulation: dynamic bodies, static walls and the per-frame loop
/// that integrates, detects and resolves them.
pub struct World {
    bodies: Vec<RigidBody>,
    walls: Vec<Wall>,
    next_id: u64,

    config: PhysicsConfig,
    limits: EngineLimits,
    paused: bool,
    sim_time: f64,
    frame_skip_counter: u64,

    // Per-substep detection output
    collisions: Vec<CollisionInfo>,
    contact_points: Vec<Vec2>,

    // Per-tick event output
    events: Vec<CollisionEvent>,
    event_keys: HashSet<EventKey>,
    observer: Option<Box<dyn CollisionObserver>>,

    trail: ContactTrail,
    tracker: PairTracker,
    clock: Box<dyn Clock>,
    grid: SpatialGrid,
    broad_phase: BroadPhase,
    history: MomentumHistory,
    stats: WorldStats,
    coords: CoordinateMapper,
}

impl World {
    /// An empty world with default parameters.
    pub fn new() -> Self {
        Self::build(PhysicsConfig::default(), EngineLimits::default())
    }

    /// An empty world with the given parameters, rejected if out of range.
    pub fn with_config(config: PhysicsConfig, limits: EngineLimits) -> Result<Self, WorldError> {
        config.validate()?;
        limits.validate()?;
        Ok(Self::build(config, limits))
    }

    fn build(config: PhysicsConfig, limits: EngineLimits) -> Self {
        World {
            bodies: Vec::new(),
            walls: Vec::new(),
            next_id: 1,
            config,
            limits,
            paused: false,
            sim_time: 0.0,
            frame_skip_counter: 0,
            collisions: Vec::new(),
            contact_points: Vec::new(),
            events: Vec::new(),
            event_keys: HashSet::new(),
            observer: None,
            trail: ContactTrail::new(TRAIL_LIFETIME),
            tracker: PairTracker::new(&limits),
            clock: Box::new(SystemClock),
            grid: SpatialGrid::new(limits.grid_cell_size),
            broad_phase: BroadPhase::BruteForce,
            history: MomentumHistory::new(),
            stats: WorldStats::default(),
            coords: CoordinateMapper::new(limits.world_size, limits.world_size),
        }
    }

    /// Replaces the wall-clock source used by the anti-entanglement timers.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn set_observer(&mut self, observer: impl CollisionObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    // --- Bodies and walls ---

    /// Takes ownership of `body` and assigns it a fresh id.
    pub fn add_body(&mut self, mut body: RigidBody) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        body.set_id(id);
        info!(body = %id, mass = body.mass(), x = body.position.x, y = body.position.y, "body added");
        self.bodies.push(body);
        id
    }

    pub fn remove_body(&mut self, id: BodyId) -> Result<RigidBody, WorldError> {
        let index = self.index_of(id).ok_or(WorldError::UnknownBody(id))?;
        let body = self.bodies.remove(index);
        self.tracker.forget_body(id);
        info!(body = %id, "body removed");
        Ok(body)
    }

    /// Adds a static wall and returns its index.
    pub fn add_wall(&mut self, wall: Wall) -> usize {
        info!(
            start_x = wall.start.x,
            start_y = wall.start.y,
            end_x = wall.end.x,
            end_y = wall.end.y,
            thickness = wall.thickness,
            "wall added"
        );
        self.walls.push(wall);
        self.walls.len() - 1
    }

    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    pub(crate) fn bodies_mut(&mut self) -> &mut Vec<RigidBody> {
        &mut self.bodies
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.iter().find(|b| b.id() == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        self.bodies.iter_mut().find(|b| b.id() == id)
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|b| b.id() == id)
    }

    pub fn snapshots(&self) -> Vec<BodySnapshot> {
        self.bodies.iter().map(BodySnapshot::from).collect()
    }

    // --- Run state ---

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            info!(sim_time = self.sim_time, "simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            info!(sim_time = self.sim_time, "simulation resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Simulated seconds elapsed, after time-speed scaling.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    // --- Parameters ---

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn limits(&self) -> &EngineLimits {
        &self.limits
    }

    /// Validates and applies a new parameter set. Takes effect on the next substep.
    pub fn set_config(&mut self, config: PhysicsConfig) -> Result<(), WorldError> {
        config.validate()?;
        debug!(?config, "physics config updated");
        self.config = config;
        Ok(())
    }

    /// Edits a copy of the current parameters and applies it only if the
    /// result is valid.
    pub fn update_config(&mut self, edit: impl FnOnce(&mut PhysicsConfig)) -> Result<(), WorldError> {
        let mut config = self.config;
        edit(&mut config);
        self.set_config(config)
    }

    pub fn set_restitution(&mut self, restitution: f64) -> Result<(), WorldError> {
        self.update_config(|c| c.restitution = restitution)
    }

    pub fn set_friction(&mut self, friction: f64) -> Result<(), WorldError> {
        self.update_config(|c| c.friction = friction)
    }

    pub fn set_air_resistance(&mut self, air_resistance: f64) -> Result<(), WorldError> {
        self.update_config(|c| c.air_resistance = air_resistance)
    }

    pub fn set_angular_damping(&mut self, angular_damping: f64) -> Result<(), WorldError> {
        self.update_config(|c| c.angular_damping = angular_damping)
    }

    pub fn set_wind(&mut self, wind: Vec2) -> Result<(), WorldError> {
        self.update_config(|c| c.wind = wind)
    }

    pub fn set_wind_enabled(&mut self, enabled: bool) -> Result<(), WorldError> {
        self.update_config(|c| c.wind_enabled = enabled)
    }

    pub fn set_time_speed(&mut self, time_speed: f64) -> Result<(), WorldError> {
        self.update_config(|c| c.time_speed = time_speed)
    }

    // --- Coordinates ---

    pub fn coords(&self) -> &CoordinateMapper {
        &self.coords
    }

    pub fn set_screen_size(&mut self, width: f64, height: f64) -> Result<(), ConfigError> {
        self.coords.set_screen_size(width, height)
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.coords.world_to_screen(world)
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.coords.screen_to_world(screen)
    }

    // --- Outputs ---

    /// Collision events of the last tick, at most one per wall/body or body pair.
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Collisions detected in the last substep.
    pub fn collisions(&self) -> &[CollisionInfo] {
        &self.collisions
    }

    /// Contact points of the last substep.
    pub fn contact_points(&self) -> &[Vec2] {
        &self.contact_points
    }

    pub fn trail(&self) -> &ContactTrail {
        &self.trail
    }

    pub fn stats(&self) -> &WorldStats {
        &self.stats
    }

    pub fn pair_tracker(&self) -> &PairTracker {
        &self.tracker
    }

    pub fn broad_phase(&self) -> BroadPhase {
        self.broad_phase
    }

    pub(crate) fn clear_transients(&mut self) {
        self.trail.clear();
        self.tracker.clear();
        self.collisions.clear();
        self.contact_points.clear();
    }

    // --- Simulation ---

    /// Advances the world by a wall-clock frame delta in seconds.
    ///
    /// The delta is scaled by the time speed, clamped to the maximum timestep
    /// and split into substeps no longer than the minimum timestep. While
    /// paused only the trail and statistics are refreshed.
    pub fn update(&mut self, dt: f64) {
        self.events.clear();
        self.event_keys.clear();

        if !self.paused && dt.is_finite() && dt > 0.0 {
            let scaled = dt * self.config.time_speed;
            self.sim_time += scaled;

            let clamped = scaled.min(self.limits.max_timestep);
            if clamped > 0.0 {
                let substeps = ((clamped / self.limits.min_timestep).ceil() as usize).max(1);
                let sub_dt = clamped / substeps as f64;
                for _ in 0..substeps {
                    self.step(sub_dt);
                }
            }
        }

        self.trail.expire(self.sim_time);
        self.stats = WorldStats::compute(&self.bodies, self.events.len(), &mut self.history);
    }

    /// One substep: wind, integration, bounds check, detection, resolution.
    pub fn step(&mut self, dt: f64) {
        let integration = IntegrationParams::new(&self.config, &self.limits);
        let wind = self.config.wind_force();
        for body in self.bodies.iter_mut() {
            if let Some(force) = wind {
                body.apply_force(force);
            }
            integrate(body, dt, &integration);
        }

        self.check_bounds();
        self.check_collisions();
        self.resolve_collisions();
    }

    /// Sends escaped or numerically broken bodies back to the world centre.
    fn check_bounds(&mut self) {
        let size = self.limits.world_size;
        let margin = self.limits.bounds_margin;
        let centre = Vec2::new(size / 2.0, size / 2.0);

        for body in self.bodies.iter_mut() {
            let p = body.position;
            let broken = !p.is_finite()
                || !body.velocity.is_finite()
                || !body.rotation.is_finite()
                || !body.angular_velocity.is_finite();
            let outside = p.x < -margin || p.x > size + margin || p.y < -margin || p.y > size + margin;
            if broken || outside {
                warn!(body = %body.id(), x = p.x, y = p.y, "body left the world, resetting to centre");
                body.reset_to(centre);
                if !body.rotation.is_finite() {
                    body.rotation = 0.0;
                }
            }
        }
    }

    fn check_collisions(&mut self) {
        self.collisions.clear();
        self.contact_points.clear();
        for body in self.bodies.iter_mut() {
            body.contact_points.clear();
        }

        self.frame_skip_counter = self.frame_skip_counter.wrapping_add(1);
        let skip_pairs = self.bodies.len() > self.limits.skip_population && self.frame_skip_counter % 2 != 0;

        for index in 0..self.bodies.len() {
            for wall_index in 0..self.walls.len() {
                if let Some(contact) = check_wall_collision(&self.bodies[index], &self.walls[wall_index]) {
                    self.handle_wall_contact(index, wall_index, contact);
                }
            }
        }

        if skip_pairs {
            return;
        }

        let strategy = BroadPhase::select(self.bodies.len(), &self.limits);
        if strategy != self.broad_phase {
            debug!(bodies = self.bodies.len(), ?strategy, "broad phase switched");
            self.broad_phase = strategy;
        }

        let positions: Vec<Vec2> = self.bodies.iter().map(|b| b.position).collect();
        let pairs = strategy.candidate_pairs(&positions, &mut self.grid);
        let detection = DetectionParams::new(&self.limits);
        let now = self.clock.now();
        for (i, j) in pairs {
            self.handle_pair(i, j, &detection, now);
        }
    }

    fn handle_wall_contact(&mut self, index: usize, wall_index: usize, contact: Contact) {
        self.collisions.push(CollisionInfo {
            body: index,
            target: ContactTarget::Wall(wall_index),
            contact,
        });
        self.note_contact(contact.point);
        self.bodies[index].contact_points = vec![contact.point];

        let body = &self.bodies[index];
        if self.event_keys.insert(EventKey::Wall(body.id(), wall_index)) {
            let event = CollisionEvent::wall(body, wall_index, contact.point);
            self.emit(event);
        }
    }

    fn handle_pair(&mut self, i: usize, j: usize, detection: &DetectionParams, now: Instant) {
        let key = PairKey::new(self.bodies[i].id(), self.bodies[j].id());
        if self.tracker.is_suppressed(key, now) {
            self.apply_separation_force(i, j);
            return;
        }

        let contact = match check_collision(&self.bodies[i], &self.bodies[j], detection) {
            Some(contact) => contact,
            None => return,
        };

        if self.tracker.record_collision(key, now) {
            self.separate_pair(i, j);
            self.tracker.suppress(key, now);
        }

        self.collisions.push(CollisionInfo {
            body: i,
            target: ContactTarget::Body(j),
            contact,
        });
        self.note_contact(contact.point);
        self.bodies[i].contact_points = vec![contact.point];
        self.bodies[j].contact_points = vec![contact.point];

        if self.event_keys.insert(EventKey::Pair(key)) {
            let event = CollisionEvent::pair(&self.bodies[i], &self.bodies[j], contact.point);
            self.emit(event);
        }
    }

    /// Soft push for a suppressed pair, growing as the centres get closer
    /// than the separation distance.
    fn apply_separation_force(&mut self, i: usize, j: usize) {
        let offset = self.bodies[j].position - self.bodies[i].position;
        let distance = offset.magnitude();
        if distance == 0.0 || distance >= self.limits.separation_distance {
            return;
        }

        let strength = (self.limits.separation_distance - distance) * self.limits.separation_strength;
        let force = offset.normalize() * strength;
        self.bodies[i].apply_force(-force);
        self.bodies[j].apply_force(force);
    }

    /// One-off velocity kick along the centre line, split by mass, applied
    /// only while the pair is still closing in.
    fn separate_pair(&mut self, i: usize, j: usize) {
        let speed = self.limits.separation_speed;
        let (a, b) = get_mutable_body_pair(&mut self.bodies, i, j);
        let direction = (b.position - a.position).normalize();
        let closing = (a.velocity - b.velocity).dot(direction);
        if closing <= 0.0 {
            return;
        }

        let total_mass = a.mass() + b.mass();
        let push = direction * speed;
        a.velocity += push * (-b.mass() / total_mass);
        b.velocity += push * (a.mass() / total_mass);
    }

    fn note_contact(&mut self, point: Vec2) {
        self.contact_points.push(point);
        self.trail.add(point, self.sim_time);
    }

    fn emit(&mut self, event: CollisionEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_collision(&event);
        }
        self.events.push(event);
    }

    fn resolve_collisions(&mut self) {
        let params = ResolutionParams::new(&self.config, &self.limits);
        for info in &self.collisions {
            resolve_collision(&mut self.bodies, info, &params);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
