//! Per-pair collision bookkeeping for the anti-entanglement heuristic.
//!
//! Pairs that keep colliding inside a short window are taken out of normal
//! resolution for a while. Both the window and the suppression run on a
//! monotonic wall clock, independent of the simulation's time speed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::common::EngineLimits;
use crate::objects::BodyId;

/// Source of monotonic wall-clock time.
pub trait Clock: Send {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time, so a
/// test can keep a handle while the world owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed_nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock {
            origin: Instant::now(),
            elapsed_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.elapsed_nanos.fetch_add(nanos, Ordering::SeqCst);
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos.load(Ordering::SeqCst))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

/// Unordered body pair, stored with the smaller id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(BodyId, BodyId);

impl PairKey {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        if a <= b {
            PairKey(a, b)
        } else {
            PairKey(b, a)
        }
    }

    pub fn first(&self) -> BodyId {
        self.0
    }

    pub fn second(&self) -> BodyId {
        self.1
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.0 == id || self.1 == id
    }
}

/// Collisions of one pair counted from `window_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionRecord {
    pub window_start: Instant,
    pub count: u32,
}

#[derive(Debug)]
pub struct PairTracker {
    history: HashMap<PairKey, CollisionRecord>,
    suppressed: HashMap<PairKey, Instant>,
    window: Duration,
    threshold: u32,
    suppression: Duration,
}

impl PairTracker {
    pub fn new(limits: &EngineLimits) -> Self {
        PairTracker {
            history: HashMap::new(),
            suppressed: HashMap::new(),
            window: limits.collision_window,
            threshold: limits.collision_threshold,
            suppression: limits.suppression_duration,
        }
    }

    /// Whether the pair is currently exempt from normal resolution.
    /// Expired suppressions are dropped here.
    pub fn is_suppressed(&mut self, key: PairKey, now: Instant) -> bool {
        match self.suppressed.get(&key) {
            Some(&until) if now > until => {
                self.suppressed.remove(&key);
                debug!(a = %key.first(), b = %key.second(), "pair suppression expired");
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Read-only variant of [`is_suppressed`](Self::is_suppressed).
    pub fn suppressed_until(&self, key: PairKey) -> Option<Instant> {
        self.suppressed.get(&key).copied()
    }

    /// Counts a collision. Returns `true` once the pair has collided
    /// `threshold` times within one window.
    pub fn record_collision(&mut self, key: PairKey, now: Instant) -> bool {
        let window = self.window;
        let record = self.history.entry(key).or_insert(CollisionRecord {
            window_start: now,
            count: 0,
        });

        if now.saturating_duration_since(record.window_start) > window {
            record.window_start = now;
            record.count = 1;
        } else {
            record.count += 1;
        }

        record.count >= self.threshold
    }

    /// Starts suppression for the pair and forgets its collision history.
    pub fn suppress(&mut self, key: PairKey, now: Instant) {
        self.suppressed.insert(key, now + self.suppression);
        self.history.remove(&key);
        debug!(a = %key.first(), b = %key.second(), "pair suppressed");
    }

    pub fn record(&self, key: PairKey) -> Option<CollisionRecord> {
        self.history.get(&key).copied()
    }

    /// Drops every entry involving `id`.
    pub fn forget_body(&mut self, id: BodyId) {
        self.history.retain(|key, _| !key.contains(id));
        self.suppressed.retain(|key, _| !key.contains(id));
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.suppressed.clear();
    }

    pub fn suppressed_pairs(&self) -> usize {
        self.suppressed.len()
    }
}
