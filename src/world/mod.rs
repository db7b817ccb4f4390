pub mod contact_trail;
pub mod coords;
pub mod events;
pub mod pair_tracker;
pub mod physics_world;
pub mod scene;
pub mod stats;

pub use contact_trail::{ContactTrail, FadingContact};
pub use coords::CoordinateMapper;
pub use events::{BodySnapshot, CollisionEvent, CollisionKind, CollisionObserver};
pub use pair_tracker::{Clock, CollisionRecord, ManualClock, PairKey, PairTracker, SystemClock};
pub use physics_world::World;
pub use scene::{SpawnKind, SpawnSettings};
pub use stats::{ActivityLevel, EnergyLevel, MomentumHistory, WorldStats};
