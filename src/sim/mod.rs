//! Deterministic simulation module
//!
//! All gameplay lives here and must stay deterministic:
//! - timers are driven only by the elapsed-ms value handed to `tick`
//! - all randomness flows through the state-owned seeded RNG
//! - category iteration order is id order, and ids ascend in spawn order
//! - no rendering or platform dependencies beyond the `Surface` seam

pub mod collision;
pub mod entity;
pub mod registry;
pub mod sprite;
pub mod state;
pub mod tick;

pub use collision::{HitRecord, first_hit, probe_hits};
pub use entity::{
    Asteroid, Body, Bounded, EnemyShip, EntityId, Explosion, Missile, PlayerShip, SpriteSheet,
};
pub use registry::{Category, Registry, SpawnError, SpawnKind};
pub use sprite::AnimationState;
pub use state::{Backdrop, GameState, RunState};
pub use tick::{TickError, TickInput, tick};
