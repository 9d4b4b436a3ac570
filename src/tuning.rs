//! Data-driven gameplay balance
//!
//! Defaults mirror the reference constants in [`crate::consts`]; any
//! subset can be overridden by deserializing a partial document, which is
//! how balance experiments ship without touching engine code.

use serde::{Deserialize, Serialize};

use crate::consts;

/// Gameplay balance knobs consumed by the sim each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Player horizontal pixels per tick while a movement flag is held
    pub player_step: f32,
    /// Asteroid descent per tick
    pub asteroid_fall_step: f32,
    /// Asteroid draw-rotation per tick (degrees)
    pub asteroid_spin_step: f32,
    /// Missile ascent per tick
    pub missile_climb_step: f32,
    /// Backdrop scroll per tick
    pub backdrop_scroll_step: f32,
    /// Accumulated-time threshold between probabilistic spawn attempts (ms)
    pub spawn_gate_ms: f64,
    /// Concurrent enemy-ship cap
    pub enemy_cap: usize,
    /// Chance of an enemy spawn each time the gate opens
    pub enemy_spawn_chance: f64,
    /// Concurrent asteroid cap
    pub asteroid_cap: usize,
    /// Chance of an asteroid spawn each time the gate opens
    pub asteroid_spawn_chance: f64,
    /// Explosion lifetime (ms)
    pub explosion_lifetime_ms: f64,
    /// Placement re-rolls before a spawn accepts an overlapping position
    pub max_placement_attempts: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_step: consts::PLAYER_STEP,
            asteroid_fall_step: consts::ASTEROID_FALL_STEP,
            asteroid_spin_step: consts::ASTEROID_SPIN_STEP,
            missile_climb_step: consts::MISSILE_CLIMB_STEP,
            backdrop_scroll_step: consts::BACKDROP_SCROLL_STEP,
            spawn_gate_ms: consts::SPAWN_GATE_MS,
            enemy_cap: consts::ENEMY_CAP,
            enemy_spawn_chance: consts::ENEMY_SPAWN_CHANCE,
            asteroid_cap: consts::ASTEROID_CAP,
            asteroid_spawn_chance: consts::ASTEROID_SPAWN_CHANCE,
            explosion_lifetime_ms: consts::EXPLOSION_LIFETIME_MS,
            max_placement_attempts: consts::MAX_PLACEMENT_ATTEMPTS,
        }
    }
}
