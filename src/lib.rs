//! Astro Barrage - a vertically scrolling arcade shooter core
//!
//! Core modules:
//! - `sim`: deterministic entity/collision engine (registry, spawn factory,
//!   fixed-order frame orchestrator)
//! - `render`: the drawable-surface seam the engine draws through
//! - `scores`: run scoring and high/average score tracking
//! - `tuning`: data-driven gameplay balance
//!
//! The engine owns no scheduler, no assets, and no pixels: an external
//! loop calls [`sim::tick`] once per frame with the elapsed milliseconds,
//! an input snapshot, and a [`render::Surface`] implementation.

pub mod render;
pub mod scores;
pub mod sim;
pub mod tuning;

pub use render::{NullSurface, Rect, RecordingSurface, SheetId, Surface};
pub use scores::{RunSnapshot, ScoreBoard};
pub use sim::{GameState, SpawnKind, TickInput, tick};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions (pixels)
    pub const CANVAS_WIDTH: f32 = 1024.0;
    pub const CANVAS_HEIGHT: f32 = 768.0;

    /// Target rate the external scheduler drives [`crate::sim::tick`] at
    pub const TARGET_FPS: f64 = 60.0;
    /// Nominal elapsed time per tick at the target rate (milliseconds)
    pub const TICK_MS: f64 = 1000.0 / TARGET_FPS;

    /// Player horizontal step per tick while a movement flag is held
    pub const PLAYER_STEP: f32 = 15.0;
    /// Gap between the player ship and the bottom canvas edge
    pub const PLAYER_BOTTOM_MARGIN: f32 = 5.0;

    /// Asteroid descent per tick
    pub const ASTEROID_FALL_STEP: f32 = 3.0;
    /// Asteroid draw-rotation per tick (degrees; collision geometry stays axis-aligned)
    pub const ASTEROID_SPIN_STEP: f32 = 2.0;

    /// Missile ascent per tick (faster than asteroid descent)
    pub const MISSILE_CLIMB_STEP: f32 = 8.0;

    /// Backdrop scroll per tick
    pub const BACKDROP_SCROLL_STEP: f32 = 2.0;

    /// Explosion lifetime (milliseconds of accumulated elapsed time)
    pub const EXPLOSION_LIFETIME_MS: f64 = 500.0;

    /// Hits absorbed before removal (or, for the player, before the run ends)
    pub const PLAYER_HITS: u32 = 3;
    pub const ENEMY_HITS: u32 = 3;
    pub const ASTEROID_HITS: u32 = 3;

    /// Spawn gate: accumulated-time threshold between probabilistic spawns
    pub const SPAWN_GATE_MS: f64 = 1000.0;
    /// Concurrent enemy-ship cap
    pub const ENEMY_CAP: usize = 7;
    pub const ENEMY_SPAWN_CHANCE: f64 = 0.25;
    /// Concurrent asteroid cap
    pub const ASTEROID_CAP: usize = 15;
    pub const ASTEROID_SPAWN_CHANCE: f64 = 0.35;

    /// Placement re-rolls before a spawn accepts an overlapping position
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 16;
}
