//! Game state
//!
//! The single shared store every pass reads and writes: the player
//! singleton, the category registry, run flags, scoring, the scrolling
//! backdrop, and the run-seeded RNG. All mutation happens synchronously
//! inside the tick that triggers it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::HitRecord;
use super::entity::{EntityId, PlayerShip};
use super::registry::{Registry, SpawnError, SpawnKind};
use crate::consts::*;
use crate::render::{Rect, SheetId, Surface};
use crate::scores::{RunSnapshot, ScoreBoard};
use crate::tuning::Tuning;

/// Run flags and lives.
///
/// Transitions: not running -> running on start/reset; running -> lost
/// when the player's hit counter reaches zero; running <-> paused on
/// toggle, ignored while lost.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunState {
    pub running: bool,
    pub paused: bool,
    pub lost: bool,
    /// Mirrors the player's remaining hit counter (0..=3)
    pub lives: u32,
}

impl RunState {
    fn fresh() -> Self {
        Self {
            running: true,
            paused: false,
            lost: false,
            lives: PLAYER_HITS,
        }
    }
}

/// Two-image vertically wrapping scroll.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Backdrop {
    pub y1: f32,
    pub y2: f32,
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new()
    }
}

impl Backdrop {
    pub fn new() -> Self {
        Self {
            y1: 0.0,
            y2: -CANVAS_HEIGHT,
        }
    }

    /// Scroll both images down, snapping back once the lead image has
    /// fully wrapped past the canvas.
    pub fn advance(&mut self, step: f32) {
        if self.y1 < CANVAS_HEIGHT {
            self.y1 += step;
            self.y2 += step;
        } else {
            self.y1 = 0.0;
            self.y2 = -CANVAS_HEIGHT;
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let src = Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT);
        surface.draw_sprite(
            SheetId::Backdrop,
            src,
            Rect::new(0.0, self.y1, CANVAS_WIDTH, CANVAS_HEIGHT),
        );
        surface.draw_sprite(
            SheetId::Backdrop,
            src,
            Rect::new(0.0, self.y2, CANVAS_WIDTH, CANVAS_HEIGHT),
        );
    }
}

/// Complete engine state for one process.
///
/// Constructed idle (`running == false`, overlay showing); the first
/// reset trigger starts the run.
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub backdrop: Backdrop,
    pub player: PlayerShip,
    pub registry: Registry,
    pub run: RunState,
    pub scores: ScoreBoard,
    /// Accumulated time since the spawn gate last opened (ms)
    pub(crate) spawn_timer_ms: f64,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut registry = Registry::new();
        let player = PlayerShip::new(registry.next_entity_id());
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            backdrop: Backdrop::new(),
            player,
            registry,
            run: RunState {
                running: false,
                ..RunState::fresh()
            },
            scores: ScoreBoard::new(),
            spawn_timer_ms: 0.0,
        }
    }

    /// Spawn an entity through the factory. The fire-input handler calls
    /// this directly with [`SpawnKind::Missile`]; the orchestrator uses it
    /// for probabilistic threats and explosions.
    pub fn spawn(
        &mut self,
        kind: SpawnKind,
        origin: Option<HitRecord>,
    ) -> Result<EntityId, SpawnError> {
        self.registry
            .spawn(kind, &self.player.body, origin, &self.tuning, &mut self.rng)
    }

    /// Restore initial run state and start a fresh run: flags, lives, and
    /// the player's hit counter reset, the live score clears, and every
    /// transient category empties. The only recovery path after a fault
    /// or a lost run; the player keeps its last position.
    pub fn reset(&mut self) {
        self.run = RunState::fresh();
        self.player.hits_left = PLAYER_HITS;
        self.scores.start_run();
        self.registry.clear();
        self.spawn_timer_ms = 0.0;
        log::info!("run reset (seed {})", self.seed);
    }

    /// Toggle pause. Ignored before the first start and once the run is
    /// lost.
    pub fn toggle_pause(&mut self) {
        if self.run.running && !self.run.lost {
            self.run.paused = !self.run.paused;
            log::info!(
                "{}",
                if self.run.paused { "paused" } else { "resumed" }
            );
        }
    }

    /// Apply one confirmed asteroid contact to the player; on the fatal
    /// hit the run ends and the score board folds the run in.
    pub(crate) fn player_hit(&mut self) -> bool {
        let fatal = self.player.hit();
        self.run.lives = self.player.hits_left;
        if fatal {
            self.run.lost = true;
            self.run.running = false;
            self.scores.finish_run();
            log::info!(
                "player destroyed; run over at score {}",
                self.scores.current
            );
        }
        fatal
    }

    /// Read-only snapshot for UI binding.
    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            running: self.run.running,
            paused: self.run.paused,
            lost: self.run.lost,
            lives: self.run.lives,
            current_score: self.scores.current,
            high_score: self.scores.high,
            average_score: self.scores.average(),
        }
    }
}
