//! Category registry and spawn factory
//!
//! Four independent id-keyed maps hold every live non-player entity.
//! Iteration order is id order, and ids ascend in spawn order, so spatial
//! queries and same-tick tie-breaks resolve deterministically. Removal is
//! the only destruction path and tolerates stale ids: two collision
//! resolutions in one tick may both try to clear the same entry.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;
use thiserror::Error;

use super::collision::{HitRecord, first_hit};
use super::entity::{Asteroid, Body, EnemyShip, EntityId, Explosion, Missile, SpriteSheet};
use crate::consts::CANVAS_WIDTH;
use crate::tuning::Tuning;

/// The four non-player entity categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Enemies,
    Asteroids,
    Missiles,
    Explosions,
}

/// Entity kinds the factory can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    EnemyShip,
    Asteroid,
    Missile,
    Explosion,
}

/// Invalid spawn requests fail fast to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    /// An explosion is always anchored to the bounds of a struck target.
    #[error("explosion spawn requires the bounds of a hit target")]
    ExplosionWithoutTarget,
}

/// Id-keyed storage for every live non-player entity, plus the id
/// allocator shared with the player singleton.
#[derive(Debug)]
pub struct Registry {
    pub enemies: BTreeMap<EntityId, EnemyShip>,
    pub asteroids: BTreeMap<EntityId, Asteroid>,
    pub missiles: BTreeMap<EntityId, Missile>,
    pub explosions: BTreeMap<EntityId, Explosion>,
    next_id: u32,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            enemies: BTreeMap::new(),
            asteroids: BTreeMap::new(),
            missiles: BTreeMap::new(),
            explosions: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Allocate the next entity id. Ids are never reused, even across
    /// resets, so a removed entity cannot be confused with a newcomer.
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// First entity in `category` (id order) matching the probe point.
    pub fn first_hit(&self, category: Category, probe: Vec2) -> Option<HitRecord> {
        match category {
            Category::Enemies => first_hit(self.enemies.values(), probe),
            Category::Asteroids => first_hit(self.asteroids.values(), probe),
            Category::Missiles => first_hit(self.missiles.values(), probe),
            Category::Explosions => first_hit(self.explosions.values(), probe),
        }
    }

    /// Remove an entity from its category. A stale id is a harmless
    /// no-op; returns whether anything was actually removed.
    pub fn remove(&mut self, category: Category, id: EntityId) -> bool {
        match category {
            Category::Enemies => self.enemies.remove(&id).is_some(),
            Category::Asteroids => self.asteroids.remove(&id).is_some(),
            Category::Missiles => self.missiles.remove(&id).is_some(),
            Category::Explosions => self.explosions.remove(&id).is_some(),
        }
    }

    /// Drop every live entity. Run reset calls this; the id allocator
    /// keeps counting.
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.asteroids.clear();
        self.missiles.clear();
        self.explosions.clear();
    }

    /// Create and insert a new entity of the requested kind.
    ///
    /// Enemy and asteroid placement re-rolls while the candidate position
    /// collides with a live enemy or asteroid; missiles spawn on the
    /// shooter's nose; explosions require the struck target's bounds.
    pub fn spawn(
        &mut self,
        kind: SpawnKind,
        shooter: &Body,
        origin: Option<HitRecord>,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> Result<EntityId, SpawnError> {
        // Validate before allocating so a rejected request has no effect.
        if kind == SpawnKind::Explosion && origin.is_none() {
            return Err(SpawnError::ExplosionWithoutTarget);
        }
        let id = self.next_entity_id();
        match kind {
            SpawnKind::EnemyShip => {
                let sheet = SpriteSheet::ENEMY;
                let x = self.place_clear(sheet.frame.x, sheet.frame.y, tuning, rng);
                log::debug!("spawned enemy {id} at x={x}");
                self.enemies.insert(id, EnemyShip::at(id, x));
            }
            SpawnKind::Asteroid => {
                let sheet = SpriteSheet::ASTEROID;
                let x = self.place_clear(sheet.frame.x, sheet.scaled_size().y, tuning, rng);
                log::debug!("spawned asteroid {id} at x={x}");
                self.asteroids.insert(id, Asteroid::at(id, x));
            }
            SpawnKind::Missile => {
                self.missiles.insert(id, Missile::fired_from(id, shooter));
            }
            SpawnKind::Explosion => {
                // Checked non-empty above.
                let origin = origin.ok_or(SpawnError::ExplosionWithoutTarget)?;
                self.explosions
                    .insert(id, Explosion::centered_on(id, origin.pos, origin.size));
            }
        }
        Ok(id)
    }

    /// Candidate position overlaps a live enemy or asteroid.
    fn occupied(&self, probe: Vec2) -> bool {
        self.first_hit(Category::Enemies, probe).is_some()
            || self.first_hit(Category::Asteroids, probe).is_some()
    }

    /// Re-roll a spawn x until it lands clear of live enemies and
    /// asteroids, bounded by the tuning's attempt cap. On exhaustion the
    /// last candidate is accepted; the per-category occupancy caps keep
    /// that rare in practice.
    fn place_clear(&self, frame_w: f32, spawn_y: f32, tuning: &Tuning, rng: &mut impl Rng) -> f32 {
        let mut x = roll_spawn_x(frame_w, rng);
        for _ in 1..tuning.max_placement_attempts {
            if !self.occupied(Vec2::new(x, spawn_y)) {
                return x;
            }
            x = roll_spawn_x(frame_w, rng);
        }
        if self.occupied(Vec2::new(x, spawn_y)) {
            log::warn!("placement retries exhausted, accepting overlap at x={x}");
        }
        x
    }
}

/// Random spawn column in `[0, canvas_width - 2 * frame_width)`, floored
/// to whole pixels.
fn roll_spawn_x(frame_w: f32, rng: &mut impl Rng) -> f32 {
    rng.random_range(0.0..CANVAS_WIDTH - 2.0 * frame_w).floor()
}
