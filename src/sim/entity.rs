//! Kinematic entity types
//!
//! One plain struct per kind, each composing a [`Body`] and an
//! [`AnimationState`]; behavior is small `&mut self` methods dispatched by
//! the orchestrator, not a class hierarchy. Per-kind motion and removal
//! rules live on the kind that owns them.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::sprite::AnimationState;
use crate::consts::*;
use crate::render::{Rect, SheetId, Surface};

/// Opaque entity identifier, unique within a run and never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EntityId(pub(crate) u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity and canvas-space bounds shared by every entity kind.
/// `pos` is the top-left corner; identity never changes after creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Body {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
}

/// Anything owning a [`Body`]; keeps the spatial query generic over
/// concrete entity kinds.
pub trait Bounded {
    fn body(&self) -> &Body;
}

macro_rules! impl_bounded {
    ($($ty:ty),+) => {
        $(impl Bounded for $ty {
            fn body(&self) -> &Body {
                &self.body
            }
        })+
    };
}

impl_bounded!(PlayerShip, EnemyShip, Asteroid, Missile, Explosion);

/// Sprite-sheet geometry and animation parameters for one entity kind.
#[derive(Debug, Clone, Copy)]
pub struct SpriteSheet {
    pub sheet: SheetId,
    /// Unscaled cell size on the sheet
    pub frame: Vec2,
    pub scale: f32,
    pub min_frame: u32,
    pub max_frame: u32,
    pub frames_per_row: u32,
    pub frame_interval_ms: f64,
}

impl SpriteSheet {
    pub const PLAYER: Self = Self {
        sheet: SheetId::Player,
        frame: Vec2::new(16.0, 24.0),
        scale: 2.5,
        min_frame: 0,
        max_frame: 9,
        frames_per_row: 5,
        frame_interval_ms: 100.0,
    };

    pub const ENEMY: Self = Self {
        sheet: SheetId::Enemy,
        frame: Vec2::new(32.0, 16.0),
        scale: 2.0,
        min_frame: 0,
        max_frame: 1,
        frames_per_row: 2,
        frame_interval_ms: 100.0,
    };

    pub const ASTEROID: Self = Self {
        sheet: SheetId::Asteroid,
        frame: Vec2::new(160.0, 160.0),
        scale: 0.4,
        min_frame: 0,
        max_frame: 0,
        frames_per_row: 1,
        frame_interval_ms: 100.0,
    };

    pub const MISSILE: Self = Self {
        sheet: SheetId::Missile,
        frame: Vec2::new(16.0, 32.0),
        scale: 2.0,
        min_frame: 0,
        max_frame: 1,
        frames_per_row: 2,
        frame_interval_ms: 50.0,
    };

    pub const EXPLOSION: Self = Self {
        sheet: SheetId::Explosion,
        frame: Vec2::new(16.0, 16.0),
        scale: 2.0,
        min_frame: 0,
        max_frame: 4,
        frames_per_row: 5,
        frame_interval_ms: 50.0,
    };

    /// On-canvas size after scaling
    #[inline]
    pub fn scaled_size(&self) -> Vec2 {
        self.frame * self.scale
    }

    pub fn anim(&self) -> AnimationState {
        AnimationState::new(
            self.min_frame,
            self.max_frame,
            self.frames_per_row,
            self.frame_interval_ms,
        )
    }

    fn draw(&self, anim: &AnimationState, body: &Body, surface: &mut dyn Surface) {
        surface.draw_sprite(
            self.sheet,
            anim.src_rect(self.frame.x, self.frame.y),
            Rect::from_pos_size(body.pos, body.size),
        );
    }
}

/// Decrement a hit counter; true exactly on the transition to zero.
fn register_hit(hits_left: &mut u32) -> bool {
    let was = *hits_left;
    *hits_left = was.saturating_sub(1);
    was == 1
}

// ---------------------------------------------------------------------------

/// The player's ship: a singleton held outside the category registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerShip {
    pub body: Body,
    pub anim: AnimationState,
    pub hits_left: u32,
}

impl PlayerShip {
    /// Centered horizontally, pinned near the bottom edge.
    pub fn new(id: EntityId) -> Self {
        let size = SpriteSheet::PLAYER.scaled_size();
        let pos = Vec2::new(
            CANVAS_WIDTH / 2.0 - size.x / 2.0,
            CANVAS_HEIGHT - size.y - PLAYER_BOTTOM_MARGIN,
        );
        Self {
            body: Body { id, pos, size },
            anim: SpriteSheet::PLAYER.anim(),
            hits_left: PLAYER_HITS,
        }
    }

    /// Shift horizontally while a movement flag is held, clamped to
    /// `[0, canvas_width - width]`. Left wins if both flags are held.
    pub fn steer(&mut self, left: bool, right: bool, step: f32) {
        if left {
            self.body.pos.x -= step;
        } else if right {
            self.body.pos.x += step;
        }
        self.body.pos.x = self.body.pos.x.clamp(0.0, CANVAS_WIDTH - self.body.size.x);
    }

    /// Confirmed asteroid contact; true when this hit ends the run.
    pub fn hit(&mut self) -> bool {
        register_hit(&mut self.hits_left)
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        SpriteSheet::PLAYER.draw(&self.anim, &self.body, surface);
    }
}

/// A hostile ship parked near the top edge. Only its animation advances;
/// it is removed when its hit counter runs out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyShip {
    pub body: Body,
    pub anim: AnimationState,
    pub hits_left: u32,
}

impl EnemyShip {
    pub fn at(id: EntityId, x: f32) -> Self {
        let sheet = SpriteSheet::ENEMY;
        Self {
            body: Body {
                id,
                pos: Vec2::new(x, sheet.frame.y),
                size: sheet.scaled_size(),
            },
            anim: sheet.anim(),
            hits_left: ENEMY_HITS,
        }
    }

    pub fn hit(&mut self) -> bool {
        register_hit(&mut self.hits_left)
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        SpriteSheet::ENEMY.draw(&self.anim, &self.body, surface);
    }
}

/// Descends at a constant rate, spinning for the draw transform only;
/// the collision box stays axis-aligned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub body: Body,
    pub anim: AnimationState,
    pub hits_left: u32,
    pub rotation_deg: f32,
}

impl Asteroid {
    pub fn at(id: EntityId, x: f32) -> Self {
        let sheet = SpriteSheet::ASTEROID;
        let size = sheet.scaled_size();
        Self {
            body: Body {
                id,
                pos: Vec2::new(x, size.y),
                size,
            },
            anim: sheet.anim(),
            hits_left: ASTEROID_HITS,
            rotation_deg: 0.0,
        }
    }

    /// Descend and spin; true once the asteroid is fully below the canvas.
    pub fn fall(&mut self, fall_step: f32, spin_step: f32) -> bool {
        self.rotation_deg += spin_step;
        self.body.pos.y += fall_step;
        self.body.pos.y >= CANVAS_HEIGHT + self.body.size.y
    }

    pub fn hit(&mut self) -> bool {
        register_hit(&mut self.hits_left)
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let sheet = SpriteSheet::ASTEROID;
        surface.draw_sprite_rotated(
            sheet.sheet,
            self.anim.src_rect(sheet.frame.x, sheet.frame.y),
            Rect::from_pos_size(self.body.pos, self.body.size),
            self.rotation_deg,
        );
    }
}

/// Climbs from the player's nose; removed past the top edge or consumed
/// by its first confirmed collision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Missile {
    pub body: Body,
    pub anim: AnimationState,
}

impl Missile {
    /// Spawn centered on the firing ship's nose.
    pub fn fired_from(id: EntityId, shooter: &Body) -> Self {
        let sheet = SpriteSheet::MISSILE;
        let size = sheet.scaled_size();
        let pos = Vec2::new(
            shooter.pos.x + shooter.size.x / 2.0 - size.x / 2.0,
            shooter.pos.y - shooter.size.y / 2.0 - size.y / 2.0,
        );
        Self {
            body: Body { id, pos, size },
            anim: sheet.anim(),
        }
    }

    /// Ascend; true once the missile is fully above the canvas.
    pub fn climb(&mut self, step: f32) -> bool {
        self.body.pos.y -= step;
        self.body.pos.y <= -self.body.size.y
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        SpriteSheet::MISSILE.draw(&self.anim, &self.body, surface);
    }
}

/// Short-lived blast centered where a target was struck. Lifetime is
/// accumulated elapsed time, independent of the frame interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub body: Body,
    pub anim: AnimationState,
    pub age_ms: f64,
}

impl Explosion {
    pub fn centered_on(id: EntityId, target_pos: Vec2, target_size: Vec2) -> Self {
        let sheet = SpriteSheet::EXPLOSION;
        let size = sheet.scaled_size();
        Self {
            body: Body {
                id,
                pos: target_pos + target_size / 2.0 - size / 2.0,
                size,
            },
            anim: sheet.anim(),
            age_ms: 0.0,
        }
    }

    /// Accumulate lifetime; true once past the removal threshold.
    pub fn age(&mut self, dt_ms: f64, lifetime_ms: f64) -> bool {
        self.age_ms += dt_ms;
        self.age_ms > lifetime_ms
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        SpriteSheet::EXPLOSION.draw(&self.anim, &self.body, surface);
    }
}
