//! Frame orchestrator
//!
//! One call per external scheduler tick, in a fixed pass order: backdrop,
//! spawn gate, enemies, asteroids, missiles, explosions, player. The
//! order is load-bearing: it decides which entities see stale vs fresh
//! positions within a tick (a missile fired this tick exists for its own
//! collision check, while an asteroid destroyed by the player was already
//! drawn by the earlier asteroid pass). Every pass iterates a snapshot of
//! its category's ids, so removal mid-pass is safe.

use std::collections::BTreeMap;

use rand::Rng;
use thiserror::Error;

use super::entity::EntityId;
use super::registry::{Category, SpawnError, SpawnKind};
use super::state::GameState;
use crate::consts::*;
use crate::render::{Rect, Surface};

/// Per-tick input, supplied by the external event-wiring layer.
///
/// The movement flags are level-triggered (held keys); fire, pause, and
/// reset are discrete triggers consumed by this tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub fire: bool,
    pub pause: bool,
    pub reset: bool,
}

/// A gameplay fault that aborted the remainder of a tick's updates.
#[derive(Debug, Error)]
pub enum TickError {
    #[error(transparent)]
    Spawn(#[from] SpawnError),
}

/// Full-canvas dim behind overlay text
const OVERLAY_DIM: [u8; 4] = [0, 0, 0, 77];
/// Banner strip the overlay text centers in
const OVERLAY_BANNER: [u8; 4] = [117, 9, 176, 128];
const BANNER_RECT: Rect = Rect::new(20.0, 250.0, CANVAS_WIDTH - 40.0, 250.0);

/// Advance the whole engine by one frame.
///
/// Always draws the backdrop and the player sprite; gameplay only runs
/// while the run is active. A gameplay fault aborts that tick's remaining
/// updates but never the render pass.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64, surface: &mut dyn Surface) {
    if input.reset {
        state.reset();
    }
    if input.pause {
        state.toggle_pause();
    }
    if input.fire {
        // The embedder's fire handler may also call `GameState::spawn`
        // directly between ticks; routing the trigger here keeps
        // single-call drivers complete.
        if let Err(err) = state.spawn(SpawnKind::Missile, None) {
            log::error!("fire rejected: {err}");
        }
    }

    state.backdrop.advance(state.tuning.backdrop_scroll_step);
    state.backdrop.draw(surface);

    let active = state.run.running && !state.run.paused && !state.run.lost;
    if !active {
        draw_overlay(state, surface);
    } else if let Err(err) = run_gameplay(state, input, dt_ms, surface) {
        log::error!("tick aborted: {err}");
    }

    // The player sprite stays visible (and animated) under overlays.
    state.player.anim.advance(dt_ms);
    state.player.draw(surface);
}

/// All gameplay updates for one active tick, in the fixed pass order.
fn run_gameplay(
    state: &mut GameState,
    input: &TickInput,
    dt_ms: f64,
    surface: &mut dyn Surface,
) -> Result<(), TickError> {
    run_spawn_gate(state, dt_ms)?;

    // Enemies: vertical position is static; only the animation advances.
    for id in snapshot_ids(&state.registry.enemies) {
        if let Some(enemy) = state.registry.enemies.get_mut(&id) {
            enemy.anim.advance(dt_ms);
            enemy.draw(surface);
        }
    }

    // Asteroids: descend, spin, leave through the bottom edge.
    for id in snapshot_ids(&state.registry.asteroids) {
        let exited = match state.registry.asteroids.get_mut(&id) {
            Some(asteroid) => asteroid.fall(
                state.tuning.asteroid_fall_step,
                state.tuning.asteroid_spin_step,
            ),
            None => continue,
        };
        if exited {
            state.registry.remove(Category::Asteroids, id);
            log::debug!("asteroid {id} exited the bottom edge");
            continue;
        }
        if let Some(asteroid) = state.registry.asteroids.get(&id) {
            asteroid.draw(surface);
        }
    }

    // Missiles: collide first; a missile consumed by its own hit is
    // neither updated nor drawn this tick and never reappears.
    for id in snapshot_ids(&state.registry.missiles) {
        if resolve_missile(state, id)? {
            continue;
        }
        let exited = match state.registry.missiles.get_mut(&id) {
            Some(missile) => {
                missile.anim.advance(dt_ms);
                missile.climb(state.tuning.missile_climb_step)
            }
            None => continue,
        };
        if exited {
            state.registry.remove(Category::Missiles, id);
            continue;
        }
        if let Some(missile) = state.registry.missiles.get(&id) {
            missile.draw(surface);
        }
    }

    // Explosions: age by elapsed time, independent of frame pacing.
    for id in snapshot_ids(&state.registry.explosions) {
        let expired = match state.registry.explosions.get_mut(&id) {
            Some(boom) => {
                boom.anim.advance(dt_ms);
                boom.age(dt_ms, state.tuning.explosion_lifetime_ms)
            }
            None => continue,
        };
        if expired {
            state.registry.remove(Category::Explosions, id);
            continue;
        }
        if let Some(boom) = state.registry.explosions.get(&id) {
            boom.draw(surface);
        }
    }

    // Player last: asteroid contact, then movement. The struck asteroid
    // is removed outright; its hit counter only matters to missiles.
    let probe = state.player.body.pos;
    if let Some(target) = state.registry.first_hit(Category::Asteroids, probe) {
        state.registry.remove(Category::Asteroids, target.id);
        state.spawn(SpawnKind::Explosion, Some(target))?;
        state.player_hit();
    }
    state
        .player
        .steer(input.move_left, input.move_right, state.tuning.player_step);

    Ok(())
}

/// Probabilistic threat creation, gated by an accumulated >=1s timer.
/// Cap checks short-circuit before consuming a random draw, so a full
/// category never perturbs the run's RNG stream.
fn run_spawn_gate(state: &mut GameState, dt_ms: f64) -> Result<(), TickError> {
    if state.spawn_timer_ms > state.tuning.spawn_gate_ms {
        state.spawn_timer_ms = 0.0;
        let spawn_enemy = state.registry.enemies.len() < state.tuning.enemy_cap
            && state.rng.random_bool(state.tuning.enemy_spawn_chance);
        let spawn_asteroid = state.registry.asteroids.len() < state.tuning.asteroid_cap
            && state.rng.random_bool(state.tuning.asteroid_spawn_chance);
        if spawn_enemy {
            state.spawn(SpawnKind::EnemyShip, None)?;
        }
        if spawn_asteroid {
            state.spawn(SpawnKind::Asteroid, None)?;
        }
    } else {
        state.spawn_timer_ms += dt_ms;
    }
    Ok(())
}

/// A missile's hit protocol: enemies are queried first; asteroids only
/// when no enemy hit resolved. On a hit the target takes its hit
/// transition, the missile is removed unconditionally, and an explosion
/// spawns over the target's recorded bounds. At most one collision
/// resolves per missile per tick.
fn resolve_missile(state: &mut GameState, id: EntityId) -> Result<bool, TickError> {
    let Some(missile) = state.registry.missiles.get(&id) else {
        return Ok(false);
    };
    let probe = missile.body.pos;

    if let Some(target) = state.registry.first_hit(Category::Enemies, probe) {
        let destroyed = state
            .registry
            .enemies
            .get_mut(&target.id)
            .is_some_and(|enemy| enemy.hit());
        if destroyed {
            state.registry.remove(Category::Enemies, target.id);
            log::debug!("enemy {} destroyed", target.id);
        }
        state.registry.remove(Category::Missiles, id);
        state.spawn(SpawnKind::Explosion, Some(target))?;
        return Ok(true);
    }

    if let Some(target) = state.registry.first_hit(Category::Asteroids, probe) {
        let destroyed = state
            .registry
            .asteroids
            .get_mut(&target.id)
            .is_some_and(|asteroid| asteroid.hit());
        if destroyed {
            state.registry.remove(Category::Asteroids, target.id);
            state.scores.award(1);
            log::debug!(
                "asteroid {} destroyed, score {}",
                target.id,
                state.scores.current
            );
        }
        state.registry.remove(Category::Missiles, id);
        state.spawn(SpawnKind::Explosion, Some(target))?;
        return Ok(true);
    }

    Ok(false)
}

/// Dimmed full-canvas overlay with a centered banner, shown whenever
/// gameplay is not advancing.
fn draw_overlay(state: &GameState, surface: &mut dyn Surface) {
    surface.fill_rect(
        Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT),
        OVERLAY_DIM,
    );
    surface.fill_rect(BANNER_RECT, OVERLAY_BANNER);
    let text = if state.run.paused {
        "PAUSED"
    } else if state.run.lost {
        "GAME OVER"
    } else {
        "PRESS ENTER TO START"
    };
    surface.draw_text(text, BANNER_RECT);
}

fn snapshot_ids<T>(map: &BTreeMap<EntityId, T>) -> Vec<EntityId> {
    map.keys().copied().collect()
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::render::{DrawCmd, RecordingSurface, SheetId};
    use crate::sim::entity::{Asteroid, EnemyShip, Missile};
    use crate::tuning::Tuning;

    const DT: f64 = 16.0;

    fn active_state() -> GameState {
        let mut state = GameState::new(0xBA55);
        state.reset();
        state
    }

    fn insert_enemy(state: &mut GameState, x: f32) -> EntityId {
        let id = state.registry.next_entity_id();
        state.registry.enemies.insert(id, EnemyShip::at(id, x));
        id
    }

    fn insert_asteroid_at(state: &mut GameState, pos: Vec2) -> EntityId {
        let id = state.registry.next_entity_id();
        let mut asteroid = Asteroid::at(id, pos.x);
        asteroid.body.pos = pos;
        state.registry.asteroids.insert(id, asteroid);
        id
    }

    fn insert_missile_at(state: &mut GameState, pos: Vec2) -> EntityId {
        let id = state.registry.next_entity_id();
        let mut missile = Missile::fired_from(id, &state.player.body);
        missile.body.pos = pos;
        state.registry.missiles.insert(id, missile);
        id
    }

    #[test]
    fn idle_state_shows_the_start_overlay_and_skips_gameplay() {
        let mut state = GameState::new(1);
        let mut surface = RecordingSurface::new();
        tick(&mut state, &TickInput::default(), DT, &mut surface);

        assert_eq!(
            surface.texts().collect::<Vec<_>>(),
            vec!["PRESS ENTER TO START"]
        );
        assert_eq!(state.spawn_timer_ms, 0.0);
        // Backdrop still scrolled.
        assert_eq!(state.backdrop.y1, 2.0);
    }

    #[test]
    fn backdrop_is_drawn_first_and_the_player_last() {
        let mut state = active_state();
        let mut surface = RecordingSurface::new();
        tick(&mut state, &TickInput::default(), DT, &mut surface);

        assert!(matches!(
            surface.commands.first(),
            Some(DrawCmd::Sprite { sheet: SheetId::Backdrop, .. })
        ));
        assert!(matches!(
            surface.commands.last(),
            Some(DrawCmd::Sprite { sheet: SheetId::Player, .. })
        ));
    }

    #[test]
    fn reset_trigger_starts_the_run() {
        let mut state = GameState::new(1);
        let mut surface = RecordingSurface::new();
        tick(
            &mut state,
            &TickInput {
                reset: true,
                ..TickInput::default()
            },
            DT,
            &mut surface,
        );
        assert!(state.run.running);
        assert!(surface.texts().next().is_none());
    }

    #[test]
    fn pause_freezes_entities_and_shows_the_pause_overlay() {
        let mut state = active_state();
        let asteroid_id = insert_asteroid_at(&mut state, Vec2::new(300.0, 100.0));
        let mut surface = RecordingSurface::new();

        tick(
            &mut state,
            &TickInput {
                pause: true,
                ..TickInput::default()
            },
            DT,
            &mut surface,
        );

        assert!(state.run.paused);
        assert_eq!(surface.texts().collect::<Vec<_>>(), vec!["PAUSED"]);
        assert_eq!(
            state.registry.asteroids[&asteroid_id].body.pos,
            Vec2::new(300.0, 100.0)
        );
    }

    #[test]
    fn fire_trigger_spawns_a_missile_that_climbs_this_tick() {
        let mut state = active_state();
        let mut surface = RecordingSurface::new();
        tick(
            &mut state,
            &TickInput {
                fire: true,
                ..TickInput::default()
            },
            DT,
            &mut surface,
        );

        assert_eq!(state.registry.missiles.len(), 1);
        let missile = state.registry.missiles.values().next().unwrap();
        let spawn_y =
            state.player.body.pos.y - state.player.body.size.y / 2.0 - missile.body.size.y / 2.0;
        assert_eq!(missile.body.pos.y, spawn_y - 8.0);
        assert_eq!(surface.sprite_count(SheetId::Missile), 1);
    }

    #[test]
    fn movement_flags_steer_the_player_during_gameplay_only() {
        let mut state = active_state();
        let x = state.player.body.pos.x;
        let input = TickInput {
            move_right: true,
            ..TickInput::default()
        };
        tick(&mut state, &input, DT, &mut crate::render::NullSurface);
        assert_eq!(state.player.body.pos.x, x + 15.0);

        state.toggle_pause();
        tick(&mut state, &input, DT, &mut crate::render::NullSurface);
        assert_eq!(state.player.body.pos.x, x + 15.0);
    }

    #[test]
    fn player_death_takes_exactly_three_asteroid_contacts() {
        let mut state = active_state();

        for expected_lives in [2u32, 1, 0] {
            let player_pos = state.player.body.pos;
            let asteroid_id = insert_asteroid_at(&mut state, player_pos);
            tick(
                &mut state,
                &TickInput::default(),
                DT,
                &mut crate::render::NullSurface,
            );

            assert!(!state.registry.asteroids.contains_key(&asteroid_id));
            assert_eq!(state.run.lives, expected_lives);
            assert_eq!(state.player.hits_left, expected_lives);
            assert!(!state.registry.explosions.is_empty());
        }

        assert!(state.run.lost);
        assert!(!state.run.running);
    }

    #[test]
    fn missile_resolves_enemies_before_asteroids_and_at_most_once() {
        let mut state = active_state();
        let enemy_id = insert_enemy(&mut state, 480.0);
        let asteroid_id = insert_asteroid_at(&mut state, Vec2::new(480.0, 16.0));
        let missile_id = insert_missile_at(&mut state, Vec2::new(500.0, 20.0));

        tick(
            &mut state,
            &TickInput::default(),
            DT,
            &mut crate::render::NullSurface,
        );

        // Enemy took the hit; the geometrically overlapping asteroid kept
        // its full counter.
        assert_eq!(state.registry.enemies[&enemy_id].hits_left, 2);
        assert_eq!(state.registry.asteroids[&asteroid_id].hits_left, 3);
        assert!(!state.registry.missiles.contains_key(&missile_id));
        assert_eq!(state.registry.explosions.len(), 1);

        // No resurrection on later ticks.
        tick(
            &mut state,
            &TickInput::default(),
            DT,
            &mut crate::render::NullSurface,
        );
        assert!(!state.registry.missiles.contains_key(&missile_id));
    }

    #[test]
    fn enemy_survives_two_hits_and_falls_on_the_third() {
        let mut state = active_state();
        let enemy_id = insert_enemy(&mut state, 480.0);

        for remaining in [2u32, 1] {
            insert_missile_at(&mut state, Vec2::new(500.0, 20.0));
            tick(
                &mut state,
                &TickInput::default(),
                DT,
                &mut crate::render::NullSurface,
            );
            assert_eq!(state.registry.enemies[&enemy_id].hits_left, remaining);
        }

        insert_missile_at(&mut state, Vec2::new(500.0, 20.0));
        tick(
            &mut state,
            &TickInput::default(),
            DT,
            &mut crate::render::NullSurface,
        );
        assert!(!state.registry.enemies.contains_key(&enemy_id));
        // Enemy kills award no points; only asteroids score.
        assert_eq!(state.scores.current, 0);
    }

    #[test]
    fn destroying_an_asteroid_scores_a_point() {
        let mut state = active_state();
        let asteroid_id = insert_asteroid_at(&mut state, Vec2::new(300.0, 100.0));

        for _ in 0..3 {
            let pos = state.registry.asteroids[&asteroid_id].body.pos;
            insert_missile_at(&mut state, pos);
            tick(
                &mut state,
                &TickInput::default(),
                DT,
                &mut crate::render::NullSurface,
            );
        }

        assert!(!state.registry.asteroids.contains_key(&asteroid_id));
        assert_eq!(state.scores.current, 1);
        assert_eq!(state.snapshot().current_score, 1);
    }

    #[test]
    fn spawn_gate_respects_the_enemy_cap_regardless_of_the_draw() {
        let tuning = Tuning {
            enemy_spawn_chance: 1.0,
            asteroid_spawn_chance: 1.0,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(0xBA55, tuning);
        state.reset();
        for i in 0..7 {
            insert_enemy(&mut state, 64.0 * i as f32);
        }
        state.spawn_timer_ms = 1200.0;

        tick(
            &mut state,
            &TickInput::default(),
            DT,
            &mut crate::render::NullSurface,
        );

        // Enemy category was at cap: no spawn. Asteroids were below cap:
        // the certain draw produced one.
        assert_eq!(state.registry.enemies.len(), 7);
        assert_eq!(state.registry.asteroids.len(), 1);
        assert_eq!(state.spawn_timer_ms, 0.0);
    }

    #[test]
    fn spawn_gate_waits_for_the_accumulated_threshold() {
        let tuning = Tuning {
            enemy_spawn_chance: 1.0,
            asteroid_spawn_chance: 1.0,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(0xBA55, tuning);
        state.reset();

        // The gate opens on the first tick whose accumulated timer
        // exceeds 1000 ms: 63 ticks accumulate 16 ms each (1008 ms), so
        // tick 64 is the first that spawns.
        for _ in 0..63 {
            tick(
                &mut state,
                &TickInput::default(),
                DT,
                &mut crate::render::NullSurface,
            );
        }
        assert!(state.registry.enemies.is_empty());
        assert!(state.registry.asteroids.is_empty());

        tick(
            &mut state,
            &TickInput::default(),
            DT,
            &mut crate::render::NullSurface,
        );
        assert_eq!(state.registry.enemies.len(), 1);
        assert_eq!(state.registry.asteroids.len(), 1);
    }

    #[test]
    fn missile_exits_through_the_top_edge() {
        let mut state = active_state();
        let missile_id = insert_missile_at(&mut state, Vec2::new(500.0, -60.0));

        tick(
            &mut state,
            &TickInput::default(),
            DT,
            &mut crate::render::NullSurface,
        );
        assert!(!state.registry.missiles.contains_key(&missile_id));
    }

    #[test]
    fn asteroid_exits_through_the_bottom_edge() {
        let mut state = active_state();
        let id = insert_asteroid_at(
            &mut state,
            Vec2::new(300.0, CANVAS_HEIGHT + 64.0 - 2.0),
        );

        tick(
            &mut state,
            &TickInput::default(),
            DT,
            &mut crate::render::NullSurface,
        );
        assert!(!state.registry.asteroids.contains_key(&id));
    }

    #[test]
    fn explosions_expire_after_their_lifetime() {
        let mut state = active_state();
        let player_pos = state.player.body.pos;
        insert_asteroid_at(&mut state, player_pos);
        tick(
            &mut state,
            &TickInput::default(),
            DT,
            &mut crate::render::NullSurface,
        );
        assert_eq!(state.registry.explosions.len(), 1);

        // 500 ms of accumulated age: gone on the tick that crosses it.
        for _ in 0..32 {
            tick(
                &mut state,
                &TickInput::default(),
                DT,
                &mut crate::render::NullSurface,
            );
        }
        assert!(state.registry.explosions.is_empty());
    }

    #[test]
    fn game_over_overlay_appears_once_lost() {
        let mut state = active_state();
        state.player.hits_left = 1;
        let player_pos = state.player.body.pos;
        insert_asteroid_at(&mut state, player_pos);
        tick(
            &mut state,
            &TickInput::default(),
            DT,
            &mut crate::render::NullSurface,
        );
        assert!(state.run.lost);

        let mut surface = RecordingSurface::new();
        tick(&mut state, &TickInput::default(), DT, &mut surface);
        assert_eq!(surface.texts().collect::<Vec<_>>(), vec!["GAME OVER"]);
    }
}
