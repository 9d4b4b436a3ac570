//! Headless demo driver
//!
//! Stands in for the external scheduler and input layer: runs the engine
//! at the nominal tick length with a small autopilot, then prints the
//! final run snapshot as JSON. Usage:
//!
//! ```text
//! astro-barrage [seed] [ticks]
//! ```

use astro_barrage::consts::TICK_MS;
use astro_barrage::render::NullSurface;
use astro_barrage::sim::{GameState, TickInput, tick};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xA57E0);
    let max_ticks: u64 = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(3600);

    log::info!("demo run: seed={seed} max_ticks={max_ticks}");

    let mut state = GameState::new(seed);
    let mut surface = NullSurface;

    // The first tick carries the reset trigger, standing in for Enter.
    let mut input = TickInput {
        reset: true,
        ..TickInput::default()
    };

    for t in 0..max_ticks {
        tick(&mut state, &input, TICK_MS, &mut surface);
        if state.snapshot().lost {
            log::info!("run lost after {} ticks", t + 1);
            break;
        }
        input = autopilot(&state, t);
    }

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("snapshot serialization failed: {err}"),
    }
}

/// Trivial stand-in pilot: drift toward the column of the oldest live
/// asteroid and fire on a fixed cadence.
fn autopilot(state: &GameState, t: u64) -> TickInput {
    let player_center = state.player.body.pos.x + state.player.body.size.x / 2.0;
    let target = state
        .registry
        .asteroids
        .values()
        .next()
        .map(|asteroid| asteroid.body.pos.x + asteroid.body.size.x / 2.0);

    let (move_left, move_right) = match target {
        Some(x) if x < player_center - 8.0 => (true, false),
        Some(x) if x > player_center + 8.0 => (false, true),
        _ => (false, false),
    };

    TickInput {
        move_left,
        move_right,
        fire: t % 20 == 0,
        pause: false,
        reset: false,
    }
}
