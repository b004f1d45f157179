//! Skyhop: a deterministic side-scrolling hopper
//!
//! Headless demonstration of the lockstep engine: a scripted input system
//! stands in for a keyboard, the match runs for a fixed number of ticks,
//! and then the whole thing is replayed from scratch through the bridge to
//! show that the same script produces the same match.

mod actors;
mod config;
mod game;
mod input;

use lockstep_engine::prelude::*;
use lockstep_engine::GameEngine;

use crate::config::GameConfig;
use crate::game::{build_scene, FlowSystem, Scoreboard};
use crate::input::{ControlScheme, ScriptedControls};

const TICKS_PER_RUN: u32 = 600;

fn hop_script() -> Vec<u64> {
    (0..u64::from(TICKS_PER_RUN)).step_by(30).collect()
}

fn run_match(engine: &mut GameEngine) -> u32 {
    for _ in 0..TICKS_PER_RUN {
        engine.tick(FrameInput::new(1.0 / 60.0));
    }
    engine
        .system::<FlowSystem>()
        .map_or(0, FlowSystem::score)
}

fn main() {
    env_logger::init();

    let config = GameConfig::load_or_default("skyhop.ron");

    let mut engine = GameEngine::new();
    engine.add_context(Scoreboard::default());
    engine.add_context(ControlScheme::default());
    engine.add_editor_system(ScriptedControls::new(hop_script()));

    let scene_config = config.clone();
    engine.set_scene_with(move || build_scene(&scene_config));

    let first = run_match(&mut engine);
    log::info!(
        "first run: score {first}, {} ticks, {:.2}s simulated",
        engine.tick_count(),
        engine.game_time()
    );

    // Replay the same script through a fresh scene via the bridge; the
    // match must come out identical.
    let bridge = engine.current_bridge();
    if let Err(err) = bridge.reload_scene(&mut engine) {
        log::error!("reload failed: {err}");
        return;
    }
    let second = run_match(&mut engine);

    if let Some(scoreboard) = engine.context::<Scoreboard>() {
        println!(
            "skyhop: run 1 scored {first}, run 2 scored {second}, best {}",
            scoreboard.best.get().max(first).max(second)
        );
    }
    println!(
        "deterministic replay: {}",
        if first == second { "ok" } else { "MISMATCH" }
    );

    engine.dispose();
}
