//! Petal Dash entry point
//!
//! Headless demo driver: builds the world from tuning + save files and runs
//! a few piloted runs on the fixed-timestep loop. Rendering, input, and
//! audio attach through the same surface (`RunWorld` + `drain_events`).

use std::path::Path;
use std::time::Instant;

use petal_dash::consts::{MAX_SUBSTEPS, SIM_DT};
use petal_dash::sim::{RunEvent, RunState, RunWorld};
use petal_dash::{JsonFileStore, Tuning};

fn main() {
    env_logger::init();
    log::info!("Petal Dash (headless) starting...");

    let tuning = Tuning::load(Path::new("petal_dash_tuning.json"));
    let store = JsonFileStore::open("petal_dash_save.json");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut world = RunWorld::new(seed, tuning, Box::new(store));

    let started = Instant::now();
    let runs = 3;
    for run in 1..=runs {
        world.start();
        run_until_game_over(&mut world);
        println!(
            "run {run}: score {} (best {})",
            world.last_run_score, world.best_score
        );
        world.spawner.for_each_active(|gate| {
            log::debug!("gate left on field at x={:.2}", gate.pos.x);
        });
        world.play_again();
    }

    log::info!(
        "{} runs simulated in {:.1} ms",
        runs,
        started.elapsed().as_secs_f32() * 1000.0
    );
}

/// Drive the fixed-timestep loop with a naive pilot until the run ends.
fn run_until_game_over(world: &mut RunWorld) {
    // Simulated wall-clock frames at 60 Hz feeding the 120 Hz sim
    let frame_dt = 1.0 / 60.0;
    let mut accumulator = 0.0f32;
    let max_frames = 60 * 60 * 10; // ten minutes, just in case

    for _ in 0..max_frames {
        if world.state != RunState::Playing {
            break;
        }

        // Pilot: flap when falling below the middle of the world
        if world.player.pos.y < 0.0 && world.player.vel.y < 0.0 {
            world.flap();
        }

        accumulator += frame_dt;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            world.tick(SIM_DT);
            world.fixed_tick(SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }

        for event in world.drain_events() {
            match event {
                RunEvent::Scored { total } => log::debug!("score: {total}"),
                RunEvent::BestBeaten { best } => log::info!("new best: {best}"),
                RunEvent::Died { score } => log::info!("died with score {score}"),
                RunEvent::Flapped => {}
            }
        }
    }
}
