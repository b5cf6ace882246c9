#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line runner for the Gridfort simulation.
//!
//! Builds a game from command-line parameters, steps it with a fixed
//! timestep until a terminal state or the step cap, and prints an outcome
//! summary. Useful for balancing runs and deterministic replays.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use gridfort_core::{Event, GameConfig};
use gridfort_game::{Game, GameStatus};
use tracing_subscriber::EnvFilter;

/// Command-line arguments controlling the scripted run.
#[derive(Debug, Parser)]
#[command(name = "gridfort", about = "Headless Gridfort simulation runner")]
struct Args {
    /// Board width in tiles.
    #[arg(long, default_value_t = 11)]
    width: u32,

    /// Board height in tiles.
    #[arg(long, default_value_t = 11)]
    height: u32,

    /// Starting player health (0 disables defeat entirely).
    #[arg(long, default_value_t = 10)]
    health: u32,

    /// Seed for every random decision in the run.
    #[arg(long, default_value_t = 0x6f72_7467_6466_7269)]
    seed: u64,

    /// Fixed timestep per frame, in milliseconds.
    #[arg(long, default_value_t = 16)]
    timestep_ms: u64,

    /// Maximum number of frames before the run is cut off.
    #[arg(long, default_value_t = 600_000)]
    max_steps: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = GameConfig::default();
    config.board.width = args.width;
    config.board.height = args.height;
    config.player_health = args.health;
    config.rng_seed = args.seed;

    let mut game = Game::new(config).context("configuration rejected")?;
    let dt = Duration::from_millis(args.timestep_ms);

    let mut steps = 0u64;
    let mut spawned = 0u64;
    let mut arrivals = 0u64;
    while game.status() == GameStatus::Playing && steps < args.max_steps {
        for event in game.update(dt) {
            match event {
                Event::EnemySpawned { .. } => spawned += 1,
                Event::EnemyReachedDestination { .. } => arrivals += 1,
                _ => {}
            }
        }
        steps += 1;
    }

    let outcome = match game.status() {
        GameStatus::Playing => "cut off",
        GameStatus::GameOver => "game over",
        GameStatus::Cleared => "cleared",
    };
    println!(
        "{outcome}: steps={steps} spawned={spawned} arrivals={arrivals} \
         kills={kills} health={health}",
        kills = game.score(),
        health = game.player_health(),
    );

    Ok(())
}
