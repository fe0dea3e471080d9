//! Maze Arena headless runner
//!
//! Plays a run in demo mode without a renderer: the autopilot drives the
//! player through the fixed-step driver at a simulated frame rate until the
//! player dies or time runs out.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use maze_arena::Settings;
use maze_arena::sim::{FixedStep, GamePhase, GameState, TickInput};

#[derive(Debug, Parser)]
#[command(name = "maze-arena", about = "Run a headless demo game")]
struct Args {
    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Run seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds before stopping
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,
    /// Simulated presentation frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let seed = args.seed.or(settings.seed).unwrap_or_else(rand::random);
    log::info!(
        "Maze Arena starting: seed {}, difficulty {}",
        seed,
        settings.difficulty.as_str()
    );

    let mut state = GameState::from_settings(&settings, seed);
    let mut clock = FixedStep::new(settings.max_substeps);
    let mut input = TickInput {
        start: true,
        autopilot: true,
        ..Default::default()
    };

    let frame_dt = 1.0 / args.fps.max(1.0);
    let mut elapsed = 0.0;
    while elapsed < args.seconds && state.phase() != GamePhase::GameOver {
        clock.advance(&mut state, &mut input, frame_dt);
        elapsed += frame_dt;
    }

    let snapshot = state.snapshot();
    log::info!(
        "Run ended after {:.1}s ({} ticks): phase {}, score {}, wave {}, health {:.0}",
        elapsed,
        snapshot.time_ticks,
        snapshot.phase.as_str(),
        snapshot.score,
        snapshot.wave,
        snapshot.health
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!(
            "score {} | wave {} | health {:.0} | {}",
            snapshot.score,
            snapshot.wave,
            snapshot.health,
            snapshot.phase.as_str()
        );
    }
    Ok(())
}
