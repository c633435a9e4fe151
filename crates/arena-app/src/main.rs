use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use arena_app::game_loop::{spawn_game_loop, LoopOptions};
use arena_core::config::ArenaConfig;
use arena_core::constants::FRAME_RATE;
use arena_core::error::ArenaError;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a headless arena match", long_about = None)]
struct Args {
    /// TOML config file. Built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for arena layout and AI decisions.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Seconds of simulation before the run stops.
    #[arg(short, long, default_value_t = 60.0)]
    duration: f32,

    #[arg(short, long)]
    enemies: Option<usize>,

    /// Hold the loop to the frame rate instead of running flat out.
    #[arg(long)]
    realtime: bool,

    /// Print the match summary as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), ArenaError> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ArenaConfig::load(path)?,
        None => ArenaConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.world.seed = seed;
    }
    if let Some(enemies) = args.enemies {
        config.world.enemy_count = enemies;
    }
    if args.duration.is_nan() || args.duration <= 0.0 {
        return Err(ArenaError::invalid_config("duration must be positive"));
    }

    let max_frames = (f64::from(args.duration) * f64::from(FRAME_RATE)).ceil() as u64;
    info!(
        seed = config.world.seed,
        enemies = config.world.enemy_count,
        max_frames,
        "starting match"
    );

    let handle = spawn_game_loop(
        config,
        LoopOptions {
            max_frames: Some(max_frames),
            realtime: args.realtime,
        },
    )?;
    let Some(summary) = handle.join() else {
        return Err(ArenaError::Io(std::io::Error::other("game loop thread panicked")));
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{:?} after {:.1}s: {} shots, {} deaths, {} enemies left, player {}",
            summary.phase,
            summary.elapsed_secs,
            summary.shots_fired,
            summary.deaths,
            summary.enemies_left,
            if summary.player_alive { "alive" } else { "down" },
        );
    }
    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
