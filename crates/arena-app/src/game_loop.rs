//! Game loop thread: runs the arena engine at the frame rate and publishes
//! snapshots.
//!
//! The engine is built on the caller's thread, so a bad config fails there, then
//! moves into the loop thread and never leaves it. Commands arrive over an
//! `mpsc` channel; the latest snapshot is kept in shared state for polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use arena_core::commands::PlayerCommand;
use arena_core::config::ArenaConfig;
use arena_core::constants::{FRAME_DT, FRAME_RATE};
use arena_core::error::Result;
use arena_core::state::ArenaSnapshot;
use arena_sim::engine::ArenaEngine;

use crate::state::{GameLoopCommand, MatchSummary};

/// Wall-clock duration of one frame.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / FRAME_RATE as u64);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoopOptions {
    /// Stop after this many ticks, paused ones included.
    pub max_frames: Option<u64>,
    /// Sleep between ticks to hold the frame rate. Off runs flat out.
    pub realtime: bool,
}

/// Owner side of a running game loop.
pub struct GameLoopHandle {
    command_tx: mpsc::Sender<GameLoopCommand>,
    latest_snapshot: Arc<Mutex<Option<ArenaSnapshot>>>,
    thread: JoinHandle<MatchSummary>,
}

impl GameLoopHandle {
    /// Forward a player command. Returns `false` once the loop has stopped.
    pub fn send(&self, command: PlayerCommand) -> bool {
        self.command_tx.send(GameLoopCommand::Player(command)).is_ok()
    }

    pub fn latest_snapshot(&self) -> Option<ArenaSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }

    /// Stop the loop and wait for it. `None` if the loop thread panicked.
    pub fn shutdown(self) -> Option<MatchSummary> {
        let _ = self.command_tx.send(GameLoopCommand::Shutdown);
        self.join()
    }

    /// Wait for the match to end on its own.
    pub fn join(self) -> Option<MatchSummary> {
        self.thread.join().ok()
    }
}

/// Spawn the game loop on a new thread. Fails without spawning if the config
/// does not validate.
pub fn spawn_game_loop(config: ArenaConfig, options: LoopOptions) -> Result<GameLoopHandle> {
    let engine = ArenaEngine::new(config)?;
    let (command_tx, command_rx) = mpsc::channel::<GameLoopCommand>();
    let latest_snapshot = Arc::new(Mutex::new(None));
    let shared = Arc::clone(&latest_snapshot);

    let thread = std::thread::Builder::new()
        .name("arena-game-loop".into())
        .spawn(move || run_game_loop(engine, &command_rx, &shared, options))?;

    Ok(GameLoopHandle {
        command_tx,
        latest_snapshot,
        thread,
    })
}

/// The game loop. Runs until a Shutdown command, channel disconnect, the end
/// of the match or the frame limit.
pub fn run_game_loop(
    mut engine: ArenaEngine,
    command_rx: &mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<ArenaSnapshot>>,
    options: LoopOptions,
) -> MatchSummary {
    let mut summary = MatchSummary::default();
    let mut ticks = 0u64;
    let mut next_tick_time = Instant::now();

    loop {
        loop {
            match command_rx.try_recv() {
                Ok(GameLoopCommand::Player(command)) => engine.queue_command(command),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    debug!(ticks, "game loop stopped by host");
                    return summary;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        let snapshot = engine.tick(FRAME_DT);
        ticks += 1;
        summary.record(&snapshot);
        let over = snapshot.phase.is_over();
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        if over {
            info!(phase = ?summary.phase, frames = summary.frames, "match finished");
            return summary;
        }
        if options.max_frames.is_some_and(|max| ticks >= max) {
            info!(frames = summary.frames, "frame limit reached");
            return summary;
        }

        if options.realtime {
            next_tick_time += TICK_DURATION;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > TICK_DURATION * 2 {
                // Too far behind; skip ahead instead of catching up.
                next_tick_time = now;
            }
        }
    }
}
