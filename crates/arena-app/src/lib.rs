//! Headless arena host.
//!
//! Runs the simulation engine on its own thread and hands the caller a
//! command channel, the latest snapshot and a match summary.

pub mod game_loop;
pub mod state;

pub use arena_core as core;
