//! Player commands sent from the host to the simulation.
//!
//! Commands are queued and applied at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::KeyCode;

/// All possible player actions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Input ---
    KeyDown { key: KeyCode },
    KeyUp { key: KeyCode },
    /// Fire button pressed at a world-space position. Also updates the aim
    /// while held.
    MouseDown { x: f32, y: f32 },
    MouseUp,

    // --- Simulation control ---
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}
