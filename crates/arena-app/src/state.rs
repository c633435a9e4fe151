//! State shared between the host and the game loop thread.

use serde::Serialize;

use arena_core::commands::PlayerCommand;
use arena_core::enums::{AnimationState, GamePhase};
use arena_core::events::GameEvent;
use arena_core::state::ArenaSnapshot;

/// Commands sent from the host to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the engine.
    Player(PlayerCommand),
    /// Stop the loop and return the summary.
    Shutdown,
}

/// Running tally of a match, updated from every snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchSummary {
    pub phase: GamePhase,
    pub frames: u64,
    pub elapsed_secs: f64,
    pub shots_fired: u32,
    pub deaths: u32,
    pub damage_dealt: f32,
    pub player_alive: bool,
    pub enemies_left: usize,
}

impl MatchSummary {
    pub fn record(&mut self, snapshot: &ArenaSnapshot) {
        self.phase = snapshot.phase;
        self.frames = snapshot.time.frame;
        self.elapsed_secs = snapshot.time.elapsed_secs;

        for event in &snapshot.events {
            match event {
                GameEvent::BulletFired { .. } => self.shots_fired += 1,
                GameEvent::Died { .. } => self.deaths += 1,
                GameEvent::Damaged { amount, .. } => self.damage_dealt += amount,
                _ => {}
            }
        }

        let standing = |animation: Option<AnimationState>| animation != Some(AnimationState::Dead);
        self.player_alive = snapshot
            .entities
            .iter()
            .any(|e| e.player && standing(e.animation));
        self.enemies_left = snapshot
            .entities
            .iter()
            .filter(|e| !e.player && !e.projectile && e.team.is_some() && standing(e.animation))
            .count();
    }
}
