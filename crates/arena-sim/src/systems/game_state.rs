//! Match outcome: victory when no enemy is left, game over when the player is
//! gone or the match clock runs out.

use tracing::info;

use arena_core::components::{PlayerControlled, Projectile};
use arena_core::enums::{ComponentKind, GamePhase};
use arena_core::types::EntityId;

use crate::system::{priority, System};
use crate::world::World;

pub struct GameStateSystem;

impl System for GameStateSystem {
    fn name(&self) -> &'static str {
        "game_state"
    }

    fn priority(&self) -> i32 {
        priority::GAME_STATE
    }

    fn update(&mut self, world: &mut World, _entities: &[EntityId], delta: f32) {
        if world.phase() != GamePhase::Playing {
            return;
        }

        let players = world.get_entities_with_components(&[ComponentKind::PlayerControlled]);
        let enemies = world
            .get_entities_with_components(&[ComponentKind::Team])
            .into_iter()
            .filter(|id| !world.has::<PlayerControlled>(*id) && !world.has::<Projectile>(*id))
            .count();

        let next = if players.is_empty() {
            GamePhase::GameOver
        } else if enemies == 0 {
            GamePhase::Victory
        } else if match_time_remaining(world) - delta <= 0.0 {
            GamePhase::GameOver
        } else {
            return;
        };

        info!(phase = ?next, time = world.now(), "match ended");
        world.set_phase(next);
    }
}

/// Seconds left on the match clock at the start of the current frame.
pub fn match_time_remaining(world: &World) -> f32 {
    let duration = world.config().world.match_duration_secs;
    (f64::from(duration) - world.now()).max(0.0) as f32
}
