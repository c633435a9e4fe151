//! ECS systems that operate on the arena world each frame.
//!
//! Each system is a small struct implementing [`crate::system::System`]. Most
//! are stateless; the firing system keeps its timers keyed by entity id.

use glam::Vec2;

use arena_ai::fsm::Sighting;
use arena_core::components::{CharacterAnimator, Collider, Position, Team, Velocity};
use arena_core::enums::{AnimationState, ComponentKind};
use arena_core::types::EntityId;

use crate::combat::is_alive;
use crate::world::World;

pub mod ai;
pub mod boundary;
pub mod bullet;
pub mod collision;
pub mod death;
pub mod firing;
pub mod game_state;
pub mod movement;
pub mod player_control;
pub mod snapshot;
pub mod status_effect;

/// Closest living health-bearing entity not on `team`.
pub fn nearest_enemy(world: &World, from: Vec2, team: u32) -> Option<Sighting> {
    let candidates = world.get_entities_with_components(&[
        ComponentKind::Team,
        ComponentKind::Position,
        ComponentKind::Health,
    ]);
    let mut best: Option<Sighting> = None;
    for id in candidates {
        let (Some(other_team), Some(pos)) = (world.read::<Team>(id), world.read::<Position>(id)) else {
            continue;
        };
        if other_team.id == team || !is_alive(world, id) {
            continue;
        }
        let position = pos.as_vec2();
        let distance = from.distance(position);
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(Sighting {
                entity: id,
                position,
                distance,
            });
        }
    }
    best
}

/// Drop the ground flag of a body that no longer touches anything, so
/// gravity takes over. Returns `true` when the body just left the ground.
pub fn check_ground(world: &mut World, id: EntityId, vel: &mut Velocity) -> bool {
    let touching = world.read::<Collider>(id).map(|c| c.is_on_collide);
    if vel.on_ground && touching == Some(false) {
        vel.on_ground = false;
        vel.affected_by_gravity = true;
        set_animation(world, id, AnimationState::Jump);
        return true;
    }
    false
}

/// Set a movement animation. Run and Idle never interrupt a shot in progress.
pub fn set_animation(world: &mut World, id: EntityId, state: AnimationState) {
    if let Some(animator) = world.get_mut::<CharacterAnimator>(id) {
        let locomotion = matches!(state, AnimationState::Run | AnimationState::Idle);
        if locomotion && animator.state() == AnimationState::Shoot {
            return;
        }
        animator.set_state(state);
    }
}

/// Whether `id` may act this frame: not dying and not showing a death.
pub fn can_act(world: &World, id: EntityId) -> bool {
    is_alive(world, id)
        && !world
            .get::<CharacterAnimator>(id)
            .is_some_and(|a| a.is_dead())
}
