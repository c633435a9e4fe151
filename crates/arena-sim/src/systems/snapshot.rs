//! Snapshot builder: reads the world and produces an [`ArenaSnapshot`].
//!
//! Read-only; it never modifies the world.

use arena_core::components::*;
use arena_core::enums::ComponentKind;
use arena_core::events::GameEvent;
use arena_core::health::Health;
use arena_core::state::{ArenaSnapshot, EntityView};
use arena_core::types::EntityId;

use crate::systems::game_state::match_time_remaining;
use crate::world::World;

/// Build a snapshot of every stored entity that has a position.
pub fn build_snapshot(
    world: &World,
    events: Vec<GameEvent>,
    detached: Vec<(EntityId, ComponentKind)>,
) -> ArenaSnapshot {
    ArenaSnapshot {
        time: world.time(),
        phase: world.phase(),
        match_time_remaining: match_time_remaining(world),
        entities: world
            .entities()
            .iter()
            .filter_map(|id| build_view(world, *id))
            .collect(),
        events,
        detached,
    }
}

fn build_view(world: &World, id: EntityId) -> Option<EntityView> {
    let position = world.read::<Position>(id)?;
    Some(EntityView {
        id,
        position,
        collider: world.read::<Collider>(id).map(|c| c.aabb(&position)),
        trigger: world.read::<Trigger>(id).map(|t| t.aabb(&position)),
        health: world.get::<Health>(id).map(|h| h.fraction()),
        animation: world.read::<CharacterAnimator>(id).map(|a| a.state()),
        team: world.read::<Team>(id).map(|t| t.id),
        player: world.has::<PlayerControlled>(id),
        projectile: world.has::<Bullet>(id),
        facing: world.read::<Gun>(id).map(|g| g.facing),
    })
}
