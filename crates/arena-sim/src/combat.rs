//! Damage application and the death sequence, shared by every system that
//! can hurt an entity.

use tracing::debug;

use arena_core::components::{CharacterAnimator, DeathTimer, Velocity};
use arena_core::config::CombatConfig;
use arena_core::constants::{ENEMY_TEAM, PLAYER_TEAM};
use arena_core::enums::AnimationState;
use arena_core::events::GameEvent;
use arena_core::health::{DamageInfo, Health};
use arena_core::types::EntityId;

use crate::world::World;

/// Scale applied to projectile damage depending on who shoots whom.
pub fn damage_multiplier(config: &CombatConfig, source_team: u32, target_is_player: bool) -> f32 {
    if source_team == ENEMY_TEAM && target_is_player {
        config.enemy_to_player_multiplier
    } else if source_team == PLAYER_TEAM && !target_is_player {
        config.player_to_enemy_multiplier
    } else {
        1.0
    }
}

/// Apply a hit to `target` at the current simulation time. Returns the damage
/// taken; a target left at zero health enters the death sequence.
pub fn apply_damage(world: &mut World, target: EntityId, damage: DamageInfo) -> f32 {
    let now = world.now();
    let Some(health) = world.get_mut::<Health>(target) else {
        return 0.0;
    };
    let taken = health.take_damage(&damage, now);
    let dead = health.is_dead();

    if taken > 0.0 {
        world.emit(GameEvent::Damaged {
            target,
            source: damage.source,
            amount: taken,
            damage_type: damage.damage_type,
        });
    }
    if dead {
        begin_death_sequence(world, target);
    }
    taken
}

/// Start the death of `id`.
///
/// Entities with an animator switch to `Dead`, stop moving and get a
/// [`DeathTimer`]; the death system removes them when it runs out. Anything
/// else is destroyed at once. Calling this again on a dying entity does
/// nothing.
pub fn begin_death_sequence(world: &mut World, id: EntityId) {
    if !world.is_active(id) || world.has::<DeathTimer>(id) {
        return;
    }
    world.emit(GameEvent::Died { entity: id });

    let animated = match world.get_mut::<CharacterAnimator>(id) {
        Some(animator) => {
            animator.set_state(AnimationState::Dead);
            true
        }
        None => false,
    };
    if !animated {
        debug!(entity = %id, "died without animation");
        world.destroy(id);
        return;
    }

    if let Some(vel) = world.get_mut::<Velocity>(id) {
        vel.halt();
    }
    let delay = world.config().combat.death_delay_secs;
    world.add_component(id, DeathTimer::new(delay));
    debug!(entity = %id, delay, "death sequence started");
}

/// Whether `id` is alive: stored, active, not dying and not at zero health.
pub fn is_alive(world: &World, id: EntityId) -> bool {
    if !world.is_active(id) || world.has::<DeathTimer>(id) {
        return false;
    }
    world.get::<Health>(id).map_or(true, |h| !h.is_dead())
}
