//! Damage-over-time ticking for every health pool with active effects.

use arena_core::components::DeathTimer;
use arena_core::enums::ComponentKind;
use arena_core::health::Health;
use arena_core::types::EntityId;

use crate::combat::begin_death_sequence;
use crate::system::{priority, System};
use crate::world::World;

pub struct StatusEffectSystem;

impl System for StatusEffectSystem {
    fn name(&self) -> &'static str {
        "status_effect"
    }

    fn priority(&self) -> i32 {
        priority::STATUS_EFFECT
    }

    fn required_components(&self) -> &'static [ComponentKind] {
        &[ComponentKind::Health]
    }

    fn update(&mut self, world: &mut World, entities: &[EntityId], delta: f32) {
        let now = world.now();
        for &id in entities {
            if world.has::<DeathTimer>(id) {
                continue;
            }
            let Some(health) = world.get_mut::<Health>(id) else {
                continue;
            };
            if health.status_effects().is_empty() {
                continue;
            }
            health.update_status_effects(delta, now);
            if health.is_dead() {
                begin_death_sequence(world, id);
            }
        }
    }
}
