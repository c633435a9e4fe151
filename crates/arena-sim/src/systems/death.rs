//! Counts down death timers and removes entities whose death animation is over.

use tracing::debug;

use arena_core::components::DeathTimer;
use arena_core::constants::TIMER_EPSILON;
use arena_core::enums::ComponentKind;
use arena_core::types::EntityId;

use crate::system::{priority, System};
use crate::world::World;

pub struct DeathSystem;

impl System for DeathSystem {
    fn name(&self) -> &'static str {
        "death"
    }

    fn priority(&self) -> i32 {
        priority::DEATH
    }

    fn required_components(&self) -> &'static [ComponentKind] {
        &[ComponentKind::DeathTimer]
    }

    fn update(&mut self, world: &mut World, entities: &[EntityId], delta: f32) {
        for &id in entities {
            let Some(timer) = world.get_mut::<DeathTimer>(id) else {
                continue;
            };
            timer.remaining_secs -= delta;
            if timer.remaining_secs <= TIMER_EPSILON {
                debug!(entity = %id, "death animation finished");
                world.destroy(id);
            }
        }
    }
}
