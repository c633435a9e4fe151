//! Lifetime countdown and off-screen culling for short-lived entities.

use arena_core::components::{Lifetime, Position, Team};
use arena_core::constants::{BULLET_CULL_MARGIN, TIMER_EPSILON};
use arena_core::enums::ComponentKind;
use arena_core::types::EntityId;

use crate::system::{priority, System};
use crate::world::World;

pub struct BulletSystem;

impl System for BulletSystem {
    fn name(&self) -> &'static str {
        "bullet"
    }

    fn priority(&self) -> i32 {
        priority::BULLET
    }

    fn required_components(&self) -> &'static [ComponentKind] {
        &[ComponentKind::Position, ComponentKind::Lifetime]
    }

    fn update(&mut self, world: &mut World, entities: &[EntityId], delta: f32) {
        let half_w = world.config().world.playfield_width + BULLET_CULL_MARGIN;
        let half_h = world.config().world.playfield_height + BULLET_CULL_MARGIN;

        for &id in entities {
            let Some(lifetime) = world.get_mut::<Lifetime>(id) else {
                continue;
            };
            lifetime.remaining_secs -= delta;
            if lifetime.remaining_secs <= TIMER_EPSILON {
                world.destroy(id);
                continue;
            }

            if !world.has::<Team>(id) {
                continue;
            }
            let Some(pos) = world.read::<Position>(id) else {
                continue;
            };
            if pos.x.abs() > half_w || pos.y.abs() > half_h {
                world.destroy(id);
            }
        }
    }
}
