//! Kills whatever falls too far below the playfield.

use arena_core::components::Position;
use arena_core::constants::FALL_DEATH_MARGIN;
use arena_core::enums::ComponentKind;
use arena_core::types::EntityId;

use crate::combat::begin_death_sequence;
use crate::system::{priority, System};
use crate::world::World;

pub struct BoundarySystem;

impl System for BoundarySystem {
    fn name(&self) -> &'static str {
        "boundary"
    }

    fn priority(&self) -> i32 {
        priority::BOUNDARY
    }

    fn required_components(&self) -> &'static [ComponentKind] {
        &[ComponentKind::Position]
    }

    fn update(&mut self, world: &mut World, entities: &[EntityId], _delta: f32) {
        let floor = world.config().world.playfield_height + FALL_DEATH_MARGIN;
        for &id in entities {
            let Some(pos) = world.read::<Position>(id) else {
                continue;
            };
            if pos.y > floor {
                begin_death_sequence(world, id);
            }
        }
    }
}
