//! Keyboard-driven movement of player-controlled characters.
//!
//! Reads the world's [`InputState`](arena_core::input::InputState): horizontal
//! movement, facing and jumping. Gravity itself is left to the movement system.

use arena_core::components::{Gun, Velocity};
use arena_core::enums::{AnimationState, ComponentKind, Facing};
use arena_core::types::EntityId;

use crate::system::{priority, System};
use crate::systems::{can_act, check_ground, set_animation};
use crate::world::World;

pub struct PlayerControlSystem;

impl System for PlayerControlSystem {
    fn name(&self) -> &'static str {
        "player_control"
    }

    fn priority(&self) -> i32 {
        priority::PLAYER_CONTROL
    }

    fn required_components(&self) -> &'static [ComponentKind] {
        &[ComponentKind::PlayerControlled, ComponentKind::Velocity]
    }

    fn update(&mut self, world: &mut World, entities: &[EntityId], _delta: f32) {
        let (left, right, jump) = {
            let input = world.input();
            (input.left(), input.right(), input.jump())
        };
        let speed = world.config().player.move_speed;
        let jump_force = world.config().player.jump_force;

        for &id in entities {
            if !can_act(world, id) {
                continue;
            }
            let Some(mut vel) = world.read::<Velocity>(id) else {
                continue;
            };
            check_ground(world, id, &mut vel);

            vel.x = 0.0;
            let mut facing = None;
            if left {
                vel.x = -speed;
                facing = Some(Facing::Left);
            } else if right {
                vel.x = speed;
                facing = Some(Facing::Right);
            }
            if vel.on_ground {
                let state = if facing.is_some() {
                    AnimationState::Run
                } else {
                    AnimationState::Idle
                };
                set_animation(world, id, state);
            }

            if jump && vel.on_ground {
                vel.y = -jump_force;
                vel.on_ground = false;
                vel.affected_by_gravity = true;
            }
            if !vel.on_ground {
                set_animation(world, id, AnimationState::Jump);
            }

            if let Some(slot) = world.get_mut::<Velocity>(id) {
                *slot = vel;
            }
            if let (Some(facing), Some(gun)) = (facing, world.get_mut::<Gun>(id)) {
                gun.facing = facing;
            }
        }
    }
}
