//! Kinematic integration system.
//!
//! Updates Position from Velocity each frame: position += velocity * dt.
//! Airborne bodies that use gravity accelerate downward; bouncing bodies are
//! reflected back inside the world bounds.

use arena_core::components::{Position, Velocity};
use arena_core::enums::ComponentKind;
use arena_core::types::{Bounds, EntityId};

use crate::system::{priority, System};
use crate::world::World;

pub struct MovementSystem;

impl System for MovementSystem {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn priority(&self) -> i32 {
        priority::MOVEMENT
    }

    fn required_components(&self) -> &'static [ComponentKind] {
        &[ComponentKind::Position, ComponentKind::Velocity]
    }

    fn update(&mut self, world: &mut World, entities: &[EntityId], delta: f32) {
        let gravity = world.config().world.gravity;
        let bounds = world.bounds();

        for &id in entities {
            let Some(mut vel) = world.read::<Velocity>(id) else {
                continue;
            };
            let Some(pos) = world.get_mut::<Position>(id) else {
                continue;
            };
            integrate(pos, &mut vel, gravity, delta);
            if vel.bounce {
                bounce(pos, &mut vel, &bounds);
            }
            if let Some(v) = world.get_mut::<Velocity>(id) {
                *v = vel;
            }
        }
    }
}

/// Advance one body by `delta` seconds.
pub fn integrate(pos: &mut Position, vel: &mut Velocity, gravity: f32, delta: f32) {
    pos.x += vel.x * delta;
    pos.y += vel.y * delta;
    if !vel.on_ground && vel.affected_by_gravity {
        vel.y += gravity * delta;
    }
}

/// Reflect and clamp a body against all four bounds.
pub fn bounce(pos: &mut Position, vel: &mut Velocity, bounds: &Bounds) {
    if pos.y < bounds.min_y {
        pos.y = bounds.min_y;
        vel.y = vel.y.abs();
    }
    if pos.y > bounds.max_y {
        pos.y = bounds.max_y;
        vel.y = -vel.y.abs();
    }
    if pos.x < bounds.min_x {
        pos.x = bounds.min_x;
        vel.x = vel.x.abs();
    }
    if pos.x > bounds.max_x {
        pos.x = bounds.max_x;
        vel.x = -vel.x.abs();
    }
}
