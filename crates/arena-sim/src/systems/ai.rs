//! AI system: runs the enemy FSM for every entity with an AI controller.
//!
//! World lookups (nearest enemy, target position) happen here; the decisions
//! themselves come from [`arena_ai::fsm`].

use tracing::debug;

use arena_ai::fsm::{self, AiContext};
use arena_core::components::{AiController, Position, Team, Velocity};
use arena_core::enums::{AnimationState, ComponentKind};
use arena_core::health::Health;
use arena_core::types::EntityId;

use crate::system::{priority, System};
use crate::systems::{can_act, check_ground, nearest_enemy, set_animation};
use crate::world::World;

pub struct AiSystem;

impl System for AiSystem {
    fn name(&self) -> &'static str {
        "ai"
    }

    fn priority(&self) -> i32 {
        priority::AI
    }

    fn required_components(&self) -> &'static [ComponentKind] {
        &[
            ComponentKind::AiController,
            ComponentKind::Position,
            ComponentKind::Velocity,
        ]
    }

    fn update(&mut self, world: &mut World, entities: &[EntityId], _delta: f32) {
        let now = world.now();
        let params = world.config().ai.clone();

        for &id in entities {
            if !can_act(world, id) {
                continue;
            }
            let (Some(pos), Some(mut vel), Some(team)) = (
                world.read::<Position>(id),
                world.read::<Velocity>(id),
                world.read::<Team>(id),
            ) else {
                continue;
            };
            let Some(health_fraction) = world.get::<Health>(id).map(|h| h.fraction()) else {
                continue;
            };
            let Some(mut ai) = world.get::<AiController>(id).map(|ai| AiController::clone(&ai)) else {
                continue;
            };

            check_ground(world, id, &mut vel);
            vel.x = 0.0;

            let ctx = AiContext {
                position: pos.as_vec2(),
                health_fraction,
                nearest_enemy: nearest_enemy(world, pos.as_vec2(), team.id),
                now,
            };
            let update = fsm::evaluate(&mut ai, &ctx);
            if update.state_changed {
                debug!(entity = %id, state = ?ai.state, target = ?ai.target, "ai state changed");
            }
            if update.active {
                let target = ai
                    .target
                    .filter(|t| world.is_active(*t))
                    .and_then(|t| world.read::<Position>(t))
                    .map(|p| p.as_vec2());
                vel.x = fsm::steer(&mut ai, pos.as_vec2(), target, &params, now);
            }

            if vel.on_ground {
                let state = if vel.x.abs() > 0.0 {
                    AnimationState::Run
                } else {
                    AnimationState::Idle
                };
                set_animation(world, id, state);
            }
            if let Some(slot) = world.get_mut::<Velocity>(id) {
                *slot = vel;
            }
            if let Some(slot) = world.get_mut::<AiController>(id) {
                *slot = ai;
            }
        }
    }
}
