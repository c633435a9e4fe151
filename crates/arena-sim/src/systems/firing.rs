//! Firing system: cooldown-gated shots synchronized with the shoot animation.
//!
//! A successful trigger pull starts three per-shooter timers: the fire
//! cooldown, the shoot animation and the pending projectile. The projectile
//! leaves the barrel once its own delay runs out, whether or not the shooter
//! has an animator.

use std::collections::HashMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use arena_core::components::{CharacterAnimator, Gun, PlayerControlled, Position, Team};
use arena_core::constants::TIMER_EPSILON;
use arena_core::enums::{AnimationState, ComponentKind, Facing};
use arena_core::types::EntityId;

use crate::system::{priority, System};
use crate::systems::{can_act, nearest_enemy};
use crate::world::World;
use crate::world_setup::spawn_bullet;

/// A shot waiting for the animation to reach the release point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingShot {
    pub origin: Vec2,
    /// Direction in radians, +y down.
    pub angle: f32,
    pub remaining_secs: f32,
}

pub struct FiringSystem {
    cooldowns: HashMap<EntityId, f32>,
    pending: HashMap<EntityId, PendingShot>,
    attack_timers: HashMap<EntityId, f32>,
    rng: ChaCha8Rng,
}

impl FiringSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            cooldowns: HashMap::new(),
            pending: HashMap::new(),
            attack_timers: HashMap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seconds until `id` may fire again.
    pub fn cooldown(&self, id: EntityId) -> f32 {
        self.cooldowns.get(&id).copied().unwrap_or(0.0).max(0.0)
    }

    pub fn pending_shot(&self, id: EntityId) -> Option<PendingShot> {
        self.pending.get(&id).copied()
    }

    fn tick_timers(&mut self, world: &mut World, delta: f32) {
        for cooldown in self.cooldowns.values_mut() {
            if *cooldown > 0.0 {
                *cooldown -= delta;
            }
        }

        let mut ready = Vec::new();
        for (&id, shot) in self.pending.iter_mut() {
            shot.remaining_secs -= delta;
            if shot.remaining_secs <= TIMER_EPSILON {
                ready.push((id, *shot));
            }
        }
        // Release shots in id order so seeded runs stay reproducible.
        ready.sort_by_key(|(id, _)| *id);
        let speed = world.config().firing.bullet_speed;
        for (id, shot) in ready {
            self.pending.remove(&id);
            if !can_act(world, id) {
                continue;
            }
            let velocity = Vec2::from_angle(shot.angle) * speed;
            spawn_bullet(world, id, shot.origin, velocity);
        }

        let mut finished = Vec::new();
        for (&id, timer) in self.attack_timers.iter_mut() {
            *timer -= delta;
            if *timer <= TIMER_EPSILON {
                finished.push(id);
            }
        }
        for id in finished {
            self.attack_timers.remove(&id);
            if let Some(animator) = world.get_mut::<CharacterAnimator>(id) {
                if animator.state() == AnimationState::Shoot {
                    animator.set_state(AnimationState::Idle);
                }
            }
        }

        self.cooldowns.retain(|id, _| world.contains(*id));
        self.pending.retain(|id, _| world.contains(*id));
        self.attack_timers.retain(|id, _| world.contains(*id));
    }

    /// Start a shot from `origin` in direction `angle`.
    fn fire(&mut self, world: &mut World, id: EntityId, origin: Vec2, angle: f32) {
        let firing = &world.config().firing;
        let (fire_rate, delay, animation) = (
            firing.fire_rate_secs,
            firing.bullet_fire_delay,
            firing.attack_animation_secs,
        );

        self.cooldowns.insert(id, fire_rate);
        self.pending.insert(
            id,
            PendingShot {
                origin,
                angle,
                remaining_secs: delay,
            },
        );
        if let Some(animator) = world.get_mut::<CharacterAnimator>(id) {
            animator.set_state(AnimationState::Shoot);
            self.attack_timers.insert(id, animation);
        }
    }

    fn player_fire(&mut self, world: &mut World, id: EntityId, pos: Position, gun: Gun) {
        let Some(target) = world.input().fire_target() else {
            return;
        };
        let muzzle = gun.muzzle(&pos);
        let aim = target - muzzle;
        self.fire(world, id, muzzle, aim.y.atan2(aim.x));
    }

    fn ai_fire(&mut self, world: &mut World, id: EntityId, pos: Position, mut gun: Gun, team: Team) {
        let (chance, spread) = {
            let firing = &world.config().firing;
            (firing.ai_fire_chance, firing.spread_angle)
        };
        // A world built without validation may carry any value here.
        let chance = if chance.is_nan() { 0.0 } else { chance.clamp(0.0, 1.0) };
        if !self.rng.gen_bool(chance) {
            return;
        }
        let Some(enemy) = nearest_enemy(world, pos.as_vec2(), team.id) else {
            return;
        };

        gun.facing = Facing::toward(pos.x, enemy.position.x);
        if let Some(slot) = world.get_mut::<Gun>(id) {
            slot.facing = gun.facing;
        }

        let muzzle = gun.muzzle(&pos);
        let aim = enemy.position - muzzle;
        let offset = (self.rng.gen::<f32>() - 0.5) * spread;
        self.fire(world, id, muzzle, aim.y.atan2(aim.x) + offset);
    }
}

impl System for FiringSystem {
    fn name(&self) -> &'static str {
        "firing"
    }

    fn priority(&self) -> i32 {
        priority::FIRING
    }

    fn required_components(&self) -> &'static [ComponentKind] {
        &[ComponentKind::Gun, ComponentKind::Position, ComponentKind::Team]
    }

    fn update(&mut self, world: &mut World, entities: &[EntityId], delta: f32) {
        self.tick_timers(world, delta);

        for &id in entities {
            if !can_act(world, id) || self.cooldown(id) > TIMER_EPSILON {
                continue;
            }
            let (Some(pos), Some(gun)) = (world.read::<Position>(id), world.read::<Gun>(id)) else {
                continue;
            };
            let Some(team) = world.read::<Team>(id) else {
                continue;
            };

            if world.has::<PlayerControlled>(id) {
                self.player_fire(world, id, pos, gun);
            } else {
                self.ai_fire(world, id, pos, gun, team);
            }
        }
    }
}
