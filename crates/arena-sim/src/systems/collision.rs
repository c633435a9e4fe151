//! Collision system: solid-body resolution and projectile hits.
//!
//! Pass A pushes moving solid bodies out of whatever they overlap and deals
//! contact damage between health-bearing bodies. Pass B checks projectile
//! hitboxes against the hitboxes of other teams and delivers their payload.
//! Both passes are brute-force O(n²) scans.

use tracing::warn;

use arena_core::components::*;
use arena_core::enums::{AnimationState, ComponentKind, DamageType};
use arena_core::events::GameEvent;
use arena_core::health::{DamageInfo, Health};
use arena_core::types::{Aabb, EntityId};

use crate::combat::{apply_damage, damage_multiplier};
use crate::system::{priority, System};
use crate::world::World;

pub struct CollisionSystem;

impl System for CollisionSystem {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn priority(&self) -> i32 {
        priority::COLLISION
    }

    fn required_components(&self) -> &'static [ComponentKind] {
        &[ComponentKind::Position]
    }

    fn update(&mut self, world: &mut World, entities: &[EntityId], _delta: f32) {
        resolve_solids(world, entities);
        resolve_projectiles(world, entities);
    }
}

/// Pass A: solid bodies.
pub fn resolve_solids(world: &mut World, entities: &[EntityId]) {
    let candidates: Vec<EntityId> = entities
        .iter()
        .copied()
        .filter(|id| world.has::<Collider>(*id))
        .collect();
    let movers: Vec<EntityId> = candidates
        .iter()
        .copied()
        .filter(|id| world.has::<Velocity>(*id))
        .collect();

    for &a in &movers {
        if !world.is_active(a) {
            continue;
        }
        let Some(collider_a) = world.get_mut::<Collider>(a) else {
            continue;
        };
        collider_a.is_on_collide = false;
        let collider_a = *collider_a;

        for &b in &candidates {
            if b == a || !world.is_active(b) {
                continue;
            }
            let (Some(pos_a), Some(pos_b), Some(collider_b)) = (
                world.read::<Position>(a),
                world.read::<Position>(b),
                world.read::<Collider>(b),
            ) else {
                continue;
            };
            let box_a = collider_a.aabb(&pos_a);
            let box_b = collider_b.aabb(&pos_b);
            if !box_a.intersects(&box_b) {
                continue;
            }

            if let Some(c) = world.get_mut::<Collider>(a) {
                c.is_on_collide = true;
            }
            if !collider_a.is_trigger && !collider_b.is_trigger {
                push_out(world, a, &collider_a, &box_a, &box_b);
            }
            contact_damage(world, a, b);
        }
    }
}

/// Move `a` out of `b` along the axis of smaller penetration.
fn push_out(world: &mut World, a: EntityId, collider: &Collider, box_a: &Aabb, box_b: &Aabb) {
    let overlap_x = box_a.overlap_x(box_b);
    let overlap_y = box_a.overlap_y(box_b);

    let Some(mut pos) = world.read::<Position>(a) else {
        return;
    };
    let mut vel = world.read::<Velocity>(a);
    let mut landed = false;

    if overlap_x < overlap_y {
        if box_a.x < box_b.x {
            pos.x = box_b.x - box_a.width - collider.offset_x;
            if let Some(v) = vel.as_mut() {
                v.x = v.x.min(0.0);
            }
        } else {
            pos.x = box_b.right() - collider.offset_x;
            if let Some(v) = vel.as_mut() {
                v.x = v.x.max(0.0);
            }
        }
    } else if box_a.y < box_b.y {
        pos.y = box_b.y - box_a.height - collider.offset_y;
        if let Some(v) = vel.as_mut() {
            v.y = v.y.min(0.0);
            v.on_ground = true;
            v.affected_by_gravity = false;
            landed = true;
        }
    } else {
        pos.y = box_b.bottom() - collider.offset_y;
        if let Some(v) = vel.as_mut() {
            v.y = v.y.max(0.0);
        }
    }

    if let Some(p) = world.get_mut::<Position>(a) {
        *p = pos;
    }
    if let (Some(v), Some(slot)) = (vel, world.get_mut::<Velocity>(a)) {
        *slot = v;
    }

    if landed {
        let running = vel.is_some_and(|v| v.x.abs() > 0.0);
        if let Some(animator) = world.get_mut::<CharacterAnimator>(a) {
            if animator.state() == AnimationState::Jump {
                animator.set_state(if running {
                    AnimationState::Run
                } else {
                    AnimationState::Idle
                });
            }
        }
    }
}

/// Both bodies take contact damage, each attributed to the other.
fn contact_damage(world: &mut World, a: EntityId, b: EntityId) {
    if !world.has::<Health>(a) || !world.has::<Health>(b) {
        return;
    }
    let amount = world.config().combat.contact_damage;
    apply_damage(
        world,
        a,
        DamageInfo::new(amount, DamageType::Physical).from_source(b),
    );
    apply_damage(
        world,
        b,
        DamageInfo::new(amount, DamageType::Physical).from_source(a),
    );
}

/// Pass B: projectiles against hitboxes.
pub fn resolve_projectiles(world: &mut World, entities: &[EntityId]) {
    let triggers: Vec<EntityId> = entities
        .iter()
        .copied()
        .filter(|id| world.has::<Trigger>(*id))
        .collect();
    let bullets: Vec<EntityId> = triggers
        .iter()
        .copied()
        .filter(|id| world.has::<Bullet>(*id))
        .collect();

    for &bullet_id in &bullets {
        if !world.is_active(bullet_id) {
            continue;
        }
        let (Some(bullet), Some(trigger), Some(pos)) = (
            world.read::<Bullet>(bullet_id),
            world.read::<Trigger>(bullet_id),
            world.read::<Position>(bullet_id),
        ) else {
            continue;
        };
        let Some(team) = world.read::<Team>(bullet_id) else {
            warn!(bullet = %bullet_id, "projectile without team ignored");
            continue;
        };
        let source = world
            .read::<Projectile>(bullet_id)
            .map_or(bullet_id, |p| p.source);
        let box_a = trigger.aabb(&pos);

        for &target in &triggers {
            if target == bullet_id || !world.is_active(target) {
                continue;
            }
            let Some(target_team) = world.read::<Team>(target) else {
                continue;
            };
            if target_team.id == team.id {
                continue;
            }
            let (Some(target_trigger), Some(target_pos)) =
                (world.read::<Trigger>(target), world.read::<Position>(target))
            else {
                continue;
            };
            if !box_a.intersects(&target_trigger.aabb(&target_pos)) {
                continue;
            }
            // Dying bodies still stop bullets.
            if !world.has::<Health>(target) {
                continue;
            }

            let is_player = world.has::<PlayerControlled>(target);
            let multiplier = damage_multiplier(&world.config().combat, team.id, is_player);
            apply_damage(
                world,
                target,
                DamageInfo::new(bullet.damage * multiplier, bullet.damage_type).from_source(source),
            );

            if let Some(effect) = bullet.status_effect {
                let now = world.now();
                let merged = world
                    .get_mut::<Health>(target)
                    .map(|health| health.add_status_effect(effect, now));
                if let Some(merged) = merged {
                    world.emit(GameEvent::StatusApplied {
                        target,
                        damage_type: effect.damage_type,
                        merged,
                    });
                }
            }

            world.destroy(bullet_id);
            break;
        }
    }
}
