//! Tests for the world, scheduler, systems and engine.

use std::sync::{Arc, Mutex};

use glam::Vec2;

use arena_core::commands::PlayerCommand;
use arena_core::components::*;
use arena_core::config::ArenaConfig;
use arena_core::constants::*;
use arena_core::enums::*;
use arena_core::error::ArenaError;
use arena_core::events::GameEvent;
use arena_core::health::{Health, StatusEffect};
use arena_core::types::EntityId;

use crate::combat::begin_death_sequence;
use crate::engine::ArenaEngine;
use crate::system::System;
use crate::systems::ai::AiSystem;
use crate::systems::boundary::BoundarySystem;
use crate::systems::bullet::BulletSystem;
use crate::systems::collision::CollisionSystem;
use crate::systems::death::DeathSystem;
use crate::systems::firing::FiringSystem;
use crate::systems::game_state::GameStateSystem;
use crate::systems::movement::{self, MovementSystem};
use crate::systems::player_control::PlayerControlSystem;
use crate::systems::status_effect::StatusEffectSystem;
use crate::world::World;
use crate::world_setup::{spawn_bullet, spawn_enemy, spawn_platform, spawn_player};

const DT: f32 = 1.0 / 60.0;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn body(x: f32, y: f32) -> (Position, Velocity, Collider, Health) {
    (
        Position::new(x, y),
        Velocity::default(),
        Collider::new(30.0, 100.0, 0.0, 0.0),
        Health::full(100.0),
    )
}

fn bullet(x: f32, y: f32, team: u32, damage: f32) -> (Position, Trigger, Bullet, Team, Lifetime) {
    (
        Position::new(x, y),
        Trigger::new(BULLET_SIZE, BULLET_SIZE, 0.0, 0.0),
        Bullet::new(damage),
        Team::new(team),
        Lifetime::new(BULLET_LIFETIME_SECS),
    )
}

fn count_with(world: &World, kind: ComponentKind) -> usize {
    world.get_entities_with_components(&[kind]).len()
}

/// Run a system that the test keeps ownership of, then finish the frame.
fn step(world: &mut World, system: &mut dyn System, delta: f32) {
    let entities = world.get_entities_with_components(system.required_components());
    system.update(world, &entities, delta);
    world.update(delta);
}

/// Records every frame in which it runs and what it saw.
struct Recorder {
    name: &'static str,
    priority: i32,
    log: Arc<Mutex<Vec<(&'static str, Vec<EntityId>)>>>,
}

impl System for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn required_components(&self) -> &'static [ComponentKind] {
        &[ComponentKind::Position]
    }

    fn update(&mut self, _world: &mut World, entities: &[EntityId], _delta: f32) {
        if let Ok(mut log) = self.log.lock() {
            log.push((self.name, entities.to_vec()));
        }
    }
}

fn recorder(
    name: &'static str,
    priority: i32,
    log: &Arc<Mutex<Vec<(&'static str, Vec<EntityId>)>>>,
) -> Box<dyn System> {
    Box::new(Recorder {
        name,
        priority,
        log: Arc::clone(log),
    })
}

// ---- World ----

#[test]
fn test_entity_ids_increase_in_insertion_order() {
    let mut world = World::default();
    let a = world.add_entity((Position::new(0.0, 0.0),));
    let b = world.add_entity((Position::new(1.0, 0.0),));
    let c = world.add_entity((Velocity::default(),));
    assert!(a < b && b < c);
    assert_eq!(world.entities(), &[a, b, c]);
}

#[test]
fn test_component_access() {
    let mut world = World::default();
    let id = world.add_entity((Position::new(3.0, 4.0), Team::new(2)));

    assert_eq!(world.read::<Position>(id), Some(Position::new(3.0, 4.0)));
    assert!(world.has::<Team>(id));
    assert!(!world.has::<Velocity>(id));
    assert!(world.get::<Velocity>(id).is_none());

    world.get_mut::<Position>(id).unwrap().x = 10.0;
    assert_eq!(world.read::<Position>(id).unwrap().x, 10.0);

    assert!(world.get::<Position>(EntityId(999)).is_none());
}

#[test]
fn test_replacing_component_detaches_old_one() {
    let mut world = World::default();
    let id = world.add_entity((Position::new(0.0, 0.0),));
    world.add_component(id, Velocity::new(1.0, 0.0));
    assert!(world.take_detached().is_empty());

    world.add_component(id, Velocity::new(2.0, 0.0));
    assert_eq!(world.take_detached(), vec![(id, ComponentKind::Velocity)]);
    assert_eq!(world.read::<Velocity>(id).unwrap().x, 2.0);

    assert!(world.remove_component::<Velocity>(id).is_some());
    assert!(!world.has::<Velocity>(id));
    assert_eq!(world.take_detached(), vec![(id, ComponentKind::Velocity)]);
}

#[test]
fn test_matching_requires_every_kind() {
    let mut world = World::default();
    let both = world.add_entity((Position::new(0.0, 0.0), Velocity::default()));
    let _pos_only = world.add_entity((Position::new(0.0, 0.0),));
    let matched =
        world.get_entities_with_components(&[ComponentKind::Position, ComponentKind::Velocity]);
    assert_eq!(matched, vec![both]);
    assert_eq!(world.get_entities_with_components(&[]).len(), 2);
}

#[test]
fn test_remove_entity_is_immediate_and_detaches_all() {
    let mut world = World::default();
    let id = world.add_entity((Position::new(0.0, 0.0), Team::new(1)));
    assert!(world.remove_entity(id));
    assert!(!world.contains(id));
    assert!(world.entities().is_empty());

    let mut detached = world.take_detached();
    detached.sort_by_key(|(_, kind)| *kind);
    assert_eq!(
        detached,
        vec![(id, ComponentKind::Position), (id, ComponentKind::Team)]
    );
    assert!(world.events().contains(&GameEvent::Removed { entity: id }));
    assert!(!world.remove_entity(id), "second removal is a no-op");
}

#[test]
fn test_destroyed_entity_visible_until_frame_end() {
    let mut world = World::default();
    let id = world.add_entity((Position::new(0.0, 0.0),));
    world.destroy(id);

    assert!(world.contains(id));
    assert!(world.get::<Position>(id).is_some(), "still readable mid-frame");
    assert!(world
        .get_entities_with_components(&[ComponentKind::Position])
        .is_empty());

    world.update(DT);
    assert!(!world.contains(id));
}

#[test]
fn test_systems_run_in_priority_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut world = World::default();
    world.add_system(recorder("late", 50, &log));
    world.add_system(recorder("early", -5, &log));
    world.add_system(recorder("mid_a", 10, &log));
    world.add_system(recorder("mid_b", 10, &log));
    assert_eq!(world.system_names(), vec!["early", "mid_a", "mid_b", "late"]);

    world.update(DT);
    let order: Vec<&str> = log.lock().unwrap().iter().map(|(n, _)| *n).collect();
    assert_eq!(order, vec!["early", "mid_a", "mid_b", "late"]);
}

#[test]
fn test_remove_system() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut world = World::default();
    world.add_system(recorder("a", 0, &log));
    world.add_system(recorder("b", 1, &log));
    assert!(world.remove_system("a"));
    assert!(!world.remove_system("a"));
    world.update(DT);
    let order: Vec<&str> = log.lock().unwrap().iter().map(|(n, _)| *n).collect();
    assert_eq!(order, vec!["b"]);
}

struct Remover {
    targets: &'static [&'static str],
    results: Arc<Mutex<Vec<bool>>>,
}

impl System for Remover {
    fn name(&self) -> &'static str {
        "remover"
    }

    fn update(&mut self, world: &mut World, _entities: &[EntityId], _delta: f32) {
        let results: Vec<bool> = self.targets.iter().map(|n| world.remove_system(n)).collect();
        if let Ok(mut log) = self.results.lock() {
            log.extend(results);
        }
    }
}

#[test]
fn test_remove_system_mid_frame_reports_unknown_names() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let results = Arc::new(Mutex::new(Vec::new()));
    let mut world = World::default();
    world.add_system(Box::new(Remover {
        targets: &["missing", "victim", "victim"],
        results: Arc::clone(&results),
    }));
    world.add_system(recorder("victim", 10, &log));
    world.add_system(recorder("other", 20, &log));

    world.update(DT);
    assert_eq!(*results.lock().unwrap(), vec![false, true, false]);
    let order: Vec<&str> = log.lock().unwrap().iter().map(|(n, _)| *n).collect();
    assert_eq!(order, vec!["victim", "other"], "removal waits for frame end");
    assert_eq!(world.system_names(), vec!["remover", "other"]);
}

struct Spawner;

impl System for Spawner {
    fn name(&self) -> &'static str {
        "spawner"
    }

    fn update(&mut self, world: &mut World, _entities: &[EntityId], _delta: f32) {
        world.add_entity((Position::new(0.0, 0.0),));
    }
}

#[test]
fn test_entities_spawned_mid_frame_reach_later_systems() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut world = World::default();
    world.add_system(Box::new(Spawner));
    world.add_system(recorder("after", 10, &log));
    world.update(DT);
    assert_eq!(log.lock().unwrap()[0].1.len(), 1);
}

struct Destroyer {
    target: EntityId,
    still_readable: Arc<Mutex<bool>>,
}

impl System for Destroyer {
    fn name(&self) -> &'static str {
        "destroyer"
    }

    fn update(&mut self, world: &mut World, _entities: &[EntityId], _delta: f32) {
        world.destroy(self.target);
        if let Ok(mut flag) = self.still_readable.lock() {
            *flag = world.get::<Position>(self.target).is_some();
        }
    }
}

#[test]
fn test_entities_destroyed_mid_frame_skip_later_systems() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let readable = Arc::new(Mutex::new(false));
    let mut world = World::default();
    let doomed = world.add_entity((Position::new(0.0, 0.0),));
    let keeper = world.add_entity((Position::new(0.0, 0.0),));
    world.add_system(Box::new(Destroyer {
        target: doomed,
        still_readable: Arc::clone(&readable),
    }));
    world.add_system(recorder("after", 10, &log));

    world.update(DT);
    assert!(*readable.lock().unwrap());
    assert_eq!(log.lock().unwrap()[0].1, vec![keeper]);
    assert!(!world.contains(doomed));
}

struct Installer {
    log: Arc<Mutex<Vec<(&'static str, Vec<EntityId>)>>>,
    installed: bool,
}

impl System for Installer {
    fn name(&self) -> &'static str {
        "installer"
    }

    fn update(&mut self, world: &mut World, _entities: &[EntityId], _delta: f32) {
        if !self.installed {
            self.installed = true;
            world.add_system(recorder("added", 100, &self.log));
        }
    }
}

#[test]
fn test_system_added_mid_frame_runs_next_frame() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut world = World::default();
    world.add_system(Box::new(Installer {
        log: Arc::clone(&log),
        installed: false,
    }));

    world.update(DT);
    assert!(log.lock().unwrap().is_empty());
    world.update(DT);
    assert_eq!(log.lock().unwrap().len(), 1);
    assert_eq!(world.system_names(), vec!["installer", "added"]);
}

#[test]
fn test_clock_advances_per_frame() {
    let mut world = World::default();
    for _ in 0..30 {
        world.update(DT);
    }
    assert_eq!(world.time().frame, 30);
    assert!((world.now() - 0.5).abs() < 1e-4);
}

// ---- Movement ----

#[test]
fn test_position_integrates_velocity() {
    let mut pos = Position::new(0.0, 0.0);
    let mut vel = Velocity::new(100.0, -50.0);
    movement::integrate(&mut pos, &mut vel, GRAVITY, 0.5);
    assert_eq!(pos, Position::new(50.0, -25.0));
    assert_eq!(vel.y, -50.0, "no gravity unless enabled");
}

#[test]
fn test_gravity_only_while_airborne() {
    let mut pos = Position::new(0.0, 0.0);
    let mut vel = Velocity {
        affected_by_gravity: true,
        ..Velocity::default()
    };
    movement::integrate(&mut pos, &mut vel, GRAVITY, 0.5);
    assert_eq!(vel.y, 400.0);

    vel.on_ground = true;
    vel.y = 0.0;
    movement::integrate(&mut pos, &mut vel, GRAVITY, 0.5);
    assert_eq!(vel.y, 0.0);
}

#[test]
fn test_bounce_reflects_and_clamps() {
    let mut world = World::default();
    world.set_bounds(arena_core::types::Bounds::new(0.0, 100.0, 0.0, 100.0));
    world.add_system(Box::new(MovementSystem));
    let id = world.add_entity((
        Position::new(95.0, 5.0),
        Velocity {
            x: 600.0,
            y: -600.0,
            bounce: true,
            ..Velocity::default()
        },
    ));
    world.update(DT);

    let pos = world.read::<Position>(id).unwrap();
    let vel = world.read::<Velocity>(id).unwrap();
    assert_eq!((pos.x, pos.y), (100.0, 0.0));
    assert_eq!((vel.x, vel.y), (-600.0, 600.0));
}

// ---- Collision: solid bodies ----

#[test]
fn test_scenario_solid_bodies_push_apart_and_hurt_once() {
    let mut world = World::default();
    world.add_system(Box::new(CollisionSystem));
    let a = world.add_entity(body(0.0, 0.0));
    let b = world.add_entity(body(20.0, 0.0));

    world.update(DT);
    assert_eq!(world.read::<Position>(a).unwrap().x, -10.0);
    assert_eq!(world.read::<Position>(b).unwrap().x, 20.0);
    assert_eq!(world.get::<Health>(a).unwrap().current, 95.0);
    assert_eq!(world.get::<Health>(b).unwrap().current, 95.0);
    assert_eq!(world.get::<Health>(a).unwrap().last_damage_source, Some(b));
    assert!(world.read::<Collider>(a).unwrap().is_on_collide);

    // Overlap again inside the hit cooldown.
    world.get_mut::<Position>(a).unwrap().x = 0.0;
    world.update(DT);
    assert_eq!(world.read::<Position>(a).unwrap().x, -10.0);
    assert_eq!(world.get::<Health>(a).unwrap().current, 95.0);
    assert_eq!(world.get::<Health>(b).unwrap().current, 95.0);
}

#[test]
fn test_push_out_leaves_no_overlap() {
    let mut world = World::default();
    world.add_system(Box::new(CollisionSystem));
    let wall = spawn_platform(&mut world, 0.0, 0.0, 100.0, 400.0);
    let mover = world.add_entity((
        Position::new(45.0, -20.0),
        Velocity::new(50.0, 0.0),
        Collider::new(30.0, 60.0, 0.0, 0.0),
    ));
    world.update(DT);

    let a = world
        .read::<Collider>(mover)
        .unwrap()
        .aabb(&world.read::<Position>(mover).unwrap());
    let b = world
        .read::<Collider>(wall)
        .unwrap()
        .aabb(&world.read::<Position>(wall).unwrap());
    assert!(!a.intersects(&b));
    assert_eq!(a.x, b.right(), "pushed out along x, the shallow axis");
    assert_eq!(world.read::<Velocity>(mover).unwrap().x, 50.0, "moving away is kept");
}

#[test]
fn test_landing_sets_ground_state() {
    let mut world = World::default();
    world.add_system(Box::new(CollisionSystem));
    spawn_platform(&mut world, 0.0, 350.0, 1000.0, 100.0);
    let player = spawn_player(&mut world, 0.0, 205.0);
    {
        let vel = world.get_mut::<Velocity>(player).unwrap();
        vel.on_ground = false;
        vel.affected_by_gravity = true;
        vel.y = 300.0;
    }
    world.get_mut::<CharacterAnimator>(player).unwrap().set_state(AnimationState::Jump);

    world.update(DT);
    let vel = world.read::<Velocity>(player).unwrap();
    assert!(vel.on_ground);
    assert!(!vel.affected_by_gravity);
    assert!(vel.y <= 0.0);
    assert_eq!(world.read::<Position>(player).unwrap().y, 200.0);
    assert_eq!(
        world.read::<CharacterAnimator>(player).unwrap().state(),
        AnimationState::Idle
    );
}

#[test]
fn test_ceiling_hit_stops_upward_motion() {
    let mut world = World::default();
    world.add_system(Box::new(CollisionSystem));
    spawn_platform(&mut world, 0.0, 0.0, 1000.0, 20.0);
    let id = world.add_entity((
        Position::new(0.0, 5.0),
        Velocity::new(0.0, -400.0),
        Collider::new(30.0, 100.0, 0.0, 0.0),
    ));
    world.update(DT);
    assert_eq!(world.read::<Position>(id).unwrap().y, 10.0);
    assert_eq!(world.read::<Velocity>(id).unwrap().y, 0.0);
}

#[test]
fn test_trigger_colliders_overlap_without_push() {
    let mut world = World::default();
    world.add_system(Box::new(CollisionSystem));
    let sensor = Collider {
        is_trigger: true,
        ..Collider::new(30.0, 100.0, 0.0, 0.0)
    };
    let a = world.add_entity((Position::new(0.0, 0.0), Velocity::default(), sensor));
    world.add_entity((Position::new(20.0, 0.0), Collider::new(30.0, 100.0, 0.0, 0.0)));
    world.update(DT);
    assert_eq!(world.read::<Position>(a).unwrap().x, 0.0);
    assert!(world.read::<Collider>(a).unwrap().is_on_collide);
}

#[test]
fn test_contact_damage_can_kill() {
    let mut world = World::default();
    world.add_system(Box::new(CollisionSystem));
    let (pos, vel, collider, _) = body(0.0, 0.0);
    let frail = world.add_entity((pos, vel, collider, Health::new(3.0, 100.0)));
    world.add_entity(body(20.0, 0.0));
    world.update(DT);
    assert!(!world.contains(frail), "no animator, removed at frame end");
}

// ---- Collision: projectiles ----

#[test]
fn test_scenario_bullet_kills_and_corpse_is_removed_later() {
    let mut world = World::default();
    world.add_system(Box::new(CollisionSystem));
    world.add_system(Box::new(DeathSystem));
    let target = spawn_enemy(&mut world, 0.0, -50.0);
    world.get_mut::<Health>(target).unwrap().current = 10.0;
    let shot = world.add_entity(bullet(0.0, 0.0, PLAYER_TEAM, 20.0));

    world.update(DT);
    assert!(!world.contains(shot), "bullet consumed by the hit");
    assert_eq!(world.get::<Health>(target).unwrap().current, 0.0);
    assert_eq!(
        world.read::<CharacterAnimator>(target).unwrap().state(),
        AnimationState::Dead
    );
    assert!(world.has::<DeathTimer>(target));
    let vel = world.read::<Velocity>(target).unwrap();
    assert_eq!((vel.x, vel.y, vel.affected_by_gravity), (0.0, 0.0, false));

    for _ in 0..30 {
        world.update(DT);
    }
    assert!(world.contains(target), "still playing the death animation");

    for _ in 0..31 {
        world.update(DT);
    }
    assert!(!world.contains(target));
}

#[test]
fn test_same_team_bullet_passes_through() {
    let mut world = World::default();
    world.add_system(Box::new(CollisionSystem));
    let target = spawn_enemy(&mut world, 0.0, -50.0);
    let shot = world.add_entity(bullet(0.0, 0.0, ENEMY_TEAM, 20.0));
    world.update(DT);
    assert!(world.contains(shot));
    assert_eq!(world.get::<Health>(target).unwrap().current, 100.0);
}

#[test]
fn test_enemy_bullets_barely_hurt_the_player() {
    let mut world = World::default();
    world.add_system(Box::new(CollisionSystem));
    let player = spawn_player(&mut world, 0.0, -50.0);
    world.add_entity(bullet(0.0, 0.0, ENEMY_TEAM, 20.0));
    world.update(DT);
    assert!(approx(world.get::<Health>(player).unwrap().current, 99.9));
}

#[test]
fn test_bullet_applies_status_effect() {
    let mut world = World::default();
    world.add_system(Box::new(CollisionSystem));
    let target = spawn_enemy(&mut world, 0.0, -50.0);
    let (pos, trigger, _, team, lifetime) = bullet(0.0, 0.0, PLAYER_TEAM, 20.0);
    let payload =
        Bullet::new(20.0).with_status_effect(StatusEffect::new(DamageType::Poison, 3.0, 1.0, 2.0));
    world.add_entity((pos, trigger, payload, team, lifetime));

    world.update(DT);
    let health = world.get::<Health>(target).unwrap();
    assert_eq!(health.current, 90.0);
    assert_eq!(health.status_effects().len(), 1);
    assert_eq!(health.status_effects()[0].damage_type, DamageType::Poison);
    drop(health);
    assert!(world.events().contains(&GameEvent::StatusApplied {
        target,
        damage_type: DamageType::Poison,
        merged: false,
    }));
}

#[test]
fn test_bullet_stops_at_first_target() {
    let mut world = World::default();
    world.add_system(Box::new(CollisionSystem));
    let target = |x: f32| {
        (
            Position::new(x, -50.0),
            Trigger::new(CHARACTER_HITBOX_WIDTH, CHARACTER_BODY_HEIGHT, 0.0, 0.0),
            Team::new(ENEMY_TEAM),
            Health::full(100.0),
        )
    };
    let first = world.add_entity(target(0.0));
    let second = world.add_entity(target(2.0));
    world.add_entity(bullet(0.0, 0.0, PLAYER_TEAM, 20.0));
    world.update(DT);
    assert_eq!(world.get::<Health>(first).unwrap().current, 90.0);
    assert_eq!(world.get::<Health>(second).unwrap().current, 100.0);
}

#[test]
fn test_dying_target_still_stops_bullets() {
    let mut world = World::default();
    world.add_system(Box::new(CollisionSystem));
    let target = spawn_enemy(&mut world, 0.0, -50.0);
    begin_death_sequence(&mut world, target);
    let shot = world.add_entity(bullet(0.0, 0.0, PLAYER_TEAM, 20.0));

    world.update(DT);
    assert!(!world.contains(shot), "bullet consumed by the corpse");
    assert!(world.has::<DeathTimer>(target));
    let died = world
        .events()
        .iter()
        .filter(|e| matches!(e, GameEvent::Died { .. }))
        .count();
    assert_eq!(died, 1);
}

#[test]
fn test_contact_damage_reaches_dying_body() {
    let mut world = World::default();
    world.add_system(Box::new(CollisionSystem));
    let amount = world.config().combat.contact_damage;
    let walker = world.add_entity(body(0.0, 0.0));
    let (pos, _, collider, health) = body(20.0, 0.0);
    let dying = world.add_entity((pos, collider, health, DeathTimer::new(1.0)));

    world.update(DT);
    assert_eq!(world.get::<Health>(walker).unwrap().current, 100.0 - amount);
    assert_eq!(world.get::<Health>(dying).unwrap().current, 100.0 - amount);
}

// ---- Death ----

#[test]
fn test_death_sequence_is_idempotent() {
    let mut world = World::default();
    let id = spawn_enemy(&mut world, 0.0, 0.0);
    begin_death_sequence(&mut world, id);
    world.get_mut::<DeathTimer>(id).unwrap().remaining_secs = 0.25;
    begin_death_sequence(&mut world, id);

    assert_eq!(world.read::<DeathTimer>(id).unwrap().remaining_secs, 0.25);
    let died = world
        .events()
        .iter()
        .filter(|e| matches!(e, GameEvent::Died { .. }))
        .count();
    assert_eq!(died, 1);
}

#[test]
fn test_death_without_animator_is_immediate() {
    let mut world = World::default();
    let id = world.add_entity((Position::new(0.0, 0.0), Health::full(10.0)));
    begin_death_sequence(&mut world, id);
    assert!(!world.is_active(id));
    world.update(DT);
    assert!(!world.contains(id));
}

#[test]
fn test_status_effect_can_kill() {
    let mut world = World::default();
    world.add_system(Box::new(StatusEffectSystem));
    let id = world.add_entity((Position::new(0.0, 0.0), Health::new(2.0, 100.0)));
    world
        .get_mut::<Health>(id)
        .unwrap()
        .add_status_effect(StatusEffect::new(DamageType::Fire, 5.0, 0.1, 5.0), 0.0);

    for _ in 0..10 {
        world.update(DT);
    }
    assert!(!world.contains(id));
    assert!(world.events().contains(&GameEvent::Died { entity: id }));
}

// ---- Bullet lifetime and boundary ----

#[test]
fn test_out_of_bounds_bullet_removed_same_frame() {
    let mut world = World::default();
    world.add_system(Box::new(BulletSystem));
    let far = world.add_entity(bullet(PLAYFIELD_WIDTH + BULLET_CULL_MARGIN + 1.0, 0.0, 1, 20.0));
    let near = world.add_entity(bullet(PLAYFIELD_WIDTH, 0.0, 1, 20.0));
    world.update(DT);
    assert!(!world.contains(far));
    assert!(world.contains(near));
}

#[test]
fn test_lifetime_expiry() {
    let mut world = World::default();
    world.add_system(Box::new(BulletSystem));
    let id = world.add_entity((Position::new(0.0, 0.0), Lifetime::new(0.05)));
    world.update(DT);
    world.update(DT);
    assert!(world.contains(id));
    world.update(DT);
    assert!(!world.contains(id));
}

#[test]
fn test_teamless_lifetime_entity_is_not_culled() {
    let mut world = World::default();
    world.add_system(Box::new(BulletSystem));
    let id = world.add_entity((Position::new(1e6, 0.0), Lifetime::new(1.0)));
    world.update(DT);
    assert!(world.contains(id));
}

#[test]
fn test_falling_below_playfield_kills() {
    let mut world = World::default();
    world.add_system(Box::new(BoundarySystem));
    let floor = PLAYFIELD_HEIGHT + FALL_DEATH_MARGIN;
    let rock = world.add_entity((Position::new(0.0, floor + 1.0),));
    let enemy = spawn_enemy(&mut world, 0.0, floor + 1.0);
    let safe = world.add_entity((Position::new(0.0, floor),));

    world.update(DT);
    assert!(!world.contains(rock));
    assert!(world.contains(safe));
    assert!(world.has::<DeathTimer>(enemy));
}

// ---- AI ----

#[test]
fn test_scenario_patrol_turns_at_waypoint() {
    let mut world = World::default();
    world.add_system(Box::new(AiSystem));
    let id = spawn_enemy(&mut world, 100.0, 0.0);
    {
        let ai = world.get_mut::<AiController>(id).unwrap();
        ai.patrol_points = vec![Vec2::new(100.0, 0.0), Vec2::new(300.0, 0.0)];
    }
    world.update(DT);

    let ai = world.get::<AiController>(id).unwrap();
    assert_eq!(ai.state, AiState::Patrol);
    assert_eq!(ai.current_patrol_index, 1);
    assert!(ai.is_moving);
    drop(ai);
    assert_eq!(world.read::<Velocity>(id).unwrap().x, 0.0);

    world.update(DT);
    assert_eq!(world.read::<Velocity>(id).unwrap().x, AI_MOVE_SPEED);
}

#[test]
fn test_ai_seeks_and_attacks_by_distance() {
    let mut world = World::default();
    world.add_system(Box::new(AiSystem));
    let enemy = spawn_enemy(&mut world, 0.0, 0.0);
    let player = spawn_player(&mut world, 250.0, 0.0);

    world.update(DT);
    assert_eq!(world.get::<AiController>(enemy).unwrap().state, AiState::Seek);
    assert_eq!(world.get::<AiController>(enemy).unwrap().target, Some(player));
    assert_eq!(world.read::<Velocity>(enemy).unwrap().x, AI_MOVE_SPEED);

    world.get_mut::<Position>(player).unwrap().x = 100.0;
    for _ in 0..40 {
        world.update(DT);
    }
    assert_eq!(world.get::<AiController>(enemy).unwrap().state, AiState::Attack);
    assert_eq!(world.read::<Velocity>(enemy).unwrap().x, 0.0);
}

#[test]
fn test_ai_retreats_when_hurt() {
    let mut world = World::default();
    world.add_system(Box::new(AiSystem));
    let enemy = spawn_enemy(&mut world, 0.0, 0.0);
    let player = spawn_player(&mut world, -100.0, 0.0);
    world.get_mut::<Health>(enemy).unwrap().current = 20.0;

    world.update(DT);
    let ai = world.get::<AiController>(enemy).unwrap();
    assert_eq!(ai.state, AiState::Retreat);
    assert_eq!(ai.target, Some(player));
    drop(ai);
    assert_eq!(world.read::<Velocity>(enemy).unwrap().x, AI_MOVE_SPEED, "away from the player");
}

#[test]
fn test_ai_with_stale_target_falls_back_to_patrol() {
    let mut world = World::default();
    world.add_system(Box::new(AiSystem));
    let enemy = spawn_enemy(&mut world, 0.0, 0.0);
    {
        let ai = world.get_mut::<AiController>(enemy).unwrap();
        ai.state = AiState::Seek;
        ai.target = Some(EntityId(999));
    }
    world.update(DT);
    assert_eq!(world.get::<AiController>(enemy).unwrap().state, AiState::Patrol);
    assert_eq!(world.read::<Velocity>(enemy).unwrap().x, 0.0);
}

#[test]
fn test_dying_ai_does_nothing() {
    let mut world = World::default();
    world.add_system(Box::new(AiSystem));
    let enemy = spawn_enemy(&mut world, 0.0, 0.0);
    spawn_player(&mut world, 100.0, 0.0);
    begin_death_sequence(&mut world, enemy);
    world.update(DT);
    assert_eq!(world.get::<AiController>(enemy).unwrap().state, AiState::Patrol);
}

// ---- Firing ----

#[test]
fn test_scenario_player_shot_spawns_after_delay() {
    let mut world = World::default();
    let player = spawn_player(&mut world, 0.0, 0.0);
    world.input_mut().mouse_down = Some(Vec2::new(500.0, 70.0));
    let mut firing = FiringSystem::new(1);
    let dt = 0.05;

    step(&mut world, &mut firing, dt);
    assert!(approx(firing.cooldown(player), FIRE_RATE_SECS));
    assert!(firing.pending_shot(player).is_some());
    assert_eq!(
        world.read::<CharacterAnimator>(player).unwrap().state(),
        AnimationState::Shoot
    );
    assert_eq!(count_with(&world, ComponentKind::Bullet), 0);

    step(&mut world, &mut firing, dt);
    step(&mut world, &mut firing, dt);
    assert_eq!(count_with(&world, ComponentKind::Bullet), 0);

    step(&mut world, &mut firing, dt);
    let bullets = world.get_entities_with_components(&[ComponentKind::Bullet]);
    assert_eq!(bullets.len(), 1, "exactly one bullet after the fire delay");
    let shot = bullets[0];
    assert_eq!(world.read::<Position>(shot).unwrap(), Position::new(40.0, 70.0));
    let vel = world.read::<Velocity>(shot).unwrap();
    assert!(approx(vel.x, BULLET_SPEED) && approx(vel.y, 0.0));
    assert_eq!(world.read::<Team>(shot).unwrap().id, PLAYER_TEAM);
    assert_eq!(world.read::<Projectile>(shot).unwrap().source, player);
    assert!(world
        .events()
        .contains(&GameEvent::BulletFired { shooter: player, bullet: shot }));

    // Still on cooldown with the button held.
    step(&mut world, &mut firing, dt);
    assert_eq!(count_with(&world, ComponentKind::Bullet), 1);
    assert!(firing.pending_shot(player).is_none());
}

#[test]
fn test_shoot_animation_returns_to_idle() {
    let mut world = World::default();
    let player = spawn_player(&mut world, 0.0, 0.0);
    world.input_mut().mouse_down = Some(Vec2::new(500.0, 70.0));
    let mut firing = FiringSystem::new(1);
    step(&mut world, &mut firing, 0.05);
    world.input_mut().mouse_down = None;
    for _ in 0..6 {
        step(&mut world, &mut firing, 0.05);
    }
    assert_eq!(
        world.read::<CharacterAnimator>(player).unwrap().state(),
        AnimationState::Idle
    );
}

#[test]
fn test_no_shot_without_fire_button() {
    let mut world = World::default();
    let player = spawn_player(&mut world, 0.0, 0.0);
    let mut firing = FiringSystem::new(1);
    for _ in 0..20 {
        step(&mut world, &mut firing, DT);
    }
    assert_eq!(firing.cooldown(player), 0.0);
    assert_eq!(count_with(&world, ComponentKind::Bullet), 0);
}

#[test]
fn test_ai_fires_at_nearest_enemy_and_turns() {
    let mut config = ArenaConfig::default();
    config.firing.ai_fire_chance = 1.0;
    let mut world = World::new(config);
    let enemy = spawn_enemy(&mut world, 0.0, 0.0);
    spawn_player(&mut world, -300.0, 0.0);
    spawn_player(&mut world, 900.0, 0.0);
    let mut firing = FiringSystem::new(7);

    step(&mut world, &mut firing, DT);
    assert_eq!(world.read::<Gun>(enemy).unwrap().facing, Facing::Left);
    let shot = firing.pending_shot(enemy).expect("enemy should have fired");
    assert_eq!(shot.origin, Vec2::new(-40.0, 70.0));
    let spread = AI_SPREAD_ANGLE / 2.0;
    let toward = (-70.0f32).atan2(-260.0);
    let diff = (shot.angle - toward).abs();
    assert!(diff <= spread + 1e-4, "aim {} outside spread of {}", shot.angle, toward);
}

#[test]
fn test_unvalidated_fire_chance_is_clamped() {
    for (chance, fires) in [(7.0, true), (-1.0, false), (f64::NAN, false)] {
        let mut config = ArenaConfig::default();
        config.firing.ai_fire_chance = chance;
        let mut world = World::new(config);
        let enemy = spawn_enemy(&mut world, 0.0, 0.0);
        spawn_player(&mut world, -300.0, 0.0);
        let mut firing = FiringSystem::new(7);

        step(&mut world, &mut firing, DT);
        assert_eq!(firing.pending_shot(enemy).is_some(), fires, "chance {chance}");
    }
}

#[test]
fn test_shot_without_animator_still_spawns() {
    let mut world = World::default();
    let shooter = world.add_entity((
        Position::new(0.0, 0.0),
        Gun::new(10.0, 0.0),
        Team::new(PLAYER_TEAM),
        PlayerControlled,
    ));
    world.input_mut().mouse_down = Some(Vec2::new(100.0, 0.0));
    let mut firing = FiringSystem::new(1);
    for _ in 0..5 {
        step(&mut world, &mut firing, 0.05);
    }
    assert_eq!(count_with(&world, ComponentKind::Bullet), 1);
    assert!(firing.cooldown(shooter) > 0.0);
}

#[test]
fn test_spawn_bullet_needs_team() {
    let mut world = World::default();
    let shooter = world.add_entity((Position::new(0.0, 0.0),));
    assert!(spawn_bullet(&mut world, shooter, Vec2::ZERO, Vec2::X).is_none());
    assert_eq!(count_with(&world, ComponentKind::Bullet), 0);
}

// ---- Player control ----

#[test]
fn test_player_moves_and_faces() {
    let mut world = World::default();
    world.add_system(Box::new(PlayerControlSystem));
    let player = spawn_player(&mut world, 0.0, 0.0);
    world.get_mut::<Collider>(player).unwrap().is_on_collide = true;

    world.input_mut().press(KeyCode::KeyA);
    world.update(DT);
    assert_eq!(world.read::<Velocity>(player).unwrap().x, -PLAYER_MOVE_SPEED);
    assert_eq!(world.read::<Gun>(player).unwrap().facing, Facing::Left);
    assert_eq!(
        world.read::<CharacterAnimator>(player).unwrap().state(),
        AnimationState::Run
    );

    world.input_mut().release(KeyCode::KeyA);
    world.input_mut().press(KeyCode::ArrowRight);
    world.update(DT);
    assert_eq!(world.read::<Velocity>(player).unwrap().x, PLAYER_MOVE_SPEED);
    assert_eq!(world.read::<Gun>(player).unwrap().facing, Facing::Right);

    world.input_mut().clear();
    world.update(DT);
    assert_eq!(world.read::<Velocity>(player).unwrap().x, 0.0);
    assert_eq!(
        world.read::<CharacterAnimator>(player).unwrap().state(),
        AnimationState::Idle
    );
}

#[test]
fn test_player_jumps_from_ground() {
    let mut world = World::default();
    world.add_system(Box::new(PlayerControlSystem));
    let player = spawn_player(&mut world, 0.0, 0.0);
    world.get_mut::<Collider>(player).unwrap().is_on_collide = true;
    world.input_mut().press(KeyCode::Space);
    world.update(DT);

    let vel = world.read::<Velocity>(player).unwrap();
    assert_eq!(vel.y, -PLAYER_JUMP_FORCE);
    assert!(!vel.on_ground);
    assert!(vel.affected_by_gravity);
    assert_eq!(
        world.read::<CharacterAnimator>(player).unwrap().state(),
        AnimationState::Jump
    );
}

#[test]
fn test_player_leaves_ground_without_support() {
    let mut world = World::default();
    world.add_system(Box::new(PlayerControlSystem));
    let player = spawn_player(&mut world, 0.0, 0.0);
    world.update(DT);
    let vel = world.read::<Velocity>(player).unwrap();
    assert!(!vel.on_ground);
    assert!(vel.affected_by_gravity);
}

#[test]
fn test_character_settles_on_platform() {
    let mut world = World::default();
    world.add_system(Box::new(PlayerControlSystem));
    world.add_system(Box::new(MovementSystem));
    world.add_system(Box::new(CollisionSystem));
    spawn_platform(&mut world, 0.0, 350.0, 1000.0, 100.0);
    let player = spawn_player(&mut world, 0.0, 100.0);

    for _ in 0..120 {
        world.update(DT);
    }
    assert!(approx(world.read::<Position>(player).unwrap().y, 200.0));
    assert!(world.read::<Velocity>(player).unwrap().y.abs() < GRAVITY * DT * 2.0);
}

// ---- Game state ----

#[test]
fn test_victory_when_no_enemy_left() {
    let mut world = World::default();
    world.add_system(Box::new(GameStateSystem));
    spawn_player(&mut world, 0.0, 0.0);
    world.update(DT);
    assert_eq!(world.phase(), GamePhase::Victory);
    assert!(world.events().contains(&GameEvent::PhaseChanged {
        from: GamePhase::Playing,
        to: GamePhase::Victory,
    }));
}

#[test]
fn test_game_over_without_player() {
    let mut world = World::default();
    world.add_system(Box::new(GameStateSystem));
    spawn_enemy(&mut world, 0.0, 0.0);
    world.update(DT);
    assert_eq!(world.phase(), GamePhase::GameOver);
}

#[test]
fn test_player_bullets_do_not_count_as_enemies() {
    let mut world = World::default();
    world.add_system(Box::new(GameStateSystem));
    let player = spawn_player(&mut world, 0.0, 0.0);
    spawn_bullet(&mut world, player, Vec2::ZERO, Vec2::X);
    world.update(DT);
    assert_eq!(world.phase(), GamePhase::Victory);
}

#[test]
fn test_match_clock_runs_out() {
    let mut config = ArenaConfig::default();
    config.world.match_duration_secs = 1.0;
    let mut world = World::new(config);
    world.add_system(Box::new(GameStateSystem));
    spawn_player(&mut world, 0.0, 0.0);
    spawn_enemy(&mut world, 500.0, 0.0);

    for _ in 0..30 {
        world.update(DT);
    }
    assert_eq!(world.phase(), GamePhase::Playing);
    for _ in 0..31 {
        world.update(DT);
    }
    assert_eq!(world.phase(), GamePhase::GameOver);
}

// ---- Engine ----

#[test]
fn test_default_arena_contents() {
    let engine = ArenaEngine::new(ArenaConfig::default()).unwrap();
    let world = engine.world();
    assert_eq!(count_with(world, ComponentKind::PlayerControlled), 1);
    assert_eq!(count_with(world, ComponentKind::AiController), 3);
    assert!(engine.player().is_some());
    assert_eq!(world.system_names().len(), 10);
}

#[test]
fn test_pause_freezes_the_clock() {
    let mut engine = ArenaEngine::new(ArenaConfig::default()).unwrap();
    engine.tick(DT);
    let frame = engine.time().frame;

    engine.queue_command(PlayerCommand::Pause);
    let snap = engine.tick(DT);
    assert_eq!(snap.phase, GamePhase::Paused);
    engine.tick(DT);
    assert_eq!(engine.time().frame, frame);

    engine.queue_command(PlayerCommand::Resume);
    engine.tick(DT);
    assert_eq!(engine.phase(), GamePhase::Playing);
    assert_eq!(engine.time().frame, frame + 1);
}

#[test]
fn test_commands_reach_input_state() {
    let mut engine = ArenaEngine::empty(ArenaConfig::default()).unwrap();
    engine.queue_commands([
        PlayerCommand::KeyDown { key: KeyCode::KeyD },
        PlayerCommand::MouseDown { x: 5.0, y: 6.0 },
    ]);
    engine.tick(DT);
    assert!(engine.world().input().right());
    assert_eq!(engine.world().input().fire_target(), Some(Vec2::new(5.0, 6.0)));

    engine.queue_commands([PlayerCommand::KeyUp { key: KeyCode::KeyD }, PlayerCommand::MouseUp]);
    engine.tick(DT);
    assert!(!engine.world().input().right());
    assert_eq!(engine.world().input().fire_target(), None);
}

#[test]
fn test_snapshot_lists_entities() {
    let mut engine = ArenaEngine::new(ArenaConfig::default()).unwrap();
    let snap = engine.tick(DT);
    let player = engine.player().unwrap();
    let view = snap.entities.iter().find(|v| v.id == player).unwrap();
    assert!(view.player);
    assert_eq!(view.team, Some(PLAYER_TEAM));
    assert!(view.health.is_some_and(|h| h > 0.0));
    assert!(view.collider.is_some() && view.trigger.is_some());
    assert!(snap.match_time_remaining > 0.0);

    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.contains("\"phase\":\"Playing\""));
}

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = ArenaEngine::new(ArenaConfig::default()).unwrap();
    let mut engine_b = ArenaEngine::new(ArenaConfig::default()).unwrap();
    engine_a.queue_command(PlayerCommand::MouseDown { x: 300.0, y: 0.0 });
    engine_b.queue_command(PlayerCommand::MouseDown { x: 300.0, y: 0.0 });

    for _ in 0..300 {
        let json_a = serde_json::to_string(&engine_a.tick(DT)).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick(DT)).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_match_runs_without_panicking() {
    let mut config = ArenaConfig::default();
    config.world.enemy_count = 6;
    config.firing.ai_fire_chance = 0.5;
    let mut engine = ArenaEngine::new(config).unwrap();
    engine.queue_commands([
        PlayerCommand::KeyDown { key: KeyCode::KeyD },
        PlayerCommand::MouseDown { x: 600.0, y: 100.0 },
    ]);
    for _ in 0..(60 * 20) {
        engine.tick(DT);
    }
    assert!(engine.time().frame > 0);
}

#[test]
fn test_engine_rejects_invalid_config() {
    let mut config = ArenaConfig::default();
    config.firing.ai_fire_chance = 1.5;
    assert!(matches!(
        ArenaEngine::new(config.clone()),
        Err(ArenaError::InvalidConfig(_))
    ));
    assert!(matches!(
        ArenaEngine::empty(config),
        Err(ArenaError::InvalidConfig(_))
    ));
}

#[test]
fn test_tick_drains_detached_components() {
    let mut engine = ArenaEngine::empty(ArenaConfig::default()).unwrap();
    engine.world_mut().add_system(Box::new(BulletSystem));

    for _ in 0..500 {
        let id = engine
            .world_mut()
            .add_entity((Position::new(0.0, 0.0), Lifetime::new(0.0)));
        let snapshot = engine.tick(DT);
        let mut detached = snapshot.detached;
        detached.sort_by_key(|(_, kind)| *kind);
        assert_eq!(
            detached,
            vec![(id, ComponentKind::Position), (id, ComponentKind::Lifetime)]
        );
        assert!(engine.world_mut().take_detached().is_empty());
    }
}
