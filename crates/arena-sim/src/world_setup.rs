//! Entity spawn factories and the default arena.
//!
//! Creates characters, projectiles and platforms with their component bundles
//! via `hecs::EntityBuilder`, and registers the standard system set.

use glam::Vec2;
use hecs::EntityBuilder;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use arena_core::components::*;
use arena_core::constants::*;
use arena_core::events::GameEvent;
use arena_core::health::Health;
use arena_core::types::EntityId;

use crate::system::System;
use crate::systems::ai::AiSystem;
use crate::systems::boundary::BoundarySystem;
use crate::systems::bullet::BulletSystem;
use crate::systems::collision::CollisionSystem;
use crate::systems::death::DeathSystem;
use crate::systems::firing::FiringSystem;
use crate::systems::game_state::GameStateSystem;
use crate::systems::movement::MovementSystem;
use crate::systems::player_control::PlayerControlSystem;
use crate::systems::status_effect::StatusEffectSystem;
use crate::world::World;

/// Default platform layout as (centre x, centre y, width, height).
const PLATFORMS: [(f32, f32, f32, f32); 4] = [
    (0.0, 350.0, 2400.0, 100.0),
    (-450.0, 80.0, 320.0, 30.0),
    (450.0, 80.0, 320.0, 30.0),
    (0.0, -180.0, 360.0, 30.0),
];

/// The standard systems, seeded for the random decisions of the firing system.
pub fn default_systems(seed: u64) -> Vec<Box<dyn System>> {
    vec![
        Box::new(PlayerControlSystem),
        Box::new(MovementSystem),
        Box::new(StatusEffectSystem),
        Box::new(AiSystem),
        Box::new(CollisionSystem),
        Box::new(FiringSystem::new(seed)),
        Box::new(BulletSystem),
        Box::new(BoundarySystem),
        Box::new(DeathSystem),
        Box::new(GameStateSystem),
    ]
}

/// Register the standard systems, spawn the platform layout, the player and
/// `config.world.enemy_count` enemies at random positions above the floor.
pub fn setup_arena(world: &mut World, rng: &mut ChaCha8Rng) -> EntityId {
    let seed = world.config().world.seed;
    for system in default_systems(seed) {
        world.add_system(system);
    }

    for (x, y, width, height) in PLATFORMS {
        spawn_platform(world, x, y, width, height);
    }

    let player = spawn_player(
        world,
        rng.gen_range(-400.0..400.0),
        -rng.gen_range(200.0..600.0),
    );
    let enemy_count = world.config().world.enemy_count;
    for _ in 0..enemy_count {
        spawn_enemy(
            world,
            rng.gen_range(-600.0..600.0),
            -rng.gen_range(300.0..900.0),
        );
    }

    info!(%player, enemies = enemy_count, "arena ready");
    player
}

/// Components shared by every character: body, hitbox, gun, health, animator.
fn character(world: &World, x: f32, y: f32, team: u32) -> EntityBuilder {
    let combat = &world.config().combat;
    let mut health = Health::full(combat.character_max_health);
    health.damage_cooldown = combat.damage_cooldown_secs;

    let mut builder = EntityBuilder::new();
    builder
        .add(Position::new(x, y))
        .add(Velocity::grounded())
        .add(health)
        .add(Team::new(team))
        .add(CharacterAnimator::default())
        .add(Gun::new(GUN_OFFSET.0, GUN_OFFSET.1))
        .add(Trigger::new(
            CHARACTER_HITBOX_WIDTH,
            CHARACTER_BODY_HEIGHT,
            -2.0,
            -2.0,
        ))
        .add(Collider::new(
            CHARACTER_BODY_WIDTH,
            CHARACTER_BODY_HEIGHT,
            0.0,
            0.0,
        ));
    builder
}

/// Spawn the player character.
pub fn spawn_player(world: &mut World, x: f32, y: f32) -> EntityId {
    let mut builder = character(world, x, y, PLAYER_TEAM);
    builder.add(PlayerControlled);
    world.add_entity(builder.build())
}

/// Spawn an AI-driven enemy character.
pub fn spawn_enemy(world: &mut World, x: f32, y: f32) -> EntityId {
    let params = &world.config().ai;
    let ai = AiController {
        state_cooldown: params.state_cooldown_secs,
        retreat_threshold: params.retreat_threshold,
        seek_range: params.seek_range,
        attack_range: params.attack_range,
        move_interval: params.move_interval_secs,
        move_duration: params.move_duration_secs,
        ..AiController::default()
    };
    let mut builder = character(world, x, y, ENEMY_TEAM);
    builder.add(ai);
    world.add_entity(builder.build())
}

/// Spawn a projectile fired by `shooter`. It inherits the shooter's team;
/// a shooter without a team cannot fire.
pub fn spawn_bullet(
    world: &mut World,
    shooter: EntityId,
    origin: Vec2,
    velocity: Vec2,
) -> Option<EntityId> {
    let Some(team) = world.read::<Team>(shooter) else {
        warn!(%shooter, "shooter has no team, projectile dropped");
        return None;
    };
    let firing = &world.config().firing;

    let mut builder = EntityBuilder::new();
    builder
        .add(Position::new(origin.x, origin.y))
        .add(Velocity::new(velocity.x, velocity.y))
        .add(team)
        .add(Lifetime::new(firing.bullet_lifetime_secs))
        .add(Bullet::new(firing.bullet_damage))
        .add(Trigger::new(BULLET_SIZE, BULLET_SIZE, 0.0, 0.0))
        .add(Projectile { source: shooter });
    let bullet = world.add_entity(builder.build());
    world.emit(GameEvent::BulletFired { shooter, bullet });
    Some(bullet)
}

/// Spawn a static platform whose position is its centre.
pub fn spawn_platform(world: &mut World, x: f32, y: f32, width: f32, height: f32) -> EntityId {
    let mut builder = EntityBuilder::new();
    builder
        .add(Position::new(x, y))
        .add(Collider::centered(width, height));
    world.add_entity(builder.build())
}
