//! ECS components.
//!
//! Components are plain data structs. Game logic lives in systems; the only
//! exceptions are the small invariants a component has to enforce itself
//! (animator state locking, AABB derivation, the health model in `health.rs`).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::health::{Health, StatusEffect};
use crate::types::{Aabb, EntityId};

/// A component kind that can live in an entity's component bag.
///
/// `KIND` ties the Rust type to its [`ComponentKind`] tag so systems can declare
/// their requirements statically.
pub trait Component: Send + Sync + 'static {
    const KIND: ComponentKind;
}

macro_rules! component_kind {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(impl Component for $ty {
            const KIND: ComponentKind = ComponentKind::$kind;
        })*
    };
}

component_kind! {
    Position => Position,
    Velocity => Velocity,
    Collider => Collider,
    Trigger => Trigger,
    Health => Health,
    Team => Team,
    Bullet => Bullet,
    Projectile => Projectile,
    Lifetime => Lifetime,
    Gun => Gun,
    AiController => AiController,
    CharacterAnimator => CharacterAnimator,
    PlayerControlled => PlayerControlled,
    DeathTimer => DeathTimer,
}

/// World-space position. +y points down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        self.as_vec2().distance(other.as_vec2())
    }
}

/// Linear velocity plus ground-contact state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
    /// Resting on top of a solid body.
    pub on_ground: bool,
    /// Gravity accelerates this body while airborne.
    pub affected_by_gravity: bool,
    /// Reflect off the world bounds instead of leaving them.
    pub bounce: bool,
}

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// A character standing on the ground with gravity suspended.
    pub fn grounded() -> Self {
        Self {
            on_ground: true,
            ..Self::default()
        }
    }

    /// Stop all motion and suspend gravity.
    pub fn halt(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
        self.affected_by_gravity = false;
    }
}

/// Axis-aligned box relative to the entity position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    /// Overlaps are detected but never pushed apart.
    pub is_trigger: bool,
    /// Set by the collision system when this box overlapped anything last pass.
    pub is_on_collide: bool,
}

impl Collider {
    pub fn new(width: f32, height: f32, offset_x: f32, offset_y: f32) -> Self {
        Self {
            width,
            height,
            offset_x,
            offset_y,
            is_trigger: false,
            is_on_collide: false,
        }
    }

    /// A box centred on the entity position.
    pub fn centered(width: f32, height: f32) -> Self {
        Self::new(width, height, -width / 2.0, -height / 2.0)
    }

    pub fn aabb(&self, pos: &Position) -> Aabb {
        Aabb::new(
            pos.x + self.offset_x,
            pos.y + self.offset_y,
            self.width,
            self.height,
        )
    }
}

/// Hitbox used for projectile hits. It shares the collider shape but lives in
/// its own slot, so a character can carry a solid body and a hitbox at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Trigger(pub Collider);

impl Trigger {
    pub fn new(width: f32, height: f32, offset_x: f32, offset_y: f32) -> Self {
        Self(Collider {
            is_trigger: true,
            ..Collider::new(width, height, offset_x, offset_y)
        })
    }

    pub fn aabb(&self, pos: &Position) -> Aabb {
        self.0.aabb(pos)
    }
}

/// Faction membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
}

impl Team {
    pub fn new(id: u32) -> Self {
        Self { id }
    }
}

/// Payload delivered by a projectile on hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub damage: f32,
    pub damage_type: DamageType,
    pub status_effect: Option<StatusEffect>,
}

impl Bullet {
    pub fn new(damage: f32) -> Self {
        Self {
            damage,
            damage_type: DamageType::Physical,
            status_effect: None,
        }
    }

    pub fn with_status_effect(mut self, effect: StatusEffect) -> Self {
        self.damage_type = effect.damage_type;
        self.status_effect = Some(effect);
        self
    }
}

/// Back-reference from a projectile to the entity that fired it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projectile {
    pub source: EntityId,
}

/// Seconds left before the entity expires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lifetime {
    pub remaining_secs: f32,
}

impl Lifetime {
    pub fn new(remaining_secs: f32) -> Self {
        Self { remaining_secs }
    }
}

/// Weapon mount. The muzzle sits `offset_x` in front of the entity along its
/// facing and `offset_y` below its origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gun {
    pub offset_x: f32,
    pub offset_y: f32,
    pub facing: Facing,
}

impl Gun {
    pub fn new(offset_x: f32, offset_y: f32) -> Self {
        Self {
            offset_x,
            offset_y,
            facing: Facing::Right,
        }
    }

    /// Muzzle position in world space.
    pub fn muzzle(&self, pos: &Position) -> Vec2 {
        Vec2::new(
            pos.x + self.facing.sign() * self.offset_x.abs(),
            pos.y + self.offset_y,
        )
    }
}

impl Default for Gun {
    fn default() -> Self {
        Self::new(GUN_OFFSET.0, GUN_OFFSET.1)
    }
}

/// Finite-state AI brain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiController {
    pub state: AiState,
    /// Entity the current state is about. Resolved through the world each frame.
    pub target: Option<EntityId>,
    pub patrol_points: Vec<Vec2>,
    pub current_patrol_index: usize,
    /// Simulation time of the last accepted state change.
    pub last_state_change: Option<f64>,
    pub state_cooldown: f32,
    pub retreat_threshold: f32,
    pub seek_range: f32,
    pub attack_range: f32,
    /// Simulation time the current movement window (or idle period) started.
    pub last_move_time: Option<f64>,
    pub move_interval: f32,
    pub move_duration: f32,
    pub is_moving: bool,
}

impl Default for AiController {
    fn default() -> Self {
        Self {
            state: AiState::Patrol,
            target: None,
            patrol_points: Vec::new(),
            current_patrol_index: 0,
            last_state_change: None,
            state_cooldown: AI_STATE_COOLDOWN_SECS,
            retreat_threshold: AI_RETREAT_THRESHOLD,
            seek_range: AI_SEEK_RANGE,
            attack_range: AI_ATTACK_RANGE,
            last_move_time: None,
            move_interval: AI_MOVE_INTERVAL_SECS,
            move_duration: AI_MOVE_DURATION_SECS,
            is_moving: false,
        }
    }
}

/// Animation side-channel between gameplay and rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterAnimator {
    state: AnimationState,
}

impl CharacterAnimator {
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Switch animation. Returns `false` when nothing changed: the state was
    /// already current, or the character is dead.
    pub fn set_state(&mut self, state: AnimationState) -> bool {
        if self.state == AnimationState::Dead || self.state == state {
            return false;
        }
        self.state = state;
        true
    }

    pub fn is_dead(&self) -> bool {
        self.state == AnimationState::Dead
    }
}

/// Marks the entity driven by the input collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerControlled;

/// Pending removal after a death animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeathTimer {
    pub remaining_secs: f32,
}

impl DeathTimer {
    pub fn new(remaining_secs: f32) -> Self {
        Self { remaining_secs }
    }
}

impl Default for DeathTimer {
    fn default() -> Self {
        Self::new(DEATH_REMOVAL_DELAY_SECS)
    }
}
