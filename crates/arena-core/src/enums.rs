//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Closed set of component kinds an entity can carry.
///
/// Systems declare their requirements as a slice of kinds; the world answers
/// "does this entity hold every listed kind" without any string lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    Position,
    Velocity,
    Collider,
    Trigger,
    Health,
    Team,
    Bullet,
    Projectile,
    Lifetime,
    Gun,
    AiController,
    CharacterAnimator,
    PlayerControlled,
    DeathTimer,
}

impl ComponentKind {
    /// Every kind, in declaration order.
    pub const ALL: [ComponentKind; 14] = [
        ComponentKind::Position,
        ComponentKind::Velocity,
        ComponentKind::Collider,
        ComponentKind::Trigger,
        ComponentKind::Health,
        ComponentKind::Team,
        ComponentKind::Bullet,
        ComponentKind::Projectile,
        ComponentKind::Lifetime,
        ComponentKind::Gun,
        ComponentKind::AiController,
        ComponentKind::CharacterAnimator,
        ComponentKind::PlayerControlled,
        ComponentKind::DeathTimer,
    ];
}

/// Damage channel, matched against per-type resistances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    #[default]
    Physical,
    Fire,
    Poison,
    Electric,
}

impl DamageType {
    pub const ALL: [DamageType; 4] = [
        DamageType::Physical,
        DamageType::Fire,
        DamageType::Poison,
        DamageType::Electric,
    ];
}

/// AI controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiState {
    /// Walk between two waypoints.
    #[default]
    Patrol,
    /// Close in on the current target.
    Seek,
    /// Hold position facing the target.
    Attack,
    /// Move away from the current target.
    Retreat,
    /// Reserved; no transition leads here yet.
    Dodge,
}

/// Animation state a character is in. Rendering reads it; gameplay writes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationState {
    #[default]
    Idle,
    Run,
    Jump,
    Shoot,
    /// Terminal. Once entered, no other state can be set.
    Dead,
}

/// Horizontal facing of a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Facing toward `target_x` when standing at `x`.
    pub fn toward(x: f32, target_x: f32) -> Self {
        if target_x < x {
            Facing::Left
        } else {
            Facing::Right
        }
    }

    /// -1.0 for left, 1.0 for right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Top-level match phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Playing,
    Paused,
    Victory,
    GameOver,
}

impl GamePhase {
    /// Whether the match has ended.
    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::Victory | GamePhase::GameOver)
    }
}

/// Keys the core understands. Capture and mapping of physical keys is the
/// input collaborator's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    KeyA,
    KeyD,
    KeyW,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    Space,
}
