//! Events emitted by the simulation for audio and UI feedback.
//!
//! The world collects events during a frame; the host drains them once the
//! frame is over.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A hit was accepted by a health pool.
    Damaged {
        target: EntityId,
        source: Option<EntityId>,
        amount: f32,
        damage_type: DamageType,
    },
    /// An entity entered the death sequence.
    Died { entity: EntityId },
    /// An entity was purged from the world.
    Removed { entity: EntityId },
    /// A projectile left a barrel.
    BulletFired { shooter: EntityId, bullet: EntityId },
    /// A damage-over-time effect was attached or extended.
    StatusApplied {
        target: EntityId,
        damage_type: DamageType,
        merged: bool,
    },
    /// The match moved to a new phase.
    PhaseChanged { from: GamePhase, to: GamePhase },
}
