//! Arena snapshot: the visible state handed to the rendering side each frame.

use serde::{Deserialize, Serialize};

use crate::components::Position;
use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{Aabb, EntityId, SimTime};

/// Complete visible state after one frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    /// Seconds left on the match clock.
    pub match_time_remaining: f32,
    pub entities: Vec<EntityView>,
    /// Events emitted during the frame.
    pub events: Vec<GameEvent>,
    /// Components detached during the frame, removed entities included.
    #[serde(default)]
    pub detached: Vec<(EntityId, ComponentKind)>,
}

/// One entity as the renderer sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub position: Position,
    /// Solid body box.
    pub collider: Option<Aabb>,
    /// Hitbox.
    pub trigger: Option<Aabb>,
    /// Health as a fraction of max, for health bars.
    pub health: Option<f32>,
    pub animation: Option<AnimationState>,
    pub team: Option<u32>,
    pub player: bool,
    pub projectile: bool,
    pub facing: Option<Facing>,
}
