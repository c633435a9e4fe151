//! Enemy behavior finite state machine.
//!
//! Pure functions that compute state transitions and horizontal steering for
//! AI entities from their controller and what they can see this frame.
//! No ECS dependency; operates on plain data.

use glam::Vec2;

use arena_core::components::AiController;
use arena_core::config::AiConfig;
use arena_core::enums::AiState;
use arena_core::types::EntityId;

use crate::controller::{is_low_health, request_state, should_move};

/// The closest living entity of another team.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    pub entity: EntityId,
    pub position: Vec2,
    pub distance: f32,
}

/// Input to the AI FSM for a single entity.
#[derive(Debug, Clone, Copy)]
pub struct AiContext {
    pub position: Vec2,
    pub health_fraction: f32,
    pub nearest_enemy: Option<Sighting>,
    /// Current simulation time in seconds.
    pub now: f64,
}

/// Output of [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiUpdate {
    /// The entity acts this frame (duty cycle open, retreating or hurt).
    pub active: bool,
    pub state_changed: bool,
}

/// State implied by the distance to the nearest enemy.
pub fn select_state(ai: &AiController, distance: f32) -> AiState {
    if distance <= ai.attack_range {
        AiState::Attack
    } else if distance <= ai.seek_range {
        AiState::Seek
    } else {
        AiState::Patrol
    }
}

/// Run the decision half of the FSM: duty cycle, retreat check and
/// distance-based transitions. Updates `ai.state` and `ai.target`.
///
/// While health is under the retreat threshold the entity keeps retreating
/// from the nearest enemy and ignores distance-based selection.
pub fn evaluate(ai: &mut AiController, ctx: &AiContext) -> AiUpdate {
    let low_health = is_low_health(ai, ctx.health_fraction);
    // The duty cycle advances every frame, even when bypassed.
    let duty = should_move(ai, ctx.now);
    let active = duty || ai.state == AiState::Retreat || low_health;
    if !active {
        return AiUpdate {
            active,
            state_changed: false,
        };
    }

    let before = ai.state;
    if low_health {
        request_state(ai, AiState::Retreat, ctx.now);
        if let Some(enemy) = ctx.nearest_enemy {
            ai.target = Some(enemy.entity);
        }
    } else if let Some(enemy) = ctx.nearest_enemy {
        let next = select_state(ai, enemy.distance);
        request_state(ai, next, ctx.now);
        ai.target = match next {
            AiState::Patrol => None,
            _ => Some(enemy.entity),
        };
    }

    AiUpdate {
        active,
        state_changed: ai.state != before,
    }
}

/// Run the steering half of the FSM and return the horizontal velocity.
///
/// `target` is the current position of `ai.target`, or `None` when the target
/// is unset or no longer exists; states that need a target then fall back to
/// patrol (subject to the state cooldown) and stand still.
pub fn steer(
    ai: &mut AiController,
    position: Vec2,
    target: Option<Vec2>,
    params: &AiConfig,
    now: f64,
) -> f32 {
    match ai.state {
        AiState::Patrol => patrol(ai, position, params),
        AiState::Seek | AiState::Attack | AiState::Retreat => {
            let Some(target) = target else {
                request_state(ai, AiState::Patrol, now);
                return 0.0;
            };
            let dx = sign(target.x - position.x);
            match ai.state {
                AiState::Seek => dx * params.move_speed,
                AiState::Retreat => -dx * params.move_speed,
                _ => 0.0,
            }
        }
        AiState::Dodge => 0.0,
    }
}

/// Walk back and forth between two waypoints. The route is laid out around
/// the position the entity has when it first patrols.
fn patrol(ai: &mut AiController, position: Vec2, params: &AiConfig) -> f32 {
    if ai.patrol_points.is_empty() {
        ai.patrol_points = vec![
            Vec2::new(position.x - params.patrol_half_width, position.y),
            Vec2::new(position.x + params.patrol_half_width, position.y),
        ];
        ai.current_patrol_index = 0;
    }
    let index = ai.current_patrol_index % ai.patrol_points.len();
    let dx = ai.patrol_points[index].x - position.x;

    if dx.abs() > params.waypoint_tolerance {
        sign(dx) * params.move_speed
    } else {
        ai.current_patrol_index = (index + 1) % ai.patrol_points.len();
        0.0
    }
}

/// Sign of `v` with `sign(0.0) == 0.0`.
pub fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
