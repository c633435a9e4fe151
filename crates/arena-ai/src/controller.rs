//! Timers owned by an [`AiController`]: the state-change cooldown and the
//! movement duty cycle. Both read the simulation clock.

use arena_core::components::AiController;
use arena_core::enums::AiState;

/// Ask for a state change.
///
/// Accepted only when `state` differs from the current one and the state
/// cooldown has elapsed since the last accepted change. Rejected requests leave
/// the cooldown untouched.
pub fn request_state(ai: &mut AiController, state: AiState, now: f64) -> bool {
    if ai.state == state {
        return false;
    }
    if let Some(last) = ai.last_state_change {
        if now - last < f64::from(ai.state_cooldown) {
            return false;
        }
    }
    ai.state = state;
    ai.last_state_change = Some(now);
    true
}

/// Advance the movement duty cycle and report whether the entity may move.
///
/// An idle entity starts a window of `move_duration` seconds once
/// `move_interval` seconds have passed since the previous window began; a fresh
/// controller starts its first window immediately.
pub fn should_move(ai: &mut AiController, now: f64) -> bool {
    let since_last = ai.last_move_time.map(|t| now - t);
    if !ai.is_moving {
        if since_last.map_or(true, |s| s >= f64::from(ai.move_interval)) {
            ai.is_moving = true;
            ai.last_move_time = Some(now);
        }
    } else if since_last.map_or(false, |s| s >= f64::from(ai.move_duration)) {
        ai.is_moving = false;
    }
    ai.is_moving
}

/// Whether the health fraction is under the retreat threshold.
pub fn is_low_health(ai: &AiController, health_fraction: f32) -> bool {
    health_fraction < ai.retreat_threshold
}
