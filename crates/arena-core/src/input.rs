//! Keyboard and mouse state as seen by the simulation.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::KeyCode;

/// Input snapshot written by the host and read by the control systems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pressed: HashSet<KeyCode>,
    /// World position of the cursor while the fire button is held.
    pub mouse_down: Option<Vec2>,
}

impl InputState {
    pub fn press(&mut self, key: KeyCode) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.pressed.remove(&key);
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    pub fn left(&self) -> bool {
        self.is_pressed(KeyCode::KeyA) || self.is_pressed(KeyCode::ArrowLeft)
    }

    pub fn right(&self) -> bool {
        self.is_pressed(KeyCode::KeyD) || self.is_pressed(KeyCode::ArrowRight)
    }

    pub fn jump(&self) -> bool {
        self.is_pressed(KeyCode::Space)
            || self.is_pressed(KeyCode::KeyW)
            || self.is_pressed(KeyCode::ArrowUp)
    }

    /// Aim point while firing.
    pub fn fire_target(&self) -> Option<Vec2> {
        self.mouse_down
    }

    /// Forget every held key and the fire button.
    pub fn clear(&mut self) {
        self.pressed.clear();
        self.mouse_down = None;
    }
}
