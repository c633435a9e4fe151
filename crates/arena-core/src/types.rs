//! Fundamental identity, geometry and time types.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque entity identity. Ids are handed out in increasing order and never reused
/// within one world, so a stale id simply fails to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// Axis-aligned bounding box in world space. +y points down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Strict overlap test; boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Penetration depth along x. Positive only when the boxes overlap on x.
    pub fn overlap_x(&self, other: &Aabb) -> f32 {
        (self.right() - other.x).min(other.right() - self.x)
    }

    /// Penetration depth along y. Positive only when the boxes overlap on y.
    pub fn overlap_y(&self, other: &Aabb) -> f32 {
        (self.bottom() - other.y).min(other.bottom() - self.y)
    }
}

/// Axis-aligned world limits used by bouncing bodies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Bounds {
    /// No limits at all.
    pub const UNBOUNDED: Bounds = Bounds {
        min_x: f32::NEG_INFINITY,
        max_x: f32::INFINITY,
        min_y: f32::NEG_INFINITY,
        max_y: f32::INFINITY,
    };

    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Whether the point lies inside the bounds, edges included.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// Simulation clock, advanced only by frame deltas.
///
/// Every cooldown and timestamp in the core reads this clock, so a paused
/// simulation pauses all of them together.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of completed frames.
    pub frame: u64,
    /// Accumulated simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one frame of `delta` seconds.
    pub fn advance(&mut self, delta: f32) {
        self.frame += 1;
        self.elapsed_secs += f64::from(delta);
    }

    /// Seconds elapsed since the timestamp `since`.
    pub fn since(&self, since: f64) -> f64 {
        self.elapsed_secs - since
    }
}
