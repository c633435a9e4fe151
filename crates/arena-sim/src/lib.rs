//! Simulation engine for the arena.
//!
//! Owns the ECS world (hecs-backed), schedules the systems each frame and
//! produces `ArenaSnapshot`s for the rendering side.

pub mod combat;
pub mod engine;
pub mod system;
pub mod systems;
pub mod world;
pub mod world_setup;

pub use arena_core as core;
pub use engine::ArenaEngine;
pub use system::System;
pub use world::World;

#[cfg(test)]
mod tests;
