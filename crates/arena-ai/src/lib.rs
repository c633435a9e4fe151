//! Enemy AI for the arena.
//!
//! Implements the per-entity behavior state machine and its timers as pure
//! functions over [`arena_core::components::AiController`]. World lookups
//! (nearest enemy, target position) are done by the caller.

pub mod controller;
pub mod fsm;

pub use arena_core as core;
