//! Core types and definitions for the arena simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, the health model, commands, events, configuration and
//! constants. It has no dependency on the ECS storage or any host runtime.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod health;
pub mod input;
pub mod state;
pub mod types;
