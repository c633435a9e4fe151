//! Arena engine: the host-facing facade over the world.
//!
//! `ArenaEngine` owns the world, applies queued player commands at frame
//! boundaries, runs the systems and produces `ArenaSnapshot`s. Completely
//! headless, so a whole match can be driven from tests.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use arena_core::commands::PlayerCommand;
use arena_core::config::ArenaConfig;
use arena_core::enums::GamePhase;
use arena_core::error::Result;
use arena_core::state::ArenaSnapshot;
use arena_core::types::{EntityId, SimTime};

use crate::systems::snapshot::build_snapshot;
use crate::world::World;
use crate::world_setup;

pub struct ArenaEngine {
    world: World,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    player: Option<EntityId>,
    /// Phase to return to on resume.
    paused_from: Option<GamePhase>,
}

impl ArenaEngine {
    /// An empty world with no systems, for hosts that build their own arena.
    /// Fails if the config does not validate.
    pub fn empty(config: ArenaConfig) -> Result<Self> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.world.seed);
        Ok(Self {
            world: World::new(config),
            rng,
            command_queue: VecDeque::new(),
            player: None,
            paused_from: None,
        })
    }

    /// The default arena: standard systems, platforms, player and enemies.
    pub fn new(config: ArenaConfig) -> Result<Self> {
        let mut engine = Self::empty(config)?;
        let player = world_setup::setup_arena(&mut engine.world, &mut engine.rng);
        engine.player = Some(player);
        Ok(engine)
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by `delta` seconds and return the resulting
    /// snapshot. A paused or finished match only applies commands.
    ///
    /// Events and detached components are drained into the snapshot, so each
    /// one is reported exactly once.
    pub fn tick(&mut self, delta: f32) -> ArenaSnapshot {
        self.process_commands();

        if self.world.phase() == GamePhase::Playing {
            self.world.update(delta);
        }

        let events = self.world.drain_events();
        let detached = self.world.take_detached();
        build_snapshot(&self.world, events, detached)
    }

    pub fn phase(&self) -> GamePhase {
        self.world.phase()
    }

    pub fn time(&self) -> SimTime {
        self.world.time()
    }

    /// The player spawned by the default arena.
    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::KeyDown { key } => self.world.input_mut().press(key),
            PlayerCommand::KeyUp { key } => self.world.input_mut().release(key),
            PlayerCommand::MouseDown { x, y } => {
                self.world.input_mut().mouse_down = Some(Vec2::new(x, y));
            }
            PlayerCommand::MouseUp => self.world.input_mut().mouse_down = None,
            PlayerCommand::Pause => {
                if self.world.phase() == GamePhase::Playing {
                    self.paused_from = Some(GamePhase::Playing);
                    self.world.set_phase(GamePhase::Paused);
                    info!(time = self.world.now(), "paused");
                }
            }
            PlayerCommand::Resume => {
                if let Some(phase) = self.paused_from.take() {
                    self.world.set_phase(phase);
                    info!(time = self.world.now(), "resumed");
                }
            }
        }
    }
}
