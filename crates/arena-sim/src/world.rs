//! The arena world: entity registry, component storage and system scheduler.
//!
//! Components live in a `hecs::World`; this type adds stable [`EntityId`]s,
//! insertion order, deferred destruction and the per-frame system loop on top
//! of it. It also carries the shared frame resources systems read: the clock,
//! tuning config, input state, bounds, the event queue and the match phase.

use std::collections::HashMap;

use hecs::DynamicBundle;
use tracing::debug;

use arena_core::components::*;
use arena_core::config::ArenaConfig;
use arena_core::enums::{ComponentKind, GamePhase};
use arena_core::events::GameEvent;
use arena_core::health::Health;
use arena_core::input::InputState;
use arena_core::types::{Bounds, EntityId, SimTime};

use crate::system::System;

#[derive(Debug, Clone, Copy)]
struct EntityRecord {
    handle: hecs::Entity,
    active: bool,
}

pub struct World {
    ecs: hecs::World,
    records: HashMap<EntityId, EntityRecord>,
    /// Live entity ids in insertion order.
    order: Vec<EntityId>,
    next_id: u64,
    systems: Vec<Box<dyn System>>,
    updating: bool,
    /// Names of the systems taken out for the current frame.
    running: Vec<&'static str>,
    removed_during_update: Vec<String>,

    time: SimTime,
    config: ArenaConfig,
    bounds: Bounds,
    input: InputState,
    phase: GamePhase,
    events: Vec<GameEvent>,
    detached: Vec<(EntityId, ComponentKind)>,
}

impl World {
    pub fn new(config: ArenaConfig) -> Self {
        let bounds = config.world.bounds();
        Self {
            ecs: hecs::World::new(),
            records: HashMap::new(),
            order: Vec::new(),
            next_id: 0,
            systems: Vec::new(),
            updating: false,
            running: Vec::new(),
            removed_during_update: Vec::new(),
            time: SimTime::default(),
            config,
            bounds,
            input: InputState::default(),
            phase: GamePhase::Playing,
            events: Vec::new(),
            detached: Vec::new(),
        }
    }

    // --- Entities ---

    /// Add an entity built from `bundle` (usually `EntityBuilder::build()`).
    pub fn add_entity(&mut self, bundle: impl DynamicBundle) -> EntityId {
        let handle = self.ecs.spawn(bundle);
        self.next_id += 1;
        let id = EntityId(self.next_id);
        self.records.insert(id, EntityRecord { handle, active: true });
        self.order.push(id);
        id
    }

    /// Flag an entity for removal at the end of the current frame. It stays
    /// readable until then but no longer matches any system.
    pub fn destroy(&mut self, id: EntityId) {
        if let Some(record) = self.records.get_mut(&id) {
            if record.active {
                record.active = false;
                debug!(entity = %id, "entity destroyed");
            }
        }
    }

    /// Detach every component and drop the entity immediately.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        let Some(record) = self.records.remove(&id) else {
            return false;
        };
        if let Ok(entity) = self.ecs.entity(record.handle) {
            for kind in ComponentKind::ALL {
                if has_kind(&entity, kind) {
                    self.detached.push((id, kind));
                }
            }
        }
        let _ = self.ecs.despawn(record.handle);
        self.order.retain(|e| *e != id);
        self.events.push(GameEvent::Removed { entity: id });
        true
    }

    /// Whether `id` is still stored, active or not.
    pub fn contains(&self, id: EntityId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn is_active(&self, id: EntityId) -> bool {
        self.records.get(&id).is_some_and(|r| r.active)
    }

    /// Stored entity ids in insertion order.
    pub fn entities(&self) -> &[EntityId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // --- Components ---

    pub fn get<T: Component>(&self, id: EntityId) -> Option<hecs::Ref<'_, T>> {
        let record = self.records.get(&id)?;
        self.ecs.get::<&T>(record.handle).ok()
    }

    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        let record = self.records.get(&id)?;
        self.ecs.query_one_mut::<&mut T>(record.handle).ok()
    }

    /// Copy of a component, for the many small `Copy` components.
    pub fn read<T: Component + Copy>(&self, id: EntityId) -> Option<T> {
        self.get::<T>(id).map(|c| *c)
    }

    pub fn has<T: Component>(&self, id: EntityId) -> bool {
        self.has_kind(id, T::KIND)
    }

    pub fn has_kind(&self, id: EntityId, kind: ComponentKind) -> bool {
        self.records
            .get(&id)
            .and_then(|r| self.ecs.entity(r.handle).ok())
            .is_some_and(|e| has_kind(&e, kind))
    }

    /// Attach a component, replacing (and detaching) any previous one of the
    /// same kind.
    pub fn add_component<T: Component>(&mut self, id: EntityId, component: T) -> bool {
        let Some(record) = self.records.get(&id).copied() else {
            return false;
        };
        if self.has::<T>(id) {
            self.detached.push((id, T::KIND));
        }
        self.ecs.insert_one(record.handle, component).is_ok()
    }

    pub fn remove_component<T: Component>(&mut self, id: EntityId) -> Option<T> {
        let record = self.records.get(&id).copied()?;
        let removed = self.ecs.remove_one::<T>(record.handle).ok()?;
        self.detached.push((id, T::KIND));
        Some(removed)
    }

    /// Active entities that hold every kind in `kinds`, in insertion order.
    pub fn get_entities_with_components(&self, kinds: &[ComponentKind]) -> Vec<EntityId> {
        self.order
            .iter()
            .copied()
            .filter(|id| {
                let Some(record) = self.records.get(id) else {
                    return false;
                };
                if !record.active {
                    return false;
                }
                match self.ecs.entity(record.handle) {
                    Ok(entity) => kinds.iter().all(|k| has_kind(&entity, *k)),
                    Err(_) => false,
                }
            })
            .collect()
    }

    // --- Systems ---

    /// Register a system. The list stays sorted by ascending priority; systems
    /// with equal priority run in registration order.
    pub fn add_system(&mut self, system: Box<dyn System>) {
        self.systems.push(system);
        self.systems.sort_by_key(|s| s.priority());
    }

    /// Remove a system by name. Mid-frame the removal is queued and applied
    /// after the last system runs; returns whether a system by that name was
    /// registered and not already queued.
    pub fn remove_system(&mut self, name: &str) -> bool {
        if self.updating {
            let known = self.running.iter().any(|n| *n == name)
                || self.systems.iter().any(|s| s.name() == name);
            if !known || self.removed_during_update.iter().any(|n| n == name) {
                return false;
            }
            self.removed_during_update.push(name.to_string());
            return true;
        }
        let before = self.systems.len();
        self.systems.retain(|s| s.name() != name);
        self.systems.len() != before
    }

    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    /// Run one frame.
    ///
    /// Each system sees the active entities matching its requirement at the
    /// moment it runs. Entities destroyed during the frame are purged after the
    /// last system, then the clock advances by `delta`.
    pub fn update(&mut self, delta: f32) {
        let mut systems = std::mem::take(&mut self.systems);
        self.running = systems.iter().map(|s| s.name()).collect();
        self.updating = true;
        for system in systems.iter_mut() {
            let entities = self.get_entities_with_components(system.required_components());
            system.update(self, &entities, delta);
        }
        self.updating = false;
        self.running.clear();

        // Systems registered mid-frame start running next frame.
        let added = std::mem::take(&mut self.systems);
        if !added.is_empty() {
            systems.extend(added);
            systems.sort_by_key(|s| s.priority());
        }
        for name in std::mem::take(&mut self.removed_during_update) {
            systems.retain(|s| s.name() != name);
        }
        self.systems = systems;

        self.purge_inactive();
        self.time.advance(delta);
    }

    fn purge_inactive(&mut self) {
        let inactive: Vec<EntityId> = self
            .order
            .iter()
            .copied()
            .filter(|id| !self.is_active(*id))
            .collect();
        for id in inactive {
            self.remove_entity(id);
        }
    }

    // --- Frame resources ---

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Current simulation time in seconds.
    pub fn now(&self) -> f64 {
        self.time.elapsed_secs
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Move to `phase`, emitting a `PhaseChanged` event when it differs.
    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            self.events.push(GameEvent::PhaseChanged {
                from: self.phase,
                to: phase,
            });
            self.phase = phase;
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Components detached since the last call, for the rendering side to
    /// release whatever it attached to them.
    pub fn take_detached(&mut self) -> Vec<(EntityId, ComponentKind)> {
        std::mem::take(&mut self.detached)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(ArenaConfig::default())
    }
}

fn has_kind(entity: &hecs::EntityRef<'_>, kind: ComponentKind) -> bool {
    match kind {
        ComponentKind::Position => entity.has::<Position>(),
        ComponentKind::Velocity => entity.has::<Velocity>(),
        ComponentKind::Collider => entity.has::<Collider>(),
        ComponentKind::Trigger => entity.has::<Trigger>(),
        ComponentKind::Health => entity.has::<Health>(),
        ComponentKind::Team => entity.has::<Team>(),
        ComponentKind::Bullet => entity.has::<Bullet>(),
        ComponentKind::Projectile => entity.has::<Projectile>(),
        ComponentKind::Lifetime => entity.has::<Lifetime>(),
        ComponentKind::Gun => entity.has::<Gun>(),
        ComponentKind::AiController => entity.has::<AiController>(),
        ComponentKind::CharacterAnimator => entity.has::<CharacterAnimator>(),
        ComponentKind::PlayerControlled => entity.has::<PlayerControlled>(),
        ComponentKind::DeathTimer => entity.has::<DeathTimer>(),
    }
}
