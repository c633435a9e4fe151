//! Health pool, damage mitigation and damage-over-time effects.
//!
//! Unlike the other components, `Health` carries its own arithmetic: armor,
//! resistances, the hit cooldown and status-effect merging all have to agree no
//! matter which system lands the hit. Every method that reads time takes the
//! current simulation time in seconds (`SimTime::elapsed_secs`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{CHARACTER_MAX_HEALTH, DAMAGE_COOLDOWN_SECS};
use crate::enums::DamageType;
use crate::types::EntityId;

/// One incoming hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageInfo {
    pub amount: f32,
    pub damage_type: DamageType,
    /// Entity that caused the hit, if any.
    pub source: Option<EntityId>,
}

impl DamageInfo {
    pub fn new(amount: f32, damage_type: DamageType) -> Self {
        Self {
            amount,
            damage_type,
            source: None,
        }
    }

    pub fn from_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }
}

/// Damage-over-time effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub damage_type: DamageType,
    /// Remaining seconds.
    pub duration: f32,
    /// Seconds between two ticks.
    pub tick_rate: f32,
    pub damage_per_tick: f32,
    /// Simulation time of the last tick (or of the application).
    pub last_tick: f64,
}

impl StatusEffect {
    pub fn new(damage_type: DamageType, duration: f32, tick_rate: f32, damage_per_tick: f32) -> Self {
        Self {
            damage_type,
            duration,
            tick_rate,
            damage_per_tick,
            last_tick: 0.0,
        }
    }
}

/// Health pool of a damageable entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    /// Flat reduction applied after resistances.
    pub armor: f32,
    /// Fraction of damage ignored per type (0.0 = none, 1.0 = immune).
    pub resistances: HashMap<DamageType, f32>,
    pub invulnerable: bool,
    /// Minimum seconds between two accepted hits.
    pub damage_cooldown: f32,
    /// Simulation time of the last accepted hit.
    pub last_damage_time: Option<f64>,
    /// Amount applied by the last accepted hit.
    pub last_damage_taken: f32,
    pub last_damage_source: Option<EntityId>,
    status_effects: Vec<StatusEffect>,
}

impl Health {
    pub fn new(current: f32, max: f32) -> Self {
        let resistances = DamageType::ALL.iter().map(|t| (*t, 0.0)).collect();
        Self {
            current,
            max,
            armor: 0.0,
            resistances,
            invulnerable: false,
            damage_cooldown: DAMAGE_COOLDOWN_SECS,
            last_damage_time: None,
            last_damage_taken: 0.0,
            last_damage_source: None,
            status_effects: Vec::new(),
        }
    }

    /// Full health pool of `max` points.
    pub fn full(max: f32) -> Self {
        Self::new(max, max)
    }

    pub fn with_armor(mut self, armor: f32) -> Self {
        self.armor = armor;
        self
    }

    pub fn with_resistance(mut self, damage_type: DamageType, resistance: f32) -> Self {
        self.resistances.insert(damage_type, resistance);
        self
    }

    pub fn resistance(&self, damage_type: DamageType) -> f32 {
        self.resistances.get(&damage_type).copied().unwrap_or(0.0)
    }

    /// Apply a hit and return the damage actually taken.
    ///
    /// Returns 0 without touching any state while invulnerable or while the hit
    /// cooldown since the last accepted hit is still running.
    pub fn take_damage(&mut self, damage: &DamageInfo, now: f64) -> f32 {
        if self.invulnerable {
            return 0.0;
        }
        if let Some(last) = self.last_damage_time {
            if now - last < f64::from(self.damage_cooldown) {
                return 0.0;
            }
        }

        let resistance = self.resistance(damage.damage_type);
        let actual = (damage.amount * (1.0 - resistance) - self.armor).max(0.0);

        self.current = (self.current - actual).max(0.0);
        self.last_damage_time = Some(now);
        self.last_damage_taken = actual;
        self.last_damage_source = damage.source;
        actual
    }

    /// Restore up to `amount` points, capped at `max`. Returns the points restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - before
    }

    /// Attach a damage-over-time effect.
    ///
    /// An effect of the same damage type already running is extended instead:
    /// it keeps the longer duration and the stronger tick. Returns `true` when the
    /// effect was merged into an existing one.
    pub fn add_status_effect(&mut self, effect: StatusEffect, now: f64) -> bool {
        if let Some(existing) = self
            .status_effects
            .iter_mut()
            .find(|e| e.damage_type == effect.damage_type)
        {
            existing.duration = existing.duration.max(effect.duration);
            existing.damage_per_tick = existing.damage_per_tick.max(effect.damage_per_tick);
            return true;
        }

        self.status_effects.push(StatusEffect {
            last_tick: now,
            ..effect
        });
        false
    }

    /// Advance every effect by `delta` seconds, dropping the expired ones and
    /// ticking the rest when their interval has elapsed. Returns the damage dealt.
    pub fn update_status_effects(&mut self, delta: f32, now: f64) -> f32 {
        let mut ticks = Vec::new();
        self.status_effects.retain_mut(|effect| {
            effect.duration -= delta;
            if effect.duration <= 0.0 {
                return false;
            }
            if now - effect.last_tick >= f64::from(effect.tick_rate) {
                ticks.push(DamageInfo::new(effect.damage_per_tick, effect.damage_type));
                effect.last_tick = now;
            }
            true
        });

        ticks.iter().map(|hit| self.take_damage(hit, now)).sum()
    }

    pub fn status_effects(&self) -> &[StatusEffect] {
        &self.status_effects
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    /// Current health as a fraction of max, for health bars and AI thresholds.
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::full(CHARACTER_MAX_HEALTH)
    }
}
