//! Tuning configuration.
//!
//! Every value defaults to the matching constant in [`crate::constants`]; a TOML
//! file only needs to list what it overrides.
//!
//! ```toml
//! [world]
//! seed = 7
//! enemy_count = 5
//!
//! [ai]
//! seek_range = 400.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{ArenaError, Result};
use crate::types::Bounds;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub world: WorldConfig,
    pub combat: CombatConfig,
    pub ai: AiConfig,
    pub firing: FiringConfig,
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub gravity: f32,
    pub match_duration_secs: f32,
    /// Seed for every random decision (AI fire rolls, arena layout).
    pub seed: u64,
    /// Enemies spawned by the default arena.
    pub enemy_count: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            gravity: GRAVITY,
            match_duration_secs: MATCH_DURATION_SECS,
            seed: 42,
            enemy_count: 3,
        }
    }
}

impl WorldConfig {
    /// Limits for bouncing bodies. The playfield is centred on the origin and
    /// extends one playfield size in every direction.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            -self.playfield_width,
            self.playfield_width,
            -self.playfield_height,
            self.playfield_height,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub contact_damage: f32,
    pub damage_cooldown_secs: f32,
    pub death_delay_secs: f32,
    pub enemy_to_player_multiplier: f32,
    pub player_to_enemy_multiplier: f32,
    pub character_max_health: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            contact_damage: CONTACT_DAMAGE,
            damage_cooldown_secs: DAMAGE_COOLDOWN_SECS,
            death_delay_secs: DEATH_REMOVAL_DELAY_SECS,
            enemy_to_player_multiplier: ENEMY_TO_PLAYER_MULTIPLIER,
            player_to_enemy_multiplier: PLAYER_TO_ENEMY_MULTIPLIER,
            character_max_health: CHARACTER_MAX_HEALTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub attack_range: f32,
    pub seek_range: f32,
    pub retreat_threshold: f32,
    pub state_cooldown_secs: f32,
    pub move_interval_secs: f32,
    pub move_duration_secs: f32,
    pub move_speed: f32,
    pub patrol_half_width: f32,
    pub waypoint_tolerance: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            attack_range: AI_ATTACK_RANGE,
            seek_range: AI_SEEK_RANGE,
            retreat_threshold: AI_RETREAT_THRESHOLD,
            state_cooldown_secs: AI_STATE_COOLDOWN_SECS,
            move_interval_secs: AI_MOVE_INTERVAL_SECS,
            move_duration_secs: AI_MOVE_DURATION_SECS,
            move_speed: AI_MOVE_SPEED,
            patrol_half_width: AI_PATROL_HALF_WIDTH,
            waypoint_tolerance: AI_WAYPOINT_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiringConfig {
    pub fire_rate_secs: f32,
    pub bullet_speed: f32,
    pub ai_fire_chance: f64,
    pub spread_angle: f32,
    pub attack_animation_secs: f32,
    pub bullet_fire_delay: f32,
    pub bullet_lifetime_secs: f32,
    pub bullet_damage: f32,
}

impl Default for FiringConfig {
    fn default() -> Self {
        Self {
            fire_rate_secs: FIRE_RATE_SECS,
            bullet_speed: BULLET_SPEED,
            ai_fire_chance: AI_FIRE_CHANCE,
            spread_angle: AI_SPREAD_ANGLE,
            attack_animation_secs: ATTACK_ANIMATION_DURATION,
            bullet_fire_delay: BULLET_FIRE_DELAY,
            bullet_lifetime_secs: BULLET_LIFETIME_SECS,
            bullet_damage: BULLET_DAMAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub move_speed: f32,
    pub jump_force: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: PLAYER_MOVE_SPEED,
            jump_force: PLAYER_JUMP_FORCE,
        }
    }
}

impl ArenaConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("world.playfield_width", self.world.playfield_width),
            ("world.playfield_height", self.world.playfield_height),
            ("world.match_duration_secs", self.world.match_duration_secs),
            ("combat.character_max_health", self.combat.character_max_health),
            ("ai.move_speed", self.ai.move_speed),
            ("ai.move_duration_secs", self.ai.move_duration_secs),
            ("ai.move_interval_secs", self.ai.move_interval_secs),
            ("firing.fire_rate_secs", self.firing.fire_rate_secs),
            ("firing.bullet_speed", self.firing.bullet_speed),
            ("firing.attack_animation_secs", self.firing.attack_animation_secs),
            ("firing.bullet_lifetime_secs", self.firing.bullet_lifetime_secs),
            ("player.move_speed", self.player.move_speed),
            ("player.jump_force", self.player.jump_force),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ArenaError::invalid_config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("world.gravity", self.world.gravity),
            ("combat.contact_damage", self.combat.contact_damage),
            ("combat.damage_cooldown_secs", self.combat.damage_cooldown_secs),
            ("combat.death_delay_secs", self.combat.death_delay_secs),
            ("ai.state_cooldown_secs", self.ai.state_cooldown_secs),
            ("firing.bullet_fire_delay", self.firing.bullet_fire_delay),
            ("firing.bullet_damage", self.firing.bullet_damage),
        ];
        for (name, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(ArenaError::invalid_config(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        if self.ai.attack_range > self.ai.seek_range {
            return Err(ArenaError::invalid_config(
                "ai.attack_range must not exceed ai.seek_range",
            ));
        }
        if !(0.0..=1.0).contains(&self.ai.retreat_threshold) {
            return Err(ArenaError::invalid_config(
                "ai.retreat_threshold must lie in [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.firing.ai_fire_chance) {
            return Err(ArenaError::invalid_config(
                "firing.ai_fire_chance must lie in [0, 1]",
            ));
        }
        if self.firing.bullet_fire_delay > self.firing.attack_animation_secs {
            return Err(ArenaError::invalid_config(
                "firing.bullet_fire_delay must fit inside the attack animation",
            ));
        }
        Ok(())
    }
}
