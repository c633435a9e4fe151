//! Simulation constants and tuning parameters.
//!
//! These are the defaults behind [`crate::config::ArenaConfig`]; systems read the
//! config, not these values directly.

// --- Frame ---

/// Nominal host frame rate (Hz).
pub const FRAME_RATE: u32 = 60;

/// Seconds per nominal frame.
pub const FRAME_DT: f32 = 1.0 / FRAME_RATE as f32;

/// Tolerance used when comparing countdown timers against zero.
pub const TIMER_EPSILON: f32 = 1e-5;

// --- World ---

/// Downward acceleration applied to airborne bodies (units/s², +y is down).
pub const GRAVITY: f32 = 800.0;

/// Default visible playfield width (units). Bullets are culled outside ±width.
pub const PLAYFIELD_WIDTH: f32 = 1280.0;

/// Default visible playfield height (units).
pub const PLAYFIELD_HEIGHT: f32 = 720.0;

/// Margin beyond the playfield before a projectile is culled.
pub const BULLET_CULL_MARGIN: f32 = 100.0;

/// Margin below the playfield before a falling body is killed.
pub const FALL_DEATH_MARGIN: f32 = 200.0;

/// Match duration in seconds (20 minutes plus a short grace period).
pub const MATCH_DURATION_SECS: f32 = 60.0 * 20.1;

// --- Teams ---

/// Faction id of the player.
pub const PLAYER_TEAM: u32 = 1;

/// Faction id of AI enemies.
pub const ENEMY_TEAM: u32 = 2;

// --- Combat ---

/// Physical damage each body takes when two health-bearing colliders touch.
pub const CONTACT_DAMAGE: f32 = 5.0;

/// Minimum simulation time between two accepted hits on the same health pool.
pub const DAMAGE_COOLDOWN_SECS: f32 = 0.5;

/// Delay between death and removal, so the death animation can play.
pub const DEATH_REMOVAL_DELAY_SECS: f32 = 1.0;

/// Multiplier for enemy-team damage landing on the player.
pub const ENEMY_TO_PLAYER_MULTIPLIER: f32 = 0.005;

/// Multiplier for player-team damage landing on anything not player-controlled.
pub const PLAYER_TO_ENEMY_MULTIPLIER: f32 = 0.5;

/// Default starting and maximum health of characters.
pub const CHARACTER_MAX_HEALTH: f32 = 100.0;

// --- AI ---

/// Distance at which the AI stops to attack.
pub const AI_ATTACK_RANGE: f32 = 150.0;

/// Distance at which the AI starts closing in on a target.
pub const AI_SEEK_RANGE: f32 = 300.0;

/// Health fraction under which the AI retreats.
pub const AI_RETREAT_THRESHOLD: f32 = 0.3;

/// Minimum simulation time between two AI state changes.
pub const AI_STATE_COOLDOWN_SECS: f32 = 0.5;

/// Seconds between two AI movement windows.
pub const AI_MOVE_INTERVAL_SECS: f32 = 30.0;

/// Length of an AI movement window.
pub const AI_MOVE_DURATION_SECS: f32 = 3.0;

/// Horizontal AI speed (slightly slower than the player).
pub const AI_MOVE_SPEED: f32 = 150.0;

/// Half-width of the patrol route around the patrol anchor.
pub const AI_PATROL_HALF_WIDTH: f32 = 200.0;

/// Distance to a waypoint that counts as arrived.
pub const AI_WAYPOINT_TOLERANCE: f32 = 10.0;

// --- Player ---

/// Horizontal player speed.
pub const PLAYER_MOVE_SPEED: f32 = 200.0;

/// Initial upward speed of a jump.
pub const PLAYER_JUMP_FORCE: f32 = 650.0;

// --- Firing ---

/// Seconds between two shots of the same shooter.
pub const FIRE_RATE_SECS: f32 = 0.6;

/// Projectile speed.
pub const BULLET_SPEED: f32 = 400.0;

/// Chance per eligible frame that an AI shooter pulls the trigger.
pub const AI_FIRE_CHANCE: f64 = 0.1;

/// Total angular spread of AI shots (radians, ±18°).
pub const AI_SPREAD_ANGLE: f32 = std::f32::consts::PI * 0.2;

/// Duration of the shoot animation.
pub const ATTACK_ANIMATION_DURATION: f32 = 0.3;

/// Time into the shoot animation at which the projectile leaves the barrel.
pub const BULLET_FIRE_DELAY: f32 = 0.15;

/// Projectile lifetime in seconds.
pub const BULLET_LIFETIME_SECS: f32 = 2.0;

/// Damage carried by a default projectile.
pub const BULLET_DAMAGE: f32 = 20.0;

/// Edge length of a projectile hitbox.
pub const BULLET_SIZE: f32 = 8.0;

// --- Character bodies ---

/// Solid body width of player and enemy characters.
pub const CHARACTER_BODY_WIDTH: f32 = 30.0;

/// Solid body height of player and enemy characters.
pub const CHARACTER_BODY_HEIGHT: f32 = 100.0;

/// Hitbox width of player and enemy characters.
pub const CHARACTER_HITBOX_WIDTH: f32 = 34.0;

/// Muzzle offset relative to the character position.
pub const GUN_OFFSET: (f32, f32) = (40.0, 70.0);
