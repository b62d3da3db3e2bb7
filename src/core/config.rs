//! Combat configuration with documented defaults
//!
//! Every tunable that is not part of the fixed damage formula lives here.
//! Defaults reproduce the 60 Hz, 1920x1080 stage the game was tuned on.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::constants::*;
use crate::combat::moves::HitboxRect;
use crate::core::error::{DuelError, Result};
use crate::core::types::{Tick, Vec2};

/// Playable region. Positions are clamped into it every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    /// Ground line fighters land on (y grows downward)
    pub ground_y: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            min_x: ARENA_MIN_X,
            max_x: ARENA_MAX_X,
            min_y: ARENA_MIN_Y,
            max_y: ARENA_MAX_Y,
            ground_y: GROUND_Y,
        }
    }
}

impl ArenaConfig {
    /// Pure clamp into the arena, no bounce
    pub fn clamp(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            position.x.clamp(self.min_x, self.max_x),
            position.y.clamp(self.min_y, self.max_y),
        )
    }

    pub fn center_x(&self) -> f32 {
        (self.min_x + self.max_x) / 2.0
    }
}

/// Horizontal acceleration and vertical gravity tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// How fast a fighter reaches its target speed
    pub acceleration: f32,
    /// How fast a fighter stops (snappier than acceleration)
    pub deceleration: f32,
    pub gravity: f32,
    /// Initial vertical velocity of a jump (negative = upward)
    pub jump_velocity: f32,
    pub max_fall_speed: f32,
    /// Residual speed below which decay snaps to zero
    pub stop_threshold: f32,
    /// Distance to target speed below which acceleration snaps to it
    pub snap_threshold: f32,
    /// Fraction of normal speed available while blocking
    pub block_speed_multiplier: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            acceleration: ACCELERATION,
            deceleration: DECELERATION,
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            max_fall_speed: MAX_FALL_SPEED,
            stop_threshold: STOP_THRESHOLD,
            snap_threshold: SNAP_THRESHOLD,
            block_speed_multiplier: BLOCK_SPEED_MULTIPLIER,
        }
    }
}

/// Visual bounding box and the vulnerable fraction of it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub width: f32,
    pub height: f32,
    pub hurtbox_width_ratio: f32,
    pub hurtbox_height_ratio: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            width: BODY_WIDTH,
            height: BODY_HEIGHT,
            hurtbox_width_ratio: HURTBOX_WIDTH_RATIO,
            hurtbox_height_ratio: HURTBOX_HEIGHT_RATIO,
        }
    }
}

/// Hit-resolution knobs outside the fixed damage formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub downed_recovery_frames: u32,
    /// Hitstun used when a hit carries no explicit duration
    pub default_hitstun_frames: u32,
    /// Damage above which a landed hit is flagged heavy for feedback
    pub heavy_hit_threshold: f32,
    /// Base move damage above which knockback uses the heavy strength
    pub heavy_knockback_damage: f32,
    pub light_knockback: f32,
    pub heavy_knockback: f32,
    /// Damage substituted for moves with missing or non-positive damage
    pub default_move_damage: f32,
    /// Hitbox substituted for moves that specify none
    pub default_hitbox: HitboxRect,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            downed_recovery_frames: DOWNED_RECOVERY_FRAMES,
            default_hitstun_frames: DEFAULT_HITSTUN_FRAMES,
            heavy_hit_threshold: HEAVY_HIT_THRESHOLD,
            heavy_knockback_damage: HEAVY_KNOCKBACK_DAMAGE,
            light_knockback: LIGHT_KNOCKBACK,
            heavy_knockback: HEAVY_KNOCKBACK,
            default_move_damage: DEFAULT_MOVE_DAMAGE,
            default_hitbox: HitboxRect::default(),
        }
    }
}

/// Per-fighter resource caps and stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FighterProfile {
    pub max_hp: f32,
    pub max_meter: f32,
    pub attack: f32,
    pub defense: f32,
    /// Top horizontal speed (arena units per second)
    pub speed: f32,
}

impl Default for FighterProfile {
    fn default() -> Self {
        Self {
            max_hp: DEFAULT_MAX_HP,
            max_meter: DEFAULT_MAX_METER,
            attack: DEFAULT_ATTACK,
            defense: DEFAULT_DEFENSE,
            speed: DEFAULT_SPEED,
        }
    }
}

/// Configuration for one duel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Simulation ticks per second; one tick advances every frame counter by one
    pub tick_rate: u32,
    pub arena: ArenaConfig,
    pub physics: PhysicsConfig,
    pub body: BodyConfig,
    pub rules: RulesConfig,
    pub fighter: FighterProfile,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            arena: ArenaConfig::default(),
            physics: PhysicsConfig::default(),
            body: BodyConfig::default(),
            rules: RulesConfig::default(),
            fighter: FighterProfile::default(),
        }
    }
}

impl CombatConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing sections keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: CombatConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Fixed simulation step in seconds
    pub fn step_seconds(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Convert a wall-clock duration into whole ticks, rounding up
    pub fn ms_to_ticks(&self, ms: u32) -> Tick {
        (ms as u64 * self.tick_rate as u64).div_ceil(1000)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.tick_rate == 0 {
            return Err(DuelError::InvalidConfig("tick_rate must be positive".into()));
        }

        let arena = &self.arena;
        if arena.min_x >= arena.max_x || arena.min_y >= arena.max_y {
            return Err(DuelError::InvalidConfig(format!(
                "arena bounds inverted: x [{}, {}], y [{}, {}]",
                arena.min_x, arena.max_x, arena.min_y, arena.max_y
            )));
        }
        if arena.ground_y < arena.min_y || arena.ground_y > arena.max_y {
            return Err(DuelError::InvalidConfig(format!(
                "ground_y ({}) lies outside the arena",
                arena.ground_y
            )));
        }

        if self.body.width <= 0.0 || self.body.height <= 0.0 {
            return Err(DuelError::InvalidConfig("body dimensions must be positive".into()));
        }

        let fighter = &self.fighter;
        if fighter.max_hp <= 0.0
            || fighter.max_meter < 0.0
            || fighter.attack <= 0.0
            || fighter.defense <= 0.0
            || fighter.speed <= 0.0
        {
            return Err(DuelError::InvalidConfig(
                "fighter stats must be positive scalars".into(),
            ));
        }

        Ok(())
    }
}

/// Load and validate a config file
pub fn load_config(path: impl AsRef<Path>) -> Result<CombatConfig> {
    let contents = fs::read_to_string(path)?;
    CombatConfig::from_toml_str(&contents)
}
