//! Combat system constants - all tunable values in one place
//!
//! The damage-formula constants are fixed rules of the game. Everything else
//! seeds the defaults of `CombatConfig` and can be overridden from TOML.

// Time
pub const DEFAULT_TICK_RATE: u32 = 60;

// Frame counts
pub const DOWNED_RECOVERY_FRAMES: u32 = 60;
pub const DEFAULT_HITSTUN_FRAMES: u32 = 20;
pub const BASE_HITSTUN_FRAMES: u32 = 10;
pub const MAX_HITSTUN_FRAMES: u32 = 40;
pub const HITSTUN_DAMAGE_DIVISOR: f32 = 5.0;

// Damage formula (not configurable)
pub const MIN_DAMAGE: f32 = 1.0;
pub const DEFENSE_MITIGATION_RATIO: f32 = 0.5;
pub const BLOCK_DAMAGE_MULTIPLIER: f32 = 0.5;
pub const DEFENDER_METER_RATIO: f32 = 0.3;
pub const ATTACKER_METER_RATIO: f32 = 0.5;
pub const ATTACK_STAT_BASELINE: f32 = 10.0;

// Hit feedback
pub const DEFAULT_MOVE_DAMAGE: f32 = 10.0;
pub const HEAVY_HIT_THRESHOLD: f32 = 20.0;
pub const HEAVY_KNOCKBACK_DAMAGE: f32 = 20.0;
pub const LIGHT_KNOCKBACK: f32 = 100.0;
pub const HEAVY_KNOCKBACK: f32 = 200.0;

// Kinematics (arena units per second, per second squared)
pub const ACCELERATION: f32 = 1200.0;
pub const DECELERATION: f32 = 1800.0;
pub const GRAVITY: f32 = 1500.0;
pub const JUMP_VELOCITY: f32 = -600.0;
pub const MAX_FALL_SPEED: f32 = 800.0;
pub const STOP_THRESHOLD: f32 = 5.0;
pub const SNAP_THRESHOLD: f32 = 10.0;
pub const BLOCK_SPEED_MULTIPLIER: f32 = 0.5;

// Body geometry
pub const BODY_WIDTH: f32 = 60.0;
pub const BODY_HEIGHT: f32 = 160.0;
pub const HURTBOX_WIDTH_RATIO: f32 = 0.6;
pub const HURTBOX_HEIGHT_RATIO: f32 = 0.8;

// Default hitbox, relative to a right-facing fighter's feet
pub const DEFAULT_HITBOX_X: f32 = 50.0;
pub const DEFAULT_HITBOX_Y: f32 = -30.0;
pub const DEFAULT_HITBOX_WIDTH: f32 = 60.0;
pub const DEFAULT_HITBOX_HEIGHT: f32 = 40.0;

// Arena (1920x1080 stage)
pub const ARENA_MIN_X: f32 = 50.0;
pub const ARENA_MAX_X: f32 = 1870.0;
pub const ARENA_MIN_Y: f32 = 100.0;
pub const ARENA_MAX_Y: f32 = 980.0;
pub const GROUND_Y: f32 = 880.0;
pub const SPAWN_OFFSET_X: f32 = 300.0;

// Fighter defaults
pub const DEFAULT_MAX_HP: f32 = 100.0;
pub const DEFAULT_MAX_METER: f32 = 100.0;
pub const DEFAULT_ATTACK: f32 = 10.0;
pub const DEFAULT_DEFENSE: f32 = 10.0;
pub const DEFAULT_SPEED: f32 = 300.0;
