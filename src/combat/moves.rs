//! Move catalog: static attack descriptions
//!
//! Moves carry no logic. The attacking state reads their frame data, the
//! collision system reads their damage and hitbox.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::constants::{
    DEFAULT_HITBOX_HEIGHT, DEFAULT_HITBOX_WIDTH, DEFAULT_HITBOX_X, DEFAULT_HITBOX_Y,
};
use crate::core::error::{DuelError, Result};

/// Which part of an attack the fighter is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AttackPhase {
    /// Not attacking
    #[default]
    None,
    /// Windup, no hitbox
    Startup,
    /// Damage window, hitbox live
    Active,
    /// Cooldown, no hitbox
    Recovery,
}

impl AttackPhase {
    pub fn name(&self) -> &'static str {
        match self {
            AttackPhase::None => "none",
            AttackPhase::Startup => "startup",
            AttackPhase::Active => "active",
            AttackPhase::Recovery => "recovery",
        }
    }
}

/// Frame triple of an attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct FrameData {
    pub startup: u32,
    pub active: u32,
    pub recovery: u32,
}

impl FrameData {
    pub fn new(startup: u32, active: u32, recovery: u32) -> Self {
        Self {
            startup,
            active,
            recovery,
        }
    }

    /// Frame at which the hitbox turns on
    pub fn active_start(&self) -> u32 {
        self.startup
    }

    /// First frame of recovery
    pub fn active_end(&self) -> u32 {
        self.startup + self.active
    }

    pub fn total(&self) -> u32 {
        self.startup + self.active + self.recovery
    }

    /// Phase at a given frame count since the attack began.
    /// `AttackPhase::None` once the attack has run its full length.
    pub fn phase_at(&self, frame: u32) -> AttackPhase {
        if frame < self.active_start() {
            AttackPhase::Startup
        } else if frame < self.active_end() {
            AttackPhase::Active
        } else if frame < self.total() {
            AttackPhase::Recovery
        } else {
            AttackPhase::None
        }
    }
}

/// Hitbox rectangle relative to a right-facing fighter's feet.
/// Mirrored horizontally when the fighter faces left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitboxRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for HitboxRect {
    fn default() -> Self {
        Self {
            x: DEFAULT_HITBOX_X,
            y: DEFAULT_HITBOX_Y,
            width: DEFAULT_HITBOX_WIDTH,
            height: DEFAULT_HITBOX_HEIGHT,
        }
    }
}

impl HitboxRect {
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Immutable description of one attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveDescriptor {
    pub name: String,
    /// Base damage before the attacker's attack stat is applied
    #[serde(default)]
    pub damage: f32,
    pub frames: FrameData,
    #[serde(default)]
    pub hitbox: Option<HitboxRect>,
    /// Passed through to the renderer, never read by the core
    #[serde(default)]
    pub animation_key: Option<String>,
    /// Landing this move knocks the defender down
    #[serde(default)]
    pub knockdown: bool,
}

impl MoveDescriptor {
    pub fn new(name: impl Into<String>, damage: f32, frames: FrameData) -> Self {
        Self {
            name: name.into(),
            damage,
            frames,
            hitbox: None,
            animation_key: None,
            knockdown: false,
        }
    }

    pub fn with_hitbox(mut self, hitbox: HitboxRect) -> Self {
        self.hitbox = Some(hitbox);
        self
    }

    pub fn with_animation(mut self, key: impl Into<String>) -> Self {
        self.animation_key = Some(key.into());
        self
    }

    pub fn with_knockdown(mut self) -> Self {
        self.knockdown = true;
        self
    }

    /// 10 damage, 5/3/7 frames
    pub fn light() -> Self {
        Self::new("Light Attack", 10.0, FrameData::new(5, 3, 7)).with_animation("generic_light")
    }

    /// 25 damage, 12/5/15 frames
    pub fn heavy() -> Self {
        Self::new("Heavy Attack", 25.0, FrameData::new(12, 5, 15)).with_animation("generic_heavy")
    }

    pub fn total_frames(&self) -> u32 {
        self.frames.total()
    }

    /// Base damage, substituting `fallback` for missing or malformed values
    pub fn base_damage_or(&self, fallback: f32) -> f32 {
        if self.damage.is_finite() && self.damage > 0.0 {
            self.damage
        } else {
            tracing::warn!(
                "Move '{}' has unusable damage {}, using {}",
                self.name,
                self.damage,
                fallback
            );
            fallback
        }
    }

    /// Hitbox, substituting `fallback` when the move specifies none
    pub fn hitbox_or(&self, fallback: HitboxRect) -> HitboxRect {
        match self.hitbox {
            Some(hitbox) if !hitbox.is_degenerate() => hitbox,
            _ => fallback,
        }
    }
}

/// A catalog entry: lookup id plus descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(flatten)]
    pub descriptor: MoveDescriptor,
}

/// Collection of moves available to fighters
#[derive(Debug, Clone, Default)]
pub struct MoveCatalog {
    entries: Vec<CatalogEntry>,
}

/// TOML representation of a moves file
#[derive(Debug, Deserialize)]
struct TomlMoves {
    moves: Vec<CatalogEntry>,
}

impl MoveCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard light/heavy pair
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.add("light", MoveDescriptor::light());
        catalog.add("heavy", MoveDescriptor::heavy());
        catalog
    }

    /// Add a move, replacing any existing move with the same id
    pub fn add(&mut self, id: impl Into<String>, descriptor: MoveDescriptor) {
        let id = id.into();
        self.entries.retain(|e| e.id != id);
        self.entries.push(CatalogEntry { id, descriptor });
    }

    pub fn get(&self, id: &str) -> Option<&MoveDescriptor> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| &e.descriptor)
    }

    /// Lookup that reports unknown ids as an error
    pub fn require(&self, id: &str) -> Result<&MoveDescriptor> {
        self.get(id)
            .ok_or_else(|| DuelError::UnknownMove(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse moves from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let toml_data: TomlMoves = toml::from_str(content)?;

        let mut catalog = Self::new();
        for entry in toml_data.moves {
            catalog.add(entry.id, entry.descriptor);
        }
        Ok(catalog)
    }

    /// Load moves from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_boundaries() {
        let frames = FrameData::new(5, 3, 7);
        assert_eq!(frames.total(), 15);
        assert_eq!(frames.phase_at(0), AttackPhase::Startup);
        assert_eq!(frames.phase_at(4), AttackPhase::Startup);
        assert_eq!(frames.phase_at(5), AttackPhase::Active);
        assert_eq!(frames.phase_at(7), AttackPhase::Active);
        assert_eq!(frames.phase_at(8), AttackPhase::Recovery);
        assert_eq!(frames.phase_at(14), AttackPhase::Recovery);
        assert_eq!(frames.phase_at(15), AttackPhase::None);
    }

    #[test]
    fn test_zero_startup_is_immediately_active() {
        let frames = FrameData::new(0, 2, 0);
        assert_eq!(frames.phase_at(0), AttackPhase::Active);
        assert_eq!(frames.phase_at(2), AttackPhase::None);
    }

    #[test]
    fn test_damage_fallback() {
        let mut descriptor = MoveDescriptor::light();
        assert_eq!(descriptor.base_damage_or(10.0), 10.0);

        descriptor.damage = 0.0;
        assert_eq!(descriptor.base_damage_or(12.0), 12.0);

        descriptor.damage = f32::NAN;
        assert_eq!(descriptor.base_damage_or(12.0), 12.0);
    }

    #[test]
    fn test_hitbox_fallback() {
        let fallback = HitboxRect::default();
        let plain = MoveDescriptor::heavy();
        assert_eq!(plain.hitbox_or(fallback), fallback);

        let custom = HitboxRect {
            x: 20.0,
            y: -100.0,
            width: 90.0,
            height: 30.0,
        };
        assert_eq!(plain.clone().with_hitbox(custom).hitbox_or(fallback), custom);

        let broken = HitboxRect {
            width: 0.0,
            ..custom
        };
        assert_eq!(plain.with_hitbox(broken).hitbox_or(fallback), fallback);
    }

    #[test]
    fn test_catalog_defaults() {
        let catalog = MoveCatalog::with_defaults();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("light").map(|m| m.damage), Some(10.0));
        assert_eq!(catalog.get("heavy").map(|m| m.total_frames()), Some(32));
        assert!(matches!(
            catalog.require("uppercut"),
            Err(DuelError::UnknownMove(_))
        ));
    }

    #[test]
    fn test_parse_toml_catalog() {
        let catalog = MoveCatalog::parse_toml(
            r#"
            [[moves]]
            id = "sweep"
            name = "Sweep"
            damage = 14.0
            knockdown = true
            frames = { startup = 8, active = 4, recovery = 18 }
            hitbox = { x = 30.0, y = -20.0, width = 80.0, height = 20.0 }

            [[moves]]
            id = "jab"
            name = "Jab"
            frames = { startup = 3, active = 2, recovery = 5 }
            "#,
        )
        .expect("catalog should parse");

        let sweep = catalog.get("sweep").expect("sweep present");
        assert!(sweep.knockdown);
        assert_eq!(sweep.total_frames(), 30);
        assert!(sweep.hitbox.is_some());

        let jab = catalog.get("jab").expect("jab present");
        assert_eq!(jab.damage, 0.0);
        assert!(jab.hitbox.is_none());
        assert!(jab.animation_key.is_none());
    }

    #[test]
    fn test_add_replaces_same_id() {
        let mut catalog = MoveCatalog::with_defaults();
        catalog.add("light", MoveDescriptor::new("Quick Jab", 6.0, FrameData::new(3, 2, 4)));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("light").map(|m| m.name.as_str()), Some("Quick Jab"));
    }
}
