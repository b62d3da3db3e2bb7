//! AI personality configuration loaded from TOML
//!
//! A personality fixes the agent's odds (how often it blocks or swings),
//! its preferred spacing and its timing. Difficulty mostly controls the
//! reaction delay.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::error::{DuelError, Result};

/// Reaction-speed tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    /// Delay between deciding on an action and issuing it
    pub fn reaction_delay_ms(&self) -> u32 {
        match self {
            Difficulty::Beginner => 500,
            Difficulty::Intermediate => 300,
            Difficulty::Advanced => 150,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = DuelError;

    fn from_str(s: &str) -> Result<Self> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DuelError::InvalidConfig(format!("unknown difficulty: {}", s)))
    }
}

/// Odds used by the decision loop (0.0 to 1.0)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Chance to swing when in range and off cooldown
    pub aggressiveness: f32,
    /// Chance to block an incoming attack
    pub block_chance: f32,
    /// Share of swings that use the light attack
    pub light_attack_ratio: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            aggressiveness: 0.6,
            block_chance: 0.5,
            light_attack_ratio: 0.7,
        }
    }
}

/// Horizontal distances, arena units
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingConfig {
    /// Distance the agent tries to hold
    pub optimal_range: f32,
    /// Dead zone around `optimal_range` before approaching or retreating
    pub range_slack: f32,
    /// Swing only when closer than this
    pub attack_range: f32,
    /// React to an opponent's attack only when closer than this
    pub threat_range: f32,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            optimal_range: 100.0,
            range_slack: 50.0,
            attack_range: 120.0,
            threat_range: 150.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How often a new decision is made
    pub decision_interval_ms: u32,
    /// Minimum time between two decided attacks
    pub attack_cooldown_ms: u32,
    /// Overrides the difficulty's reaction delay when set
    pub reaction_delay_ms: Option<u32>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            decision_interval_ms: 100,
            attack_cooldown_ms: 300,
            reaction_delay_ms: None,
        }
    }
}

/// Complete AI personality configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiPersonality {
    /// Name of this personality (set from filename)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub behavior: BehaviorConfig,
    #[serde(default)]
    pub spacing: SpacingConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

impl Default for AiPersonality {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}

impl AiPersonality {
    /// Stock tuning at the given difficulty
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            name: difficulty.name().to_string(),
            difficulty,
            behavior: BehaviorConfig::default(),
            spacing: SpacingConfig::default(),
            timing: TimingConfig::default(),
        }
    }

    pub fn reaction_delay_ms(&self) -> u32 {
        self.timing
            .reaction_delay_ms
            .unwrap_or_else(|| self.difficulty.reaction_delay_ms())
    }

    pub fn validate(&self) -> Result<()> {
        let odds = [
            ("aggressiveness", self.behavior.aggressiveness),
            ("block_chance", self.behavior.block_chance),
            ("light_attack_ratio", self.behavior.light_attack_ratio),
        ];
        for (field, value) in odds {
            if !(0.0..=1.0).contains(&value) {
                return Err(DuelError::InvalidConfig(format!(
                    "personality {}: {} must lie in [0, 1], got {}",
                    self.name, field, value
                )));
            }
        }
        if self.timing.decision_interval_ms == 0 {
            return Err(DuelError::InvalidConfig(format!(
                "personality {}: decision_interval_ms must be positive",
                self.name
            )));
        }
        Ok(())
    }
}

/// Parse and validate a personality document
pub fn parse_personality(name: &str, contents: &str) -> Result<AiPersonality> {
    let mut personality: AiPersonality = toml::from_str(contents)?;
    personality.name = name.to_string();
    personality.validate()?;
    Ok(personality)
}

/// Load personality from TOML file
///
/// Loads from `data/ai_personalities/{name}.toml`
pub fn load_personality(name: &str) -> Result<AiPersonality> {
    load_personality_from(Path::new(PERSONALITY_DIR), name)
}

pub fn load_personality_from(dir: &Path, name: &str) -> Result<AiPersonality> {
    let path = personality_path(dir, name);
    let contents = fs::read_to_string(&path)?;
    parse_personality(name, &contents)
}

/// Load a personality by name, falling back to the difficulty preset of the
/// same name (or the default) when the file is missing or broken
pub fn load_personality_or_preset(name: &str) -> AiPersonality {
    match load_personality(name) {
        Ok(personality) => personality,
        Err(e) => {
            let difficulty = name.parse().unwrap_or_default();
            tracing::warn!(
                "Personality {:?} unavailable ({}), using {} preset",
                name,
                e,
                difficulty
            );
            AiPersonality::for_difficulty(difficulty)
        }
    }
}

const PERSONALITY_DIR: &str = "data/ai_personalities";

fn personality_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.toml", name))
}
