//! Computer-controlled fighters
//!
//! Architecture: Trait + Data hybrid
//! - DuelAi trait defines interface for swappable implementations
//! - AiPersonality struct holds TOML-loaded odds, spacing and timing
//! - DecisionAgent is the stock implementation

pub mod agent;
pub mod personality;

pub use agent::{AiAction, DecisionAgent, ScheduledIntent, Stance};
pub use personality::{
    load_personality, load_personality_or_preset, parse_personality, AiPersonality, Difficulty,
};

use crate::combat::fighter::Fighter;
use crate::core::types::Tick;

/// Trait for duel AI implementations
pub trait DuelAi: std::fmt::Debug {
    /// Called once per tick after collision resolution. Acts on `me` only
    /// through the intent vocabulary.
    fn observe(&mut self, tick: Tick, me: &mut Fighter, opponent: &Fighter);

    /// Forget in-flight decisions (round restart)
    fn reset(&mut self, me: &mut Fighter);

    /// Get the personality configuration
    fn personality(&self) -> &AiPersonality;
}
