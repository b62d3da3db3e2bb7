//! Combat events and feedback cues
//!
//! The core never schedules its own visual effects. It records what happened
//! and the rendering/audio collaborator drains the log after each tick.

use serde::{Deserialize, Serialize};

use crate::core::types::{FighterSlot, Tick};

/// Feedback a fighter raises about itself during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FighterCue {
    /// Brief tint flash on entering hitstun
    HitFlash,
    /// HP reached zero
    KnockedOut,
}

/// How a round was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelOutcome {
    InProgress,
    Knockout { winner: FighterSlot },
    DoubleKnockout,
    /// Tick limit reached; higher remaining HP fraction wins, `None` on a tie
    TimeUp { winner: Option<FighterSlot> },
}

impl DuelOutcome {
    pub fn is_finished(&self) -> bool {
        !matches!(self, DuelOutcome::InProgress)
    }

    pub fn winner(&self) -> Option<FighterSlot> {
        match self {
            DuelOutcome::Knockout { winner } => Some(*winner),
            DuelOutcome::TimeUp { winner } => *winner,
            DuelOutcome::InProgress | DuelOutcome::DoubleKnockout => None,
        }
    }
}

/// Log entry for combat events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatEvent {
    pub tick: Tick,
    pub event_type: CombatEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEventType {
    HitLanded {
        attacker: FighterSlot,
        defender: FighterSlot,
        damage: f32,
        /// Damage above the heavy-hit threshold (camera shake territory)
        heavy: bool,
    },
    HitFlash { fighter: FighterSlot },
    FighterKo { fighter: FighterSlot },
    RoundEnded { outcome: DuelOutcome },
}

/// Events accumulated since the last drain
#[derive(Debug, Clone, Default)]
pub struct CombatEventLog {
    pub events: Vec<CombatEvent>,
}

impl CombatEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: CombatEventType, description: String, tick: Tick) {
        self.events.push(CombatEvent {
            tick,
            event_type,
            description,
        });
    }

    /// Record a fighter cue under the fighter's slot
    pub fn push_cue(&mut self, slot: FighterSlot, cue: FighterCue, name: &str, tick: Tick) {
        match cue {
            FighterCue::HitFlash => self.push(
                CombatEventType::HitFlash { fighter: slot },
                format!("{} flashes", name),
                tick,
            ),
            FighterCue::KnockedOut => self.push(
                CombatEventType::FighterKo { fighter: slot },
                format!("{} is knocked out", name),
                tick,
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hits landed by `attacker`
    pub fn hits_by(&self, attacker: FighterSlot) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter().filter(move |e| {
            matches!(e.event_type, CombatEventType::HitLanded { attacker: a, .. } if a == attacker)
        })
    }

    pub fn knockouts(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e.event_type, CombatEventType::FighterKo { .. }))
    }
}
