//! Intent vocabulary shared by human input and the AI
//!
//! Every intent is gated by the receiving fighter (`can_act`, grounded
//! checks), so sending one never bypasses the state machine.

use serde::{Deserialize, Serialize};

use crate::combat::moves::MoveDescriptor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Start the given attack
    Attack(MoveDescriptor),
    /// Hold a horizontal direction: -1 left, 0 neutral, 1 right
    Move(i8),
    Block,
    ReleaseBlock,
    Jump,
}

impl Intent {
    pub fn move_left() -> Self {
        Intent::Move(-1)
    }

    pub fn move_right() -> Self {
        Intent::Move(1)
    }

    pub fn stop() -> Self {
        Intent::Move(0)
    }

    /// Walk toward `target_x` from `from_x`
    pub fn move_toward(from_x: f32, target_x: f32) -> Self {
        if target_x >= from_x {
            Intent::move_right()
        } else {
            Intent::move_left()
        }
    }

    /// Walk away from `threat_x`
    pub fn move_away(from_x: f32, threat_x: f32) -> Self {
        if threat_x > from_x {
            Intent::move_left()
        } else {
            Intent::move_right()
        }
    }

    /// Movement intents are held; everything else fires once
    pub fn is_continuous(&self) -> bool {
        matches!(self, Intent::Move(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Intent::Attack(_) => "attack",
            Intent::Move(0) => "stop",
            Intent::Move(_) => "move",
            Intent::Block => "block",
            Intent::ReleaseBlock => "release_block",
            Intent::Jump => "jump",
        }
    }
}
