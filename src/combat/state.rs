//! Fighter states
//!
//! Every fighter is always in exactly one state. Each state owns its entry,
//! per-tick and exit behavior plus the rules for which states it may hand
//! control to. Frame counting lives in the state machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::combat::events::FighterCue;
use crate::combat::fighter::FighterBody;
use crate::combat::moves::{AttackPhase, MoveDescriptor};
use crate::core::error::DuelError;
use crate::core::types::Vec2;

/// Name-level identity of a state, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    Idle,
    Moving,
    Attacking,
    Blocking,
    Hit,
    Downed,
}

impl StateKind {
    pub const ALL: [StateKind; 6] = [
        StateKind::Idle,
        StateKind::Moving,
        StateKind::Attacking,
        StateKind::Blocking,
        StateKind::Hit,
        StateKind::Downed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StateKind::Idle => "idle",
            StateKind::Moving => "moving",
            StateKind::Attacking => "attacking",
            StateKind::Blocking => "blocking",
            StateKind::Hit => "hit",
            StateKind::Downed => "downed",
        }
    }

    /// States from which new attacks, blocks and jumps may be initiated
    pub fn can_act(&self) -> bool {
        matches!(
            self,
            StateKind::Idle | StateKind::Moving | StateKind::Blocking
        )
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StateKind {
    type Err = DuelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StateKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DuelError::UnknownState(s.to_string()))
    }
}

/// Payload for entering hitstun
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitReaction {
    /// Frames of hitstun; `None` uses the configured default
    pub hitstun_frames: Option<u32>,
    /// Instantaneous displacement applied on entry
    pub knockback: Vec2,
    /// Damage that caused the reaction, for diagnostics
    pub damage: f32,
}

/// A transition target together with the data the target state needs
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Idle,
    Moving,
    Attacking(MoveDescriptor),
    Blocking,
    Hit(HitReaction),
    Downed,
}

impl Transition {
    pub fn kind(&self) -> StateKind {
        match self {
            Transition::Idle => StateKind::Idle,
            Transition::Moving => StateKind::Moving,
            Transition::Attacking(_) => StateKind::Attacking,
            Transition::Blocking => StateKind::Blocking,
            Transition::Hit(_) => StateKind::Hit,
            Transition::Downed => StateKind::Downed,
        }
    }
}

/// Frame counts the machine needs to build states from transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTimings {
    pub downed_recovery_frames: u32,
    pub default_hitstun_frames: u32,
}

/// Active state with its payload
#[derive(Debug, Clone, PartialEq)]
pub enum FighterState {
    Idle,
    Moving,
    Attacking { attack: MoveDescriptor },
    Blocking,
    Hit { hitstun_frames: u32, knockback: Vec2 },
    Downed { recovery_frames: u32 },
}

impl FighterState {
    pub fn from_transition(transition: Transition, timings: &StateTimings) -> Self {
        match transition {
            Transition::Idle => FighterState::Idle,
            Transition::Moving => FighterState::Moving,
            Transition::Attacking(attack) => FighterState::Attacking { attack },
            Transition::Blocking => FighterState::Blocking,
            Transition::Hit(reaction) => FighterState::Hit {
                hitstun_frames: reaction
                    .hitstun_frames
                    .filter(|frames| *frames > 0)
                    .unwrap_or(timings.default_hitstun_frames),
                knockback: reaction.knockback,
            },
            Transition::Downed => FighterState::Downed {
                recovery_frames: timings.downed_recovery_frames,
            },
        }
    }

    pub fn kind(&self) -> StateKind {
        match self {
            FighterState::Idle => StateKind::Idle,
            FighterState::Moving => StateKind::Moving,
            FighterState::Attacking { .. } => StateKind::Attacking,
            FighterState::Blocking => StateKind::Blocking,
            FighterState::Hit { .. } => StateKind::Hit,
            FighterState::Downed { .. } => StateKind::Downed,
        }
    }

    /// Move being performed, if attacking
    pub fn current_move(&self) -> Option<&MoveDescriptor> {
        match self {
            FighterState::Attacking { attack } => Some(attack),
            _ => None,
        }
    }

    /// Legality of leaving this state for `target` after `frame_count`
    /// frames in it. `current_hp` gates getting up from a knockdown.
    pub fn permits(&self, frame_count: u32, target: StateKind, current_hp: f32) -> bool {
        use StateKind as K;

        match (self, target) {
            (FighterState::Idle, K::Downed) => false,
            (FighterState::Idle, _) => true,

            (FighterState::Moving, _) => true,

            (FighterState::Attacking { attack }, K::Idle) => frame_count >= attack.total_frames(),
            (FighterState::Attacking { .. }, K::Hit | K::Downed) => true,
            (FighterState::Attacking { .. }, _) => false,

            (FighterState::Blocking, _) => true,

            (FighterState::Hit { hitstun_frames, .. }, K::Idle) => frame_count >= *hitstun_frames,
            (FighterState::Hit { .. }, K::Downed) => true,
            (FighterState::Hit { .. }, _) => false,

            (FighterState::Downed { recovery_frames }, K::Idle) => {
                frame_count >= *recovery_frames && current_hp > 0.0
            }
            (FighterState::Downed { .. }, _) => false,
        }
    }

    pub(crate) fn enter(&self, body: &mut FighterBody) {
        match self {
            FighterState::Idle | FighterState::Moving => {}
            FighterState::Attacking { attack } => {
                tracing::debug!(
                    "Attacking with {}: {} total frames",
                    attack.name,
                    attack.total_frames()
                );
                set_attack_phase(body, attack.frames.phase_at(0));
            }
            FighterState::Blocking => {
                body.velocity.x = 0.0;
                body.is_blocking = true;
            }
            FighterState::Hit { knockback, .. } => {
                body.velocity = Vec2::ZERO;
                body.hitbox_active = false;
                body.attack_phase = AttackPhase::None;
                if !knockback.is_zero() {
                    body.position += *knockback;
                }
                body.cues.push(FighterCue::HitFlash);
            }
            FighterState::Downed { .. } => {
                body.velocity = Vec2::ZERO;
                body.hitbox_active = false;
                body.attack_phase = AttackPhase::None;
                body.is_vulnerable = false;
            }
        }
    }

    /// Per-tick behavior. `frame_count` has already been incremented.
    /// Returns the transition this state asks for, if any.
    pub(crate) fn update(
        &self,
        body: &mut FighterBody,
        frame_count: u32,
        dt: f32,
    ) -> Option<Transition> {
        match self {
            FighterState::Idle => {
                body.decay_horizontal(dt);
                None
            }
            FighterState::Moving => {
                let target = body.stats.speed * body.move_direction as f32;
                body.accelerate_toward(target, dt);
                if body.move_direction > 0 {
                    body.facing_right = true;
                } else if body.move_direction < 0 {
                    body.facing_right = false;
                }
                None
            }
            FighterState::Attacking { attack } => {
                body.decay_horizontal(dt);
                let phase = attack.frames.phase_at(frame_count);
                set_attack_phase(body, phase);
                if frame_count >= attack.total_frames() {
                    Some(Transition::Idle)
                } else {
                    None
                }
            }
            FighterState::Blocking => {
                let target = body.stats.speed
                    * body.move_direction as f32
                    * body.physics.block_speed_multiplier;
                body.accelerate_toward(target, dt);
                None
            }
            FighterState::Hit { hitstun_frames, .. } => {
                body.decay_horizontal(dt);
                (frame_count >= *hitstun_frames).then_some(Transition::Idle)
            }
            FighterState::Downed { recovery_frames } => {
                body.decay_horizontal(dt);
                // A knocked-out fighter stays down for the rest of the round
                (frame_count >= *recovery_frames && body.current_hp > 0.0)
                    .then_some(Transition::Idle)
            }
        }
    }

    pub(crate) fn exit(&self, body: &mut FighterBody) {
        match self {
            FighterState::Idle | FighterState::Hit { .. } => {}
            FighterState::Moving => {
                body.move_direction = 0;
            }
            FighterState::Attacking { .. } => {
                body.hitbox_active = false;
                body.attack_phase = AttackPhase::None;
            }
            FighterState::Blocking => {
                body.is_blocking = false;
            }
            FighterState::Downed { .. } => {
                body.is_vulnerable = true;
            }
        }
    }
}

fn set_attack_phase(body: &mut FighterBody, phase: AttackPhase) {
    body.attack_phase = phase;
    body.hitbox_active = phase == AttackPhase::Active;
}
