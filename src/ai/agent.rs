//! Decision agent: drives one fighter through the same intents a player sends
//!
//! Every `decision_interval` the agent reads the distance and the opponent's
//! state and picks one action. The action is held for the reaction delay
//! before it is issued. Movement decisions are re-sent every tick while they
//! stand; attacks and guard changes fire once.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::ai::personality::AiPersonality;
use crate::ai::DuelAi;
use crate::combat::fighter::Fighter;
use crate::combat::moves::MoveDescriptor;
use crate::combat::state::StateKind;
use crate::core::config::CombatConfig;
use crate::core::types::Tick;
use crate::input::Intent;

/// What the agent decided to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiAction {
    Block,
    AttackLight,
    AttackHeavy,
    Approach,
    Retreat,
    StopBlock,
    Idle,
}

/// The standing decision that shapes per-tick intents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stance {
    Approaching,
    Retreating,
    Attacking,
    Blocking,
}

/// An action waiting out the reaction delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledIntent {
    pub action: AiAction,
    pub due_tick: Tick,
}

/// Tick-based timing derived from the personality's millisecond values
#[derive(Debug, Clone, Copy)]
struct Cadence {
    decision_interval: Tick,
    reaction_delay: Tick,
    attack_cooldown: Tick,
}

#[derive(Debug, Clone)]
pub struct DecisionAgent {
    personality: AiPersonality,
    cadence: Cadence,
    light_attack: MoveDescriptor,
    heavy_attack: MoveDescriptor,
    rng: ChaCha8Rng,
    last_decision_tick: Option<Tick>,
    /// No new attack is decided before this tick
    attack_ready_tick: Tick,
    scheduled: Option<ScheduledIntent>,
    stance: Option<Stance>,
    decisions_made: u32,
}

impl DecisionAgent {
    /// Create an agent with the default seed
    pub fn new(personality: AiPersonality, config: &CombatConfig) -> Self {
        Self::with_seed(personality, config, 42)
    }

    /// Create with specific RNG seed for deterministic behavior
    pub fn with_seed(personality: AiPersonality, config: &CombatConfig, seed: u64) -> Self {
        let cadence = Cadence {
            // A zero interval would mean deciding every tick
            decision_interval: config
                .ms_to_ticks(personality.timing.decision_interval_ms)
                .max(1),
            reaction_delay: config.ms_to_ticks(personality.reaction_delay_ms()),
            attack_cooldown: config.ms_to_ticks(personality.timing.attack_cooldown_ms),
        };
        tracing::debug!(
            "AI '{}' ({}): decide every {} ticks, react after {} ticks",
            personality.name,
            personality.difficulty,
            cadence.decision_interval,
            cadence.reaction_delay
        );

        Self {
            personality,
            cadence,
            light_attack: MoveDescriptor::light(),
            heavy_attack: MoveDescriptor::heavy(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            last_decision_tick: None,
            attack_ready_tick: 0,
            scheduled: None,
            stance: None,
            decisions_made: 0,
        }
    }

    /// Replace the light/heavy moves the agent throws
    pub fn with_moves(mut self, light: MoveDescriptor, heavy: MoveDescriptor) -> Self {
        self.light_attack = light;
        self.heavy_attack = heavy;
        self
    }

    pub fn stance(&self) -> Option<Stance> {
        self.stance
    }

    pub fn scheduled(&self) -> Option<&ScheduledIntent> {
        self.scheduled.as_ref()
    }

    pub fn decisions_made(&self) -> u32 {
        self.decisions_made
    }

    pub fn reaction_delay_ticks(&self) -> Tick {
        self.cadence.reaction_delay
    }

    pub fn decision_interval_ticks(&self) -> Tick {
        self.cadence.decision_interval
    }

    /// Should we re-evaluate this tick?
    fn should_decide(&self, tick: Tick) -> bool {
        match self.last_decision_tick {
            None => true,
            Some(last) => tick >= last + self.cadence.decision_interval,
        }
    }

    fn roll(&mut self, chance: f32) -> bool {
        self.rng.gen::<f32>() < chance
    }

    /// Pick an action by priority: guard against an incoming attack, swing,
    /// close in, back off, drop the guard, stand still
    fn decide(&mut self, tick: Tick, me: &Fighter, opponent: &Fighter) -> Option<AiAction> {
        if !me.can_act() {
            self.stance = None;
            return None;
        }

        let distance = me.position().horizontal_distance(&opponent.position());
        let spacing = &self.personality.spacing;
        let (threat_range, attack_range) = (spacing.threat_range, spacing.attack_range);
        let (near, far) = (
            spacing.optimal_range - spacing.range_slack,
            spacing.optimal_range + spacing.range_slack,
        );
        let behavior = self.personality.behavior.clone();

        if opponent.is_in_state(StateKind::Attacking)
            && distance < threat_range
            && self.roll(behavior.block_chance)
        {
            return Some(AiAction::Block);
        }

        if distance < attack_range
            && tick >= self.attack_ready_tick
            && self.roll(behavior.aggressiveness)
        {
            self.attack_ready_tick = tick + self.cadence.attack_cooldown;
            return Some(if self.roll(behavior.light_attack_ratio) {
                AiAction::AttackLight
            } else {
                AiAction::AttackHeavy
            });
        }

        if distance > far {
            return Some(AiAction::Approach);
        }
        if distance < near {
            return Some(AiAction::Retreat);
        }
        if me.is_in_state(StateKind::Blocking) {
            return Some(AiAction::StopBlock);
        }
        Some(AiAction::Idle)
    }

    fn execute(&mut self, action: AiAction, me: &mut Fighter) {
        tracing::debug!("AI {} executes {:?}", me.name, action);
        match action {
            AiAction::AttackLight => {
                me.apply_intent(&Intent::Attack(self.light_attack.clone()));
                self.stance = Some(Stance::Attacking);
            }
            AiAction::AttackHeavy => {
                me.apply_intent(&Intent::Attack(self.heavy_attack.clone()));
                self.stance = Some(Stance::Attacking);
            }
            AiAction::Block => {
                if !me.is_in_state(StateKind::Blocking) {
                    me.apply_intent(&Intent::Block);
                    self.stance = Some(Stance::Blocking);
                }
            }
            AiAction::StopBlock => {
                if me.is_in_state(StateKind::Blocking) {
                    me.apply_intent(&Intent::ReleaseBlock);
                    self.stance = None;
                }
            }
            AiAction::Approach => self.stance = Some(Stance::Approaching),
            AiAction::Retreat => self.stance = Some(Stance::Retreating),
            AiAction::Idle => self.stance = None,
        }
    }

    /// Re-send movement for the standing decision
    fn hold_stance(&self, me: &mut Fighter, opponent: &Fighter) {
        let (from, other) = (me.position().x, opponent.position().x);
        match self.stance {
            Some(Stance::Approaching) => {
                me.apply_intent(&Intent::move_toward(from, other));
            }
            Some(Stance::Retreating) => {
                me.apply_intent(&Intent::move_away(from, other));
            }
            Some(Stance::Attacking) | Some(Stance::Blocking) => {}
            None => {
                me.apply_intent(&Intent::stop());
            }
        }
    }
}

impl DuelAi for DecisionAgent {
    fn observe(&mut self, tick: Tick, me: &mut Fighter, opponent: &Fighter) {
        if let Some(scheduled) = self.scheduled {
            if tick >= scheduled.due_tick {
                self.scheduled = None;
                self.execute(scheduled.action, me);
            }
        }

        // A scheduled action is never replaced before it fires
        if self.scheduled.is_none() && self.should_decide(tick) {
            self.last_decision_tick = Some(tick);
            if let Some(action) = self.decide(tick, me, opponent) {
                self.decisions_made += 1;
                tracing::trace!("AI {} decided {:?} at tick {}", me.name, action, tick);
                self.scheduled = Some(ScheduledIntent {
                    action,
                    due_tick: tick + self.cadence.reaction_delay,
                });
            }
        }

        self.hold_stance(me, opponent);
    }

    fn reset(&mut self, me: &mut Fighter) {
        self.last_decision_tick = None;
        self.attack_ready_tick = 0;
        self.scheduled = None;
        self.stance = None;
        me.apply_intent(&Intent::stop());
    }

    fn personality(&self) -> &AiPersonality {
        &self.personality
    }
}
