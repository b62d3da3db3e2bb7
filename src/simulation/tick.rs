//! Tick system - orchestrates one duel
//!
//! Each tick runs the same fixed sequence so hit detection always sees
//! post-movement, post-state positions:
//! fighter kinematics + state advance -> collision resolution -> AI observation
//!
//! Fighter One is always processed before Fighter Two.

use crate::ai::{AiPersonality, DecisionAgent, DuelAi};
use crate::combat::collision::{CollisionSystem, DebugGeometry};
use crate::combat::constants::SPAWN_OFFSET_X;
use crate::combat::events::{CombatEvent, CombatEventLog, CombatEventType, DuelOutcome};
use crate::combat::fighter::Fighter;
use crate::combat::moves::{MoveCatalog, MoveDescriptor};
use crate::core::config::CombatConfig;
use crate::core::error::Result;
use crate::core::types::{FighterSlot, Tick};
use crate::input::Intent;

/// Owns both fighters and everything needed to step them
#[derive(Debug)]
pub struct Duel {
    config: CombatConfig,
    fighters: [Fighter; 2],
    collision: CollisionSystem,
    agents: [Option<Box<dyn DuelAi>>; 2],
    catalog: MoveCatalog,
    tick: Tick,
    round: u32,
    outcome: DuelOutcome,
    /// Everything logged this round
    log: CombatEventLog,
}

impl Duel {
    /// Two default fighters spawned either side of the arena center, facing
    /// each other
    pub fn new(config: CombatConfig) -> Self {
        Self::with_names(config, "Player 1", "Player 2")
    }

    pub fn with_names(config: CombatConfig, one: &str, two: &str) -> Self {
        let center = config.arena.center_x();
        let fighters = [
            Fighter::new(one, center - SPAWN_OFFSET_X, true, &config),
            Fighter::new(two, center + SPAWN_OFFSET_X, false, &config),
        ];

        Self {
            collision: CollisionSystem::new(config.rules),
            config,
            fighters,
            agents: [None, None],
            catalog: MoveCatalog::with_defaults(),
            tick: 0,
            round: 1,
            outcome: DuelOutcome::InProgress,
            log: CombatEventLog::new(),
        }
    }

    /// Use `catalog` for move lookups (and for agents attached afterwards)
    pub fn with_catalog(mut self, catalog: MoveCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn catalog(&self) -> &MoveCatalog {
        &self.catalog
    }

    pub fn fighter(&self, slot: FighterSlot) -> &Fighter {
        &self.fighters[slot.index()]
    }

    pub fn fighter_mut(&mut self, slot: FighterSlot) -> &mut Fighter {
        &mut self.fighters[slot.index()]
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn outcome(&self) -> DuelOutcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_finished()
    }

    /// Events logged so far this round
    pub fn events(&self) -> &[CombatEvent] {
        &self.log.events
    }

    /// Hand control of `slot` to an AI, or back to input with `None`
    pub fn set_agent(&mut self, slot: FighterSlot, agent: Option<Box<dyn DuelAi>>) {
        self.agents[slot.index()] = agent;
    }

    /// Attach the stock decision agent, throwing the catalog's "light" and
    /// "heavy" moves when present
    pub fn attach_decision_agent(
        &mut self,
        slot: FighterSlot,
        personality: AiPersonality,
        seed: u64,
    ) {
        let light = self
            .catalog
            .get("light")
            .cloned()
            .unwrap_or_else(MoveDescriptor::light);
        let heavy = self
            .catalog
            .get("heavy")
            .cloned()
            .unwrap_or_else(MoveDescriptor::heavy);

        let agent =
            DecisionAgent::with_seed(personality, &self.config, seed).with_moves(light, heavy);
        self.set_agent(slot, Some(Box::new(agent)));
    }

    pub fn agent(&self, slot: FighterSlot) -> Option<&dyn DuelAi> {
        self.agents[slot.index()].as_deref()
    }

    /// Deliver an input intent to the fighter in `slot`
    pub fn apply_intent(&mut self, slot: FighterSlot, intent: &Intent) -> bool {
        self.fighters[slot.index()].apply_intent(intent)
    }

    /// Look up `move_id` in the catalog and request it for `slot`
    pub fn request_move(&mut self, slot: FighterSlot, move_id: &str) -> Result<bool> {
        let attack = self.catalog.require(move_id)?.clone();
        Ok(self.fighters[slot.index()].request_attack(attack))
    }

    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.collision.set_debug_mode(enabled);
    }

    pub fn debug_geometry(&self) -> Option<&DebugGeometry> {
        self.collision.debug_geometry()
    }

    /// Run a complete tick. Returns the events it produced; nothing happens
    /// once the round is decided.
    pub fn tick(&mut self) -> Vec<CombatEvent> {
        let mut events = CombatEventLog::new();

        if self.is_finished() {
            return events.drain();
        }

        // ===== PHASE 1: FIGHTERS =====
        self.phase_fighters(&mut events);

        // ===== PHASE 2: COLLISION =====
        self.phase_collision(&mut events);

        // ===== PHASE 3: AI =====
        self.phase_ai();

        // ===== PHASE 4: POST-TICK =====
        self.phase_post_tick(&mut events);

        self.log.events.extend(events.events.iter().cloned());
        events.drain()
    }

    fn phase_fighters(&mut self, events: &mut CombatEventLog) {
        let dt = self.config.step_seconds();
        for fighter in &mut self.fighters {
            fighter.update(dt);
        }
        self.collect_cues(events);
    }

    fn phase_collision(&mut self, events: &mut CombatEventLog) {
        let [one, two] = &mut self.fighters;
        self.collision.resolve(one, two, self.tick, events);
        self.collect_cues(events);
    }

    fn phase_ai(&mut self) {
        let [one, two] = &mut self.fighters;

        if let Some(agent) = self.agents[0].as_mut() {
            agent.observe(self.tick, one, two);
        }
        if let Some(agent) = self.agents[1].as_mut() {
            agent.observe(self.tick, two, one);
        }
    }

    fn phase_post_tick(&mut self, events: &mut CombatEventLog) {
        if let Some(outcome) = check_knockout(&self.fighters) {
            self.end_round(outcome, events);
        }

        self.tick += 1;
    }

    fn collect_cues(&mut self, events: &mut CombatEventLog) {
        for slot in FighterSlot::ALL {
            let fighter = &mut self.fighters[slot.index()];
            for cue in fighter.drain_cues() {
                events.push_cue(slot, cue, &fighter.name, self.tick);
            }
        }
    }

    fn end_round(&mut self, outcome: DuelOutcome, events: &mut CombatEventLog) {
        self.outcome = outcome;
        let description = match outcome.winner() {
            Some(slot) => format!("{} wins ({:?})", self.fighter(slot).name, outcome),
            None => format!("No winner ({:?})", outcome),
        };
        tracing::info!("Round {} ended at tick {}: {}", self.round, self.tick, description);
        events.push(CombatEventType::RoundEnded { outcome }, description, self.tick);
    }

    /// Decide an unfinished round on remaining HP fraction
    pub fn judge_time_up(&mut self) -> DuelOutcome {
        if self.is_finished() {
            return self.outcome;
        }

        let ratio = |f: &Fighter| f.hp() / f.max_hp();
        let (one, two) = (ratio(&self.fighters[0]), ratio(&self.fighters[1]));
        let winner = if one > two {
            Some(FighterSlot::One)
        } else if two > one {
            Some(FighterSlot::Two)
        } else {
            None
        };

        let mut events = CombatEventLog::new();
        self.end_round(DuelOutcome::TimeUp { winner }, &mut events);
        self.log.events.extend(events.drain());
        self.outcome
    }

    /// Tick until a knockout or `max_ticks` ticks into the round, then judge
    pub fn run_until_finished(&mut self, max_ticks: Tick) -> DuelOutcome {
        while !self.is_finished() && self.tick < max_ticks {
            self.tick();
        }
        self.judge_time_up()
    }

    /// Restore both fighters and agents for the next round
    pub fn reset_round(&mut self) {
        for (fighter, agent) in self.fighters.iter_mut().zip(self.agents.iter_mut()) {
            fighter.reset();
            if let Some(agent) = agent.as_mut() {
                agent.reset(fighter);
            }
        }
        self.collision.reset();
        self.outcome = DuelOutcome::InProgress;
        self.tick = 0;
        self.round += 1;
        self.log = CombatEventLog::new();
        tracing::debug!("Round {} begins", self.round);
    }
}

/// Round end by knockout, if any fighter is out
pub fn check_knockout(fighters: &[Fighter; 2]) -> Option<DuelOutcome> {
    match (fighters[0].is_knocked_out(), fighters[1].is_knocked_out()) {
        (true, true) => Some(DuelOutcome::DoubleKnockout),
        (false, true) => Some(DuelOutcome::Knockout {
            winner: FighterSlot::One,
        }),
        (true, false) => Some(DuelOutcome::Knockout {
            winner: FighterSlot::Two,
        }),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::moves::FrameData;
    use crate::combat::state::StateKind;

    fn close_duel() -> Duel {
        let mut duel = Duel::new(CombatConfig::default());
        // 80 units apart: inside the default hitbox reach
        duel.fighter_mut(FighterSlot::One).body.position.x = 900.0;
        duel.fighter_mut(FighterSlot::Two).body.position.x = 980.0;
        duel
    }

    #[test]
    fn test_spawn_positions() {
        let duel = Duel::new(CombatConfig::default());
        let one = duel.fighter(FighterSlot::One);
        let two = duel.fighter(FighterSlot::Two);
        assert_eq!(one.position().x, 660.0);
        assert_eq!(two.position().x, 1260.0);
        assert!(one.facing_right());
        assert!(!two.facing_right());
        assert_eq!(duel.outcome(), DuelOutcome::InProgress);
    }

    #[test]
    fn test_hit_produces_events() {
        let mut duel = close_duel();
        duel.request_move(FighterSlot::One, "light").expect("known move");

        let mut all = Vec::new();
        for _ in 0..10 {
            all.extend(duel.tick());
        }

        let hits: Vec<_> = all
            .iter()
            .filter(|e| matches!(e.event_type, CombatEventType::HitLanded { .. }))
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tick, 4);
        assert!(all
            .iter()
            .any(|e| e.event_type == CombatEventType::HitFlash { fighter: FighterSlot::Two }));
        assert_eq!(duel.events().len(), all.len());
    }

    #[test]
    fn test_unknown_move_is_error() {
        let mut duel = close_duel();
        assert!(duel.request_move(FighterSlot::One, "hadouken").is_err());
    }

    #[test]
    fn test_knockout_ends_round() {
        let mut duel = close_duel();
        duel.fighter_mut(FighterSlot::Two).body.current_hp = 3.0;
        duel.request_move(FighterSlot::One, "light").expect("known move");

        for _ in 0..10 {
            duel.tick();
        }
        assert_eq!(
            duel.outcome(),
            DuelOutcome::Knockout {
                winner: FighterSlot::One
            }
        );
        assert!(duel.fighter(FighterSlot::Two).is_in_state(StateKind::Downed));

        let finished_at = duel.current_tick();
        assert!(duel.tick().is_empty());
        assert_eq!(duel.current_tick(), finished_at);
        assert_eq!(
            duel.events()
                .iter()
                .filter(|e| matches!(e.event_type, CombatEventType::FighterKo { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_time_up_judged_on_hp_ratio() {
        let mut duel = Duel::new(CombatConfig::default());
        duel.fighter_mut(FighterSlot::One).body.current_hp = 40.0;
        let outcome = duel.run_until_finished(30);
        assert_eq!(
            outcome,
            DuelOutcome::TimeUp {
                winner: Some(FighterSlot::Two)
            }
        );
        assert_eq!(duel.current_tick(), 30);
    }

    #[test]
    fn test_time_up_tie() {
        let mut duel = Duel::new(CombatConfig::default());
        assert_eq!(
            duel.run_until_finished(5),
            DuelOutcome::TimeUp { winner: None }
        );
    }

    #[test]
    fn test_reset_round() {
        let mut duel = close_duel();
        duel.fighter_mut(FighterSlot::Two).body.current_hp = 3.0;
        duel.request_move(FighterSlot::One, "light").expect("known move");
        duel.run_until_finished(100);
        assert!(duel.is_finished());

        duel.reset_round();
        assert_eq!(duel.round(), 2);
        assert_eq!(duel.current_tick(), 0);
        assert!(!duel.is_finished());
        assert!(duel.events().is_empty());
        let two = duel.fighter(FighterSlot::Two);
        assert_eq!(two.hp(), 100.0);
        assert_eq!(two.position().x, 1260.0);
        assert!(two.is_in_state(StateKind::Idle));
    }

    #[test]
    fn test_intents_route_to_slot() {
        let mut duel = Duel::new(CombatConfig::default());
        assert!(duel.apply_intent(FighterSlot::Two, &Intent::move_left()));
        duel.tick();
        assert!(duel.fighter(FighterSlot::Two).is_in_state(StateKind::Moving));
        assert!(duel.fighter(FighterSlot::One).is_in_state(StateKind::Idle));
    }

    #[test]
    fn test_custom_catalog_move() {
        let mut catalog = MoveCatalog::with_defaults();
        catalog.add(
            "poke",
            MoveDescriptor::new("Poke", 4.0, FrameData::new(1, 1, 1)),
        );
        let mut duel = close_duel().with_catalog(catalog);
        assert!(duel.request_move(FighterSlot::One, "poke").expect("known move"));
        duel.tick();
        // 4 raw vs defense 10 floors at 1
        assert_eq!(duel.fighter(FighterSlot::Two).hp(), 99.0);
    }

    #[test]
    fn test_debug_geometry_exposed() {
        let mut duel = close_duel();
        assert!(duel.debug_geometry().is_none());
        duel.set_debug_mode(true);
        duel.tick();
        assert!(duel.debug_geometry().is_some());
    }

    #[test]
    fn test_agents_drive_fighters_together() {
        let mut duel = Duel::new(CombatConfig::default());
        duel.attach_decision_agent(FighterSlot::One, AiPersonality::default(), 1);
        duel.attach_decision_agent(FighterSlot::Two, AiPersonality::default(), 2);
        assert!(duel.agent(FighterSlot::One).is_some());

        for _ in 0..120 {
            duel.tick();
        }
        let gap = duel
            .fighter(FighterSlot::One)
            .position()
            .horizontal_distance(&duel.fighter(FighterSlot::Two).position());
        assert!(gap < 600.0);
    }
}
