//! AI behavior integration tests
//!
//! Agents only act through intents, so these run full duels and inspect
//! the fighters and the event log.

use duel_core::ai::{load_personality, AiPersonality, Difficulty};
use duel_core::combat::{CombatEventType, StateKind};
use duel_core::core::config::CombatConfig;
use duel_core::{Duel, DuelOutcome, FighterSlot};

fn gap(duel: &Duel) -> f32 {
    duel.fighter(FighterSlot::One)
        .position()
        .horizontal_distance(&duel.fighter(FighterSlot::Two).position())
}

fn event_trace(duel: &Duel) -> Vec<(u64, String)> {
    duel.events()
        .iter()
        .map(|e| (e.tick, e.description.clone()))
        .collect()
}

#[test]
fn test_agent_closes_distance_to_idle_opponent() {
    let mut personality = AiPersonality::for_difficulty(Difficulty::Advanced);
    personality.behavior.aggressiveness = 0.0;

    let mut duel = Duel::new(CombatConfig::default());
    duel.attach_decision_agent(FighterSlot::One, personality, 3);
    assert_eq!(gap(&duel), 600.0);

    for _ in 0..300 {
        duel.tick();
    }

    // Settles inside the dead zone around its preferred range
    let settled = gap(&duel);
    assert!(settled < 200.0, "gap {settled}");
    assert_eq!(duel.fighter(FighterSlot::Two).hp(), 100.0);
}

#[test]
fn test_agent_damages_passive_opponent() {
    let mut duel = Duel::new(CombatConfig::default());
    let personality = AiPersonality::for_difficulty(Difficulty::Advanced);
    duel.attach_decision_agent(FighterSlot::One, personality, 11);

    for _ in 0..3600 {
        if duel.is_finished() {
            break;
        }
        duel.tick();
    }

    assert!(duel.fighter(FighterSlot::Two).hp() < 100.0);
    assert_eq!(duel.fighter(FighterSlot::One).hp(), 100.0);
    let p2_hits = duel.events().iter().filter(|e| {
        matches!(
            e.event_type,
            CombatEventType::HitLanded {
                attacker: FighterSlot::Two,
                ..
            }
        )
    });
    assert_eq!(p2_hits.count(), 0);
}

#[test]
fn test_guarding_agent_blocks_incoming_heavy() {
    let mut personality = AiPersonality::for_difficulty(Difficulty::Advanced);
    personality.behavior.aggressiveness = 0.0;
    personality.behavior.block_chance = 1.0;
    personality.timing.reaction_delay_ms = Some(0);

    let mut duel = Duel::new(CombatConfig::default());
    duel.fighter_mut(FighterSlot::One).body.position.x = 900.0;
    duel.fighter_mut(FighterSlot::Two).body.position.x = 980.0;
    duel.attach_decision_agent(FighterSlot::Two, personality, 5);

    duel.request_move(FighterSlot::One, "heavy").expect("built-in move");
    duel.tick();
    duel.tick();
    assert_eq!(
        duel.fighter(FighterSlot::Two).current_state(),
        StateKind::Blocking
    );

    for _ in 0..18 {
        duel.tick();
    }
    // Guarded: (25 - 5) * 0.5
    assert_eq!(duel.fighter(FighterSlot::Two).hp(), 90.0);
}

#[test]
fn test_same_seeds_replay_identically() {
    let run = || {
        let mut duel = Duel::new(CombatConfig::default());
        duel.attach_decision_agent(FighterSlot::One, AiPersonality::default(), 21);
        duel.attach_decision_agent(FighterSlot::Two, AiPersonality::default(), 22);
        let outcome = duel.run_until_finished(1800);
        (outcome, duel.current_tick(), event_trace(&duel))
    };

    assert_eq!(run(), run());
}

#[test]
fn test_ai_vs_ai_round_finishes() {
    let mut duel = Duel::new(CombatConfig::default());
    let beginner = AiPersonality::for_difficulty(Difficulty::Beginner);
    let advanced = AiPersonality::for_difficulty(Difficulty::Advanced);
    duel.attach_decision_agent(FighterSlot::One, beginner, 1);
    duel.attach_decision_agent(FighterSlot::Two, advanced, 2);

    let outcome = duel.run_until_finished(1200);
    assert!(outcome.is_finished());
    assert!(duel.current_tick() <= 1200);

    for slot in FighterSlot::ALL {
        let hp = duel.fighter(slot).hp();
        assert!((0.0..=100.0).contains(&hp));
    }
    if let DuelOutcome::Knockout { winner } = outcome {
        assert!(duel.fighter(winner.opponent()).is_knocked_out());
    }
}

#[test]
fn test_reset_round_resets_agents() {
    let mut duel = Duel::new(CombatConfig::default());
    duel.attach_decision_agent(FighterSlot::One, AiPersonality::default(), 9);

    for _ in 0..60 {
        duel.tick();
    }
    duel.reset_round();

    let one = duel.fighter(FighterSlot::One);
    assert_eq!(one.current_state(), StateKind::Idle);
    assert_eq!(one.position().x, 660.0);
    assert_eq!(one.body.move_direction, 0);
}

#[test]
fn test_shipped_personalities_differ() {
    let beginner = load_personality("beginner").expect("shipped file");
    let advanced = load_personality("advanced").expect("shipped file");
    assert!(beginner.reaction_delay_ms() > advanced.reaction_delay_ms());

    let turtle = load_personality("turtle").expect("shipped file");
    assert!(turtle.behavior.block_chance > beginner.behavior.block_chance);
}
