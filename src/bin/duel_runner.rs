//! Headless Duel Runner
//!
//! Runs AI vs AI rounds and prints the result as JSON or text.

use std::path::PathBuf;

use clap::Parser;
use duel_core::ai::load_personality_or_preset;
use duel_core::combat::{CombatEventType, MoveCatalog};
use duel_core::core::config::load_config;
use duel_core::{CombatConfig, Duel, DuelOutcome, FighterSlot, Result};
use serde::Serialize;

/// Headless Duel Runner - AI vs AI rounds
#[derive(Parser, Debug)]
#[command(name = "duel_runner")]
#[command(about = "Run AI vs AI duels and report the outcome")]
struct Args {
    /// Player 1 personality (data/ai_personalities/<name>.toml or a difficulty)
    #[arg(long, default_value = "intermediate")]
    p1: String,

    /// Player 2 personality (data/ai_personalities/<name>.toml or a difficulty)
    #[arg(long, default_value = "intermediate")]
    p2: String,

    /// Maximum ticks per round before judging on remaining HP
    #[arg(long, default_value_t = 5400)]
    max_ticks: u64,

    /// Number of rounds to play
    #[arg(long, default_value_t = 1)]
    rounds: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Combat config TOML (defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Move catalog TOML
    #[arg(long, default_value = "data/moves.toml")]
    moves: PathBuf,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print every combat event to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Per-round output
#[derive(Serialize)]
struct RoundResult {
    round: u32,
    outcome: DuelOutcome,
    winner: Option<String>,
    ticks: u64,
    p1_hp: f32,
    p2_hp: f32,
    p1_hits: usize,
    p2_hits: usize,
    p1_damage_dealt: f32,
    p2_damage_dealt: f32,
}

/// JSON output structure
#[derive(Serialize)]
struct DuelReport {
    p1_personality: String,
    p2_personality: String,
    seed: u64,
    rounds: Vec<RoundResult>,
    p1_round_wins: u32,
    p2_round_wins: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("duel_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => CombatConfig::default(),
    };

    let catalog = MoveCatalog::load_from_toml(&args.moves).unwrap_or_else(|e| {
        tracing::warn!("Failed to load moves from {:?}: {}, using built-ins", args.moves, e);
        MoveCatalog::with_defaults()
    });

    let p1_personality = load_personality_or_preset(&args.p1);
    let p2_personality = load_personality_or_preset(&args.p2);

    let mut duel = Duel::with_names(config, &p1_personality.name, &p2_personality.name)
        .with_catalog(catalog);
    duel.attach_decision_agent(FighterSlot::One, p1_personality.clone(), seed);
    duel.attach_decision_agent(FighterSlot::Two, p2_personality.clone(), seed.wrapping_add(1));

    let mut rounds = Vec::new();
    for round in 1..=args.rounds.max(1) {
        if round > 1 {
            duel.reset_round();
        }

        while !duel.is_finished() && duel.current_tick() < args.max_ticks {
            let events = duel.tick();
            if args.verbose {
                for event in &events {
                    eprintln!(
                        "  [{}] {:?}: {}",
                        event.tick, event.event_type, event.description
                    );
                }
            }
        }
        duel.judge_time_up();

        rounds.push(summarize(round, &duel));
    }

    let count_wins = |slot: FighterSlot| {
        rounds
            .iter()
            .filter(|r| r.outcome.winner() == Some(slot))
            .count() as u32
    };
    let report = DuelReport {
        p1_round_wins: count_wins(FighterSlot::One),
        p2_round_wins: count_wins(FighterSlot::Two),
        p1_personality: p1_personality.name,
        p2_personality: p2_personality.name,
        seed,
        rounds,
    };

    match args.format.as_str() {
        "text" => print_text(&report),
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn summarize(round: u32, duel: &Duel) -> RoundResult {
    let mut hits = [0usize; 2];
    let mut dealt = [0.0f32; 2];
    for event in duel.events() {
        if let CombatEventType::HitLanded {
            attacker, damage, ..
        } = event.event_type
        {
            hits[attacker.index()] += 1;
            dealt[attacker.index()] += damage;
        }
    }

    let outcome = duel.outcome();
    RoundResult {
        round,
        outcome,
        winner: outcome
            .winner()
            .map(|slot| duel.fighter(slot).name.clone()),
        ticks: duel.current_tick(),
        p1_hp: duel.fighter(FighterSlot::One).hp(),
        p2_hp: duel.fighter(FighterSlot::Two).hp(),
        p1_hits: hits[0],
        p2_hits: hits[1],
        p1_damage_dealt: dealt[0],
        p2_damage_dealt: dealt[1],
    }
}

fn print_text(report: &DuelReport) {
    println!("Duel Result");
    println!("===========");
    println!(
        "Personalities: {} vs {}",
        report.p1_personality, report.p2_personality
    );
    println!("Seed: {}", report.seed);
    println!();
    for round in &report.rounds {
        println!(
            "Round {}: {} after {} ticks",
            round.round,
            round.winner.as_deref().unwrap_or("no winner"),
            round.ticks
        );
        println!(
            "  HP left: {:.1} / {:.1}   hits: {} / {}   damage: {:.1} / {:.1}",
            round.p1_hp,
            round.p2_hp,
            round.p1_hits,
            round.p2_hits,
            round.p1_damage_dealt,
            round.p2_damage_dealt
        );
    }
    println!();
    println!(
        "Rounds won: {} {} - {} {}",
        report.p1_personality, report.p1_round_wins, report.p2_round_wins, report.p2_personality
    );
}
