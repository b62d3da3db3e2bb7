use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use duel_core::ai::{AiPersonality, Difficulty};
use duel_core::{CombatConfig, Duel, FighterSlot};

fn ai_duel() -> Duel {
    let mut duel = Duel::new(CombatConfig::default());
    duel.attach_decision_agent(
        FighterSlot::One,
        AiPersonality::for_difficulty(Difficulty::Advanced),
        1,
    );
    duel.attach_decision_agent(
        FighterSlot::Two,
        AiPersonality::for_difficulty(Difficulty::Intermediate),
        2,
    );
    duel
}

fn bench_single_tick(c: &mut Criterion) {
    c.bench_function("duel_tick", |b| {
        b.iter_batched(
            ai_duel,
            |mut duel| {
                black_box(duel.tick());
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_full_round(c: &mut Criterion) {
    c.bench_function("duel_round_3600_ticks", |b| {
        b.iter_batched(
            ai_duel,
            |mut duel| black_box(duel.run_until_finished(3600)),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_single_tick, bench_full_round);
criterion_main!(benches);
