//! Benchmarks for exact and sampled reel evaluation.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use slot_tuner::{
    compute::{
        ExactEvaluator, Simulator, SlotMachine,
        search::{ReelRng, ReelSearch},
    },
    schema::{MutationWeights, SearchConfig},
};

fn machine_with_length(length: usize) -> SlotMachine {
    let mut rng = ReelRng::new(42, &MutationWeights::default(), (2, 4)).unwrap();
    let reels = rng.random_triple((length, length));
    SlotMachine::new(reels, 1.0).unwrap()
}

fn bench_exact(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_evaluator");

    for length in [8, 11, 14, 32] {
        let machine = machine_with_length(length);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}^3", length)),
            &length,
            |b, _| {
                b.iter(|| ExactEvaluator::new(black_box(&machine)).run().unwrap());
            },
        );
    }

    group.finish();
}

fn bench_simulator(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulator");
    let machine = machine_with_length(12);

    for spins in [10_000u64, 50_000] {
        group.bench_with_input(BenchmarkId::from_parameter(spins), &spins, |b, &spins| {
            b.iter(|| Simulator::new(black_box(&machine), 7).run(spins).unwrap());
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    let config = SearchConfig {
        max_steps: 50,
        spins_per_eval: 5_000,
        seed: Some(1337),
        ..Default::default()
    };

    group.bench_function("50_steps_5k_spins", |b| {
        b.iter(|| {
            ReelSearch::new(black_box(config.clone()))
                .unwrap()
                .run()
                .unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_exact, bench_simulator, bench_search);
criterion_main!(benches);
