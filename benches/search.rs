use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use battle_mcts::games::duel::DuelBuilder;
use battle_mcts::mcts::{MCTSConfig, MCTSSearch, RootParallelSearch};

fn bench_search(c: &mut Criterion) {
    let state = DuelBuilder::new().build(42);
    let mut group = c.benchmark_group("duel_search");

    for iterations in [100u32, 500, 2000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(iterations),
            &iterations,
            |b, &iterations| {
                b.iter(|| {
                    let mut search = MCTSSearch::new(MCTSConfig::default());
                    black_box(search.search(black_box(&state), iterations))
                })
            },
        );
    }

    group.finish();
}

fn bench_root_parallel(c: &mut Criterion) {
    let state = DuelBuilder::new().build(42);
    let config = MCTSConfig::default().with_iterations(2000).with_workers(4);

    c.bench_function("duel_root_parallel_2000x4", |b| {
        b.iter(|| {
            let mut search = RootParallelSearch::new(config.clone());
            black_box(search.decide(black_box(&state)))
        })
    });
}

criterion_group!(benches, bench_search, bench_root_parallel);
criterion_main!(benches);
