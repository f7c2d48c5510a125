//! Controller benchmarks for swarm_core.
//!
//! Run with: `cargo bench -p swarm_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use swarm_arena::entity::Side;
use swarm_core::roles::classify;
use swarm_core::world::WorldQuery;
use swarm_test_utils::fixtures::MatchFixture;

/// A fixture a little way into the match, with carriers and an army forming.
fn warmed_up() -> MatchFixture {
    let mut fixture = MatchFixture::spawn_and_swamp();
    for _ in 0..200 {
        if fixture.tick().is_err() {
            break;
        }
    }
    fixture
}

/// Runs controller benchmarks for the swarm_core crate.
pub fn controller_benchmark(c: &mut Criterion) {
    let fixture = warmed_up();

    c.bench_function("classify_snapshot", |b| {
        let mut arena = fixture.arena.clone();
        let units = arena.view(Side::Player).units();
        b.iter(|| black_box(classify(black_box(&units)).my.army().len()));
    });

    c.bench_function("controller_tick", |b| {
        b.iter_batched(
            || fixture.clone(),
            |mut f| {
                let report = f.player.tick(&mut f.arena.view(Side::Player));
                black_box(report.is_ok())
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("match_tick", |b| {
        b.iter_batched(
            || fixture.clone(),
            |mut f| black_box(f.tick().is_ok()),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, controller_benchmark);
criterion_main!(benches);
