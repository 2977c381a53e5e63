//! Solver benchmarks on generated automata.
//!
//! Run with:
//! ```bash
//! cargo bench --bench solver
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use reachgame::automaton::{Automaton, AutomatonBuilder};
use reachgame::couple::CoupleRanks;
use reachgame::game::GameGraph;
use reachgame::rank::Ranks;
use reachgame::strategy::Strategy;

// ============================================================================
// Helper: random automata
// ============================================================================

/// Builds an automaton with `n` states and about `degree` transitions per state.
///
/// Roughly a third of the labels are offers, so both players own states.
fn random_automaton(n: usize, degree: usize, seed: u64) -> Automaton {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let names: Vec<String> = (0..n).map(|i| format!("q{}", i)).collect();
    let mut builder = AutomatonBuilder::new(names.clone())
        .initial(names[0].clone())
        .target(names[n - 1].clone());
    for (i, src) in names.iter().enumerate() {
        for k in 0..degree {
            let dest = &names[rng.gen_range(0..n)];
            let label = if rng.gen_bool(0.3) {
                format!("!a{}_{}", i, k)
            } else {
                format!("a{}_{}", i, k)
            };
            builder = builder.transition(src.clone(), label, dest.clone());
        }
    }
    builder.build().unwrap()
}

const SIZES: [usize; 4] = [100, 1_000, 5_000, 20_000];

// ============================================================================
// Benchmark: game graph construction
// ============================================================================

fn bench_graph_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("game/construction");
    group.sample_size(20);

    for n in SIZES {
        let automaton = random_automaton(n, 3, 42);
        group.throughput(Throughput::Elements(automaton.num_transitions() as u64));
        group.bench_with_input(BenchmarkId::new("from_automaton", n), &automaton, |b, a| {
            b.iter(|| GameGraph::from_automaton(a));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: rank solvers
// ============================================================================

fn bench_rank_solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank/solvers");
    group.sample_size(10);

    for n in SIZES {
        let automaton = random_automaton(n, 3, 7);
        let graph = GameGraph::from_automaton(&automaton);
        let target = graph.state_vertex(automaton.target().unwrap());
        group.throughput(Throughput::Elements(graph.num_vertices() as u64));

        group.bench_with_input(BenchmarkId::new("integer", n), &graph, |b, g| {
            b.iter(|| Ranks::compute(g, target));
        });
        group.bench_with_input(BenchmarkId::new("couple", n), &graph, |b, g| {
            b.iter(|| CoupleRanks::compute(g, target));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: full pipeline up to the strategy
// ============================================================================

fn bench_strategy(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategy/pipeline");
    group.sample_size(10);

    for n in [1_000, 10_000] {
        let automaton = random_automaton(n, 4, 1);
        group.bench_with_input(BenchmarkId::new("extract", n), &automaton, |b, a| {
            b.iter(|| {
                let graph = GameGraph::from_automaton(a);
                let ranks = Ranks::compute(&graph, graph.state_vertex(a.target().unwrap()));
                Strategy::extract(a, &graph, &ranks)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_graph_construction, bench_rank_solvers, bench_strategy);

criterion_main!(benches);
