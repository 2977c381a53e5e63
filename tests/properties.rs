//! Property tests over generated automata and the reference scenarios.
//!
//! Tests cover graph construction, both rank solvers, strategy extraction
//! and the trace simulator.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use reachgame::automaton::{Automaton, AutomatonBuilder};
use reachgame::couple::{Couple, CoupleRank, CoupleRanks};
use reachgame::game::{GameGraph, Vertex};
use reachgame::rank::{order_equivalent, Ranking, Ranks};
use reachgame::simulate::{simulate, SimulationConfig, SimulationError, Simulator};
use reachgame::strategy::{Decision, Strategy};
use reachgame::types::{Owner, VertexId};
use test_log::test;

/// Generates a random automaton with `n` states and up to `m` transitions.
fn random_automaton(seed: u64, n: usize, m: usize) -> Automaton {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let names: Vec<String> = (0..n).map(|i| format!("q{}", i)).collect();
    let mut builder = AutomatonBuilder::new(names.clone())
        .initial(names[0].clone())
        .target(names[n - 1].clone());
    let mut used = std::collections::HashSet::new();
    for _ in 0..m {
        let src = rng.gen_range(0..n);
        let dest = rng.gen_range(0..n);
        let offer = rng.gen_bool(0.3);
        let label = format!("{}l{}", if offer { "!" } else { "" }, rng.gen_range(0..4));
        if used.insert((src, label.clone())) {
            builder = builder.transition(names[src].clone(), label, names[dest].clone());
        }
    }
    builder.build().unwrap()
}

fn samples() -> impl Iterator<Item = Automaton> {
    (0..40u64).map(|seed| random_automaton(seed, 2 + (seed as usize % 7), 3 + (seed as usize % 13)))
}

fn target_vertex(a: &Automaton, g: &GameGraph) -> VertexId {
    g.state_vertex(a.target().unwrap())
}

// ─── Graph construction ────────────────────────────────────────────────────────

#[test]
fn graph_alternates() {
    for a in samples() {
        let g = GameGraph::from_automaton(&a);
        assert!(g.is_alternating(), "not alternating:\n{}", g.debug_string());
    }
}

#[test]
fn traps_point_at_each_other() {
    for a in samples() {
        let g = GameGraph::from_automaton(&a);
        assert_eq!(g.successors(g.error_red()), &[g.error_blue()]);
        assert_eq!(g.successors(g.error_blue()), &[g.error_red()]);
    }
}

#[test]
fn one_synthetic_vertex_per_same_owner_transition() {
    for a in samples() {
        let g = GameGraph::from_automaton(&a);
        let same_owner = a
            .transitions()
            .iter()
            .filter(|t| g.owner(g.state_vertex(t.source)) == g.owner(g.state_vertex(t.dest)))
            .count();
        assert_eq!(g.num_synthetic(), same_owner);
        let splits = g.vertex_ids().filter(|&v| g.vertex(v).is_synthetic()).count();
        assert_eq!(splits, same_owner);
    }
}

#[test]
fn red_states_may_abandon() {
    for a in samples() {
        let g = GameGraph::from_automaton(&a);
        for s in a.states() {
            let v = g.state_vertex(s);
            assert_eq!(g.owner(v) == Owner::Red, a.is_offering(s));
            if g.owner(v) == Owner::Red {
                assert_eq!(g.successors(v).last(), Some(&g.error_blue()));
            }
        }
    }
}

#[test]
fn graph_construction_is_idempotent() {
    for a in samples() {
        assert_eq!(GameGraph::from_automaton(&a), GameGraph::from_automaton(&a));
    }
}

// ─── Ranks ─────────────────────────────────────────────────────────────────────

#[test]
fn target_has_rank_zero() {
    for a in samples() {
        let g = GameGraph::from_automaton(&a);
        let t = target_vertex(&a, &g);
        assert_eq!(Ranks::compute(&g, t).get(t), Some(0));
        assert_eq!(CoupleRanks::compute(&g, t).get(t), CoupleRank::Finite(Couple::ZERO));
    }
}

#[test]
fn integer_and_couple_ranks_agree() {
    for a in samples() {
        let g = GameGraph::from_automaton(&a);
        for s in a.states() {
            let t = g.state_vertex(s);
            let ints = Ranks::compute(&g, t);
            let couples = CoupleRanks::compute(&g, t);
            assert!(
                order_equivalent(&g, &ints, &couples),
                "{}\n{}\n{}",
                g.debug_string(),
                g.debug_ranks(&ints),
                g.debug_ranks(&couples)
            );
        }
    }
}

#[test]
fn ranks_never_regress() {
    for a in samples() {
        let g = GameGraph::from_automaton(&a);
        let ranks = Ranks::compute(&g, target_vertex(&a, &g));
        let assigned: Vec<u32> = ranks.iter().map(|(_, r)| r).collect();
        assert!(assigned.windows(2).all(|w| w[0] <= w[1]), "{:?}", assigned);
    }
}

#[test]
fn every_rank_is_justified() {
    for a in samples() {
        let g = GameGraph::from_automaton(&a);
        let ranks = Ranks::compute(&g, target_vertex(&a, &g));
        for (v, r) in ranks.iter().filter(|&(_, r)| r > 0) {
            let lower = |w: &VertexId| ranks.get(*w).is_some_and(|rw| rw < r);
            let succ = g.successors(v);
            assert!(succ.iter().any(lower), "{} ({}) has no lower successor", v, g.owner(v));
        }
    }
}

#[test]
fn ranks_are_idempotent() {
    for a in samples() {
        let g = GameGraph::from_automaton(&a);
        let t = target_vertex(&a, &g);
        assert_eq!(Ranks::compute(&g, t), Ranks::compute(&g, t));
        assert_eq!(CoupleRanks::compute(&g, t), CoupleRanks::compute(&g, t));
    }
}

// ─── Strategies ────────────────────────────────────────────────────────────────

#[test]
fn strategy_picks_minimal_destination() {
    for a in samples() {
        let g = GameGraph::from_automaton(&a);
        let ranks = Ranks::compute(&g, target_vertex(&a, &g));
        let strategy = Strategy::extract(&a, &g, &ranks);

        for (v, decision) in strategy.iter() {
            let Some(state) = g.as_state(v) else { continue };
            let dest_rank = |t| ranks.rank(g.state_vertex(a.transition(t).dest));
            let available: Vec<u32> = a.outgoing(state).iter().filter_map(|&t| dest_rank(t)).collect();
            match decision {
                Decision::Play(t) => {
                    let chosen = dest_rank(t).unwrap();
                    assert!(available.iter().all(|&r| chosen <= r));
                }
                Decision::NoMove => assert!(available.is_empty()),
                Decision::Arrived => assert_eq!(v, ranks.target()),
                Decision::Stay => unreachable!("states never stay"),
            }
        }
    }
}

#[test]
fn strategy_covers_exactly_blue_states() {
    for a in samples() {
        let g = GameGraph::from_automaton(&a);
        let ranks = Ranks::compute(&g, target_vertex(&a, &g));
        let strategy = Strategy::extract(&a, &g, &ranks);
        for v in g.vertex_ids() {
            let expected = g.owner(v) == Owner::Blue && matches!(g.vertex(v), Vertex::State(_) | Vertex::ErrorBlue);
            assert_eq!(strategy.decision(v).is_some(), expected, "vertex {}", g.vertex_name(v));
        }
    }
}

// ─── Scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn scenario_single_offer() {
    let a = AutomatonBuilder::new(["a", "b"])
        .initial("a")
        .target("b")
        .transition("a", "!go", "b")
        .build()
        .unwrap();
    let g = GameGraph::from_automaton(&a);
    let (va, vb) = (g.state_vertex(a.initial()), target_vertex(&a, &g));

    assert_eq!(g.owner(va), Owner::Red);
    assert_eq!(g.owner(vb), Owner::Blue);

    let ranks = Ranks::compute(&g, vb);
    assert_eq!(ranks.get(vb), Some(0));
    assert_eq!(ranks.get(va), Some(1));

    let strategy = Strategy::extract(&a, &g, &ranks);
    assert_eq!(strategy.decision(va), None);
    assert_eq!(strategy.decision(vb), Some(Decision::Arrived));
}

#[test]
fn scenario_blue_two_cycle() {
    let a = AutomatonBuilder::new(["a", "b"])
        .initial("a")
        .target("b")
        .transition("a", "x", "b")
        .transition("b", "y", "a")
        .build()
        .unwrap();
    let g = GameGraph::from_automaton(&a);
    assert!(a.states().all(|s| g.owner(g.state_vertex(s)) == Owner::Blue));

    let vb = target_vertex(&a, &g);
    let ranks = Ranks::compute(&g, vb);
    let split = g.hop(a.find(a.initial(), "x").unwrap());
    let path = [vb, split, g.state_vertex(a.initial())];
    let along: Vec<u32> = path.iter().map(|&v| ranks.get(v).unwrap()).collect();
    assert!(along.windows(2).all(|w| w[0] < w[1]), "{:?}", along);
}

#[test]
fn scenario_unknown_first_label() {
    let a = AutomatonBuilder::new(["a", "b"])
        .initial("a")
        .transition("a", "x", "b")
        .build()
        .unwrap();
    let g = GameGraph::from_automaton(&a);
    for _ in 0..3 {
        let res = Simulator::new(&a, &g, &["nope", "x"]);
        assert!(matches!(res, Err(SimulationError::UnknownLabel(ref l)) if l == "nope"));
    }
    let err = simulate(&a, &["nope"], &SimulationConfig::default()).unwrap_err();
    assert_eq!(err.to_string(), "no transition is labeled \"nope\"");
}

#[test]
fn scenario_handshake_replay() {
    // A client (Blue) requests, the server (Red) answers or drops the request.
    let a = Automaton::from_text(
        "idle waiting served
idle served
idle request waiting
waiting !ok served
waiting !drop idle
served reset idle
",
    )
    .unwrap();
    let g = GameGraph::from_automaton(&a);
    let config = SimulationConfig::default().with_seed(2024).with_max_attempts(2_000);
    let replay = Simulator::new(&a, &g, &["!ok", "reset"]).unwrap().run(&config).unwrap();

    assert_eq!(replay.anchor, a.state("waiting").unwrap());
    for m in &replay.moves {
        assert!(g.successors(m.from).contains(&m.to));
        assert_ne!(m.to, g.error_blue());
    }
    assert_eq!(replay.moves.last().map(|m| m.to), Some(g.state_vertex(a.initial())));
}
