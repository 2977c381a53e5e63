//! Memoryless strategies for the Blue player.
//!
//! A [`Strategy`] assigns a [`Decision`] to every Blue-owned original state: the
//! transition whose destination has the lowest rank, scanning the state's transitions
//! in declaration order and keeping the first one on ties. The trap `ErrorBlue`
//! always stays put. Red-owned states and synthetic vertices have no entry.
//!
//! States from which no ranked destination exists get an explicit [`Decision::NoMove`]
//! so that callers treat them as a loss instead of guessing a label.

use log::debug;

use crate::automaton::Automaton;
use crate::game::{GameGraph, Vertex};
use crate::rank::Ranking;
use crate::types::{StateId, TransitionId, VertexId};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Decision {
    /// Take this transition.
    Play(TransitionId),
    /// The state is the target itself; no move is needed.
    Arrived,
    /// Absorbing action of the `ErrorBlue` trap.
    Stay,
    /// No transition leads to a ranked destination.
    NoMove,
}

impl Decision {
    pub fn transition(self) -> Option<TransitionId> {
        match self {
            Decision::Play(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Strategy {
    target: VertexId,
    decisions: Vec<Option<Decision>>,
}

impl Strategy {
    /// Extracts Blue's strategy from a ranking of `graph`, which must have been
    /// built from `automaton`.
    pub fn extract<R: Ranking>(automaton: &Automaton, graph: &GameGraph, ranks: &R) -> Self {
        let target = ranks.target();
        let mut decisions = vec![None; graph.num_vertices()];

        for v in graph.vertex_ids() {
            if !graph.owner(v).is_blue() {
                continue;
            }
            let decision = match graph.vertex(v) {
                Vertex::ErrorBlue => Decision::Stay,
                Vertex::State(_) if v == target => Decision::Arrived,
                Vertex::State(s) => best_move(automaton, graph, ranks, s),
                Vertex::Split(_) | Vertex::ErrorRed => continue,
            };
            decisions[v.index()] = Some(decision);
        }

        let strategy = Self { target, decisions };
        debug!(
            "strategy for target {}: {} decisions, {} without move",
            target,
            strategy.iter().count(),
            strategy.stuck().count()
        );
        strategy
    }

    pub fn target(&self) -> VertexId {
        self.target
    }

    /// Decision at vertex `v`, or `None` if `v` is not a Blue-owned state.
    pub fn decision(&self, v: VertexId) -> Option<Decision> {
        self.decisions.get(v.index()).copied().flatten()
    }

    /// Decision at an original state.
    pub fn choice(&self, state: StateId) -> Option<Decision> {
        self.decision(VertexId::from(state))
    }

    /// The label Blue plays at `state`, if the strategy has a move there.
    pub fn label<'a>(&self, automaton: &'a Automaton, state: StateId) -> Option<&'a str> {
        let t = self.choice(state)?.transition()?;
        Some(automaton.transition(t).label.as_str())
    }

    /// All defined decisions in vertex order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, Decision)> + '_ {
        self.decisions
            .iter()
            .enumerate()
            .filter_map(|(i, d)| d.map(|d| (VertexId::new(i), d)))
    }

    /// Blue states with no move towards the target.
    pub fn stuck(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.iter().filter(|&(_, d)| d == Decision::NoMove).map(|(v, _)| v)
    }
}

fn best_move<R: Ranking>(automaton: &Automaton, graph: &GameGraph, ranks: &R, state: StateId) -> Decision {
    let mut best: Option<(TransitionId, R::Rank)> = None;
    for &t in automaton.outgoing(state) {
        let dest = graph.state_vertex(automaton.transition(t).dest);
        if let Some(rank) = ranks.rank(dest) {
            if best.map_or(true, |(_, b)| rank < b) {
                best = Some((t, rank));
            }
        }
    }
    match best {
        Some((t, _)) => Decision::Play(t),
        None => Decision::NoMove,
    }
}
