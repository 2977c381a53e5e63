//! Couple ranks: the reference definition of the rank fixpoint.
//!
//! Ranks are pairs `(i, j)` ordered lexicographically, where `i` counts rounds and
//! `j` counts sub-steps within a round. The solver keeps every frontier `W(i, j)`:
//!
//! ```text
//! W(0, 0)   = { target }
//! W(i, j+1) = W(i, j) ∪ { Blue p : some succ(p) ∈ W(i, j) }
//!                     ∪ { Red p  : succ(p) ≠ ∅, succ(p) ⊆ W(i, j) }
//! W(i+1, 0) = W(i, *) ∪ { Red p  : succ(p) meets both W(i, *) and its complement }
//! ```
//!
//! where `W(i, *)` is the stable frontier of round `i`. The computation stops when a
//! round admits nothing new. The couple rank of `p` is the first `(i, j)` with
//! `p ∈ W(i, j)`; vertices outside the final frontier are [`CoupleRank::Infinite`].
//!
//! Integer ranks from [`crate::rank::Ranks`] are an order-preserving flattening of
//! couple ranks: they agree on the order of any two vertices, not on the values.

use std::cmp::Ordering;
use std::fmt;

use log::debug;

use crate::game::GameGraph;
use crate::rank::{is_forced, is_straddling, Ranking};
use crate::types::VertexId;
use crate::vertex_set::VertexSet;

/// A finite couple rank `(round, step)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Couple {
    pub round: u32,
    pub step: u32,
}

impl Couple {
    pub const ZERO: Couple = Couple { round: 0, step: 0 };

    pub const fn new(round: u32, step: u32) -> Self {
        Self { round, step }
    }
}

impl fmt::Display for Couple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.round, self.step)
    }
}

/// A couple rank, with an explicit marker for vertices Blue cannot force.
///
/// `Finite` ranks order lexicographically and below `Infinite`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CoupleRank {
    Finite(Couple),
    Infinite,
}

impl CoupleRank {
    pub fn finite(self) -> Option<Couple> {
        match self {
            CoupleRank::Finite(c) => Some(c),
            CoupleRank::Infinite => None,
        }
    }

    pub fn is_infinite(self) -> bool {
        self == CoupleRank::Infinite
    }
}

impl fmt::Display for CoupleRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoupleRank::Finite(c) => write!(f, "{}", c),
            CoupleRank::Infinite => write!(f, "inf"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CoupleRanks {
    target: VertexId,
    ranks: Vec<CoupleRank>,
    /// `frontiers[i][j]` is `W(i, j)`.
    frontiers: Vec<Vec<VertexSet>>,
}

impl CoupleRanks {
    /// Computes couple ranks of all vertices of `graph` relative to `target`.
    pub fn compute(graph: &GameGraph, target: VertexId) -> Self {
        let n = graph.num_vertices();
        assert!(target.index() < n, "Target {} is out of range (graph has {} vertices)", target, n);

        let mut ranks = vec![CoupleRank::Infinite; n];
        ranks[target.index()] = CoupleRank::Finite(Couple::ZERO);

        let mut current = VertexSet::new(n);
        current.insert(target);
        let mut frontiers = Vec::new();
        let mut round_frontiers = vec![current.clone()];
        let mut round = 0;

        loop {
            // Stabilize the Blue-forcing fixpoint of this round.
            let mut step = 0;
            loop {
                let added: VertexSet = graph
                    .vertex_ids()
                    .filter(|&v| !current.contains(v) && is_forced(graph, v, |w| current.contains(w)))
                    .collect();
                if added.is_empty() {
                    break;
                }
                step += 1;
                for v in added.iter() {
                    ranks[v.index()] = CoupleRank::Finite(Couple::new(round, step));
                }
                current.union_with(&added);
                round_frontiers.push(current.clone());
            }
            debug!("round {}: stable after {} steps, |W| = {}", round, step, current.len());
            frontiers.push(std::mem::take(&mut round_frontiers));

            // Admit Red vertices straddling the stable frontier.
            let admitted: VertexSet = graph
                .vertex_ids()
                .filter(|&v| !current.contains(v) && is_straddling(graph, v, |w| current.contains(w)))
                .collect();
            if admitted.is_empty() {
                break;
            }
            round += 1;
            debug!("round {}: admitting {} straddling red vertices", round, admitted.len());
            for v in admitted.iter() {
                ranks[v.index()] = CoupleRank::Finite(Couple::new(round, 0));
            }
            current.union_with(&admitted);
            round_frontiers.push(current.clone());
        }

        Self {
            target,
            ranks,
            frontiers,
        }
    }

    pub fn get(&self, v: VertexId) -> CoupleRank {
        self.ranks[v.index()]
    }

    pub fn num_rounds(&self) -> usize {
        self.frontiers.len()
    }

    /// The frontier `W(i, j)`, if that layer exists.
    pub fn frontier(&self, round: usize, step: usize) -> Option<&VertexSet> {
        self.frontiers.get(round).and_then(|r| r.get(step))
    }

    /// The stable frontier of the last round: every vertex with a finite rank.
    pub fn final_frontier(&self) -> &VertexSet {
        self.frontiers
            .last()
            .and_then(|r| r.last())
            .expect("the first round always holds W(0, 0)")
    }

    /// Compares two vertices by couple rank.
    pub fn compare(&self, p: VertexId, q: VertexId) -> Ordering {
        self.get(p).cmp(&self.get(q))
    }
}

impl Ranking for CoupleRanks {
    type Rank = Couple;

    fn target(&self) -> VertexId {
        self.target
    }

    fn rank(&self, v: VertexId) -> Option<Couple> {
        self.get(v).finite()
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::automaton::AutomatonBuilder;
    use crate::rank::{order_equivalent, Ranks};

    #[test]
    fn test_single_offer() {
        let a = AutomatonBuilder::new(["a", "b"])
            .initial("a")
            .target("b")
            .transition("a", "!go", "b")
            .build()
            .unwrap();
        let g = GameGraph::from_automaton(&a);
        let vb = g.state_vertex(a.target().unwrap());
        let ranks = CoupleRanks::compute(&g, vb);

        assert_eq!(ranks.get(vb), CoupleRank::Finite(Couple::ZERO));
        assert_eq!(ranks.get(g.state_vertex(a.initial())), CoupleRank::Finite(Couple::new(1, 0)));
        assert!(ranks.get(g.error_blue()).is_infinite());
        assert!(ranks.get(g.error_red()).is_infinite());
        assert_eq!(ranks.num_rounds(), 2);
        assert_eq!(ranks.compare(vb, g.state_vertex(a.initial())), Ordering::Less);
        assert_eq!(ranks.compare(g.error_red(), g.error_blue()), Ordering::Equal);
    }

    #[test]
    fn test_frontiers_grow() {
        let a = AutomatonBuilder::new(["a", "b", "c"])
            .initial("a")
            .target("c")
            .transition("a", "x", "b")
            .transition("b", "y", "c")
            .transition("c", "z", "a")
            .build()
            .unwrap();
        let g = GameGraph::from_automaton(&a);
        let ranks = CoupleRanks::compute(&g, g.state_vertex(a.target().unwrap()));

        let mut previous: Option<&VertexSet> = None;
        for i in 0..ranks.num_rounds() {
            let mut j = 0;
            while let Some(w) = ranks.frontier(i, j) {
                if let Some(prev) = previous {
                    assert!(prev.is_subset(w), "W({}, {}) lost vertices", i, j);
                }
                previous = Some(w);
                j += 1;
            }
        }
        let finite = g.vertex_ids().filter(|&v| !ranks.get(v).is_infinite()).count();
        assert_eq!(ranks.final_frontier().len(), finite);
        assert!(ranks.final_frontier().iter().all(|v| !ranks.get(v).is_infinite()));
        assert_eq!(ranks.frontier(0, 0).map(|w| w.iter().collect::<Vec<_>>()), Some(vec![ranks.target()]));
    }

    #[test]
    fn test_matches_integer_order() {
        let a = AutomatonBuilder::new(["a", "b", "c", "d"])
            .initial("a")
            .target("d")
            .transition("a", "!x", "b")
            .transition("a", "!y", "c")
            .transition("b", "u", "d")
            .transition("b", "v", "a")
            .transition("c", "w", "c")
            .build()
            .unwrap();
        let g = GameGraph::from_automaton(&a);
        let target = g.state_vertex(a.target().unwrap());
        let ints = Ranks::compute(&g, target);
        let couples = CoupleRanks::compute(&g, target);
        assert!(order_equivalent(&g, &ints, &couples));
    }

    #[test]
    fn test_display() {
        assert_eq!(CoupleRank::Finite(Couple::new(2, 3)).to_string(), "(2,3)");
        assert_eq!(CoupleRank::Infinite.to_string(), "inf");
        assert!(CoupleRank::Finite(Couple::new(100, 0)) < CoupleRank::Infinite);
        assert!(Couple::new(1, 5) < Couple::new(2, 0));
    }
}
