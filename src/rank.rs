//! Backward rank computation for reachability games.
//!
//! The rank of a vertex measures how many alternating layers Blue needs to force
//! the play into the target. It is computed as a backward layered fixpoint:
//!
//! - the target has rank 0;
//! - a Blue vertex joins the next layer if **some** successor is already ranked;
//! - a Red vertex joins the next layer if **all** its successors are already ranked;
//! - when no vertex joins, the current round is exhausted and a Red vertex with both
//!   ranked and unranked successors is admitted (the relaxed rule), opening a new round.
//!
//! Each layer only sees the ranks assigned before it, so rank values do not depend on
//! the vertex enumeration order. Vertices never admitted stay unranked (rank infinity).
//!
//! Both [`Ranks`] (flat integers) and [`CoupleRanks`][crate::couple::CoupleRanks]
//! (lexicographic pairs) implement the [`Ranking`] trait and induce the same order.

use std::fmt::Debug;

use log::debug;

use crate::game::GameGraph;
use crate::types::VertexId;

/// A rank table computed relative to a fixed target vertex.
pub trait Ranking {
    /// Totally ordered rank values; lower is better for Blue.
    type Rank: Copy + Ord + Debug;

    fn target(&self) -> VertexId;

    /// Rank of `v`, or `None` if Blue cannot force reaching the target from `v`.
    fn rank(&self, v: VertexId) -> Option<Self::Rank>;

    fn is_ranked(&self, v: VertexId) -> bool {
        self.rank(v).is_some()
    }
}

/// Returns true if `v` is forced into `ranked` within one layer.
pub(crate) fn is_forced(graph: &GameGraph, v: VertexId, ranked: impl Fn(VertexId) -> bool) -> bool {
    let succ = graph.successors(v);
    if graph.owner(v).is_blue() {
        succ.iter().any(|&w| ranked(w))
    } else {
        !succ.is_empty() && succ.iter().all(|&w| ranked(w))
    }
}

/// Returns true if the Red vertex `v` straddles the `ranked` region.
pub(crate) fn is_straddling(graph: &GameGraph, v: VertexId, ranked: impl Fn(VertexId) -> bool) -> bool {
    let succ = graph.successors(v);
    graph.owner(v).is_red() && succ.iter().any(|&w| ranked(w)) && succ.iter().any(|&w| !ranked(w))
}

/// Flat integer ranks.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Ranks {
    target: VertexId,
    ranks: Vec<Option<u32>>,
    /// Vertices in the order their ranks were assigned.
    order: Vec<VertexId>,
}

impl Ranks {
    /// Computes the ranks of all vertices of `graph` relative to `target`.
    pub fn compute(graph: &GameGraph, target: VertexId) -> Self {
        assert!(
            target.index() < graph.num_vertices(),
            "Target {} is out of range (graph has {} vertices)",
            target,
            graph.num_vertices()
        );

        let mut ranks = vec![None; graph.num_vertices()];
        let mut order = vec![target];
        ranks[target.index()] = Some(0);

        let mut k = 1;
        loop {
            let is_ranked = |w: VertexId| ranks[w.index()].is_some();
            let mut layer: Vec<VertexId> = graph
                .vertex_ids()
                .filter(|&v| !is_ranked(v) && is_forced(graph, v, is_ranked))
                .collect();
            if layer.is_empty() {
                layer = graph
                    .vertex_ids()
                    .filter(|&v| !is_ranked(v) && is_straddling(graph, v, is_ranked))
                    .collect();
                if !layer.is_empty() {
                    debug!("rank {}: round exhausted, admitting {} straddling red vertices", k, layer.len());
                }
            }
            if layer.is_empty() {
                break;
            }

            debug!("rank {}: {} vertices", k, layer.len());
            for &v in &layer {
                ranks[v.index()] = Some(k);
            }
            order.extend(layer);
            k += 1;
        }

        debug!(
            "ranks for target {}: {}/{} vertices ranked, max rank {}",
            target,
            order.len(),
            graph.num_vertices(),
            k - 1
        );

        Self { target, ranks, order }
    }

    pub fn get(&self, v: VertexId) -> Option<u32> {
        self.ranks[v.index()]
    }

    pub fn num_vertices(&self) -> usize {
        self.ranks.len()
    }

    pub fn num_ranked(&self) -> usize {
        self.order.len()
    }

    /// Largest assigned rank (0 if only the target is ranked).
    pub fn max_rank(&self) -> u32 {
        self.order.last().and_then(|&v| self.get(v)).unwrap_or(0)
    }

    /// Ranked vertices in assignment order, with their ranks.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, u32)> + '_ {
        self.order.iter().filter_map(|&v| self.get(v).map(|r| (v, r)))
    }

    /// Vertices that received exactly rank `k`.
    pub fn layer(&self, k: u32) -> impl Iterator<Item = VertexId> + '_ {
        self.iter().filter(move |&(_, r)| r == k).map(|(v, _)| v)
    }

    pub fn unranked(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.ranks.len())
            .map(VertexId::new)
            .filter(|&v| self.get(v).is_none())
    }
}

impl Ranking for Ranks {
    type Rank = u32;

    fn target(&self) -> VertexId {
        self.target
    }

    fn rank(&self, v: VertexId) -> Option<u32> {
        self.get(v)
    }
}

/// Checks that two rankings of `graph` induce the same order on ranked vertices
/// and leave the same vertices unranked.
pub fn order_equivalent<A: Ranking, B: Ranking>(graph: &GameGraph, a: &A, b: &B) -> bool {
    let vertices: Vec<VertexId> = graph.vertex_ids().collect();
    vertices.iter().all(|&p| {
        vertices.iter().all(|&q| match (a.rank(p), a.rank(q), b.rank(p), b.rank(q)) {
            (Some(ap), Some(aq), Some(bp), Some(bq)) => ap.cmp(&aq) == bp.cmp(&bq),
            (ap, aq, bp, bq) => ap.is_some() == bp.is_some() && aq.is_some() == bq.is_some(),
        })
    })
}
