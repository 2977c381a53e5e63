//! Debug utilities for inspecting game graphs, ranks and strategies.
//!
//! These helpers are primarily useful in tests and during development.

use std::fmt::Write;

use crate::automaton::Automaton;
use crate::game::{GameGraph, Vertex};
use crate::rank::Ranking;
use crate::strategy::{Decision, Strategy};
use crate::types::{Owner, VertexId};

/// Detailed information about a single game vertex.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VertexInfo {
    pub id: VertexId,
    pub name: String,
    pub kind: Vertex,
    pub owner: Owner,
    /// Successor names, in edge order.
    pub successors: Vec<String>,
}

impl std::fmt::Display for VertexInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}({}) -> [{}]", self.id, self.name, self.owner, self.successors.join(", "))
    }
}

impl GameGraph {
    /// Get detailed information about a single vertex.
    pub fn vertex_info(&self, v: VertexId) -> VertexInfo {
        VertexInfo {
            id: v,
            name: self.vertex_name(v),
            kind: self.vertex(v),
            owner: self.owner(v),
            successors: self.successors(v).iter().map(|&w| self.vertex_name(w)).collect(),
        }
    }

    /// Print a compact representation of the whole graph, one vertex per line.
    ///
    /// Format: `@id name(Owner) -> [succ, ...]`
    pub fn debug_string(&self) -> String {
        let mut result = String::new();
        writeln!(
            &mut result,
            "Game graph (vertices={}, synthetic={}, edges={}):",
            self.num_vertices(),
            self.num_synthetic(),
            self.num_edges()
        )
        .unwrap();
        for v in self.vertex_ids() {
            writeln!(&mut result, "  {}", self.vertex_info(v)).unwrap();
        }
        result
    }

    /// Print the rank of every vertex, `inf` for unranked ones.
    pub fn debug_ranks<R: Ranking>(&self, ranks: &R) -> String {
        let mut result = String::new();
        writeln!(&mut result, "Ranks (target = {}):", self.vertex_name(ranks.target())).unwrap();
        for v in self.vertex_ids() {
            match ranks.rank(v) {
                Some(r) => writeln!(&mut result, "  {} = {:?}", self.vertex_name(v), r).unwrap(),
                None => writeln!(&mut result, "  {} = inf", self.vertex_name(v)).unwrap(),
            }
        }
        result
    }
}

impl Strategy {
    /// Print the strategy as `state -> label` lines.
    pub fn debug_string(&self, automaton: &Automaton, graph: &GameGraph) -> String {
        let mut result = String::new();
        writeln!(&mut result, "Strategy (target = {}):", graph.vertex_name(self.target())).unwrap();
        for (v, decision) in self.iter() {
            let action = match decision {
                Decision::Play(t) => format!("-> {}", automaton.transition(t).label),
                Decision::Arrived => "(target)".to_string(),
                Decision::Stay => "(stay)".to_string(),
                Decision::NoMove => "(no move)".to_string(),
            };
            writeln!(&mut result, "  {} {}", graph.vertex_name(v), action).unwrap();
        }
        result
    }
}
