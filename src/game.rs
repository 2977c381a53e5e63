//! Bipartite two-player game graph.
//!
//! The [`GameGraph`] is derived from an [`Automaton`] so that every edge connects
//! vertices of opposite owner: Blue (the existential player, who wants to reach the
//! target) and Red (the universal adversary).
//!
//! # Construction
//!
//! 1. Every state starts Blue; a state with an outgoing offer label (`!x`) is Red.
//! 2. Two absorbing traps are added, `ErrorRed` and `ErrorBlue`, each pointing to the other.
//! 3. A transition between two states of the same owner is split by a fresh synthetic
//!    vertex of the opposite owner. A Red synthetic vertex may also escape to `ErrorBlue`.
//! 4. Every Red state may escape to `ErrorBlue`.
//!
//! # Vertex layout
//!
//! Vertices live in an arena addressed by [`VertexId`]: original states first (in
//! declaration order, so a [`StateId`] converts directly), then `ErrorRed`, then
//! `ErrorBlue`, then synthetic vertices in creation order.
//!
//! ```
//! use reachgame::automaton::AutomatonBuilder;
//! use reachgame::game::GameGraph;
//! use reachgame::types::Owner;
//!
//! let automaton = AutomatonBuilder::new(["a", "b"])
//!     .initial("a")
//!     .transition("a", "x", "b")
//!     .build()
//!     .unwrap();
//! let graph = GameGraph::from_automaton(&automaton);
//!
//! // Both states are Blue, so the transition is split by a Red vertex.
//! assert_eq!(graph.num_synthetic(), 1);
//! assert!(graph.is_alternating());
//! assert_eq!(graph.owner(graph.error_red()), Owner::Red);
//! ```

use std::fmt;

use log::debug;

use crate::automaton::Automaton;
use crate::types::{Owner, StateId, TransitionId, VertexId};

/// Tagged kind of a game vertex.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Vertex {
    /// An original automaton state.
    State(StateId),
    /// Red-owned trap.
    ErrorRed,
    /// Blue-owned trap.
    ErrorBlue,
    /// Synthetic vertex splitting a same-owner transition.
    Split(TransitionId),
}

impl Vertex {
    pub fn is_trap(self) -> bool {
        matches!(self, Vertex::ErrorRed | Vertex::ErrorBlue)
    }

    pub fn is_synthetic(self) -> bool {
        matches!(self, Vertex::Split(_))
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vertex::State(s) => write!(f, "{}", s),
            Vertex::ErrorRed => write!(f, "errorRed"),
            Vertex::ErrorBlue => write!(f, "errorBlue"),
            Vertex::Split(t) => write!(f, "split({})", t),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GameGraph {
    names: Vec<String>,
    vertices: Vec<Vertex>,
    owners: Vec<Owner>,
    edges: Vec<Vec<VertexId>>,
    /// First vertex reached when taking each transition from its source.
    hops: Vec<VertexId>,
}

impl GameGraph {
    /// Builds the bipartite arena of `automaton`.
    pub fn from_automaton(automaton: &Automaton) -> Self {
        let n = automaton.num_states();

        let mut vertices: Vec<Vertex> = automaton.states().map(Vertex::State).collect();
        let mut owners: Vec<Owner> = automaton
            .states()
            .map(|s| if automaton.is_offering(s) { Owner::Red } else { Owner::Blue })
            .collect();
        let mut edges: Vec<Vec<VertexId>> = vec![Vec::new(); n];

        let error_red = VertexId::new(n);
        let error_blue = VertexId::new(n + 1);
        vertices.push(Vertex::ErrorRed);
        owners.push(Owner::Red);
        edges.push(vec![error_blue]);
        vertices.push(Vertex::ErrorBlue);
        owners.push(Owner::Blue);
        edges.push(vec![error_red]);

        let mut hops = Vec::with_capacity(automaton.num_transitions());
        for (i, t) in automaton.transitions().iter().enumerate() {
            let src = VertexId::from(t.source);
            let dest = VertexId::from(t.dest);
            let owner = owners[src.index()];
            if owner == owners[dest.index()] {
                let split = VertexId::new(vertices.len());
                let split_owner = -owner;
                debug!(
                    "split {} --{}--> {} ({}) via {} ({})",
                    automaton.name(t.source),
                    t.label,
                    automaton.name(t.dest),
                    owner,
                    split,
                    split_owner
                );
                vertices.push(Vertex::Split(TransitionId::new(i)));
                owners.push(split_owner);
                let mut out = vec![dest];
                if split_owner.is_red() {
                    out.push(error_blue);
                }
                edges.push(out);
                edges[src.index()].push(split);
                hops.push(split);
            } else {
                edges[src.index()].push(dest);
                hops.push(dest);
            }
        }

        for s in automaton.states() {
            if owners[s.index()].is_red() {
                edges[s.index()].push(error_blue);
            }
        }

        let graph = Self {
            names: automaton.states().map(|s| automaton.name(s).to_string()).collect(),
            vertices,
            owners,
            edges,
            hops,
        };
        debug!(
            "game graph: {} vertices ({} synthetic), {} edges",
            graph.num_vertices(),
            graph.num_synthetic(),
            graph.num_edges()
        );
        graph
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_states(&self) -> usize {
        self.names.len()
    }

    /// Number of synthetic vertices, one per split same-owner transition.
    pub fn num_synthetic(&self) -> usize {
        self.vertices.len() - self.names.len() - 2
    }

    pub fn num_edges(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Iterates over all vertex handles in arena order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len()).map(VertexId::new)
    }

    pub fn vertex(&self, v: VertexId) -> Vertex {
        self.vertices[v.index()]
    }

    pub fn owner(&self, v: VertexId) -> Owner {
        self.owners[v.index()]
    }

    /// Successors of `v` in insertion order (duplicates possible).
    pub fn successors(&self, v: VertexId) -> &[VertexId] {
        &self.edges[v.index()]
    }

    pub fn error_red(&self) -> VertexId {
        VertexId::new(self.names.len())
    }

    pub fn error_blue(&self) -> VertexId {
        VertexId::new(self.names.len() + 1)
    }

    pub fn state_vertex(&self, state: StateId) -> VertexId {
        assert!(state.index() < self.names.len(), "State {} is not part of this graph", state);
        VertexId::from(state)
    }

    /// Returns the original state behind `v`, if any.
    pub fn as_state(&self, v: VertexId) -> Option<StateId> {
        match self.vertex(v) {
            Vertex::State(s) => Some(s),
            _ => None,
        }
    }

    /// First vertex reached when taking `transition` from its source:
    /// either the destination itself or the synthetic vertex splitting it.
    pub fn hop(&self, transition: TransitionId) -> VertexId {
        self.hops[transition.index()]
    }

    /// Checks that every edge connects vertices of opposite owner.
    pub fn is_alternating(&self) -> bool {
        self.vertex_ids()
            .all(|v| self.successors(v).iter().all(|&w| self.owner(v) != self.owner(w)))
    }

    /// Human-readable vertex name: the state name, a trap name, or `new<k>`.
    pub fn vertex_name(&self, v: VertexId) -> String {
        match self.vertex(v) {
            Vertex::State(s) => self.names[s.index()].clone(),
            Vertex::ErrorRed => "errorRed".to_string(),
            Vertex::ErrorBlue => "errorBlue".to_string(),
            Vertex::Split(_) => format!("new{}", v.index() - self.names.len() - 2),
        }
    }
}
