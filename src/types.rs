//! Type-safe handles for automaton states, transitions and game vertices.
//!
//! This module provides newtype wrappers that enforce compile-time distinction
//! between the different index spaces, preventing a state index from being
//! mistaken for a vertex index (the two coincide only for original states).
use std::fmt;
use std::ops::Neg;

/// A state of the automaton (0-indexed, in declaration order).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct StateId(u32);

impl StateId {
    /// Creates a new state handle with the given index.
    pub fn new(index: usize) -> Self {
        assert!(index <= u32::MAX as usize, "State index {} does not fit into u32", index);
        StateId(index as u32)
    }

    /// Returns the raw index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// A transition of the automaton (0-indexed, in declaration order).
///
/// Declaration order is the enumeration order used for strategy tie-breaks.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TransitionId(u32);

impl TransitionId {
    pub fn new(index: usize) -> Self {
        assert!(index <= u32::MAX as usize, "Transition index {} does not fit into u32", index);
        TransitionId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// A vertex of the game graph (0-indexed arena handle).
///
/// # Invariants
///
/// - Vertices `0..n` are the `n` original states, in declaration order
/// - Vertices `n` and `n + 1` are the `ErrorRed` and `ErrorBlue` traps
/// - Remaining vertices are synthetic, in creation order
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VertexId(u32);

impl VertexId {
    pub fn new(index: usize) -> Self {
        assert!(index <= u32::MAX as usize, "Vertex index {} does not fit into u32", index);
        VertexId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<StateId> for VertexId {
    fn from(state: StateId) -> Self {
        VertexId(state.0)
    }
}

impl From<VertexId> for usize {
    fn from(vertex: VertexId) -> Self {
        vertex.index()
    }
}

/// Owner mark of a game vertex.
///
/// Blue is the existential player trying to reach the target,
/// Red is the universal adversary.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Owner {
    Blue,
    Red,
}

impl Owner {
    pub fn is_blue(self) -> bool {
        self == Owner::Blue
    }

    pub fn is_red(self) -> bool {
        self == Owner::Red
    }

    /// Returns the other player.
    pub fn opponent(self) -> Self {
        match self {
            Owner::Blue => Owner::Red,
            Owner::Red => Owner::Blue,
        }
    }
}

impl Neg for Owner {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.opponent()
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Blue => write!(f, "Blue"),
            Owner::Red => write!(f, "Red"),
        }
    }
}
