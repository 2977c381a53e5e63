//! Labeled transition systems.
//!
//! An [`Automaton`] is a declared set of named states, an initial state, an optional
//! target state and a deterministic-per-label transition relation. It is validated
//! once by [`AutomatonBuilder::build`] and immutable afterwards: every name referenced
//! by a transition or by the initial/target designation must be declared.
//!
//! ```
//! use reachgame::automaton::AutomatonBuilder;
//!
//! let automaton = AutomatonBuilder::new(["a", "b"])
//!     .initial("a")
//!     .target("b")
//!     .transition("a", "!go", "b")
//!     .build()
//!     .unwrap();
//!
//! let a = automaton.initial();
//! assert_eq!(automaton.step(a, "!go"), automaton.target());
//! assert_eq!(automaton.step(a, "stop"), None);
//! ```

use std::collections::{HashMap, HashSet};

use log::debug;
use thiserror::Error;

use crate::types::{StateId, TransitionId};

/// Leading character of "offer" labels.
///
/// A state with at least one outgoing offer transition is owned by the adversary.
pub const OFFER_MARKER: char = '!';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("automaton declares no states")]
    NoStates,
    #[error("automaton has no initial state")]
    MissingInitial,
    #[error("state \"{0}\" is declared more than once")]
    DuplicateState(String),
    #[error("\"{0}\" is not in the declared states")]
    UnknownState(String),
    #[error("transition \"{state} {label}\" is declared more than once")]
    DuplicateTransition { state: String, label: String },
}

/// A single `source --label--> dest` transition.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Transition {
    pub source: StateId,
    pub label: String,
    pub dest: StateId,
}

impl Transition {
    /// Returns true if the label starts with [`OFFER_MARKER`].
    pub fn is_offer(&self) -> bool {
        is_offer_label(&self.label)
    }
}

pub fn is_offer_label(label: &str) -> bool {
    label.starts_with(OFFER_MARKER)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    names: Vec<String>,
    index: HashMap<String, StateId>,
    initial: StateId,
    target: Option<StateId>,
    transitions: Vec<Transition>,
    outgoing: Vec<Vec<TransitionId>>,
}

impl Automaton {
    pub fn num_states(&self) -> usize {
        self.names.len()
    }

    pub fn num_transitions(&self) -> usize {
        self.transitions.len()
    }

    /// Iterates over all states in declaration order.
    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        (0..self.names.len()).map(StateId::new)
    }

    pub fn name(&self, state: StateId) -> &str {
        &self.names[state.index()]
    }

    /// Looks up a state by its declared name.
    pub fn state(&self, name: &str) -> Option<StateId> {
        self.index.get(name).copied()
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn target(&self) -> Option<StateId> {
        self.target
    }

    /// All transitions in declaration order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn transition(&self, id: TransitionId) -> &Transition {
        &self.transitions[id.index()]
    }

    /// Transitions leaving `state`, in declaration order.
    pub fn outgoing(&self, state: StateId) -> &[TransitionId] {
        &self.outgoing[state.index()]
    }

    /// Returns true if any transition leaving `state` carries an offer label.
    pub fn is_offering(&self, state: StateId) -> bool {
        self.outgoing(state).iter().any(|&t| self.transition(t).is_offer())
    }

    /// Finds the transition leaving `state` with the given label.
    pub fn find(&self, state: StateId, label: &str) -> Option<TransitionId> {
        self.outgoing(state)
            .iter()
            .copied()
            .find(|&t| self.transition(t).label == label)
    }

    /// Single-step lookup: the destination of `state --label-->`, if any.
    pub fn step(&self, state: StateId, label: &str) -> Option<StateId> {
        self.find(state, label).map(|t| self.transition(t).dest)
    }

    /// The first transition (in declaration order) carrying `label`, from any state.
    pub fn first_with_label(&self, label: &str) -> Option<TransitionId> {
        self.transitions
            .iter()
            .position(|t| t.label == label)
            .map(TransitionId::new)
    }

    /// Renders the automaton in the line-oriented text format read by [`crate::io`].
    pub fn to_text(&self) -> String {
        let mut text = self.names.join(" ");
        text.push('\n');
        text.push_str(self.name(self.initial));
        if let Some(target) = self.target {
            text.push(' ');
            text.push_str(self.name(target));
        }
        text.push('\n');
        for t in &self.transitions {
            text.push_str(&format!("{} {} {}\n", self.name(t.source), t.label, self.name(t.dest)));
        }
        text
    }
}

/// Collects raw names and validates them into an [`Automaton`].
#[derive(Debug, Clone, Default)]
pub struct AutomatonBuilder {
    states: Vec<String>,
    initial: Option<String>,
    target: Option<String>,
    transitions: Vec<(String, String, String)>,
}

impl AutomatonBuilder {
    pub fn new<I, S>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            states: states.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn initial(mut self, state: impl Into<String>) -> Self {
        self.initial = Some(state.into());
        self
    }

    pub fn target(mut self, state: impl Into<String>) -> Self {
        self.target = Some(state.into());
        self
    }

    pub fn transition(mut self, source: impl Into<String>, label: impl Into<String>, dest: impl Into<String>) -> Self {
        self.transitions.push((source.into(), label.into(), dest.into()));
        self
    }

    pub fn build(self) -> Result<Automaton, AutomatonError> {
        if self.states.is_empty() {
            return Err(AutomatonError::NoStates);
        }

        let mut index = HashMap::with_capacity(self.states.len());
        for (i, name) in self.states.iter().enumerate() {
            if index.insert(name.clone(), StateId::new(i)).is_some() {
                return Err(AutomatonError::DuplicateState(name.clone()));
            }
        }
        let resolve = |name: &str| index.get(name).copied().ok_or_else(|| AutomatonError::UnknownState(name.to_string()));

        let initial = resolve(self.initial.as_deref().ok_or(AutomatonError::MissingInitial)?)?;
        let target = self.target.as_deref().map(resolve).transpose()?;

        let mut transitions = Vec::with_capacity(self.transitions.len());
        let mut outgoing = vec![Vec::new(); self.states.len()];
        let mut seen = HashSet::new();
        for (source_name, label, dest_name) in &self.transitions {
            let source = resolve(source_name)?;
            let dest = resolve(dest_name)?;
            if !seen.insert((source, label.as_str())) {
                return Err(AutomatonError::DuplicateTransition {
                    state: source_name.clone(),
                    label: label.clone(),
                });
            }
            outgoing[source.index()].push(TransitionId::new(transitions.len()));
            transitions.push(Transition {
                source,
                label: label.clone(),
                dest,
            });
        }

        debug!(
            "automaton: {} states, {} transitions, initial = {}, target = {:?}",
            self.states.len(),
            transitions.len(),
            initial,
            target
        );

        Ok(Automaton {
            names: self.states,
            index,
            initial,
            target,
            transitions,
            outgoing,
        })
    }
}
