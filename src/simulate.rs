//! Monte-Carlo validation of a trace against winning strategies.
//!
//! The [`Simulator`] tries to show that an observed trace is a fragment of an
//! infinitely repeatable play in which Blue follows its rank-based strategy while
//! Red moves uniformly at random. One attempt runs three phases:
//!
//! 1. **Approach**: from the initial state, play until the *anchor* (the source of the
//!    trace's first label) is reached. Blue follows the strategy towards the anchor.
//! 2. **Replay**: consume the trace label by label. Blue plays the traced label; on
//!    Red's turn the adversary moves at random and must happen to take the traced
//!    transition.
//! 3. **Return**: play until the initial state recurs, Blue now following the strategy
//!    towards the initial state.
//!
//! An attempt is aborted when the play falls into `ErrorBlue`, when Blue has no move,
//! when the trace deviates, or when a phase exceeds its step budget. Aborted attempts
//! are retried from scratch until the attempt budget or the deadline runs out.
//!
//! Attempt `k` draws from stream `k` of a ChaCha generator seeded with
//! [`SimulationConfig::seed`], so every attempt is reproducible in isolation.
//!
//! ```
//! use reachgame::automaton::AutomatonBuilder;
//! use reachgame::simulate::{simulate, SimulationConfig};
//!
//! let automaton = AutomatonBuilder::new(["a", "b"])
//!     .initial("a")
//!     .transition("a", "x", "b")
//!     .transition("b", "y", "a")
//!     .build()
//!     .unwrap();
//!
//! let config = SimulationConfig::default().with_seed(7);
//! let replay = simulate(&automaton, &["x", "y"], &config).unwrap();
//! assert_eq!(replay.anchor, automaton.initial());
//! ```

use std::fmt;
use std::time::Instant;

use log::{debug, info, trace, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

use crate::automaton::Automaton;
use crate::game::{GameGraph, Vertex};
use crate::rank::Ranks;
use crate::strategy::{Decision, Strategy};
use crate::types::{Owner, StateId, VertexId};

/// Budgets bounding a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Seed of the adversary's random generator.
    pub seed: u64,
    /// Maximum number of attempts before giving up.
    pub max_attempts: usize,
    /// Maximum number of moves in the approach and return phases of one attempt.
    pub max_steps: usize,
    /// Wall-clock limit, checked before each attempt.
    pub deadline: Option<Instant>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_attempts: 10_000,
            max_steps: 1_000,
            deadline: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Phase {
    Approach,
    Replay,
    Return,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Approach => write!(f, "approach"),
            Phase::Replay => write!(f, "replay"),
            Phase::Return => write!(f, "return"),
        }
    }
}

/// Why an attempt was abandoned.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AbortReason {
    /// The play reached `ErrorBlue`.
    Trap,
    /// Blue had no move towards its goal.
    NoMove,
    /// The trace's next label was unavailable, or Red took another transition.
    Deviation,
    /// The phase ran out of steps.
    StepLimit,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Abort {
    pub phase: Phase,
    pub reason: AbortReason,
}

impl fmt::Display for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} during {}", self.reason, self.phase)
    }
}

/// Counts of aborted attempts by reason.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct AttemptStats {
    pub attempts: usize,
    pub traps: usize,
    pub stuck: usize,
    pub deviations: usize,
    pub step_limits: usize,
}

impl AttemptStats {
    fn record(&mut self, reason: AbortReason) {
        match reason {
            AbortReason::Trap => self.traps += 1,
            AbortReason::NoMove => self.stuck += 1,
            AbortReason::Deviation => self.deviations += 1,
            AbortReason::StepLimit => self.step_limits += 1,
        }
    }

    /// Number of aborted attempts.
    pub fn aborted(&self) -> usize {
        self.traps + self.stuck + self.deviations + self.step_limits
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("trace is empty")]
    EmptyTrace,
    #[error("no transition is labeled \"{0}\"")]
    UnknownLabel(String),
    #[error("no successful attempt within {} attempts", .0.attempts)]
    AttemptsExhausted(AttemptStats),
    #[error("deadline exceeded after {} attempts", .0.attempts)]
    DeadlineExceeded(AttemptStats),
}

/// A single move of a simulated play.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Move {
    pub phase: Phase,
    pub mover: Owner,
    pub from: VertexId,
    pub to: VertexId,
}

/// A successful attempt.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Replay {
    /// State from which the trace's first label departs.
    pub anchor: StateId,
    /// 1-based index of the successful attempt.
    pub attempt: usize,
    /// Moves of the successful attempt, in order.
    pub moves: Vec<Move>,
    /// Statistics over all attempts, the successful one included.
    pub stats: AttemptStats,
}

impl Replay {
    pub fn phase_moves(&self, phase: Phase) -> impl Iterator<Item = &Move> + '_ {
        self.moves.iter().filter(move |m| m.phase == phase)
    }
}

pub struct Simulator<'a> {
    automaton: &'a Automaton,
    graph: &'a GameGraph,
    trace: Vec<String>,
    anchor: StateId,
    to_anchor: Strategy,
    to_initial: Strategy,
}

impl<'a> Simulator<'a> {
    /// Locates the trace's anchor and computes the two strategies the play follows.
    ///
    /// `graph` must have been built from `automaton`.
    pub fn new<S: AsRef<str>>(automaton: &'a Automaton, graph: &'a GameGraph, trace: &[S]) -> Result<Self, SimulationError> {
        let first: &str = trace.first().ok_or(SimulationError::EmptyTrace)?.as_ref();
        let anchor = automaton
            .first_with_label(first)
            .map(|t| automaton.transition(t).source)
            .ok_or_else(|| SimulationError::UnknownLabel(first.to_string()))?;
        debug!("anchor of trace: {} (first label {})", automaton.name(anchor), first);

        let strategy_towards = |state: StateId| {
            let ranks = Ranks::compute(graph, graph.state_vertex(state));
            Strategy::extract(automaton, graph, &ranks)
        };
        let to_anchor = strategy_towards(anchor);
        let to_initial = strategy_towards(automaton.initial());

        Ok(Self {
            automaton,
            graph,
            trace: trace.iter().map(|l| l.as_ref().to_string()).collect(),
            anchor,
            to_anchor,
            to_initial,
        })
    }

    pub fn anchor(&self) -> StateId {
        self.anchor
    }

    pub fn strategy_to_anchor(&self) -> &Strategy {
        &self.to_anchor
    }

    pub fn strategy_to_initial(&self) -> &Strategy {
        &self.to_initial
    }

    /// Runs attempts until one succeeds or a budget runs out.
    pub fn run(&self, config: &SimulationConfig) -> Result<Replay, SimulationError> {
        let mut stats = AttemptStats::default();

        for attempt in 0..config.max_attempts {
            if let Some(deadline) = config.deadline {
                if Instant::now() >= deadline {
                    warn!("deadline exceeded after {} attempts", stats.attempts);
                    return Err(SimulationError::DeadlineExceeded(stats));
                }
            }

            let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
            rng.set_stream(attempt as u64);
            stats.attempts += 1;

            match self.attempt(&mut rng, config.max_steps) {
                Ok(moves) => {
                    info!(
                        "trace replayed on attempt {} ({} moves, {} aborted attempts)",
                        attempt + 1,
                        moves.len(),
                        stats.aborted()
                    );
                    return Ok(Replay {
                        anchor: self.anchor,
                        attempt: attempt + 1,
                        moves,
                        stats,
                    });
                }
                Err(abort) => {
                    debug!("attempt {} aborted: {}", attempt + 1, abort);
                    stats.record(abort.reason);
                }
            }
        }

        warn!("no successful attempt within {} attempts", config.max_attempts);
        Err(SimulationError::AttemptsExhausted(stats))
    }

    /// Plays one attempt with the given source of randomness.
    pub fn attempt<R: Rng + ?Sized>(&self, rng: &mut R, max_steps: usize) -> Result<Vec<Move>, Abort> {
        let mut moves = Vec::new();
        let initial = self.graph.state_vertex(self.automaton.initial());
        let anchor = self.graph.state_vertex(self.anchor);

        let at = |phase: Phase| move |reason: AbortReason| Abort { phase, reason };

        self.play_until(Phase::Approach, initial, anchor, &self.to_anchor, rng, &mut moves, max_steps)
            .map_err(at(Phase::Approach))?;
        let end = self.replay(anchor, rng, &mut moves).map_err(at(Phase::Replay))?;
        self.play_until(Phase::Return, end, initial, &self.to_initial, rng, &mut moves, max_steps)
            .map_err(at(Phase::Return))?;

        Ok(moves)
    }

    #[allow(clippy::too_many_arguments)]
    fn play_until<R: Rng + ?Sized>(
        &self,
        phase: Phase,
        mut v: VertexId,
        goal: VertexId,
        strategy: &Strategy,
        rng: &mut R,
        moves: &mut Vec<Move>,
        max_steps: usize,
    ) -> Result<(), AbortReason> {
        let mut steps = 0;
        while v != goal {
            if steps == max_steps {
                return Err(AbortReason::StepLimit);
            }
            let next = match self.graph.owner(v) {
                Owner::Red => self.random_move(v, rng)?,
                Owner::Blue => self.strategy_move(v, strategy)?,
            };
            v = self.advance(phase, v, next, moves)?;
            steps += 1;
        }
        Ok(())
    }

    fn replay<R: Rng + ?Sized>(&self, mut v: VertexId, rng: &mut R, moves: &mut Vec<Move>) -> Result<VertexId, AbortReason> {
        for label in &self.trace {
            let state = self.graph.as_state(v).ok_or(AbortReason::Deviation)?;
            let t = self.automaton.find(state, label).ok_or(AbortReason::Deviation)?;
            let hop = self.graph.hop(t);

            let next = match self.graph.owner(v) {
                Owner::Blue => hop,
                Owner::Red => self.random_move(v, rng)?,
            };
            if next != hop && next != self.graph.error_blue() {
                trace!("red took {} instead of {}", self.graph.vertex_name(next), label);
                return Err(AbortReason::Deviation);
            }
            v = self.advance(Phase::Replay, v, next, moves)?;

            if self.graph.vertex(v).is_synthetic() {
                let next = match self.graph.owner(v) {
                    Owner::Red => self.random_move(v, rng)?,
                    Owner::Blue => self.forced_move(v)?,
                };
                v = self.advance(Phase::Replay, v, next, moves)?;
            }
        }
        Ok(v)
    }

    /// Records the move `from -> to`, failing if it falls into `ErrorBlue`.
    fn advance(&self, phase: Phase, from: VertexId, to: VertexId, moves: &mut Vec<Move>) -> Result<VertexId, AbortReason> {
        let mover = self.graph.owner(from);
        trace!(
            "{}: {} moves {} -> {}",
            phase,
            mover,
            self.graph.vertex_name(from),
            self.graph.vertex_name(to)
        );
        moves.push(Move { phase, mover, from, to });
        if to == self.graph.error_blue() {
            return Err(AbortReason::Trap);
        }
        Ok(to)
    }

    /// Picks uniformly among the distinct successors of `v`.
    fn random_move<R: Rng + ?Sized>(&self, v: VertexId, rng: &mut R) -> Result<VertexId, AbortReason> {
        let mut choices: Vec<VertexId> = Vec::with_capacity(self.graph.successors(v).len());
        for &w in self.graph.successors(v) {
            if !choices.contains(&w) {
                choices.push(w);
            }
        }
        if choices.is_empty() {
            return Err(AbortReason::NoMove);
        }
        Ok(choices[rng.gen_range(0..choices.len())])
    }

    fn forced_move(&self, v: VertexId) -> Result<VertexId, AbortReason> {
        self.graph.successors(v).first().copied().ok_or(AbortReason::NoMove)
    }

    fn strategy_move(&self, v: VertexId, strategy: &Strategy) -> Result<VertexId, AbortReason> {
        match self.graph.vertex(v) {
            Vertex::Split(_) => self.forced_move(v),
            Vertex::ErrorBlue => Err(AbortReason::Trap),
            _ => match strategy.decision(v) {
                Some(Decision::Play(t)) => Ok(self.graph.hop(t)),
                _ => Err(AbortReason::NoMove),
            },
        }
    }
}

/// Builds the game graph of `automaton` and runs the simulator on `trace`.
pub fn simulate<S: AsRef<str>>(automaton: &Automaton, trace: &[S], config: &SimulationConfig) -> Result<Replay, SimulationError> {
    let graph = GameGraph::from_automaton(automaton);
    Simulator::new(automaton, &graph, trace)?.run(config)
}
