//! # reachgame: reachability games over labeled transition systems
//!
//! **`reachgame`** turns a labeled transition system into a two-player reachability game,
//! computes winning strategies for the player seeking a target state, and validates a
//! strategy by replaying an observed trace against a randomized adversary.
//!
//! ## The game
//!
//! Every state of the automaton belongs to one of two players:
//!
//! - **Blue** (existential) wants to reach the target and picks a single move;
//! - **Red** (universal) is the adversary; states offering a `!`-labeled transition are Red.
//!
//! The automaton is turned into a strictly alternating [`GameGraph`][crate::game::GameGraph],
//! backward **ranks** measure how many layers Blue needs to force the target, and the
//! **strategy** picks, in every Blue state, the transition with the lowest-ranked destination.
//!
//! ## Basic Usage
//!
//! ```rust
//! use reachgame::automaton::AutomatonBuilder;
//! use reachgame::game::GameGraph;
//! use reachgame::rank::Ranks;
//! use reachgame::strategy::{Decision, Strategy};
//!
//! // 1. Describe the automaton
//! let automaton = AutomatonBuilder::new(["idle", "busy", "done"])
//!     .initial("idle")
//!     .target("done")
//!     .transition("idle", "start", "busy")
//!     .transition("busy", "!finish", "done")
//!     .transition("busy", "!abort", "idle")
//!     .build()
//!     .unwrap();
//!
//! // 2. Build the bipartite game graph
//! let graph = GameGraph::from_automaton(&automaton);
//! assert!(graph.is_alternating());
//!
//! // 3. Rank every vertex relative to the target
//! let target = graph.state_vertex(automaton.target().unwrap());
//! let ranks = Ranks::compute(&graph, target);
//! assert_eq!(ranks.get(target), Some(0));
//!
//! // 4. Extract Blue's strategy
//! let strategy = Strategy::extract(&automaton, &graph, &ranks);
//! assert_eq!(strategy.label(&automaton, automaton.initial()), Some("start"));
//! assert_eq!(strategy.choice(automaton.target().unwrap()), Some(Decision::Arrived));
//! ```
//!
//! ## Core Components
//!
//! - **[`automaton`]**: Labeled transition systems and their validation.
//! - **[`game`]**: The bipartite game graph with its two trap vertices.
//! - **[`rank`]** and **[`couple`]**: Integer and couple rank solvers.
//! - **[`strategy`]**: Memoryless strategy extraction.
//! - **[`simulate`]**: Monte-Carlo trace replay against a random adversary.
//! - **[`io`]**: Text formats for automata and traces.

pub mod automaton;
pub mod couple;
pub mod debug;
pub mod game;
pub mod io;
pub mod rank;
pub mod simulate;
pub mod strategy;
pub mod types;
pub mod vertex_set;
