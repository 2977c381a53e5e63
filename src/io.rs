//! Text formats for automata and traces.
//!
//! # Automaton format
//!
//! ```text
//! <state> <state> ...          # declared states, space-separated
//! <initial> [<target>]         # initial state, optional target state
//! <source> <label> <dest>      # one transition per line
//! ```
//!
//! Blank lines after the header are ignored.
//!
//! # Trace format
//!
//! One transition label per line; blank lines are ignored.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::automaton::{Automaton, AutomatonBuilder, AutomatonError};

/// Error type for I/O operations.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("invalid automaton: {0}")]
    Automaton(#[from] AutomatonError),
}

fn parse_error(line: usize, message: impl Into<String>) -> IoError {
    IoError::Parse {
        line,
        message: message.into(),
    }
}

impl Automaton {
    /// Loads an automaton from a file.
    ///
    /// ```no_run
    /// use reachgame::automaton::Automaton;
    ///
    /// let automaton = Automaton::load("door.lts").unwrap();
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, IoError> {
        let content = fs::read_to_string(path)?;
        Self::from_text(&content)
    }

    /// Saves the automaton in the format read by [`Automaton::load`].
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), IoError> {
        fs::write(path, self.to_text())?;
        Ok(())
    }

    /// Parses an automaton from its text representation.
    pub fn from_text(content: &str) -> Result<Self, IoError> {
        let mut lines = content.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));

        let (_, header) = lines.next().ok_or_else(|| parse_error(1, "missing state declarations"))?;
        let states: Vec<&str> = header.split_whitespace().collect();
        if states.is_empty() {
            return Err(parse_error(1, "missing state declarations"));
        }

        let (line, designation) = lines.next().ok_or_else(|| parse_error(2, "missing initial state"))?;
        let mut builder = match designation.split_whitespace().collect::<Vec<_>>()[..] {
            [initial] => AutomatonBuilder::new(states).initial(initial),
            [initial, target] => AutomatonBuilder::new(states).initial(initial).target(target),
            _ => return Err(parse_error(line, format!("expected `<initial> [<target>]`, found `{}`", designation))),
        };

        for (line, text) in lines {
            if text.is_empty() {
                continue;
            }
            match text.split_whitespace().collect::<Vec<_>>()[..] {
                [source, label, dest] => builder = builder.transition(source, label, dest),
                _ => return Err(parse_error(line, format!("expected `<source> <label> <dest>`, found `{}`", text))),
            }
        }

        Ok(builder.build()?)
    }
}

/// Loads a trace from a file.
pub fn load_trace<P: AsRef<Path>>(path: P) -> Result<Vec<String>, IoError> {
    let content = fs::read_to_string(path)?;
    Ok(parse_trace(&content))
}

/// Parses a trace: one label per non-blank line.
pub fn parse_trace(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
