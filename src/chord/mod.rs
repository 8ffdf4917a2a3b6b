//! Chord parsing: turning a key string plus positional arguments into an
//! ordered list of execution steps.

use thiserror::Error;

use crate::branch::BranchResolver;

pub mod macros;
pub mod tokenizer;

pub use tokenizer::{TokenStream, tokenize};

/// Errors that abort a chord before any step runs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command '{key}' at position {position}")]
    UnknownCommand { key: char, position: usize },
}

/// One resolved key and the argument bound to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionStep {
    pub key: String,
    pub argument: String,
}

impl ExecutionStep {
    #[must_use]
    pub fn new(key: impl Into<String>, argument: impl Into<String>) -> Self {
        ExecutionStep {
            key: key.into(),
            argument: argument.into(),
        }
    }
}

/// A single user call: the chord, its positional arguments and the branch
/// captured when the call started.
#[derive(Debug, Clone)]
pub struct ChordInvocation {
    chord: String,
    args: Vec<String>,
    branch: String,
}

impl ChordInvocation {
    /// Capture the current branch once; every macro in this chord reuses it.
    #[must_use]
    pub fn new(
        chord: impl Into<String>,
        args: Vec<String>,
        resolver: &dyn BranchResolver,
    ) -> Self {
        Self::with_branch(chord, args, resolver.current_branch())
    }

    #[must_use]
    pub fn with_branch(
        chord: impl Into<String>,
        args: Vec<String>,
        branch: impl Into<String>,
    ) -> Self {
        ChordInvocation {
            chord: chord.into(),
            args,
            branch: branch.into(),
        }
    }

    #[must_use]
    pub fn chord(&self) -> &str {
        &self.chord
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }
}
