//! Runs a whole chord: tokenize once, then execute steps in order until one fails.

use log::{debug, warn};
use thiserror::Error;

use crate::chord::{ChordInvocation, ParseError, tokenize};
use crate::executor::{ExecutionError, Executor, Runner};
use crate::registry::Registry;

#[derive(Error, Debug)]
pub enum SequenceError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Step {index} ('{key}') failed: {source}")]
    Step {
        /// 1-based position in the expanded step list
        index: usize,
        key: String,
        #[source]
        source: ExecutionError,
    },
}

impl SequenceError {
    /// Key of the command or character that stopped the chord
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            SequenceError::Parse(ParseError::UnknownCommand { key, .. }) => key.to_string(),
            SequenceError::Step { key, .. } => key.clone(),
        }
    }
}

/// Summary of a chord that ran to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceReport {
    pub executed: usize,
}

pub struct Sequencer<'a, R> {
    registry: &'a Registry,
    executor: Executor<'a, R>,
}

impl<'a, R: Runner> Sequencer<'a, R> {
    #[must_use]
    pub fn new(registry: &'a Registry, runner: R) -> Self {
        Sequencer {
            registry,
            executor: Executor::new(registry, runner),
        }
    }

    #[must_use]
    pub fn executor(&self) -> &Executor<'a, R> {
        &self.executor
    }

    /// Run every step of `invocation`. An empty chord runs the registry's
    /// default chord.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::Parse` if the chord does not tokenize (nothing
    /// runs), or `SequenceError::Step` for the first step that fails (later
    /// steps are skipped).
    pub fn run(&self, invocation: &ChordInvocation) -> Result<SequenceReport, SequenceError> {
        let chord = if invocation.chord().is_empty() {
            debug!(
                "Empty chord, running default '{}'",
                self.registry.default_chord()
            );
            self.registry.default_chord()
        } else {
            invocation.chord()
        };

        let stream = tokenize(
            self.registry,
            chord,
            invocation.args(),
            invocation.branch(),
        )?;
        let unused = &invocation.args()[stream.consumed_args..];
        if !unused.is_empty() {
            warn!("Ignoring unused argument(s): {}", unused.join(", "));
        }

        for (i, step) in stream.steps.iter().enumerate() {
            self.executor
                .execute(step)
                .map_err(|source| SequenceError::Step {
                    index: i + 1,
                    key: step.key.clone(),
                    source,
                })?;
        }

        Ok(SequenceReport {
            executed: stream.steps.len(),
        })
    }
}
