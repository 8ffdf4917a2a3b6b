//! Resolving execution steps into command lines and running them.

use std::fmt;
use std::process::Command as ProcessCommand;

use log::info;
use thiserror::Error;

use crate::chord::ExecutionStep;
use crate::registry::Registry;
use crate::registry::spec::ArgPolicy;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Unknown command '{0}'")]
    UnknownKey(String),
    #[error("Command '{0}' requires an argument")]
    MissingArgument(String),
    #[error("Command '{key}' failed with {}: {command}", describe_exit(.exit_code.as_ref()))]
    Failed {
        key: String,
        command: CommandLine,
        exit_code: Option<i32>,
    },
    #[error("Unable to run `{command}` for command '{key}': {source}")]
    Spawn {
        key: String,
        command: CommandLine,
        #[source]
        source: std::io::Error,
    },
}

fn describe_exit(exit_code: Option<&i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// A fully resolved program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", quote_for_display(arg))?;
        }
        Ok(())
    }
}

/// Quote an argument so the echoed line can be pasted back into a shell.
fn quote_for_display(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:@%+,~^".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Exit information from a finished command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub exit_code: Option<i32>,
}

impl Outcome {
    #[must_use]
    pub fn success() -> Self {
        Outcome {
            success: true,
            exit_code: Some(0),
        }
    }
}

/// Launches resolved command lines
pub trait Runner {
    /// Run `line` to completion.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the program cannot be started.
    fn run(&self, line: &CommandLine) -> std::io::Result<Outcome>;
}

/// Runs commands as child processes sharing this process's stdio
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn run(&self, line: &CommandLine) -> std::io::Result<Outcome> {
        let status = ProcessCommand::new(&line.program)
            .args(&line.args)
            .status()?;
        Ok(Outcome {
            success: status.success(),
            exit_code: status.code(),
        })
    }
}

/// Runs nothing and reports success, used for `--dry-run`
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunner;

impl Runner for DryRunner {
    fn run(&self, _line: &CommandLine) -> std::io::Result<Outcome> {
        Ok(Outcome::success())
    }
}

pub struct Executor<'a, R> {
    registry: &'a Registry,
    runner: R,
}

impl<'a, R: Runner> Executor<'a, R> {
    #[must_use]
    pub fn new(registry: &'a Registry, runner: R) -> Self {
        Executor { registry, runner }
    }

    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Resolve the command line for `step` without running it.
    ///
    /// The bound argument wins; an empty one falls back to the command's
    /// default, and a required argument with neither is an error.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::MissingArgument` or `ExecutionError::UnknownKey`.
    pub fn resolve(&self, step: &ExecutionStep) -> Result<CommandLine, ExecutionError> {
        if let Some(multi) = self.registry.multi(&step.key) {
            return Ok(self.command_line(multi.args.clone()));
        }

        let spec = single_key(&step.key)
            .and_then(|key| self.registry.command(key))
            .ok_or_else(|| ExecutionError::UnknownKey(step.key.clone()))?;

        let value = if step.argument.is_empty() {
            match &spec.arg {
                ArgPolicy::Optional {
                    default: Some(default),
                } => default.as_str(),
                ArgPolicy::Required => {
                    return Err(ExecutionError::MissingArgument(step.key.clone()));
                }
                ArgPolicy::Optional { default: None } | ArgPolicy::None => "",
            }
        } else {
            step.argument.as_str()
        };
        Ok(self.command_line(spec.template.render(value)))
    }

    /// Resolve and run `step`, logging the command line first.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError` if resolution fails, the program cannot be
    /// started, or it exits unsuccessfully.
    pub fn execute(&self, step: &ExecutionStep) -> Result<(), ExecutionError> {
        let command = self.resolve(step)?;
        info!("{command}");
        match self.runner.run(&command) {
            Ok(outcome) if outcome.success => Ok(()),
            Ok(outcome) => Err(ExecutionError::Failed {
                key: step.key.clone(),
                command,
                exit_code: outcome.exit_code,
            }),
            Err(source) => Err(ExecutionError::Spawn {
                key: step.key.clone(),
                command,
                source,
            }),
        }
    }

    fn command_line(&self, args: Vec<String>) -> CommandLine {
        CommandLine {
            program: self.registry.vcs().to_string(),
            args,
        }
    }
}

fn single_key(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
