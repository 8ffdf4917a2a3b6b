//! Keys available without any configuration file.

use super::RegistryBuilder;
use super::spec::{ArgPolicy, CommandSpec, MacroSpec, MultiCommandSpec, Template};
use crate::config_file::ConfigError;

enum Arg {
    None,
    Required,
    Default(&'static str),
    Optional,
}

struct Command {
    key: char,
    arg: Arg,
    template: &'static str,
    description: &'static str,
}

struct Multi {
    key: &'static str,
    cmd: &'static str,
    description: &'static str,
}

struct Macro {
    key: char,
    steps: &'static str,
    description: &'static str,
}

/// Chord used when the user passes an empty one
pub(super) const DEFAULT_CHORD: &str = "s";
/// Program every command runs through
pub(super) const DEFAULT_VCS: &str = "git";

const COMMANDS: &[Command] = &[
    Command {
        key: 's',
        arg: Arg::None,
        template: "status {}",
        description: "Show the working tree status",
    },
    Command {
        key: 'a',
        arg: Arg::None,
        template: "add -A {}",
        description: "Stage all changes",
    },
    Command {
        key: 'c',
        arg: Arg::Required,
        template: "commit -m {}",
        description: "Commit staged changes with a message",
    },
    Command {
        key: 'p',
        arg: Arg::None,
        template: "push {}",
        description: "Push the current branch",
    },
    Command {
        key: 'l',
        arg: Arg::None,
        template: "pull {}",
        description: "Pull from the upstream branch",
    },
    Command {
        key: 'f',
        arg: Arg::None,
        template: "fetch {}",
        description: "Fetch from the default remote",
    },
    Command {
        key: 'x',
        arg: Arg::Default("main"),
        template: "checkout {}",
        description: "Check out a branch",
    },
    Command {
        key: 'b',
        arg: Arg::Required,
        template: "checkout -b {}",
        description: "Create and check out a new branch",
    },
    Command {
        key: 'm',
        arg: Arg::Required,
        template: "merge {}",
        description: "Merge a branch into the current one",
    },
    Command {
        key: 'r',
        arg: Arg::Default("main"),
        template: "rebase {}",
        description: "Rebase the current branch",
    },
    Command {
        key: 'd',
        arg: Arg::None,
        template: "diff {}",
        description: "Show unstaged changes",
    },
    Command {
        key: 'g',
        arg: Arg::None,
        template: "log --oneline --graph -n 20 {}",
        description: "Show recent history",
    },
    Command {
        key: 't',
        arg: Arg::None,
        template: "stash {}",
        description: "Stash working tree changes",
    },
    Command {
        key: 'o',
        arg: Arg::Optional,
        template: "stash pop {}",
        description: "Pop a stash entry (latest when none is given)",
    },
    Command {
        key: 'u',
        arg: Arg::Default("HEAD~1"),
        template: "reset --soft {}",
        description: "Undo commits, keeping their changes staged",
    },
];

const MULTI: &[Multi] = &[
    Multi {
        key: "pf",
        cmd: "push --force-with-lease",
        description: "Force-push, refusing to overwrite unseen remote work",
    },
    Multi {
        key: "pu",
        cmd: "push -u origin HEAD",
        description: "Push and set the upstream branch",
    },
    Multi {
        key: "ca",
        cmd: "commit --amend --no-edit",
        description: "Amend the last commit with staged changes",
    },
    Multi {
        key: "rc",
        cmd: "rebase --continue",
        description: "Continue an interrupted rebase",
    },
    Multi {
        key: "ra",
        cmd: "rebase --abort",
        description: "Abort an interrupted rebase",
    },
];

const MACROS: &[Macro] = &[
    Macro {
        key: 'S',
        steps: "x main:l:x {branch}:r main",
        description: "Update main and rebase the current branch onto it",
    },
    Macro {
        key: 'W',
        steps: "a:c WIP on {branch}:p",
        description: "Commit everything as work in progress and push",
    },
];

impl RegistryBuilder {
    /// Start from the built-in command, multi-command and macro tables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a built-in entry is malformed.
    pub fn with_builtins() -> Result<Self, ConfigError> {
        let mut builder = RegistryBuilder::new();
        for command in COMMANDS {
            let arg = match command.arg {
                Arg::None => ArgPolicy::None,
                Arg::Required => ArgPolicy::Required,
                Arg::Default(default) => ArgPolicy::Optional {
                    default: Some(default.to_string()),
                },
                Arg::Optional => ArgPolicy::Optional { default: None },
            };
            builder = builder.command(CommandSpec {
                key: command.key,
                arg,
                template: Template::parse(command.template)?,
                description: command.description.to_string(),
            });
        }
        for multi in MULTI {
            builder = builder.multi(MultiCommandSpec::new(
                multi.key,
                multi.cmd,
                multi.description,
            )?);
        }
        for spec in MACROS {
            builder = builder.macro_spec(MacroSpec::parse(
                spec.key,
                spec.steps,
                spec.description,
            )?);
        }
        Ok(builder)
    }
}
