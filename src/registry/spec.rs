use std::fmt;

use crate::config_file::ConfigError;

/// Placeholder substituted with a command's argument
pub const PLACEHOLDER: &str = "{}";
/// Placeholder substituted with the branch captured when a chord starts
pub const BRANCH_PLACEHOLDER: &str = "{branch}";
/// Separator between the steps of a macro
pub const MACRO_DELIMITER: char = ':';
/// Characters that open an inline argument in a chord
pub const QUOTES: [char; 2] = ['"', '\''];

/// How a command binds its argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgPolicy {
    /// Placeholder resolves to an empty string unless quoted inline
    None,
    /// An argument must be supplied inline or positionally
    Required,
    /// Falls back to `default` (or nothing) when no argument is supplied
    Optional { default: Option<String> },
}

impl ArgPolicy {
    /// Whether the command consumes the next positional argument
    #[must_use]
    pub fn takes_positional(&self) -> bool {
        !matches!(self, ArgPolicy::None)
    }
}

/// Command line pattern with a single `{}` placeholder.
///
/// Words are whitespace-separated. Substitution happens per word, so a value
/// containing spaces stays a single argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    words: Vec<String>,
}

impl Template {
    /// # Errors
    ///
    /// Returns `ConfigError::Placeholder` unless `text` contains exactly one `{}`.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let count = text.matches(PLACEHOLDER).count();
        if count != 1 {
            return Err(ConfigError::Placeholder {
                template: text.to_string(),
                count,
            });
        }
        Ok(Template {
            words: text.split_whitespace().map(str::to_string).collect(),
        })
    }

    /// Substitute `value` and return the argument vector. A word left empty by
    /// the substitution is dropped.
    #[must_use]
    pub fn render(&self, value: &str) -> Vec<String> {
        self.words
            .iter()
            .map(|word| word.replace(PLACEHOLDER, value))
            .filter(|word| !word.is_empty())
            .collect()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.words.join(" "))
    }
}

/// A single-key command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub key: char,
    pub arg: ArgPolicy,
    pub template: Template,
    pub description: String,
}

/// A two-key command that runs a literal command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiCommandSpec {
    pub key: String,
    pub args: Vec<String>,
    pub description: String,
}

impl MultiCommandSpec {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidKey` unless `key` is exactly two valid
    /// characters, or `ConfigError::Validation` if `cmd` is empty or contains a
    /// placeholder.
    pub fn new(
        key: &str,
        cmd: &str,
        description: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        if key.chars().count() != 2 {
            return Err(ConfigError::InvalidKey {
                kind: "multi",
                key: key.to_string(),
                reason: "must be exactly two characters",
            });
        }
        for c in key.chars() {
            check_key_char("multi", c)?;
        }
        if cmd.contains(PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "Multi command '{key}' cannot take an argument: `{cmd}`"
            )));
        }
        let args: Vec<String> = cmd.split_whitespace().map(str::to_string).collect();
        if args.is_empty() {
            return Err(ConfigError::Validation(format!(
                "Multi command '{key}' has an empty command line"
            )));
        }
        Ok(MultiCommandSpec {
            key: key.to_string(),
            args,
            description: description.into(),
        })
    }
}

/// One step of a macro. The argument may contain `{branch}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroStep {
    pub key: String,
    pub argument: Option<String>,
}

impl MacroStep {
    fn parse(text: &str) -> Self {
        let (key, rest) = text.split_once(' ').unwrap_or((text, text));
        let argument = (rest != key).then(|| rest.to_string());
        MacroStep {
            key: key.to_string(),
            argument,
        }
    }
}

impl fmt::Display for MacroStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.argument {
            Some(argument) => write!(f, "{} {argument}", self.key),
            None => f.write_str(&self.key),
        }
    }
}

/// A key that expands into a fixed sequence of other keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroSpec {
    pub key: char,
    pub steps: Vec<MacroStep>,
    pub description: String,
}

impl MacroSpec {
    /// Parse a colon-delimited step list such as `x main:l:x {branch}`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidKey` for a reserved key character, or
    /// `ConfigError::Validation` if the list or one of its steps is empty.
    pub fn parse(
        key: char,
        steps: &str,
        description: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        check_key_char("macro", key)?;
        let steps = steps
            .split(MACRO_DELIMITER)
            .map(str::trim)
            .map(|step| {
                if step.is_empty() {
                    Err(ConfigError::Validation(format!(
                        "Macro '{key}' contains an empty step"
                    )))
                } else {
                    Ok(MacroStep::parse(step))
                }
            })
            .collect::<Result<Vec<MacroStep>, ConfigError>>()?;
        Ok(MacroSpec {
            key,
            steps,
            description: description.into(),
        })
    }
}

impl fmt::Display for MacroSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<String> = self.steps.iter().map(ToString::to_string).collect();
        f.write_str(&steps.join(" : "))
    }
}

/// Reject characters the chord grammar reserves.
pub(crate) fn check_key_char(kind: &'static str, c: char) -> Result<(), ConfigError> {
    let reason = if c.is_whitespace() {
        "whitespace cannot be a key"
    } else if QUOTES.contains(&c) {
        "quotes delimit inline arguments"
    } else if c == MACRO_DELIMITER {
        "':' separates macro steps"
    } else if c == '{' || c == '}' {
        "braces are reserved for placeholders"
    } else {
        return Ok(());
    };
    Err(ConfigError::InvalidKey {
        kind,
        key: c.to_string(),
        reason,
    })
}
