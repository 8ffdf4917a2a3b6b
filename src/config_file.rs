//! Configuration file handling for gitchord

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::spec::{ArgPolicy, CommandSpec, MacroSpec, MultiCommandSpec, Template};

/// Errors that can occur while loading configuration or building the registry
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("Unknown working directory: {0}")]
    UnknownWorkingDirectory(String),
    #[error("Unable to parse YAML config file {path}: {source}")]
    Yaml {
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("Unable to parse JSON config file {path}: {source}")]
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("Template `{template}` must contain exactly one `{{}}` placeholder (found {count})")]
    Placeholder { template: String, count: usize },
    #[error("Invalid {kind} key `{key}`: {reason}")]
    InvalidKey {
        kind: &'static str,
        key: String,
        reason: &'static str,
    },
    #[error("Invalid config: {0}")]
    Validation(String),
}

/// Argument policy as written in the config file
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigArg {
    None,
    Required,
    Optional,
}

/// Configuration for a single-key command
#[derive(Debug, Deserialize, Serialize)]
pub struct ConfigCommand {
    pub key: String,
    pub template: String,
    pub arg: Option<ConfigArg>,
    pub default: Option<String>,
    pub description: Option<String>,
}

impl TryFrom<ConfigCommand> for CommandSpec {
    type Error = ConfigError;

    fn try_from(config: ConfigCommand) -> Result<Self, Self::Error> {
        let key = single_char("command", &config.key)?;
        // `default` alone implies an optional argument
        let arg = match (config.arg, config.default) {
            (None, None) | (Some(ConfigArg::None), None) => ArgPolicy::None,
            (Some(ConfigArg::Required), None) => ArgPolicy::Required,
            (None | Some(ConfigArg::Optional), default) => ArgPolicy::Optional { default },
            (Some(ConfigArg::None | ConfigArg::Required), Some(_)) => {
                return Err(ConfigError::Validation(format!(
                    "Command '{key}' sets a default but its argument is not optional"
                )));
            }
        };
        Ok(CommandSpec {
            key,
            arg,
            template: Template::parse(&config.template)?,
            description: config.description.unwrap_or_default(),
        })
    }
}

/// Configuration for a two-key command with a literal command line
#[derive(Debug, Deserialize, Serialize)]
pub struct ConfigMulti {
    pub key: String,
    pub cmd: String,
    pub description: Option<String>,
}

impl TryFrom<ConfigMulti> for MultiCommandSpec {
    type Error = ConfigError;

    fn try_from(config: ConfigMulti) -> Result<Self, Self::Error> {
        MultiCommandSpec::new(
            &config.key,
            &config.cmd,
            config.description.unwrap_or_default(),
        )
    }
}

/// Configuration for a macro key
#[derive(Debug, Deserialize, Serialize)]
pub struct ConfigMacro {
    pub key: String,
    pub steps: String,
    pub description: Option<String>,
}

impl TryFrom<ConfigMacro> for MacroSpec {
    type Error = ConfigError;

    fn try_from(config: ConfigMacro) -> Result<Self, Self::Error> {
        let key = single_char("macro", &config.key)?;
        MacroSpec::parse(key, &config.steps, config.description.unwrap_or_default())
    }
}

/// Root configuration structure for gitchord
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub gitchord_version: String,
    /// Program every command runs through (defaults to `git`)
    pub vcs: Option<String>,
    /// Chord used when the user passes an empty one
    pub default_chord: Option<String>,
    pub commands: Option<Vec<ConfigCommand>>,
    pub multi: Option<Vec<ConfigMulti>>,
    pub macros: Option<Vec<ConfigMacro>>,
}

/// List of supported configuration file names
const FILENAMES: [&str; 3] = [".gitchord.json", ".gitchord.yaml", ".gitchord.yml"];

impl Config {
    /// Loads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file cannot be read, or
    /// `ConfigError::Yaml`/`ConfigError::Json` if parsing fails.
    pub fn from_file(file: &Path) -> Result<Config, ConfigError> {
        let contents = std::fs::read_to_string(file)
            .map_err(|_| ConfigError::ConfigNotFound(file.to_path_buf()))?;
        let config: Config = if file.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents).map_err(|e| ConfigError::Json {
                source: e,
                path: file.to_path_buf(),
            })?
        } else {
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::Yaml {
                source: e,
                path: file.to_path_buf(),
            })?
        };
        Ok(config)
    }

    /// Searches for a configuration file in `start` and its parents.
    ///
    /// Returns `None` when no file is found, gitchord then runs on the
    /// built-in tables alone.
    #[must_use]
    pub fn find_config_from(start: &Path) -> Option<PathBuf> {
        let mut path = start.to_path_buf();
        debug!("Searching for config file in {}", start.display());
        loop {
            for file in &FILENAMES {
                let config_path = path.join(file);
                if config_path.exists() {
                    debug!("Found config file: {}", config_path.display());
                    return Some(config_path);
                }
            }
            if !path.pop() {
                debug!("No config file found, using built-in keys");
                return None;
            }
        }
    }

    /// Searches for a configuration file in the current directory and its parents.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownWorkingDirectory` if the cwd cannot be determined.
    pub fn find_config() -> Result<Option<PathBuf>, ConfigError> {
        let cwd = std::env::current_dir()
            .map_err(|e| ConfigError::UnknownWorkingDirectory(e.to_string()))?;
        Ok(Self::find_config_from(&cwd))
    }
}

/// Parse a key that must be exactly one character.
pub(crate) fn single_char(kind: &'static str, key: &str) -> Result<char, ConfigError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::InvalidKey {
            kind,
            key: key.to_string(),
            reason: "must be exactly one character",
        }),
    }
}
