//! Core implementation of gitchord
//!
//! gitchord expands short key chords such as `acp` into a sequence of git
//! invocations (`git add -A`, `git commit -m …`, `git push`). Keys map to
//! command templates, two-key multi commands or macros; arguments come from
//! inline quotes in the chord or from positional arguments. Steps run in order
//! and the chord stops at the first failure.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config_file::{Config, ConfigError};
use crate::registry::{Registry, RegistryBuilder};

pub mod branch;
pub mod chord;
pub mod config_file;
pub mod executor;
pub mod listing;
pub mod logger;
pub mod registry;
pub mod sequencer;

/// Build the registry from the built-in keys plus a config file, if any.
///
/// `config_file` must exist when given; otherwise the current directory and
/// its parents are searched. Returns the registry and the config path used.
///
/// # Errors
///
/// Returns `ConfigError` if the given config file is missing, a config file
/// cannot be parsed, or the resulting tables fail validation.
pub fn load_registry(
    config_file: Option<&str>,
) -> Result<(Registry, Option<PathBuf>), ConfigError> {
    let config_path = match config_file {
        Some(file) => {
            let config_path = PathBuf::from(file);
            if !config_path.exists() {
                return Err(ConfigError::ConfigNotFound(config_path));
            }
            Some(config_path)
        }
        None => Config::find_config()?,
    };

    let registry = match &config_path {
        Some(path) => registry_from_file(path)?,
        None => Registry::builtin()?,
    };
    Ok((registry, config_path))
}

fn registry_from_file(path: &Path) -> Result<Registry, ConfigError> {
    debug!("Loading keys from config file: {}", path.display());
    let parsed = Config::from_file(path)?;
    validate_version(&parsed.gitchord_version);
    RegistryBuilder::with_builtins()?
        .apply_config(parsed)?
        .build()
}

/// Warn if the config's `gitchord_version` doesn't match the binary version
fn validate_version(config_version: &str) {
    let binary_version = env!("CARGO_PKG_VERSION");
    if config_version != binary_version {
        warn!(
            "Config gitchord_version '{config_version}' differs from binary version '{binary_version}'"
        );
    }
}
