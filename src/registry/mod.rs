//! Lookup tables mapping chord keys to commands, multi-commands and macros.
//!
//! A [`Registry`] is assembled once through a [`RegistryBuilder`] (built-in
//! tables first, configuration entries on top) and is read-only afterwards.

use std::collections::HashMap;

use log::{debug, warn};

use crate::config_file::{Config, ConfigError};
use crate::registry::spec::{CommandSpec, MacroSpec, MultiCommandSpec, check_key_char};

mod builtin;
pub mod spec;

/// Immutable key tables consulted while tokenizing and executing a chord
#[derive(Debug, Clone)]
pub struct Registry {
    vcs: String,
    default_chord: String,
    commands: HashMap<char, CommandSpec>,
    multi: HashMap<String, MultiCommandSpec>,
    macros: HashMap<char, MacroSpec>,
}

impl Registry {
    /// Registry holding only the built-in keys.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a built-in entry fails validation.
    pub fn builtin() -> Result<Self, ConfigError> {
        RegistryBuilder::with_builtins()?.build()
    }

    #[must_use]
    pub fn command(&self, key: char) -> Option<&CommandSpec> {
        self.commands.get(&key)
    }

    #[must_use]
    pub fn multi(&self, key: &str) -> Option<&MultiCommandSpec> {
        self.multi.get(key)
    }

    #[must_use]
    pub fn macro_spec(&self, key: char) -> Option<&MacroSpec> {
        self.macros.get(&key)
    }

    /// Program the resolved command lines are run with
    #[must_use]
    pub fn vcs(&self) -> &str {
        &self.vcs
    }

    /// Chord substituted for an empty one
    #[must_use]
    pub fn default_chord(&self) -> &str {
        &self.default_chord
    }

    /// Single-key commands sorted by key
    #[must_use]
    pub fn commands(&self) -> Vec<&CommandSpec> {
        let mut commands: Vec<&CommandSpec> = self.commands.values().collect();
        commands.sort_by_key(|spec| spec.key);
        commands
    }

    /// Multi-key commands sorted by key
    #[must_use]
    pub fn multi_commands(&self) -> Vec<&MultiCommandSpec> {
        let mut multi: Vec<&MultiCommandSpec> = self.multi.values().collect();
        multi.sort_by(|a, b| a.key.cmp(&b.key));
        multi
    }

    /// Macros sorted by key
    #[must_use]
    pub fn macros(&self) -> Vec<&MacroSpec> {
        let mut macros: Vec<&MacroSpec> = self.macros.values().collect();
        macros.sort_by_key(|spec| spec.key);
        macros
    }
}

/// Collects table entries before the registry is frozen. Later entries
/// replace earlier ones with the same key.
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    vcs: String,
    default_chord: String,
    commands: HashMap<char, CommandSpec>,
    multi: HashMap<String, MultiCommandSpec>,
    macros: HashMap<char, MacroSpec>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    /// Empty tables, `git` as the program and `s` as the default chord.
    #[must_use]
    pub fn new() -> Self {
        RegistryBuilder {
            vcs: builtin::DEFAULT_VCS.to_string(),
            default_chord: builtin::DEFAULT_CHORD.to_string(),
            commands: HashMap::new(),
            multi: HashMap::new(),
            macros: HashMap::new(),
        }
    }

    #[must_use]
    pub fn vcs(mut self, vcs: impl Into<String>) -> Self {
        self.vcs = vcs.into();
        self
    }

    #[must_use]
    pub fn default_chord(mut self, chord: impl Into<String>) -> Self {
        self.default_chord = chord.into();
        self
    }

    #[must_use]
    pub fn command(mut self, spec: CommandSpec) -> Self {
        let key = spec.key;
        if self.commands.insert(key, spec).is_some() {
            debug!("Replaced definition of command '{key}'");
        }
        self
    }

    #[must_use]
    pub fn multi(mut self, spec: MultiCommandSpec) -> Self {
        let key = spec.key.clone();
        if self.multi.insert(spec.key.clone(), spec).is_some() {
            debug!("Replaced definition of multi command '{key}'");
        }
        self
    }

    #[must_use]
    pub fn macro_spec(mut self, spec: MacroSpec) -> Self {
        let key = spec.key;
        if self.macros.insert(key, spec).is_some() {
            debug!("Replaced definition of macro '{key}'");
        }
        self
    }

    /// Layer the entries of a parsed config file on top of the current tables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any entry is malformed.
    pub fn apply_config(mut self, config: Config) -> Result<Self, ConfigError> {
        if let Some(vcs) = config.vcs {
            self = self.vcs(vcs);
        }
        if let Some(chord) = config.default_chord {
            self = self.default_chord(chord);
        }
        for command in config.commands.unwrap_or_default() {
            self = self.command(command.try_into()?);
        }
        for multi in config.multi.unwrap_or_default() {
            self = self.multi(multi.try_into()?);
        }
        for spec in config.macros.unwrap_or_default() {
            self = self.macro_spec(spec.try_into()?);
        }
        Ok(self)
    }

    /// Validate the tables and freeze them.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a key is reserved, a macro is empty or refers
    /// to an unknown key, or the program or default chord is empty.
    pub fn build(self) -> Result<Registry, ConfigError> {
        if self.vcs.trim().is_empty() {
            return Err(ConfigError::Validation(
                "The vcs program must not be empty".to_string(),
            ));
        }
        if self.default_chord.is_empty() {
            return Err(ConfigError::Validation(
                "The default chord must not be empty".to_string(),
            ));
        }
        for key in self.commands.keys() {
            check_key_char("command", *key)?;
        }
        for spec in self.macros.values() {
            self.check_macro(spec)?;
        }
        Ok(Registry {
            vcs: self.vcs,
            default_chord: self.default_chord,
            commands: self.commands,
            multi: self.multi,
            macros: self.macros,
        })
    }

    fn check_macro(&self, spec: &MacroSpec) -> Result<(), ConfigError> {
        if spec.steps.is_empty() {
            return Err(ConfigError::Validation(format!(
                "Macro '{}' has no steps",
                spec.key
            )));
        }
        if self.commands.contains_key(&spec.key) {
            warn!(
                "Macro '{}' shadows the command with the same key",
                spec.key
            );
        }
        for step in &spec.steps {
            let mut chars = step.key.chars();
            let known = match (chars.next(), chars.next(), chars.next()) {
                (Some(c), None, None) => self.commands.contains_key(&c),
                (Some(_), Some(_), None) => self.multi.contains_key(&step.key),
                _ => false,
            };
            if !known {
                return Err(ConfigError::Validation(format!(
                    "Macro '{}' refers to unknown command '{}'",
                    spec.key, step.key
                )));
            }
        }
        Ok(())
    }
}
