//! Allowlist handling for exempting commands from the catalog
//!
//! Entries are user-defined patterns that approve a command before the
//! catalog is consulted. Patterns are searched case-sensitively, so an
//! exemption only applies to the exact spelling the user wrote down.

use regex::Regex;
use serde::Deserialize;
use std::path::Path;

use crate::config::ConfigError;

/// An allowlist entry
#[derive(Debug, Clone, Deserialize)]
pub struct AllowEntry {
    /// Regex pattern to match
    pub pattern: String,

    /// Human-readable reason for allowing
    pub reason: String,
}

/// The allowlist file structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AllowlistConfig {
    /// List of allowed patterns
    #[serde(default)]
    pub allow: Vec<AllowEntry>,
}

/// Compiled allowlist for efficient matching
#[derive(Debug, Default)]
pub struct CompiledAllowlist {
    entries: Vec<(Regex, String)>,
}

impl CompiledAllowlist {
    /// Create an empty allowlist
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and compile allowlist from file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AllowlistConfig = toml::from_str(&content)?;
        Self::from_config(&config)
    }

    /// Compile from config
    pub fn from_config(config: &AllowlistConfig) -> Result<Self, ConfigError> {
        let entries = config
            .allow
            .iter()
            .map(|entry| -> Result<(Regex, String), ConfigError> {
                Ok((Regex::new(&entry.pattern)?, entry.reason.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    /// Load from an optional path, falling back to an empty allowlist
    ///
    /// A broken allowlist only ever makes the validator stricter.
    pub fn load_or_empty(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::empty();
        };
        if !path.exists() {
            return Self::empty();
        }

        match Self::from_file(path) {
            Ok(allowlist) => allowlist,
            Err(e) => {
                log::warn!("Ignoring allowlist {}: {}", path.display(), e);
                Self::empty()
            }
        }
    }

    /// Return the reason of the first entry matching the command
    pub fn matches(&self, command: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(regex, _)| regex.is_match(command))
            .map(|(_, reason)| reason.as_str())
    }

    /// Check if the allowlist is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
