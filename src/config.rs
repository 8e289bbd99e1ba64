//! Configuration loading for security-validator
//!
//! Supports TOML configuration with embedded defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default location of the audit log
pub const DEFAULT_AUDIT_PATH: &str = "~/.claude/logs/security.log";

/// Default number of characters kept from unparseable input
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 200;

/// Errors raised while loading configuration or the allowlist
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// General configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable audit logging
    pub audit_log: bool,

    /// Path to audit log file
    pub audit_path: Option<String>,

    /// Also record approved commands
    pub log_approved: bool,

    /// Characters of raw input kept when input fails to parse
    pub snapshot_limit: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            audit_log: true,
            audit_path: Some(DEFAULT_AUDIT_PATH.to_string()),
            log_approved: false,
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
        }
    }
}

/// Override configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverrideConfig {
    /// Path to allowlist file
    pub allowlist_file: Option<String>,
}

impl Default for OverrideConfig {
    fn default() -> Self {
        Self {
            allowlist_file: Some("~/.claude/security-allow.toml".to_string()),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub overrides: OverrideConfig,
}

impl Config {
    /// Load configuration from the standard locations or use defaults
    pub fn load() -> Self {
        let config_paths = [
            // User-specific config
            dirs::home_dir().map(|p| p.join(".claude/security-validator.toml")),
            // System-wide config
            Some(PathBuf::from("/etc/security-validator/config.toml")),
        ];

        for path in config_paths.into_iter().flatten() {
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(config) => return config,
                    Err(e) => log::warn!("Failed to load {}: {}", path.display(), e),
                }
            }
        }

        Config::default()
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Expand ~ in path strings
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// The audit log path (expanded), or `None` when auditing is off
    pub fn audit_path(&self) -> Option<PathBuf> {
        if !self.general.audit_log {
            return None;
        }
        self.general.audit_path.as_deref().map(Self::expand_path)
    }

    /// Get the allowlist file path (expanded)
    pub fn allowlist_path(&self) -> Option<PathBuf> {
        self.overrides
            .allowlist_file
            .as_deref()
            .map(Self::expand_path)
    }
}

/// Embedded default configuration
pub const DEFAULT_CONFIG_TOML: &str = r#"
[general]
audit_log = true
audit_path = "~/.claude/logs/security.log"
log_approved = false
snapshot_limit = 200

[overrides]
allowlist_file = "~/.claude/security-allow.toml"
"#;
