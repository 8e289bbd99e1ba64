//! JSONL audit logging for security-validator
//!
//! Records blocked and errored evaluations (and optionally approvals) to an
//! append-only file, one JSON object per line. Writing is best-effort: a
//! failure is reported on the diagnostic channel and never changes a verdict.

use chrono::{DateTime, Local};
use fs2::FileExt;
use serde::Serialize;
use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Identity recorded when no user can be resolved
pub const UNKNOWN_ACTOR: &str = "unknown";

/// Failure to persist an audit record
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit log I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("audit record could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// What happened to the evaluated command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Blocked,
    Error,
    Approved,
}

/// One line of the audit log
#[derive(Debug, Serialize)]
pub struct AuditRecord {
    /// Local time of the decision
    pub timestamp: DateTime<Local>,

    /// Raw, unredacted command (or an error marker)
    pub command: String,

    pub action: AuditAction,

    pub reason: String,

    /// Best-effort identity of the invoking user
    pub user: String,

    /// Working directory of the validator process
    pub pwd: String,
}

impl AuditRecord {
    /// Create a record stamped with the current time, user and directory
    pub fn new(command: impl Into<String>, action: AuditAction, reason: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            command: command.into(),
            action,
            reason: reason.into(),
            user: resolve_actor(),
            pwd: working_directory(),
        }
    }
}

/// Resolve the invoking user from the environment, or [`UNKNOWN_ACTOR`]
pub fn resolve_actor() -> String {
    ["USER", "LOGNAME", "USERNAME"]
        .iter()
        .find_map(|key| env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| UNKNOWN_ACTOR.to_string())
}

fn working_directory() -> String {
    env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| UNKNOWN_ACTOR.to_string())
}

/// Audit logger
///
/// Holds only the target path; the file is opened per record so one logger
/// can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct AuditLogger {
    path: Option<PathBuf>,
}

impl AuditLogger {
    /// Create a new audit logger; `None` disables logging
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
        }
    }

    /// A logger that accepts and drops every record
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Where records are written
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Append a record as a single newline-terminated write
    ///
    /// Concurrent writers are serialized with an exclusive advisory lock.
    pub fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        FileExt::lock_exclusive(&file)?;
        let written = file.write_all(line.as_bytes()).and_then(|_| file.flush());
        let unlocked = FileExt::unlock(&file);

        written?;
        unlocked?;
        Ok(())
    }

    /// Record an evaluation, swallowing any failure
    pub fn record(&self, command: &str, action: AuditAction, reason: &str) {
        let record = AuditRecord::new(command, action, reason);
        if let Err(e) = self.append(&record) {
            log::warn!("Log write error: {}", e);
        }
    }

    /// Human-readable location for user-facing messages
    pub fn location(&self) -> String {
        match self.path.as_deref() {
            Some(path) => path.display().to_string(),
            None => "disabled".to_string(),
        }
    }
}
