//! Error types for the decision layer
//!
//! Audit-log failures have their own type ([`crate::audit::AuditError`]) and
//! never flow into [`ValidatorError`].

use thiserror::Error;

/// Anything that stops a command from being evaluated
///
/// Every variant ends in a fail-closed block at the boundary.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// Input was not valid JSON
    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    /// Input was JSON but not in the expected hook shape
    #[error("invalid hook input: {0}")]
    InvalidRequest(String),

    /// The rule catalog failed to compile
    #[error("rule catalog failed to compile: {0}")]
    Catalog(regex::Error),

    /// Evaluation could not complete (caught panic, unreadable input)
    #[error("{0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ValidatorError>;
