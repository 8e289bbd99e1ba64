//! security-validator - fail-closed command filter for agent hooks
//!
//! Receives a proposed shell command, checks it against an ordered catalog of
//! dangerous-command patterns and answers approve or block. Blocks and
//! evaluation errors are appended to a JSONL audit log.
//!
//! # Features
//!
//! - **Ordered rule catalog**: first matching rule wins, case-insensitive
//! - **Injection awareness**: dangerous verbs behind `;`, `&&`, pipes,
//!   substitution, `eval` and `sh -c` are caught too
//! - **Fail closed**: unparseable input or internal errors block
//! - **Audit logging**: best-effort, never alters a verdict
//! - **Allowlist support**: user-defined exceptions for specific commands
//!
//! # Example
//!
//! ```
//! use security_validator::{AuditLogger, DecisionEngine, RuleCatalog};
//!
//! let catalog = RuleCatalog::global().unwrap();
//! let engine = DecisionEngine::new(catalog, AuditLogger::disabled());
//!
//! assert!(engine.decide("rm -rf /").is_block());
//! assert!(engine.decide("ls -la").is_approve());
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod hook;
pub mod input;
pub mod output;
pub mod rules;

// Re-exports for convenience
pub use audit::{AuditAction, AuditLogger, AuditRecord};
pub use config::Config;
pub use engine::{DecisionEngine, Matcher};
pub use error::ValidatorError;
pub use hook::Hook;
pub use input::HookInput;
pub use output::{HookOutput, Verdict};
pub use rules::catalog::RuleCatalog;
pub use rules::{Family, Rule};
