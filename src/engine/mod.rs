//! Decision engine for security-validator
//!
//! Turns a command into a [`Verdict`], records blocks in the audit log and
//! formats the user-facing explanation.

pub mod matcher;

use crate::audit::{AuditAction, AuditLogger};
use crate::output::{block_message, HookOutput, Verdict};
use crate::rules::allowlist::CompiledAllowlist;
use crate::rules::catalog::RuleCatalog;

pub use matcher::Matcher;

/// The main decision engine
#[derive(Debug)]
pub struct DecisionEngine<'c> {
    catalog: &'c RuleCatalog,
    allowlist: CompiledAllowlist,
    logger: AuditLogger,
    log_approved: bool,
}

impl<'c> DecisionEngine<'c> {
    /// Create a new engine over a compiled catalog
    pub fn new(catalog: &'c RuleCatalog, logger: AuditLogger) -> Self {
        Self {
            catalog,
            allowlist: CompiledAllowlist::empty(),
            logger,
            log_approved: false,
        }
    }

    /// Exempt commands matching the allowlist
    pub fn with_allowlist(mut self, allowlist: CompiledAllowlist) -> Self {
        self.allowlist = allowlist;
        self
    }

    /// Also write APPROVED records
    pub fn with_log_approved(mut self, log_approved: bool) -> Self {
        self.log_approved = log_approved;
        self
    }

    /// Main entry point: decide whether a command may run
    ///
    /// An empty command requests nothing and is always approved. A block is
    /// recorded in the audit log before returning; a logging failure does
    /// not change the verdict.
    pub fn decide(&self, command: &str) -> Verdict {
        if command.is_empty() {
            return Verdict::Approve;
        }

        if let Some(reason) = self.allowlist.matches(command) {
            log::debug!("allowlisted: {}", reason);
            if self.log_approved {
                self.logger.record(
                    command,
                    AuditAction::Approved,
                    &format!("allowlisted: {}", reason),
                );
            }
            return Verdict::Approve;
        }

        match Matcher::new(self.catalog).evaluate(command) {
            Some(rule) => {
                log::debug!("rule {} ({}) matched", rule.id, rule.family);
                self.logger.record(command, AuditAction::Blocked, rule.reason);
                Verdict::block(rule.id, rule.reason)
            }
            None => {
                if self.log_approved {
                    self.logger
                        .record(command, AuditAction::Approved, "no rule matched");
                }
                Verdict::Approve
            }
        }
    }

    /// Build the hook response for a verdict on `command`
    pub fn explain(&self, command: &str, verdict: &Verdict) -> HookOutput {
        match verdict {
            Verdict::Approve => HookOutput::approve(),
            Verdict::Block { rule_id, reason } => HookOutput::block(block_message(
                command,
                rule_id,
                reason,
                &self.logger.location(),
            )),
        }
    }

    /// Get the audit logger
    pub fn logger(&self) -> &AuditLogger {
        &self.logger
    }

    /// Get the rule catalog
    pub fn catalog(&self) -> &'c RuleCatalog {
        self.catalog
    }
}
