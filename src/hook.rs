//! Hook boundary: raw stdin bytes in, one JSON response out
//!
//! Every path ends in a well-formed response. Anything that prevents a
//! confident evaluation (unparseable input, an input of the wrong shape, a
//! broken catalog, a panic) becomes a block and an ERROR audit record.

use std::any::Any;
use std::io::{self, Read, Write};
use std::panic::{self, AssertUnwindSafe};

use crate::audit::{AuditAction, AuditLogger};
use crate::config::{Config, DEFAULT_SNAPSHOT_LIMIT};
use crate::engine::DecisionEngine;
use crate::error::{Result, ValidatorError};
use crate::input::{snapshot, HookInput};
use crate::output::{internal_error_message, HookOutput, PARSE_FAILURE_REASON};
use crate::rules::allowlist::CompiledAllowlist;
use crate::rules::catalog::RuleCatalog;

/// Command recorded when an error occurs before a command is known
pub const UNKNOWN_COMMAND: &str = "HOOK_ERROR";

/// Prefix of the command field for unparseable input
pub const INVALID_JSON_PREFIX: &str = "INVALID_JSON: ";

/// One hook invocation's worth of state
pub struct Hook<'c> {
    engine: Result<DecisionEngine<'c>>,
    logger: AuditLogger,
    snapshot_limit: usize,
}

impl Hook<'static> {
    /// Build a hook from configuration, using the built-in catalog
    pub fn from_config(config: &Config) -> Self {
        let logger = AuditLogger::new(config.audit_path().as_deref());
        let allowlist = CompiledAllowlist::load_or_empty(config.allowlist_path().as_deref());

        let engine = RuleCatalog::global().map(|catalog| {
            DecisionEngine::new(catalog, logger.clone())
                .with_allowlist(allowlist)
                .with_log_approved(config.general.log_approved)
        });

        Self {
            engine,
            logger,
            snapshot_limit: config.general.snapshot_limit,
        }
    }
}

impl<'c> Hook<'c> {
    /// Wrap an existing engine
    pub fn new(engine: DecisionEngine<'c>) -> Self {
        let logger = engine.logger().clone();
        Self {
            engine: Ok(engine),
            logger,
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
        }
    }

    /// Set how much unparseable input is kept in the ERROR record
    pub fn with_snapshot_limit(mut self, limit: usize) -> Self {
        self.snapshot_limit = limit;
        self
    }

    /// Read one request from `input` and write one response line to `output`
    pub fn run<R: Read, W: Write>(&self, mut input: R, mut output: W) -> io::Result<()> {
        let mut raw = Vec::new();
        let response = match input.read_to_end(&mut raw) {
            Ok(_) => self.respond(&raw),
            Err(e) => self.fail_closed(
                None,
                &ValidatorError::Internal(format!("failed to read input: {}", e)),
            ),
        };

        writeln!(output, "{}", response.to_json())?;
        output.flush()
    }

    /// Produce the response for one raw request
    pub fn respond(&self, raw: &[u8]) -> HookOutput {
        self.respond_with(raw, decide_and_explain)
    }

    /// Evaluate a bare command string, failing closed on error
    ///
    /// Unlike [`Hook::evaluate`], errors are recorded and turned into a block.
    pub fn check(&self, command: &str) -> HookOutput {
        match self.evaluate(command) {
            Ok(output) => output,
            Err(e) => self.fail_closed(Some(command), &e),
        }
    }

    /// Evaluate a bare command string
    pub fn evaluate(&self, command: &str) -> Result<HookOutput> {
        self.evaluate_with(command, decide_and_explain)
    }

    fn respond_with<F>(&self, raw: &[u8], step: F) -> HookOutput
    where
        F: FnOnce(&DecisionEngine<'c>, &str) -> HookOutput,
    {
        let input = match HookInput::from_slice(raw) {
            Ok(input) => input,
            Err(ValidatorError::Parse(e)) => {
                log::warn!("{}: {}", PARSE_FAILURE_REASON, e);
                let command = format!(
                    "{}{}",
                    INVALID_JSON_PREFIX,
                    snapshot(raw, self.snapshot_limit)
                );
                self.logger.record(
                    &command,
                    AuditAction::Error,
                    &format!("{}: {}", PARSE_FAILURE_REASON, e),
                );
                return HookOutput::parse_failure();
            }
            Err(e) => return self.fail_closed(None, &e),
        };

        let command = input.command();
        match self.evaluate_with(command, step) {
            Ok(output) => output,
            Err(e) => self.fail_closed(Some(command), &e),
        }
    }

    fn evaluate_with<F>(&self, command: &str, step: F) -> Result<HookOutput>
    where
        F: FnOnce(&DecisionEngine<'c>, &str) -> HookOutput,
    {
        let engine = self
            .engine
            .as_ref()
            .map_err(|e| ValidatorError::Internal(e.to_string()))?;

        panic::catch_unwind(AssertUnwindSafe(|| step(engine, command)))
            .map_err(|payload| ValidatorError::Internal(panic_message(payload.as_ref())))
    }

    fn fail_closed(&self, command: Option<&str>, error: &ValidatorError) -> HookOutput {
        let description = error.to_string();
        log::warn!("Blocking after error: {}", description);

        let command = command.filter(|c| !c.is_empty()).unwrap_or(UNKNOWN_COMMAND);
        self.logger.record(command, AuditAction::Error, &description);

        HookOutput::block(internal_error_message(&description))
    }
}

fn decide_and_explain(engine: &DecisionEngine<'_>, command: &str) -> HookOutput {
    let verdict = engine.decide(command);
    engine.explain(command, &verdict)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "evaluation panicked".to_string()
    }
}
