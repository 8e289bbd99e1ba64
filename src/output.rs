//! Verdicts and the hook response format
//!
//! Produces the `{"decision": ...}` JSON the hosting agent expects.

use serde::Serialize;

/// Reason shown when the hook input could not be parsed
pub const PARSE_FAILURE_REASON: &str = "Failed to parse hook input";

/// Emitted verbatim if a response cannot be serialized
pub const FAIL_CLOSED_JSON: &str =
    r#"{"decision":"block","reason":"Failed to serialize hook response"}"#;

/// Outcome of evaluating one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Let the command run
    Approve,

    /// Stop the command
    Block {
        /// Catalog rule id, or an error id
        rule_id: &'static str,
        /// Justification from the rule or the error path
        reason: String,
    },
}

impl Verdict {
    /// Create a block verdict
    pub fn block(rule_id: &'static str, reason: impl Into<String>) -> Self {
        Verdict::Block {
            rule_id,
            reason: reason.into(),
        }
    }

    pub fn is_approve(&self) -> bool {
        matches!(self, Verdict::Approve)
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Verdict::Block { .. })
    }

    /// Get the rule ID if applicable
    pub fn rule_id(&self) -> Option<&'static str> {
        match self {
            Verdict::Approve => None,
            Verdict::Block { rule_id, .. } => Some(*rule_id),
        }
    }

    /// Get the reason if applicable
    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Approve => None,
            Verdict::Block { reason, .. } => Some(reason),
        }
    }
}

/// Decision field of the response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    Approve,
    Block,
}

/// Response written to stdout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookOutput {
    pub decision: DecisionKind,

    /// User-facing explanation, present only on block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl HookOutput {
    /// Create an approve response
    pub fn approve() -> Self {
        HookOutput {
            decision: DecisionKind::Approve,
            reason: None,
        }
    }

    /// Create a block response with a user-facing message
    pub fn block(message: impl Into<String>) -> Self {
        HookOutput {
            decision: DecisionKind::Block,
            reason: Some(message.into()),
        }
    }

    /// The response for input that could not be parsed
    pub fn parse_failure() -> Self {
        HookOutput::block(PARSE_FAILURE_REASON)
    }

    /// Serialize to JSON string; never fails
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| FAIL_CLOSED_JSON.to_string())
    }
}

/// Multi-line explanation for a blocked command
pub fn block_message(command: &str, rule_id: &str, reason: &str, log_location: &str) -> String {
    format!(
        "SECURITY ALERT: command blocked [{rule_id}]\n\
         \n\
         Command: {command}\n\
         Reason: {reason}\n\
         \n\
         This command could cause serious damage to the system.\n\
         Use a safer alternative.\n\
         \n\
         Security log: {log_location}"
    )
}

/// Explanation for a command that could not be evaluated
pub fn internal_error_message(description: &str) -> String {
    format!("Internal error while evaluating command: {}", description)
}
