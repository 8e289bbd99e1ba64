//! Input parsing for the hook JSON format
//!
//! Parses the single JSON object the hosting agent writes to stdin. Only
//! `tool_input.command` matters; every other field is ignored.

use serde::Deserialize;

use crate::error::{Result, ValidatorError};

/// Main input structure from the hook
#[derive(Debug, Default, Deserialize)]
pub struct HookInput {
    /// Tool-specific input parameters
    #[serde(default)]
    pub tool_input: Option<ToolInput>,
}

/// The part of the tool input this validator reads
#[derive(Debug, Default, Deserialize)]
pub struct ToolInput {
    /// Shell command about to run
    #[serde(default)]
    pub command: Option<String>,
}

impl HookInput {
    /// Parse input from raw bytes
    ///
    /// Bytes that are not JSON at all are a [`ValidatorError::Parse`]; JSON of
    /// the wrong shape (say, a numeric `command`) is a
    /// [`ValidatorError::InvalidRequest`].
    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(raw)?;
        if !value.is_object() {
            return Err(ValidatorError::InvalidRequest(
                "expected a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| ValidatorError::InvalidRequest(e.to_string()))
    }

    /// Parse input from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_slice(json.as_bytes())
    }

    /// The command to evaluate; absent and empty are the same thing
    pub fn command(&self) -> &str {
        self.tool_input
            .as_ref()
            .and_then(|t| t.command.as_deref())
            .unwrap_or("")
    }
}

/// First `limit` characters of raw input, decoded lossily
pub fn snapshot(raw: &[u8], limit: usize) -> String {
    String::from_utf8_lossy(raw).chars().take(limit).collect()
}
