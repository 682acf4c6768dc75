//! Hook input parsing.
//!
//! The host runtime delivers one JSON object on stdin per invocation:
//! `{"tool_name": "...", "tool_input": {...}}`. Malformed or missing JSON
//! degrades to an empty input - never a fatal error, because a crash here
//! would block the agent on garbage the host produced.

use std::io::Read;

use serde::Deserialize;

use crate::core::event::ToolInvocationEvent;

/// Raw tool-use hook input as delivered by the host runtime.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ToolUseInput {
    /// The tool name, e.g. "Bash".
    #[serde(default)]
    pub tool_name: String,
    /// The tool's input payload.
    #[serde(default)]
    pub tool_input: serde_json::Value,
}

impl ToolUseInput {
    /// Parse hook input, degrading to the empty input on any error.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!("malformed hook input: {} (treated as empty event)", e);
                Self::default()
            }
        }
    }

    /// Build the gate's event view of this input.
    pub fn event(&self) -> ToolInvocationEvent {
        ToolInvocationEvent::from_parts(&self.tool_name, &self.tool_input)
    }
}

/// Read all of stdin. I/O errors yield the empty string, which parses to
/// the empty event downstream.
pub fn read_stdin() -> String {
    let mut buffer = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
        tracing::warn!("failed to read stdin: {} (treated as empty event)", e);
        return String::new();
    }
    buffer
}
