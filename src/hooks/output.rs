//! Hook output types.
//!
//! A hook invocation produces text on stdout plus an exit code. Advisory
//! channels optionally wrap their text as
//! `{"hookSpecificOutput": {"hookEventName": ..., "additionalContext": ...}}`
//! so the host runtime injects it into the agent's context instead of
//! treating it as a user-visible message.

use serde::{Deserialize, Serialize};

use crate::error::exit_codes;

/// The result of one hook invocation: what to print, and how to exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookOutcome {
    /// Text printed to stdout, if any.
    pub text: Option<String>,
    /// Process exit code.
    pub exit_code: i32,
}

impl HookOutcome {
    /// Silent approval.
    pub fn allow() -> Self {
        Self {
            text: None,
            exit_code: exit_codes::APPROVE,
        }
    }

    /// Approval with advisory text.
    pub fn advisory(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            exit_code: exit_codes::APPROVE,
        }
    }

    /// Blocking denial with the reason text.
    pub fn deny(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            exit_code: exit_codes::BLOCK,
        }
    }

    /// Whether this outcome blocks the action.
    pub fn is_blocking(&self) -> bool {
        self.exit_code == exit_codes::BLOCK
    }
}

/// Inner payload of the advisory wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HookSpecificOutput {
    /// The hook event this context belongs to, e.g. "PostToolUse".
    #[serde(rename = "hookEventName")]
    pub hook_event_name: String,
    /// The context text injected into the agent's reasoning stream.
    #[serde(rename = "additionalContext")]
    pub additional_context: String,
}

/// The advisory wrapper object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdditionalContext {
    #[serde(rename = "hookSpecificOutput")]
    pub hook_specific_output: HookSpecificOutput,
}

impl AdditionalContext {
    /// Build a wrapper for the given event and context text.
    pub fn new(event_name: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            hook_specific_output: HookSpecificOutput {
                hook_event_name: event_name.into(),
                additional_context: context.into(),
            },
        }
    }

    /// Serialize to the JSON line printed on stdout.
    ///
    /// Serialization of this shape cannot realistically fail; if it ever
    /// does, the raw context is printed unwrapped rather than dropped.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| self.hook_specific_output.additional_context.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_outcome() {
        let outcome = HookOutcome::allow();
        assert!(outcome.text.is_none());
        assert_eq!(outcome.exit_code, exit_codes::APPROVE);
        assert!(!outcome.is_blocking());
    }

    #[test]
    fn test_advisory_outcome() {
        let outcome = HookOutcome::advisory("heads up");
        assert_eq!(outcome.text.as_deref(), Some("heads up"));
        assert_eq!(outcome.exit_code, exit_codes::APPROVE);
    }

    #[test]
    fn test_deny_outcome() {
        let outcome = HookOutcome::deny("blocked");
        assert_eq!(outcome.text.as_deref(), Some("blocked"));
        assert_eq!(outcome.exit_code, exit_codes::BLOCK);
        assert!(outcome.is_blocking());
    }

    #[test]
    fn test_additional_context_shape() {
        let wrapper = AdditionalContext::new("PostToolUse", "3 stub patterns found");
        let json = wrapper.to_json();

        assert!(json.contains("\"hookSpecificOutput\""));
        assert!(json.contains("\"hookEventName\":\"PostToolUse\""));
        assert!(json.contains("\"additionalContext\":\"3 stub patterns found\""));
    }

    #[test]
    fn test_additional_context_roundtrip() {
        let wrapper = AdditionalContext::new("PostToolUse", "context");
        let parsed: AdditionalContext = serde_json::from_str(&wrapper.to_json()).unwrap();
        assert_eq!(parsed, wrapper);
    }
}
