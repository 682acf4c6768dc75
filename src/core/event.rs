//! Tool invocation events.
//!
//! A [`ToolInvocationEvent`] is the gate's view of one inbound tool call:
//! which tool, and the file path or command it carries. Events are built
//! fresh per invocation and never persisted.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The kind of tool being invoked.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ToolKind {
    /// File creation.
    Write,
    /// File modification.
    Edit,
    /// Shell command execution.
    Bash,
    /// External content fetch.
    WebFetch,
    /// External content search.
    WebSearch,
    /// Any other tool; never gated.
    #[default]
    Other,
}

impl ToolKind {
    /// Parse a tool name as delivered by the host runtime.
    ///
    /// Unrecognized names map to [`ToolKind::Other`].
    pub fn parse(name: &str) -> Self {
        match name {
            "Write" => Self::Write,
            "Edit" => Self::Edit,
            "Bash" => Self::Bash,
            "WebFetch" => Self::WebFetch,
            "WebSearch" => Self::WebSearch,
            _ => Self::Other,
        }
    }

    /// Whether this tool kind is subject to the policy gate.
    pub fn is_gated(&self) -> bool {
        matches!(self, Self::Write | Self::Edit | Self::Bash)
    }

    /// Whether this tool kind fetches external content.
    pub fn is_web(&self) -> bool {
        matches!(self, Self::WebFetch | Self::WebSearch)
    }

    /// Whether this tool kind mutates files.
    pub fn is_file_mutation(&self) -> bool {
        matches!(self, Self::Write | Self::Edit)
    }
}

/// One inbound tool invocation, as seen by the gate and the scanner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolInvocationEvent {
    /// The tool being invoked.
    pub tool: ToolKind,
    /// Target file path for Write/Edit tools.
    pub file_path: Option<PathBuf>,
    /// Command string for the Bash tool.
    pub command: Option<String>,
}

impl ToolInvocationEvent {
    /// Build an event from the raw `tool_name` / `tool_input` pair.
    ///
    /// Absent or non-string payload fields are simply left empty; an empty
    /// event is always a valid input to the gate.
    pub fn from_parts(tool_name: &str, tool_input: &serde_json::Value) -> Self {
        let file_path = tool_input
            .get("file_path")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        let command = tool_input
            .get("command")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            tool: ToolKind::parse(tool_name),
            file_path,
            command,
        }
    }

    /// Build an event carrying only a command.
    pub fn bash(command: impl Into<String>) -> Self {
        Self {
            tool: ToolKind::Bash,
            file_path: None,
            command: Some(command.into()),
        }
    }

    /// Build an event carrying only a file path.
    pub fn file(tool: ToolKind, path: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            file_path: Some(path.into()),
            command: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_kind_parse() {
        assert_eq!(ToolKind::parse("Write"), ToolKind::Write);
        assert_eq!(ToolKind::parse("Edit"), ToolKind::Edit);
        assert_eq!(ToolKind::parse("Bash"), ToolKind::Bash);
        assert_eq!(ToolKind::parse("WebFetch"), ToolKind::WebFetch);
        assert_eq!(ToolKind::parse("WebSearch"), ToolKind::WebSearch);
        assert_eq!(ToolKind::parse("Glob"), ToolKind::Other);
        assert_eq!(ToolKind::parse(""), ToolKind::Other);
    }

    #[test]
    fn test_tool_kind_is_gated() {
        assert!(ToolKind::Write.is_gated());
        assert!(ToolKind::Edit.is_gated());
        assert!(ToolKind::Bash.is_gated());
        assert!(!ToolKind::WebFetch.is_gated());
        assert!(!ToolKind::WebSearch.is_gated());
        assert!(!ToolKind::Other.is_gated());
    }

    #[test]
    fn test_tool_kind_is_web() {
        assert!(ToolKind::WebFetch.is_web());
        assert!(ToolKind::WebSearch.is_web());
        assert!(!ToolKind::Bash.is_web());
    }

    #[test]
    fn test_from_parts_bash() {
        let event =
            ToolInvocationEvent::from_parts("Bash", &json!({"command": "  git status  "}));

        assert_eq!(event.tool, ToolKind::Bash);
        assert_eq!(event.command.as_deref(), Some("git status"));
        assert!(event.file_path.is_none());
    }

    #[test]
    fn test_from_parts_write() {
        let event = ToolInvocationEvent::from_parts(
            "Write",
            &json!({"file_path": "/tmp/main.rs", "content": "fn main() {}"}),
        );

        assert_eq!(event.tool, ToolKind::Write);
        assert_eq!(event.file_path, Some(PathBuf::from("/tmp/main.rs")));
    }

    #[test]
    fn test_from_parts_empty_payload() {
        let event = ToolInvocationEvent::from_parts("Bash", &json!({}));

        assert_eq!(event.tool, ToolKind::Bash);
        assert!(event.command.is_none());
    }

    #[test]
    fn test_from_parts_null_payload() {
        let event = ToolInvocationEvent::from_parts("Edit", &serde_json::Value::Null);

        assert_eq!(event.tool, ToolKind::Edit);
        assert!(event.file_path.is_none());
        assert!(event.command.is_none());
    }

    #[test]
    fn test_from_parts_empty_strings_dropped() {
        let event = ToolInvocationEvent::from_parts(
            "Bash",
            &json!({"command": "   ", "file_path": ""}),
        );

        assert!(event.command.is_none());
        assert!(event.file_path.is_none());
    }

    #[test]
    fn test_default_event_is_other() {
        let event = ToolInvocationEvent::default();
        assert_eq!(event.tool, ToolKind::Other);
    }
}
