//! The policy gate.
//!
//! [`decide`] is a pure function of the event, the config, and the session
//! probe. All side effects (printing, exit codes, the tracker subprocess)
//! belong to the hook runner. The rules are evaluated in strict order and
//! the first match wins:
//!
//! 1. Non-gated tool → Allow
//! 2. Write/Edit inside `~/.claude/` → Allow (self-management is never gated)
//! 3. Blocked git mutation → Deny, in every mode
//! 4. Allow-listed command prefix → Allow
//! 5. Relaxed mode → Allow
//! 6. Tracker untracked/unreachable → Allow (fail-open)
//! 7. Active work item → Allow
//! 8. Otherwise Strict → Deny, Normal → Warn
//!
//! Rules 1–5 need no session state; [`static_decision`] exposes that prefix
//! so the runner can skip the tracker subprocess when the outcome is
//! already determined.

use std::path::Path;

use crate::config::{HookConfig, TrackingMode};
use crate::core::event::{ToolInvocationEvent, ToolKind};
use crate::core::session::SessionProbe;
use crate::error::exit_codes;

/// Why an invocation was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// A git mutation command; denied in every mode.
    GitMutationForbidden,
    /// No active work item in Strict mode.
    NoActiveWorkItem,
}

impl DenyReason {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::GitMutationForbidden => "git-mutation-forbidden",
            Self::NoActiveWorkItem => "no-active-work-item",
        }
    }

    /// The full denial text surfaced to the agent.
    pub fn message(&self) -> &'static str {
        match self {
            Self::GitMutationForbidden => GIT_BLOCK_MESSAGE,
            Self::NoActiveWorkItem => STRICT_BLOCK_MESSAGE,
        }
    }
}

/// Why an invocation drew a non-blocking warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarnReason {
    /// No active work item in Normal mode.
    NoActiveWorkItem,
}

impl WarnReason {
    /// The reminder text surfaced to the agent.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoActiveWorkItem => NORMAL_REMINDER_MESSAGE,
        }
    }
}

/// The gate's verdict for one tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Let the action proceed silently.
    Allow,
    /// Block the action and surface the reason text.
    Deny(DenyReason),
    /// Let the action proceed but surface the reason text.
    Warn(WarnReason),
}

impl Decision {
    /// Exit code communicated to the host runtime.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Deny(_) => exit_codes::BLOCK,
            Self::Allow | Self::Warn(_) => exit_codes::APPROVE,
        }
    }

    /// Text to print, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::Deny(reason) => Some(reason.message()),
            Self::Warn(reason) => Some(reason.message()),
        }
    }
}

/// Decide the fate of a tool invocation.
pub fn decide(event: &ToolInvocationEvent, config: &HookConfig, probe: &SessionProbe) -> Decision {
    match static_decision(event, config) {
        Some(decision) => decision,
        None => session_decision(config.tracking_mode, probe),
    }
}

/// Evaluate the rules that need no session state (rules 1–5).
///
/// Returns `None` when the outcome depends on the tracker, in which case
/// the caller must probe the backend and finish via [`decide`].
pub fn static_decision(event: &ToolInvocationEvent, config: &HookConfig) -> Option<Decision> {
    // Rule 1: only Write, Edit, and Bash are gated.
    if !event.tool.is_gated() {
        return Some(Decision::Allow);
    }

    // Rule 2: the agent's own config area is never gated.
    if event.tool.is_file_mutation() {
        if let Some(path) = &event.file_path {
            if is_claude_memory_path(path) {
                return Some(Decision::Allow);
            }
        }
    }

    let command = event.command.as_deref().unwrap_or("");

    // Rule 3: git mutations are denied in every mode.
    if event.tool == ToolKind::Bash && is_blocked_command(command, &config.blocked_git_commands) {
        return Some(Decision::Deny(DenyReason::GitMutationForbidden));
    }

    // Rule 4: allow-listed commands pass without a work item.
    if event.tool == ToolKind::Bash && is_allowed_command(command, &config.allowed_bash_prefixes) {
        return Some(Decision::Allow);
    }

    // Rule 5: relaxed mode skips issue-tracking enforcement entirely.
    if config.tracking_mode == TrackingMode::Relaxed {
        return Some(Decision::Allow);
    }

    None
}

/// Evaluate the session-dependent rules (6–8).
fn session_decision(mode: TrackingMode, probe: &SessionProbe) -> Decision {
    match probe {
        // Rule 6: fail open when the backend is absent or unreachable.
        SessionProbe::Untracked | SessionProbe::Unreachable => Decision::Allow,
        SessionProbe::Reachable(state) => {
            // Rule 7: an attached work item satisfies the gate.
            if state.working_issue_id.is_some() {
                return Decision::Allow;
            }
            // Rule 8: no work item; enforcement depends on the mode.
            match mode {
                TrackingMode::Strict => Decision::Deny(DenyReason::NoActiveWorkItem),
                _ => Decision::Warn(WarnReason::NoActiveWorkItem),
            }
        }
    }
}

/// Check whether a command is a blocked git mutation.
///
/// Matches a blocked prefix at the start of the command, or immediately
/// after a shell conjunction/pipe operator (`&& `, `; `, `| `). This is
/// literal prefix matching, not semantic command analysis; obfuscated
/// equivalents are a known limitation.
fn is_blocked_command(command: &str, blocked: &[String]) -> bool {
    let command = command.trim();
    if blocked.iter().any(|b| command.starts_with(b.as_str())) {
        return true;
    }
    blocked.iter().any(|b| {
        command.contains(&format!("&& {b}"))
            || command.contains(&format!("; {b}"))
            || command.contains(&format!("| {b}"))
    })
}

/// Check whether a command starts with an allow-listed prefix.
fn is_allowed_command(command: &str, allowed: &[String]) -> bool {
    let command = command.trim();
    allowed.iter().any(|a| command.starts_with(a.as_str()))
}

/// Check whether a path targets the agent's reserved `~/.claude/` area.
fn is_claude_memory_path(path: &Path) -> bool {
    match dirs::home_dir() {
        Some(home) => path_is_under(path, &home.join(".claude")),
        None => false,
    }
}

/// Prefix check on absolute paths; relative paths never match.
fn path_is_under(path: &Path, base: &Path) -> bool {
    path.is_absolute() && path.starts_with(base)
}

/// Denial text for git mutation commands.
const GIT_BLOCK_MESSAGE: &str = "MANDATORY COMPLIANCE \u{2014} DO NOT ATTEMPT TO WORK AROUND THIS BLOCK.

Git mutation commands (commit, push, merge, rebase, reset, etc.) are PERMANENTLY FORBIDDEN. The human performs all git write operations.

You MUST NOT:
  - Retry this command
  - Rewrite the command to achieve the same effect
  - Use a different tool to perform git mutations
  - Ask the user if you should bypass this restriction

You MUST instead:
  - Inform the user that this is a manual step for them
  - Continue with your other work

Read-only git commands (status, diff, log, show, branch) are allowed.";

/// Denial text when Strict mode finds no active work item.
const STRICT_BLOCK_MESSAGE: &str = "MANDATORY COMPLIANCE \u{2014} DO NOT ATTEMPT TO WORK AROUND THIS BLOCK.

You cannot Write, Edit, or run Bash commands without an active chainlink issue. This is a hard requirement enforced by the project, not a suggestion.

You MUST NOT:
  - Retry the same tool call hoping it will work
  - Try alternative tools or approaches to bypass this check
  - Proceed without creating an issue first
  - Tell the user the hook is preventing you from working

You MUST do exactly this, right now, before anything else:

  chainlink quick \"<describe what you are about to do>\" -p <priority> -l <label>

This single command creates an issue AND sets it as your active work item. After running it, your tool calls will succeed.

If an issue already exists for this work, use:
  chainlink list -s open
  chainlink session work <id>

This is how the project tracks work. Comply, then continue.";

/// Reminder text when Normal mode finds no active work item.
const NORMAL_REMINDER_MESSAGE: &str = "Reminder: No active chainlink issue. You should create one before making changes.

  chainlink quick \"<describe what you are about to do>\" -p <priority> -l <label>

Or pick an existing issue:
  chainlink list -s open
  chainlink session work <id>";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::SessionState;

    fn config_with_mode(mode: TrackingMode) -> HookConfig {
        HookConfig {
            tracking_mode: mode,
            ..HookConfig::default()
        }
    }

    fn working_session() -> SessionProbe {
        SessionProbe::Reachable(SessionState {
            active: true,
            working_issue_id: Some("12".to_string()),
            ..SessionState::default()
        })
    }

    fn idle_session() -> SessionProbe {
        SessionProbe::Reachable(SessionState {
            active: true,
            ..SessionState::default()
        })
    }

    #[test]
    fn test_non_gated_tools_always_allowed() {
        let config = config_with_mode(TrackingMode::Strict);
        for tool in [ToolKind::WebFetch, ToolKind::WebSearch, ToolKind::Other] {
            let event = ToolInvocationEvent {
                tool,
                ..ToolInvocationEvent::default()
            };
            assert_eq!(decide(&event, &config, &idle_session()), Decision::Allow);
        }
    }

    #[test]
    fn test_blocked_git_denied_in_every_mode() {
        for mode in [
            TrackingMode::Strict,
            TrackingMode::Normal,
            TrackingMode::Relaxed,
        ] {
            let config = config_with_mode(mode);
            let event = ToolInvocationEvent::bash("git commit -m 'x'");
            assert_eq!(
                decide(&event, &config, &working_session()),
                Decision::Deny(DenyReason::GitMutationForbidden),
                "mode {mode:?} must deny git mutations"
            );
        }
    }

    #[test]
    fn test_blocked_git_after_conjunctions() {
        let config = config_with_mode(TrackingMode::Relaxed);
        for cmd in [
            "cargo test && git push origin main",
            "echo done; git commit -m x",
            "true | git push",
        ] {
            let event = ToolInvocationEvent::bash(cmd);
            assert_eq!(
                decide(&event, &config, &working_session()),
                Decision::Deny(DenyReason::GitMutationForbidden),
                "must deny chained mutation in `{cmd}`"
            );
        }
    }

    #[test]
    fn test_blocked_prefix_does_not_match_substring() {
        let config = config_with_mode(TrackingMode::Relaxed);
        // "git commitment" starts with the "git commit" prefix, matching the
        // literal-prefix contract; but a mutation named mid-word without an
        // operator must not match.
        let event = ToolInvocationEvent::bash("echo 'discussing git push strategy'");
        assert_eq!(decide(&event, &config, &working_session()), Decision::Allow);
    }

    #[test]
    fn test_allowed_prefix_wins_over_missing_work_item() {
        let config = config_with_mode(TrackingMode::Strict);
        let event = ToolInvocationEvent::bash("git status");
        // Even with no session at all, the allow list wins.
        assert_eq!(decide(&event, &config, &idle_session()), Decision::Allow);
        assert_eq!(
            static_decision(&event, &config),
            Some(Decision::Allow),
            "allow-listed commands resolve without a probe"
        );
    }

    #[test]
    fn test_relaxed_never_denies_for_missing_work_item() {
        let config = config_with_mode(TrackingMode::Relaxed);
        for event in [
            ToolInvocationEvent::bash("make deploy"),
            ToolInvocationEvent::file(ToolKind::Write, "/tmp/x.rs"),
            ToolInvocationEvent::file(ToolKind::Edit, "/tmp/x.rs"),
        ] {
            assert_eq!(decide(&event, &config, &idle_session()), Decision::Allow);
        }
    }

    #[test]
    fn test_unreachable_tracker_allows_even_in_strict() {
        let config = config_with_mode(TrackingMode::Strict);
        let event = ToolInvocationEvent::file(ToolKind::Write, "/tmp/x.rs");

        assert_eq!(
            decide(&event, &config, &SessionProbe::Unreachable),
            Decision::Allow
        );
        assert_eq!(
            decide(&event, &config, &SessionProbe::Untracked),
            Decision::Allow
        );
    }

    #[test]
    fn test_working_issue_allows() {
        let config = config_with_mode(TrackingMode::Strict);
        let event = ToolInvocationEvent::file(ToolKind::Edit, "/tmp/x.rs");
        assert_eq!(decide(&event, &config, &working_session()), Decision::Allow);
    }

    #[test]
    fn test_strict_denies_without_work_item() {
        let config = config_with_mode(TrackingMode::Strict);
        let event = ToolInvocationEvent::file(ToolKind::Write, "/tmp/x.rs");

        let decision = decide(&event, &config, &idle_session());
        assert_eq!(decision, Decision::Deny(DenyReason::NoActiveWorkItem));
        assert_eq!(decision.exit_code(), exit_codes::BLOCK);
        assert!(decision
            .message()
            .is_some_and(|m| m.contains("chainlink quick")));
    }

    #[test]
    fn test_normal_warns_without_work_item() {
        let config = config_with_mode(TrackingMode::Normal);
        let event = ToolInvocationEvent::file(ToolKind::Write, "/tmp/x.rs");

        let decision = decide(&event, &config, &idle_session());
        assert_eq!(decision, Decision::Warn(WarnReason::NoActiveWorkItem));
        assert_eq!(decision.exit_code(), exit_codes::APPROVE);
        assert!(decision.message().is_some_and(|m| m.contains("Reminder")));
    }

    #[test]
    fn test_reachable_without_session_still_enforced() {
        // A reachable tracker reporting no session at all is "no work item",
        // not "unreachable" - Strict mode must still block.
        let config = config_with_mode(TrackingMode::Strict);
        let event = ToolInvocationEvent::file(ToolKind::Write, "/tmp/x.rs");
        let probe = SessionProbe::Reachable(SessionState::default());

        assert_eq!(
            decide(&event, &config, &probe),
            Decision::Deny(DenyReason::NoActiveWorkItem)
        );
    }

    #[test]
    fn test_static_decision_defers_session_rules() {
        let config = config_with_mode(TrackingMode::Strict);
        let event = ToolInvocationEvent::file(ToolKind::Write, "/tmp/x.rs");
        assert_eq!(static_decision(&event, &config), None);
    }

    #[test]
    fn test_claude_memory_path_allowed() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let config = config_with_mode(TrackingMode::Strict);
        let event = ToolInvocationEvent::file(
            ToolKind::Write,
            home.join(".claude").join("memory").join("notes.md"),
        );

        assert_eq!(static_decision(&event, &config), Some(Decision::Allow));
    }

    #[test]
    fn test_path_is_under() {
        assert!(path_is_under(
            Path::new("/home/dev/.claude/settings.json"),
            Path::new("/home/dev/.claude")
        ));
        assert!(!path_is_under(
            Path::new("/home/dev/.claude-other/x"),
            Path::new("/home/dev/.claude")
        ));
        assert!(!path_is_under(
            Path::new("relative/.claude/x"),
            Path::new("/home/dev/.claude")
        ));
    }

    #[test]
    fn test_deny_reason_codes() {
        assert_eq!(
            DenyReason::GitMutationForbidden.code(),
            "git-mutation-forbidden"
        );
        assert_eq!(DenyReason::NoActiveWorkItem.code(), "no-active-work-item");
    }

    #[test]
    fn test_empty_bash_command_falls_through_to_session_rules() {
        let config = config_with_mode(TrackingMode::Strict);
        let event = ToolInvocationEvent {
            tool: ToolKind::Bash,
            ..ToolInvocationEvent::default()
        };

        assert_eq!(static_decision(&event, &config), None);
        assert_eq!(
            decide(&event, &config, &idle_session()),
            Decision::Deny(DenyReason::NoActiveWorkItem)
        );
    }
}
