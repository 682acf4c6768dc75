//! Session state parsed from the tracker's status output.
//!
//! The chainlink backend reports session status as human-readable text.
//! This module is the single place that knows that format: every
//! recognizable substring and capture pattern lives here, so a backend
//! reformat requires a one-place fix. Partially-matching text degrades to
//! empty fields rather than an error, preserving the fail-open bias.

use std::sync::OnceLock;

use regex::Regex;

/// Normalized view of the tracker's session status.
///
/// Derived fresh per invocation; the authoritative state lives in the
/// external tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Whether an active session marker was present.
    pub active: bool,
    /// The work item currently attached to the session.
    pub working_issue_id: Option<String>,
    /// Raw started-at text, as reported by the tracker.
    pub started_at: Option<String>,
    /// Session age in minutes.
    pub age_minutes: Option<u32>,
    /// The last recorded action breadcrumb.
    pub last_action: Option<String>,
}

/// Result of probing the session backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionProbe {
    /// No `.chainlink/` directory; the project is not tracked.
    Untracked,
    /// The tracker binary is missing, timed out, or exited non-zero.
    Unreachable,
    /// The tracker answered; fields are whatever the status text yielded.
    Reachable(SessionState),
}

impl SessionProbe {
    /// The parsed state, if the backend was reachable.
    pub fn state(&self) -> Option<&SessionState> {
        match self {
            Self::Reachable(state) => Some(state),
            _ => None,
        }
    }

    /// Whether an active session was reported.
    pub fn has_active_session(&self) -> bool {
        self.state().map(|s| s.active).unwrap_or(false)
    }
}

fn working_issue_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Working on: #(\d+)").expect("valid regex"))
}

fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Duration:\s*(\d+)\s*minutes").expect("valid regex"))
}

fn started_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(started\s+([^)]+)\)").expect("valid regex"))
}

fn last_action_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Last action:\s*(.+)").expect("valid regex"))
}

/// Parse the tracker's free-text status output.
///
/// A session is active when both the `Session #` header and the
/// `(started ...)` suffix are present. Everything else is optional.
pub fn parse_status(text: &str) -> SessionState {
    let active = text.contains("Session #") && text.contains("(started");

    let working_issue_id = working_issue_re()
        .captures(text)
        .map(|c| c[1].to_string());
    let age_minutes = duration_re()
        .captures(text)
        .and_then(|c| c[1].parse().ok());
    let started_at = started_re().captures(text).map(|c| c[1].to_string());
    let last_action = last_action_re()
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty());

    SessionState {
        active,
        working_issue_id,
        started_at,
        age_minutes,
        last_action,
    }
}
