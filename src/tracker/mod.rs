//! Session tracker integration.
//!
//! The chainlink issue tracker is an external CLI. This module owns the
//! subprocess boundary: the [`TrackerCli`] trait abstracts command
//! invocation so tests can script responses, and [`SessionTracker`]
//! implements the session lifecycle operations on top of it. Every call is
//! time-boxed and every failure degrades to `None` - the gate fails open
//! when its backend is unavailable.

use std::process::Command;
use std::time::Duration;

use crate::core::session::{parse_status, SessionProbe};
use crate::util::run_with_timeout;

/// Name of the tracker binary, resolved via PATH.
pub const TRACKER_BIN: &str = "chainlink";

/// Timeout for gate-path status queries. Kept short: this sits on the
/// critical path of every gated tool call.
pub const GATE_TIMEOUT: Duration = Duration::from_secs(3);

/// Timeout for session-start context queries.
pub const CONTEXT_TIMEOUT: Duration = Duration::from_secs(5);

/// Command-line interface to the tracker binary.
///
/// Returns the trimmed stdout on success, `None` on any failure (missing
/// binary, timeout, non-zero exit).
pub trait TrackerCli {
    fn invoke(&self, args: &[&str], timeout: Duration) -> Option<String>;
}

/// The real tracker: a `chainlink` subprocess.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainlinkBin;

impl TrackerCli for ChainlinkBin {
    fn invoke(&self, args: &[&str], timeout: Duration) -> Option<String> {
        let mut cmd = Command::new(TRACKER_BIN);
        cmd.args(args);
        match run_with_timeout(cmd, timeout) {
            Ok(output) if output.status.success() => Some(output.stdout.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("chainlink {:?}: {:?} (treated as unreachable)", args, e);
                None
            }
        }
    }
}

/// Session lifecycle operations over the tracker CLI.
#[derive(Debug)]
pub struct SessionTracker<C: TrackerCli> {
    pub(crate) cli: C,
}

impl<C: TrackerCli> SessionTracker<C> {
    /// Create a tracker over the given CLI.
    pub fn new(cli: C) -> Self {
        Self { cli }
    }

    /// Raw session status text, if the backend answered.
    pub fn status_text(&self) -> Option<String> {
        self.cli.invoke(&["session", "status"], GATE_TIMEOUT)
    }

    /// Probe the backend and parse its status.
    pub fn probe(&self) -> SessionProbe {
        match self.status_text() {
            Some(text) => SessionProbe::Reachable(parse_status(&text)),
            None => SessionProbe::Unreachable,
        }
    }

    /// Start a session if none is active. Idempotent; safe to call on
    /// every invocation.
    ///
    /// Returns `true` if a new session was started.
    pub fn ensure_started(&self) -> bool {
        if self.probe().has_active_session() {
            return false;
        }
        self.cli
            .invoke(&["session", "start"], CONTEXT_TIMEOUT)
            .is_some()
    }

    /// Force-end the session if it is older than `max_age_minutes`.
    ///
    /// Writes an auto-generated handoff note so the next session sees why
    /// the previous one ended. This is the only automatic-recovery
    /// mechanism for sessions abandoned mid-task.
    ///
    /// Returns `true` if a stale session was ended.
    pub fn end_if_stale(&self, max_age_minutes: u32) -> bool {
        let probe = self.probe();
        let Some(state) = probe.state() else {
            return false;
        };
        let Some(age) = state.age_minutes.filter(|_| state.active) else {
            return false;
        };
        if age <= max_age_minutes {
            return false;
        }

        let note = format!(
            "Session auto-ended (stale after {} minutes). No handoff notes provided.",
            age
        );
        self.cli
            .invoke(&["session", "end", "--notes", &note], CONTEXT_TIMEOUT);
        true
    }

    /// Handoff notes from the previous session, if any were recorded.
    pub fn last_handoff(&self) -> Option<String> {
        self.cli
            .invoke(&["session", "last-handoff"], CONTEXT_TIMEOUT)
            .filter(|text| !text.is_empty() && !text.contains("No previous"))
    }

    /// Unblocked issues ready to be worked.
    pub fn ready_issues(&self) -> Option<String> {
        self.cli
            .invoke(&["ready"], CONTEXT_TIMEOUT)
            .filter(|text| !text.is_empty())
    }

    /// Summary of open issues.
    pub fn open_issues(&self) -> Option<String> {
        self.cli
            .invoke(&["list", "-s", "open"], CONTEXT_TIMEOUT)
            .filter(|text| !text.is_empty())
    }

    /// Add a comment to an issue. Best-effort.
    pub fn comment(&self, issue_id: &str, text: &str) {
        self.cli
            .invoke(&["comment", issue_id, text], CONTEXT_TIMEOUT);
    }
}
