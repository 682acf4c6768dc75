//! chainguard - workflow policy hooks for Claude Code
//!
//! chainguard mediates an AI coding agent's actions against a project's
//! workflow policy. It gates Write/Edit/Bash invocations on issue-tracking
//! state, injects behavioral rules on prompt submission, scans completed
//! edits for stub patterns with debounced linting, and drives the external
//! chainlink tracker's session lifecycle.
//!
//! Every infrastructure failure fails open: a missing tracker, a malformed
//! config, or an unwritable marker never blocks the agent. The only
//! blocking outcomes are policy denials (exit code 2).

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod hooks;
pub mod markers;
pub mod rules;
pub mod scan;
pub mod tracker;
pub mod util;

pub use crate::config::{find_chainlink_dir, HookConfig, ProjectContext, TrackingMode};
pub use crate::core::{
    decide, parse_status, static_decision, Decision, DenyReason, SessionProbe, SessionState,
    ToolInvocationEvent, ToolKind, WarnReason,
};
pub use crate::error::{ChainguardError, FailOpen, Result};
pub use crate::hooks::{HookOutcome, HookRunner, HookType};
pub use crate::markers::{FileMarkerStore, MarkerStore, MemoryMarkerStore};
pub use crate::rules::{compose, web_guard, ComposedRules, RuleSet};
pub use crate::scan::{run_linter, scan_content, scan_file, LintFinding};
pub use crate::tracker::{ChainlinkBin, SessionTracker, TrackerCli};

// CLI commands
pub use crate::cli::{InitCommand, ScanCommand};
