//! Hook dispatch and handlers.
//!
//! The runner wires the policy gate, session tracker, marker store, rule
//! composer, and scanner into the four hook events. It owns every side
//! effect the gate itself is not allowed to have: subprocess probes,
//! marker touches, and the text/exit-code outcome handed back to `main`.

use crate::config::{HookConfig, ProjectContext};
use crate::core::gate::{self, Decision};
use crate::core::session::{parse_status, SessionProbe};
use crate::hooks::input::{read_stdin, ToolUseInput};
use crate::hooks::output::{AdditionalContext, HookOutcome};
use crate::markers::{keys, MarkerStore, LINT_DEBOUNCE_SECS, STALE_SESSION_MINUTES};
use crate::rules::composer;
use crate::scan;
use crate::tracker::{SessionTracker, TrackerCli};

/// Hook type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookType {
    /// Session initialization and tracker lifecycle.
    SessionStart,
    /// Behavioral guard injection on prompt submission.
    UserPromptSubmit,
    /// The policy gate and the web guard.
    PreToolUse,
    /// Post-edit stub scan, lint, and test reminder.
    PostToolUse,
}

impl HookType {
    /// Parse a hook type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "session-start" | "sessionstart" | "session_start" => Some(Self::SessionStart),
            "user-prompt-submit" | "userpromptsubmit" | "user_prompt_submit" => {
                Some(Self::UserPromptSubmit)
            }
            "pre-tool-use" | "pretooluse" | "pre_tool_use" => Some(Self::PreToolUse),
            "post-tool-use" | "posttooluse" | "post_tool_use" => Some(Self::PostToolUse),
            _ => None,
        }
    }

    /// Event name used in the advisory wrapper.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::SessionStart => "SessionStart",
            Self::UserPromptSubmit => "UserPromptSubmit",
            Self::PreToolUse => "PreToolUse",
            Self::PostToolUse => "PostToolUse",
        }
    }
}

/// Hook runner context.
pub struct HookRunner<M: MarkerStore, C: TrackerCli> {
    project: ProjectContext,
    config: HookConfig,
    markers: M,
    tracker: SessionTracker<C>,
}

impl<M: MarkerStore, C: TrackerCli> HookRunner<M, C> {
    /// Create a runner, loading the hook config from the project.
    pub fn new(project: ProjectContext, markers: M, cli: C) -> Self {
        let config = project.load_config();
        Self::with_config(project, config, markers, cli)
    }

    /// Create a runner with an explicit config.
    pub fn with_config(project: ProjectContext, config: HookConfig, markers: M, cli: C) -> Self {
        Self {
            project,
            config,
            markers,
            tracker: SessionTracker::new(cli),
        }
    }

    /// Run a hook with input from stdin.
    pub fn run(&self, hook: HookType) -> HookOutcome {
        let input = read_stdin();
        self.run_with_input(hook, &input)
    }

    /// Run a hook with provided input.
    pub fn run_with_input(&self, hook: HookType, input: &str) -> HookOutcome {
        match hook {
            HookType::SessionStart => self.handle_session_start(),
            HookType::UserPromptSubmit => self.handle_user_prompt_submit(),
            HookType::PreToolUse => self.handle_pre_tool_use(input),
            HookType::PostToolUse => self.handle_post_tool_use(input),
        }
    }

    // =========================================================================
    // Pre-Tool-Use Handler
    // =========================================================================

    /// Gate Write/Edit/Bash; inject the web protocol for WebFetch/WebSearch.
    ///
    /// The tracker subprocess runs only when rules 1-5 leave the outcome
    /// open, so allow-listed commands and blocked mutations never pay for a
    /// status query.
    fn handle_pre_tool_use(&self, input: &str) -> HookOutcome {
        let event = ToolUseInput::from_json(input).event();

        if event.tool.is_web() {
            let guard = composer::web_guard(self.project.rules_dir().as_deref());
            return HookOutcome::advisory(guard);
        }

        let decision = match gate::static_decision(&event, &self.config) {
            Some(decision) => decision,
            None => {
                let probe = if self.project.chainlink_dir.is_none() {
                    SessionProbe::Untracked
                } else {
                    self.tracker.probe()
                };
                gate::decide(&event, &self.config, &probe)
            }
        };

        match decision {
            Decision::Allow => HookOutcome::allow(),
            Decision::Deny(reason) => HookOutcome::deny(reason.message()),
            Decision::Warn(reason) => HookOutcome::advisory(reason.message()),
        }
    }

    // =========================================================================
    // Post-Tool-Use Handler
    // =========================================================================

    /// Scan a completed Write/Edit: stub patterns always, linting when the
    /// edit burst has settled, and a test reminder when code outran tests.
    fn handle_post_tool_use(&self, input: &str) -> HookOutcome {
        let event = ToolUseInput::from_json(input).event();

        if !event.tool.is_file_mutation() {
            return HookOutcome::allow();
        }
        let Some(path) = event.file_path.as_deref() else {
            return HookOutcome::allow();
        };
        if !scan::has_code_extension(path) {
            return HookOutcome::allow();
        }
        // Never scan the hook machinery itself
        let path_str = path.to_string_lossy();
        if path_str.contains(".claude") && path_str.contains("hooks") {
            return HookOutcome::allow();
        }

        let root = scan::find_project_root(path, scan::PROJECT_ROOT_MARKERS);

        // Stub scan is instant and always runs
        let findings = scan::scan_file(path);

        // Linting is debounced: skip while edits are still rapid-firing.
        // The marker is touched either way so the window slides forward.
        let should_lint = self
            .markers
            .age_seconds(keys::LAST_EDIT_TIME)
            .map(|age| age >= LINT_DEBOUNCE_SECS)
            .unwrap_or(true);
        self.markers.touch(keys::LAST_EDIT_TIME);

        let lint_errors = if should_lint {
            scan::run_linter(path)
        } else {
            Vec::new()
        };

        let reminder = scan::test_reminder(path, root.as_deref(), &self.markers);

        let mut messages = Vec::new();

        if !findings.is_empty() {
            let mut listed: Vec<String> = findings
                .iter()
                .take(5)
                .map(|f| format!("  Line {}: {} - `{}`", f.line, f.kind, f.excerpt))
                .collect();
            if findings.len() > 5 {
                listed.push(format!("  ... and {} more", findings.len() - 5));
            }
            messages.push(format!(
                "\u{26a0}\u{fe0f} STUB PATTERNS DETECTED in {}:\n{}\n\n\
                 Fix these NOW - replace with real implementation.",
                path.display(),
                listed.join("\n")
            ));
        }

        if !lint_errors.is_empty() {
            let listed: Vec<String> = lint_errors.iter().map(|e| format!("  {e}")).collect();
            messages.push(format!(
                "\u{1f50d} LINTER ISSUES:\n{}",
                listed.join("\n")
            ));
        }

        if let Some(reminder) = reminder {
            messages.push(reminder);
        }

        let context = if messages.is_empty() {
            let basename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path_str.into_owned());
            format!("\u{2713} {} - no issues detected", basename)
        } else {
            messages.join("\n\n")
        };

        let wrapper = AdditionalContext::new(HookType::PostToolUse.event_name(), context);
        HookOutcome::advisory(wrapper.to_json())
    }

    // =========================================================================
    // Session-Start Handler
    // =========================================================================

    /// Drive the tracker's session lifecycle and assemble startup context.
    fn handle_session_start(&self) -> HookOutcome {
        if self.project.chainlink_dir.is_none() {
            return HookOutcome::allow();
        }

        let mut parts = vec!["<chainlink-session-context>".to_string()];

        // An already-active session at startup means this process resumed
        // after context compression (or a previous process was abandoned).
        let mut is_resume = self.tracker.probe().has_active_session();

        if is_resume && self.tracker.end_if_stale(STALE_SESSION_MINUTES) {
            is_resume = false;
            parts.push(format!(
                "## Stale Session Warning\nPrevious session was auto-ended (open > {} hours). \
                 Handoff notes may be incomplete.",
                STALE_SESSION_MINUTES / 60
            ));
        }

        // Capture the previous session's handoff before starting a new one
        let last_handoff = self.tracker.last_handoff();

        self.tracker.ensure_started();

        if is_resume {
            if let Some(status) = self.tracker.status_text() {
                let state = parse_status(&status);

                if let Some(issue_id) = &state.working_issue_id {
                    let comment = match &state.last_action {
                        Some(action) => format!(
                            "[auto] Session resumed after context compression. Last action: {action}"
                        ),
                        None => "[auto] Session resumed after context compression.".to_string(),
                    };
                    self.tracker.comment(issue_id, &comment);
                }

                let breadcrumb = match &state.last_action {
                    Some(action) => format!(
                        "## Context Compression Breadcrumb\n\
                         This session resumed after context compression.\n\
                         Last recorded action: {action}"
                    ),
                    None => "## Context Compression Breadcrumb\n\
                             This session resumed after context compression.\n\
                             No last action was recorded. Use `chainlink session action \"...\"` \
                             to track progress."
                        .to_string(),
                };
                parts.push(breadcrumb);
            }
        }

        if let Some(handoff) = last_handoff {
            parts.push(format!("## Previous Session Handoff\n{handoff}"));
        }

        if let Some(status) = self.tracker.status_text() {
            parts.push(format!("## Current Session\n{status}"));
        }

        if let Some(ready) = self.tracker.ready_issues() {
            parts.push(format!("## Ready Issues (unblocked)\n{ready}"));
        }

        if let Some(open) = self.tracker.open_issues() {
            parts.push(format!("## Open Issues\n{open}"));
        }

        parts.push(WORKFLOW_REMINDER.to_string());

        HookOutcome::advisory(parts.join("\n\n"))
    }

    // =========================================================================
    // User-Prompt-Submit Handler
    // =========================================================================

    /// Inject the behavioral guard, full or condensed.
    fn handle_user_prompt_submit(&self) -> HookOutcome {
        let composed = composer::compose(
            &self.project.cwd,
            self.project.rules_dir().as_deref(),
            &self.config,
            &self.markers,
        );

        if composed.is_full {
            self.markers.touch(keys::GUARD_FULL_SENT);
        }

        HookOutcome::advisory(composed.text)
    }
}

/// Workflow reminder closing the session-start context.
const WORKFLOW_REMINDER: &str = "## Chainlink Workflow Reminder
- Use `chainlink session start` at the beginning of work
- Use `chainlink session work <id>` to mark current focus
- Use `chainlink session action \"...\"` to record breadcrumbs before context compression
- Add comments as you discover things: `chainlink comment <id> \"...\"`
- End with handoff notes: `chainlink session end --notes \"...\"`
</chainlink-session-context>";
