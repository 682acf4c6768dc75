//! Configuration loading for chainguard.
//!
//! Hook behavior is configured by a single JSON file at
//! `.chainlink/hook-config.json` with three optional keys:
//! `tracking_mode`, `blocked_git_commands`, and `allowed_bash_prefixes`.
//! Any missing key keeps its built-in default; a missing or malformed file
//! yields full defaults. Config errors never block a hook invocation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ChainguardError, FailOpen, Result};

/// Name of the tracker's project directory.
pub const CHAINLINK_DIR: &str = ".chainlink";

/// Name of the hook config file inside the chainlink directory.
pub const HOOK_CONFIG_FILE: &str = "hook-config.json";

/// Maximum directory levels to walk up when locating `.chainlink/`.
const MAX_WALK_UP: usize = 10;

/// Enforcement strictness for issue tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrackingMode {
    /// Block Write/Edit/Bash without an active work item.
    #[default]
    Strict,
    /// Remind (print a warning) but allow.
    Normal,
    /// No issue-tracking enforcement; only the git block applies.
    Relaxed,
}

impl TrackingMode {
    /// Get the mode name as used in config files and rule file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Normal => "normal",
            Self::Relaxed => "relaxed",
        }
    }
}

impl std::fmt::Display for TrackingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hook configuration.
///
/// Loaded once per invocation; never written back by the hooks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HookConfig {
    /// Enforcement strictness level.
    pub tracking_mode: TrackingMode,
    /// Command prefixes that are always denied (git mutations).
    pub blocked_git_commands: Vec<String>,
    /// Command prefixes allowed without an active work item.
    pub allowed_bash_prefixes: Vec<String>,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            tracking_mode: TrackingMode::Strict,
            blocked_git_commands: DEFAULT_BLOCKED_GIT.iter().map(|s| s.to_string()).collect(),
            allowed_bash_prefixes: DEFAULT_ALLOWED_BASH
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Git mutation commands denied in every mode. The human performs all git
/// write operations.
pub const DEFAULT_BLOCKED_GIT: &[&str] = &[
    "git push",
    "git commit",
    "git merge",
    "git rebase",
    "git cherry-pick",
    "git reset",
    "git checkout .",
    "git restore .",
    "git clean",
    "git stash",
    "git tag",
    "git am",
    "git apply",
    "git branch -d",
    "git branch -D",
    "git branch -m",
];

/// Read-only and infrastructure commands allowed without an active work item.
pub const DEFAULT_ALLOWED_BASH: &[&str] = &[
    "chainlink ",
    "git status",
    "git diff",
    "git log",
    "git branch",
    "git show",
    "cargo test",
    "cargo build",
    "cargo check",
    "cargo clippy",
    "cargo fmt",
    "npm test",
    "npm run",
    "npx ",
    "tsc",
    "node ",
    "python ",
    "ls",
    "dir",
    "pwd",
    "echo",
];

impl HookConfig {
    /// Load the hook config for a project, falling back to defaults.
    ///
    /// Missing directory, missing file, unreadable file, and malformed JSON
    /// all yield defaults silently (logged at warn level only).
    pub fn load(chainlink_dir: Option<&Path>) -> Self {
        let Some(dir) = chainlink_dir else {
            return Self::default();
        };
        let path = dir.join(HOOK_CONFIG_FILE);
        if !path.is_file() {
            return Self::default();
        }
        Self::load_from_file(&path).fail_open_default("loading hook config")
    }

    /// Load config from a specific file path.
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ChainguardError::storage(path, e))?;
        serde_json::from_str(&content).map_err(|e| ChainguardError::config(e.to_string()))
    }
}

/// Find the `.chainlink` directory by walking up from a starting directory.
///
/// Bounded at [`MAX_WALK_UP`] levels so a pathological mount layout cannot
/// turn discovery into a long filesystem crawl.
pub fn find_chainlink_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    for _ in 0..MAX_WALK_UP {
        let candidate = current.join(CHAINLINK_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
    None
}

/// Per-invocation view of the project: where we run and whether the
/// tracker's directory exists.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// The working directory of this invocation.
    pub cwd: PathBuf,
    /// The discovered `.chainlink/` directory, if any.
    pub chainlink_dir: Option<PathBuf>,
}

impl ProjectContext {
    /// Discover the project context from a working directory.
    pub fn discover(cwd: impl Into<PathBuf>) -> Self {
        let cwd = cwd.into();
        let chainlink_dir = find_chainlink_dir(&cwd);
        Self { cwd, chainlink_dir }
    }

    /// Discover the project context from the process working directory.
    ///
    /// Fail-open: an unavailable cwd produces an untracked context rooted
    /// at `.`, never an error.
    pub fn from_env() -> Self {
        match std::env::current_dir() {
            Ok(cwd) => Self::discover(cwd),
            Err(e) => {
                tracing::warn!("cwd unavailable: {} (fail-open: untracked context)", e);
                Self {
                    cwd: PathBuf::from("."),
                    chainlink_dir: None,
                }
            }
        }
    }

    /// The rules directory (`.chainlink/rules/`), if tracked.
    pub fn rules_dir(&self) -> Option<PathBuf> {
        self.chainlink_dir.as_ref().map(|d| d.join("rules"))
    }

    /// The marker cache directory (`.chainlink/.cache/`), if tracked.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        self.chainlink_dir.as_ref().map(|d| d.join(".cache"))
    }

    /// The crash log path (`.chainlink/.cache/crash.log`), if tracked.
    pub fn crash_log_path(&self) -> Option<PathBuf> {
        self.cache_dir().map(|d| d.join("crash.log"))
    }

    /// Load the hook config for this project.
    pub fn load_config(&self) -> HookConfig {
        HookConfig::load(self.chainlink_dir.as_deref())
    }
}
