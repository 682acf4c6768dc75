//! Init command.
//!
//! Scaffolds the `.chainlink/` hook configuration: `hook-config.json` with
//! the built-in defaults, a `rules/` directory with starter files, and the
//! `.cache/` marker directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{HookConfig, CHAINLINK_DIR, HOOK_CONFIG_FILE};

/// Options for the init command.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Force overwrite existing files.
    pub force: bool,
}

/// Output format for the init command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitOutput {
    /// Whether initialization was successful.
    pub success: bool,
    /// Files and directories created.
    pub created: Vec<String>,
    /// Files that already existed (skipped).
    pub skipped: Vec<String>,
    /// Error message if initialization failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Starter global rules.
const DEFAULT_GLOBAL_RULES: &str = r#"### General Requirements
1. **NO STUBS**: never leave placeholder markers or empty bodies as implementation.
2. **READ BEFORE WRITE**: always read a file before editing it.
3. **ERROR HANDLING**: proper error handling everywhere; no crashes on bad input.
4. **FULL FEATURES**: implement the complete feature as requested.
"#;

/// Starter project rules.
const DEFAULT_PROJECT_RULES: &str = r#"### Project-Specific Rules
Add project conventions here. This file is injected verbatim into the
behavioral guard on the first prompt of each session.
"#;

/// The init command implementation.
pub struct InitCommand {
    cwd: PathBuf,
}

impl InitCommand {
    /// Create a new init command rooted at the given directory.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// Run the init command.
    pub fn run(&self, options: &InitOptions) -> InitOutput {
        let mut created = Vec::new();
        let mut skipped = Vec::new();

        let chainlink_dir = self.cwd.join(CHAINLINK_DIR);

        for dir in [
            chainlink_dir.clone(),
            chainlink_dir.join("rules"),
            chainlink_dir.join(".cache"),
        ] {
            if let Err(e) = ensure_dir(&dir, &mut created, &mut skipped) {
                return InitOutput {
                    success: false,
                    created,
                    skipped,
                    error: Some(e),
                };
            }
        }

        let config_json = match serde_json::to_string_pretty(&HookConfig::default()) {
            Ok(json) => json,
            Err(e) => {
                return InitOutput {
                    success: false,
                    created,
                    skipped,
                    error: Some(format!("failed to render default config: {e}")),
                }
            }
        };

        let files = [
            (chainlink_dir.join(HOOK_CONFIG_FILE), config_json.as_str()),
            (
                chainlink_dir.join("rules").join("global.md"),
                DEFAULT_GLOBAL_RULES,
            ),
            (
                chainlink_dir.join("rules").join("project.md"),
                DEFAULT_PROJECT_RULES,
            ),
        ];

        for (path, content) in files {
            if path.exists() && !options.force {
                skipped.push(display(&path, &self.cwd));
                continue;
            }
            if let Err(e) = fs::write(&path, content) {
                return InitOutput {
                    success: false,
                    created,
                    skipped,
                    error: Some(format!("failed to write {}: {e}", path.display())),
                };
            }
            created.push(display(&path, &self.cwd));
        }

        InitOutput {
            success: true,
            created,
            skipped,
            error: None,
        }
    }

    /// Format the command output for display.
    pub fn format_output(&self, output: &InitOutput, options: &InitOptions) -> String {
        if options.quiet {
            return String::new();
        }
        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_default();
        }

        let mut lines = Vec::new();
        if output.success {
            lines.push("Initialized chainguard hook configuration.".to_string());
        } else if let Some(error) = &output.error {
            lines.push(format!("Initialization failed: {error}"));
        }
        for path in &output.created {
            lines.push(format!("  created {path}"));
        }
        for path in &output.skipped {
            lines.push(format!("  skipped {path} (exists, use --force to overwrite)"));
        }
        lines.join("\n")
    }
}

fn ensure_dir(
    dir: &Path,
    created: &mut Vec<String>,
    skipped: &mut Vec<String>,
) -> Result<(), String> {
    if dir.is_dir() {
        skipped.push(format!("{}/", dir.display()));
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| format!("failed to create {}: {e}", dir.display()))?;
    created.push(format!("{}/", dir.display()));
    Ok(())
}

fn display(path: &Path, cwd: &Path) -> String {
    path.strip_prefix(cwd)
        .unwrap_or(path)
        .display()
        .to_string()
}
