//! Rule file loading.
//!
//! Rules are opaque markdown blobs under `.chainlink/rules/`:
//! `global.md`, `project.md`, `web.md`, `tracking-<mode>.md`, and one file
//! per recognized language. An absent or empty file contributes nothing to
//! the composed advisory - no placeholder headings, no fallback text. The
//! web protocol is the one exception and keeps its fallback in the
//! composer, because the web guard must always inject something.

use std::fs;
use std::path::Path;

use crate::config::TrackingMode;
use crate::rules::languages::LanguageSpec;

/// Loaded rule content for one invocation. Never cached across
/// invocations; only the full-vs-condensed decision is cached, via the
/// marker store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    /// Global rules (`global.md`).
    pub global: Option<String>,
    /// Project-specific rules (`project.md`).
    pub project: Option<String>,
    /// Web security rules (`web.md`).
    pub web: Option<String>,
    /// Tracking-mode rules (`tracking-<mode>.md`).
    pub tracking: Option<String>,
    /// Per-language rules, in detection order: (language name, content).
    pub by_language: Vec<(&'static str, String)>,
}

impl RuleSet {
    /// Load all rule files relevant to this invocation.
    pub fn load(
        rules_dir: Option<&Path>,
        mode: TrackingMode,
        languages: &[&'static LanguageSpec],
    ) -> Self {
        let Some(dir) = rules_dir.filter(|d| d.is_dir()) else {
            return Self::default();
        };

        let by_language = languages
            .iter()
            .filter_map(|spec| {
                load_rule_file(dir, spec.rule_file).map(|content| (spec.name, content))
            })
            .collect();

        Self {
            global: load_rule_file(dir, "global.md"),
            project: load_rule_file(dir, "project.md"),
            web: load_rule_file(dir, "web.md"),
            tracking: load_rule_file(dir, &format!("tracking-{}.md", mode.as_str())),
            by_language,
        }
    }
}

/// Read one rule file, trimmed. Missing, unreadable, or empty files all
/// yield `None`.
fn load_rule_file(dir: &Path, name: &str) -> Option<String> {
    let content = fs::read_to_string(dir.join(name)).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
