//! Scan command.
//!
//! Manual stub scan of a single file, using the same pattern table as the
//! post-tool-use hook. Useful for checking a file before handing it to
//! review, or for wiring the scanner into other tooling.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::scan::{scan_file, LintFinding};

/// Options for the scan command.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// One finding in scan command output.
#[derive(Debug, Clone, Serialize)]
pub struct FindingRecord {
    /// 1-based line number.
    pub line: usize,
    /// Pattern label.
    pub kind: &'static str,
    /// Trimmed line excerpt.
    pub excerpt: String,
}

impl From<&LintFinding> for FindingRecord {
    fn from(finding: &LintFinding) -> Self {
        Self {
            line: finding.line,
            kind: finding.kind,
            excerpt: finding.excerpt.clone(),
        }
    }
}

/// Output format for the scan command.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutput {
    /// Always true: findings are advisory, not failures.
    pub success: bool,
    /// The scanned file.
    pub file: PathBuf,
    /// Findings in pattern-table order per line.
    pub findings: Vec<FindingRecord>,
}

/// The scan command implementation.
pub struct ScanCommand;

impl ScanCommand {
    /// Create a new scan command.
    pub fn new() -> Self {
        Self
    }

    /// Run the scan command against a file.
    pub fn run(&self, file: &Path, _options: &ScanOptions) -> ScanOutput {
        let findings = scan_file(file);
        ScanOutput {
            success: true,
            file: file.to_path_buf(),
            findings: findings.iter().map(FindingRecord::from).collect(),
        }
    }

    /// Format the command output for display.
    pub fn format_output(&self, output: &ScanOutput, options: &ScanOptions) -> String {
        if options.quiet {
            return String::new();
        }
        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_default();
        }

        if output.findings.is_empty() {
            return format!("No stub patterns found in {}", output.file.display());
        }

        let mut lines = vec![format!(
            "{} stub pattern(s) in {}:",
            output.findings.len(),
            output.file.display()
        )];
        for finding in &output.findings {
            lines.push(format!(
                "  {}:{}: {} - `{}`",
                output.file.display(),
                finding.line,
                finding.kind,
                finding.excerpt
            ));
        }
        lines.join("\n")
    }
}

impl Default for ScanCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_reports_findings() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("wip.rs");
        fs::write(&file, "fn f() { todo!() }\n").unwrap();

        let cmd = ScanCommand::new();
        let output = cmd.run(&file, &ScanOptions::default());

        assert!(output.success);
        assert_eq!(output.findings.len(), 1);
        assert_eq!(output.findings[0].kind, "todo!() macro");
    }

    #[test]
    fn test_scan_clean_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("done.rs");
        fs::write(&file, "fn f() { g(); }\n").unwrap();

        let cmd = ScanCommand::new();
        let output = cmd.run(&file, &ScanOptions::default());

        assert!(output.findings.is_empty());
        let text = cmd.format_output(&output, &ScanOptions::default());
        assert!(text.contains("No stub patterns found"));
    }

    #[test]
    fn test_scan_missing_file_is_empty() {
        let cmd = ScanCommand::new();
        let output = cmd.run(Path::new("/nonexistent.rs"), &ScanOptions::default());

        assert!(output.success);
        assert!(output.findings.is_empty());
    }

    #[test]
    fn test_format_output_text_lists_lines() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("wip.py");
        fs::write(&file, "# TODO finish\n# FIXME broken\n").unwrap();

        let cmd = ScanCommand::new();
        let output = cmd.run(&file, &ScanOptions::default());
        let text = cmd.format_output(&output, &ScanOptions::default());

        assert!(text.contains("2 stub pattern(s)"));
        assert!(text.contains(":1: TODO comment"));
        assert!(text.contains(":2: FIXME comment"));
    }

    #[test]
    fn test_format_output_json() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("wip.rs");
        fs::write(&file, "// HACK temporary\n").unwrap();

        let cmd = ScanCommand::new();
        let output = cmd.run(&file, &ScanOptions::default());
        let text = cmd.format_output(
            &output,
            &ScanOptions {
                json: true,
                ..ScanOptions::default()
            },
        );

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["findings"][0]["kind"], "HACK marker");
    }
}
