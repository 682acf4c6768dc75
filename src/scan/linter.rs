//! Best-effort linter invocation.
//!
//! The scanner shells out to whichever linter matches the edited file's
//! extension, time-boxed so a wedged toolchain cannot stall the hook. A
//! missing linter is silently tolerated, a timeout yields one synthetic
//! finding, and any other failure yields nothing. Output is advisory only.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crate::util::{clip, run_with_timeout, RunError};

/// Maximum linter lines reported.
const MAX_ERRORS: usize = 10;

/// Maximum length of one reported line.
const LINE_LEN: usize = 100;

/// Timeout for whole-project linters (clippy, eslint, go vet).
const PROJECT_LINT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for single-file linters (flake8, py_compile).
const FILE_LINT_TIMEOUT: Duration = Duration::from_secs(10);

/// Synthetic finding emitted when a linter exceeds its deadline.
const TIMEOUT_FINDING: &str = "(linter timed out)";

/// Markers that identify a project root for linting purposes.
pub const PROJECT_ROOT_MARKERS: &[&str] = &[
    "Cargo.toml",
    "package.json",
    "go.mod",
    "setup.py",
    "pyproject.toml",
    ".git",
];

/// Maximum directory levels to walk up when locating a project root.
const MAX_WALK_UP: usize = 10;

/// Walk up from a file looking for any of the given root markers.
pub fn find_project_root(file_path: &Path, markers: &[&str]) -> Option<PathBuf> {
    let mut current = file_path.parent()?;
    for _ in 0..MAX_WALK_UP {
        if markers.iter().any(|m| current.join(m).exists()) {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
    None
}

/// Run the appropriate linter for a file and return its first findings.
pub fn run_linter(file_path: &Path) -> Vec<String> {
    let ext = file_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    match ext.as_str() {
        "rs" => lint_rust(file_path),
        "py" => lint_python(file_path),
        "js" | "ts" | "tsx" | "jsx" => lint_javascript(file_path),
        "go" => lint_go(file_path),
        _ => Vec::new(),
    }
}

/// `cargo clippy` from the crate root; error/warning lines from stderr.
fn lint_rust(file_path: &Path) -> Vec<String> {
    let Some(root) = find_project_root(file_path, &["Cargo.toml"]) else {
        return Vec::new();
    };
    let mut cmd = Command::new("cargo");
    cmd.args(["clippy", "--message-format=short", "--quiet"])
        .current_dir(root);

    collect(cmd, PROJECT_LINT_TIMEOUT, |output| {
        output
            .stderr
            .lines()
            .filter(|line| {
                let lower = line.to_lowercase();
                !line.trim().is_empty() && (lower.contains("error") || lower.contains("warning"))
            })
            .map(|line| clip(line.trim(), LINE_LEN))
            .collect()
    })
}

/// `flake8` if installed, `python -m py_compile` otherwise.
fn lint_python(file_path: &Path) -> Vec<String> {
    let mut cmd = Command::new("flake8");
    cmd.arg("--max-line-length=120").arg(file_path);

    match run_with_timeout(cmd, FILE_LINT_TIMEOUT) {
        Ok(output) => output
            .stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .take(MAX_ERRORS)
            .map(|line| clip(line.trim(), LINE_LEN))
            .collect(),
        Err(RunError::Timeout) => vec![TIMEOUT_FINDING.to_string()],
        Err(RunError::Io(_)) => {
            // flake8 not installed; fall back to a syntax check
            let mut cmd = Command::new("python");
            cmd.args(["-m", "py_compile"]).arg(file_path);
            collect(cmd, FILE_LINT_TIMEOUT, |output| {
                if output.stderr.trim().is_empty() {
                    Vec::new()
                } else {
                    vec![clip(output.stderr.trim(), 200)]
                }
            })
        }
    }
}

/// `npx eslint` from the package root; compact-format lines from stdout.
fn lint_javascript(file_path: &Path) -> Vec<String> {
    let markers = ["package.json", ".eslintrc", ".eslintrc.js", ".eslintrc.json"];
    let Some(root) = find_project_root(file_path, &markers) else {
        return Vec::new();
    };
    let mut cmd = Command::new("npx");
    cmd.args(["eslint", "--format=compact"])
        .arg(file_path)
        .current_dir(root);

    collect(cmd, PROJECT_LINT_TIMEOUT, |output| {
        output
            .stdout
            .lines()
            .filter(|line| !line.trim().is_empty() && line.contains(':'))
            .map(|line| clip(line.trim(), LINE_LEN))
            .collect()
    })
}

/// `go vet ./...` from the module root; stderr lines.
fn lint_go(file_path: &Path) -> Vec<String> {
    let Some(root) = find_project_root(file_path, &["go.mod"]) else {
        return Vec::new();
    };
    let mut cmd = Command::new("go");
    cmd.args(["vet", "./..."]).current_dir(root);

    collect(cmd, PROJECT_LINT_TIMEOUT, |output| {
        output
            .stderr
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| clip(line.trim(), LINE_LEN))
            .collect()
    })
}

/// Run a linter command and extract findings, applying the shared
/// degradation policy: missing tool → nothing, timeout → one synthetic
/// finding, and at most [`MAX_ERRORS`] lines.
fn collect(
    cmd: Command,
    timeout: Duration,
    extract: impl FnOnce(&crate::util::CommandOutput) -> Vec<String>,
) -> Vec<String> {
    match run_with_timeout(cmd, timeout) {
        Ok(output) => {
            let mut lines = extract(&output);
            lines.truncate(MAX_ERRORS);
            lines
        }
        Err(RunError::Timeout) => vec![TIMEOUT_FINDING.to_string()],
        Err(RunError::Io(_)) => Vec::new(),
    }
}
