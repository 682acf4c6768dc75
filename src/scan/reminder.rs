//! Test reminders after source edits.
//!
//! When a source file is edited after the last recorded test run, the
//! scanner appends a reminder naming the ecosystem's test command and any
//! related test files it can find cheaply. Editing a test file never
//! triggers a reminder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::markers::{keys, MarkerStore};
use crate::scan::CODE_EXTENSIONS;

/// Maximum related test files named in a reminder.
const MAX_TEST_FILES: usize = 5;

/// Filename fragments that mark a test file.
const TEST_NAME_PATTERNS: &[&str] = &[
    "test_", "_test.", ".test.", "spec.", "_spec.", "tests.", "testing.", "mock.", "_mock.",
];

/// Directory names that mark a test tree.
const TEST_DIRS: &[&str] = &["test", "tests", "__tests__", "spec", "specs", "testing"];

/// Check whether a path is a test file.
pub fn is_test_file(path: &Path) -> bool {
    let basename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if TEST_NAME_PATTERNS.iter().any(|p| basename.contains(p)) {
        return true;
    }

    path.components().any(|c| {
        let name = c.as_os_str().to_string_lossy().to_lowercase();
        TEST_DIRS.contains(&name.as_str())
    })
}

/// Find test files related to a source file, bounded and best-effort.
///
/// Looks in the project's `tests/` directory for names containing the
/// source stem, plus ecosystem-specific siblings (`<stem>_test.go`,
/// `<stem>.test.<ext>`, `<stem>.spec.<ext>`).
pub fn find_test_files(file_path: &Path, root: &Path) -> Vec<PathBuf> {
    let stem = file_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if stem.is_empty() {
        return Vec::new();
    }

    let mut found = Vec::new();

    let tests_dir = root.join("tests");
    if let Ok(entries) = fs::read_dir(&tests_dir) {
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.contains(&stem) && entry.path().is_file() {
                found.push(entry.path());
            }
        }
    }

    if let Some(parent) = file_path.parent() {
        let ext = file_path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        let siblings = [
            parent.join(format!("{stem}_test.{ext}")),
            parent.join(format!("{stem}.test.{ext}")),
            parent.join(format!("{stem}.spec.{ext}")),
        ];
        for sibling in siblings {
            if sibling.is_file() {
                found.push(sibling);
            }
        }
    }

    found.sort();
    found.dedup();
    found.truncate(MAX_TEST_FILES);
    found
}

/// Pick the test command for the project's ecosystem.
fn test_command(ext: &str, root: &Path) -> Option<&'static str> {
    match ext {
        "rs" if root.join("Cargo.toml").exists() => Some("cargo test"),
        "py" if root.join("pytest.ini").exists() || root.join("pyproject.toml").exists() => {
            Some("pytest")
        }
        "py" if root.join("setup.py").exists() => Some("python -m pytest"),
        "js" | "ts" | "tsx" | "jsx" if root.join("package.json").exists() => Some("npm test"),
        "go" if root.join("go.mod").exists() => Some("go test ./..."),
        _ => None,
    }
}

/// Build a test reminder for an edited file, if one is warranted.
pub fn test_reminder(
    file_path: &Path,
    root: Option<&Path>,
    markers: &impl MarkerStore,
) -> Option<String> {
    if is_test_file(file_path) {
        return None;
    }

    let ext = file_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();
    if !CODE_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }

    // Stale when the file is newer than the last recorded test run, or no
    // run was ever recorded. Unreadable mtimes count as stale.
    let modified_after_tests = match markers.timestamp(keys::LAST_TEST_RUN) {
        None => true,
        Some(marker_time) => file_mtime(file_path)
            .map(|file_time| file_time > marker_time)
            .unwrap_or(true),
    };
    if !modified_after_tests {
        return None;
    }

    let root = root?;
    let test_files = find_test_files(file_path, root);
    let test_cmd = test_command(&ext, root);

    if test_files.is_empty() && test_cmd.is_none() {
        return None;
    }

    let mut msg = String::from("\u{1f9ea} TEST REMINDER: Code modified since last test run.");
    if let Some(cmd) = test_cmd {
        msg.push_str(&format!("\n   Run: {cmd}"));
    }
    if !test_files.is_empty() {
        let names: Vec<String> = test_files
            .iter()
            .take(3)
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        msg.push_str(&format!("\n   Related tests: {}", names.join(", ")));
    }
    Some(msg)
}

fn file_mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
