//! Post-edit scanning: stub detection, linting, and test reminders.
//!
//! Everything in this module is advisory. It never blocks a tool call and
//! never returns a denial; its output is merged into the post-tool-use
//! advisory channel.

pub mod linter;
pub mod reminder;
pub mod stubs;

pub use linter::{find_project_root, run_linter, PROJECT_ROOT_MARKERS};
pub use reminder::{find_test_files, is_test_file, test_reminder};
pub use stubs::{scan_content, scan_file, LintFinding};

/// File extensions the post-edit scanner considers source code.
pub const CODE_EXTENSIONS: &[&str] = &[
    "rs", "py", "js", "ts", "tsx", "jsx", "go", "java", "c", "cpp", "h", "hpp", "cs", "rb",
    "php", "swift", "kt", "scala", "zig", "odin",
];

/// Check whether a path has a recognized source-code extension.
pub fn has_code_extension(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| CODE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_has_code_extension() {
        assert!(has_code_extension(Path::new("/p/main.rs")));
        assert!(has_code_extension(Path::new("/p/App.TSX")));
        assert!(!has_code_extension(Path::new("/p/readme.md")));
        assert!(!has_code_extension(Path::new("/p/Makefile")));
    }
}
