//! Project snapshots for the full advisory.
//!
//! Two grounding blocks are prepended to the full behavioral guard: a
//! compact project tree (so the agent uses real paths) and a dependency
//! listing (so it uses real versions). Both are best-effort; an empty
//! project contributes nothing.

use std::fs;
use std::path::Path;

/// Maximum tree depth.
const TREE_MAX_DEPTH: usize = 3;

/// Maximum entries in the tree snapshot.
const TREE_MAX_ENTRIES: usize = 50;

/// Maximum files shown per directory.
const TREE_MAX_FILES_PER_DIR: usize = 10;

/// Maximum dependencies listed.
const MAX_DEPS: usize = 30;

/// Directories never descended into.
const SKIP_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    "venv",
    ".venv",
    "env",
    ".env",
    "__pycache__",
    ".chainlink",
    ".claude",
    "dist",
    "build",
    ".next",
    ".nuxt",
    "vendor",
    ".idea",
    ".vscode",
    "coverage",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    "eggs",
    ".sass-cache",
];

fn should_skip_dir(name: &str) -> bool {
    if name.starts_with('.') && name != ".github" && name != ".claude" {
        return true;
    }
    SKIP_DIRS.contains(&name) || name.ends_with(".egg-info")
}

/// Generate a compact project tree.
///
/// Files are listed before directories at each level, capped per directory
/// and overall, with explicit truncation notes so the agent knows the view
/// is partial.
pub fn project_tree(cwd: &Path) -> Option<String> {
    let mut entries = Vec::new();
    walk_dir(cwd, "", 0, &mut entries);

    if entries.is_empty() {
        return None;
    }
    if entries.len() >= TREE_MAX_ENTRIES {
        entries.push(format!("... (tree truncated at {} entries)", TREE_MAX_ENTRIES));
    }
    Some(entries.join("\n"))
}

fn walk_dir(path: &Path, prefix: &str, depth: usize, entries: &mut Vec<String>) {
    if depth > TREE_MAX_DEPTH || entries.len() >= TREE_MAX_ENTRIES {
        return;
    }

    let Ok(read) = fs::read_dir(path) else {
        return;
    };
    let mut names: Vec<String> = read
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    let dirs: Vec<&String> = names
        .iter()
        .filter(|n| path.join(n).is_dir() && !should_skip_dir(n))
        .collect();
    let files: Vec<&String> = names
        .iter()
        .filter(|n| path.join(n).is_file() && !n.starts_with('.'))
        .collect();

    for file in files.iter().take(TREE_MAX_FILES_PER_DIR) {
        if entries.len() >= TREE_MAX_ENTRIES {
            return;
        }
        entries.push(format!("{prefix}{file}"));
    }
    if files.len() > TREE_MAX_FILES_PER_DIR {
        entries.push(format!(
            "{prefix}... ({} more files)",
            files.len() - TREE_MAX_FILES_PER_DIR
        ));
    }

    for dir in dirs {
        if entries.len() >= TREE_MAX_ENTRIES {
            return;
        }
        entries.push(format!("{prefix}{dir}/"));
        walk_dir(&path.join(dir), &format!("{prefix}  "), depth + 1, entries);
    }
}

/// Generate a dependency listing for the project, first ecosystem wins.
pub fn dependency_snapshot(cwd: &Path) -> Option<String> {
    cargo_dependencies(cwd)
        .or_else(|| node_dependencies(cwd))
        .or_else(|| python_dependencies(cwd))
        .or_else(|| go_dependencies(cwd))
}

/// Direct dependencies from `Cargo.toml`.
fn cargo_dependencies(cwd: &Path) -> Option<String> {
    let content = fs::read_to_string(cwd.join("Cargo.toml")).ok()?;
    let value: toml::Value = toml::from_str(&content).ok()?;
    let table = value.get("dependencies")?.as_table()?;

    let mut deps = Vec::new();
    for (name, spec) in table {
        let version = match spec {
            toml::Value::String(v) => Some(v.clone()),
            toml::Value::Table(t) => t
                .get("version")
                .and_then(|v| v.as_str())
                .map(|v| v.to_string()),
            _ => None,
        };
        if let Some(version) = version {
            deps.push(format!("  {} = \"{}\"", name, version));
        }
        if deps.len() >= MAX_DEPS {
            break;
        }
    }

    if deps.is_empty() {
        None
    } else {
        Some(format!("Rust (Cargo.toml):\n{}", deps.join("\n")))
    }
}

/// Dependencies and devDependencies from `package.json`.
fn node_dependencies(cwd: &Path) -> Option<String> {
    let content = fs::read_to_string(cwd.join("package.json")).ok()?;
    let pkg: serde_json::Value = serde_json::from_str(&content).ok()?;

    let mut deps = Vec::new();
    for section in ["dependencies", "devDependencies"] {
        if let Some(map) = pkg.get(section).and_then(|v| v.as_object()) {
            for (name, version) in map {
                deps.push(format!(
                    "  {}: {}",
                    name,
                    version.as_str().unwrap_or_default()
                ));
                if deps.len() >= MAX_DEPS {
                    break;
                }
            }
        }
        if deps.len() >= MAX_DEPS {
            break;
        }
    }

    if deps.is_empty() {
        None
    } else {
        Some(format!("Node.js (package.json):\n{}", deps.join("\n")))
    }
}

/// Pinned requirements from `requirements.txt`.
fn python_dependencies(cwd: &Path) -> Option<String> {
    let content = fs::read_to_string(cwd.join("requirements.txt")).ok()?;

    let deps: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .take(MAX_DEPS)
        .map(|line| format!("  {}", line))
        .collect();

    if deps.is_empty() {
        None
    } else {
        Some(format!("Python (requirements.txt):\n{}", deps.join("\n")))
    }
}

/// The `require` block from `go.mod`.
fn go_dependencies(cwd: &Path) -> Option<String> {
    let content = fs::read_to_string(cwd.join("go.mod")).ok()?;

    let mut deps = Vec::new();
    let mut in_require = false;
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with("require (") {
            in_require = true;
            continue;
        }
        if in_require {
            if line == ")" {
                break;
            }
            if !line.is_empty() {
                deps.push(format!("  {}", line));
                if deps.len() >= MAX_DEPS {
                    break;
                }
            }
        }
    }

    if deps.is_empty() {
        None
    } else {
        Some(format!("Go (go.mod):\n{}", deps.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tree_empty_project() {
        let dir = TempDir::new().unwrap();
        assert!(project_tree(dir.path()).is_none());
    }

    #[test]
    fn test_tree_lists_files_then_dirs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src").join("main.rs"), "").unwrap();

        let tree = project_tree(dir.path()).unwrap();
        let lines: Vec<&str> = tree.lines().collect();

        assert_eq!(lines[0], "README.md");
        assert_eq!(lines[1], "src/");
        assert_eq!(lines[2], "  main.rs");
    }

    #[test]
    fn test_tree_skips_noise_dirs() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("node_modules").join("x")).unwrap();
        fs::create_dir_all(dir.path().join("target")).unwrap();
        fs::create_dir_all(dir.path().join(".chainlink")).unwrap();
        fs::write(dir.path().join("main.go"), "").unwrap();

        let tree = project_tree(dir.path()).unwrap();
        assert!(!tree.contains("node_modules"));
        assert!(!tree.contains("target"));
        assert!(!tree.contains(".chainlink"));
        assert!(tree.contains("main.go"));
    }

    #[test]
    fn test_tree_caps_files_per_dir() {
        let dir = TempDir::new().unwrap();
        for i in 0..15 {
            fs::write(dir.path().join(format!("file{i:02}.txt")), "").unwrap();
        }

        let tree = project_tree(dir.path()).unwrap();
        assert!(tree.contains("... (5 more files)"));
    }

    #[test]
    fn test_cargo_dependencies() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            r#"
[package]
name = "x"

[dependencies]
serde = { version = "1.0", features = ["derive"] }
tracing = "0.1"
local-helper = { path = "../helper" }
"#,
        )
        .unwrap();

        let deps = dependency_snapshot(dir.path()).unwrap();
        assert!(deps.starts_with("Rust (Cargo.toml):"));
        assert!(deps.contains("serde = \"1.0\""));
        assert!(deps.contains("tracing = \"0.1\""));
        // Path-only dependencies carry no version and are omitted
        assert!(!deps.contains("local-helper"));
    }

    #[test]
    fn test_node_dependencies() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"react": "^18.0.0"}, "devDependencies": {"vitest": "^2.0.0"}}"#,
        )
        .unwrap();

        let deps = dependency_snapshot(dir.path()).unwrap();
        assert!(deps.starts_with("Node.js (package.json):"));
        assert!(deps.contains("react: ^18.0.0"));
        assert!(deps.contains("vitest: ^2.0.0"));
    }

    #[test]
    fn test_python_dependencies() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("requirements.txt"),
            "# pinned\nflask==3.0.0\n-r extra.txt\nrequests>=2.31\n",
        )
        .unwrap();

        let deps = dependency_snapshot(dir.path()).unwrap();
        assert!(deps.contains("flask==3.0.0"));
        assert!(deps.contains("requests>=2.31"));
        assert!(!deps.contains("extra.txt"));
    }

    #[test]
    fn test_go_dependencies() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("go.mod"),
            "module example.com/x\n\nrequire (\n\tgithub.com/pkg/errors v0.9.1\n)\n",
        )
        .unwrap();

        let deps = dependency_snapshot(dir.path()).unwrap();
        assert!(deps.starts_with("Go (go.mod):"));
        assert!(deps.contains("github.com/pkg/errors v0.9.1"));
    }

    #[test]
    fn test_first_ecosystem_wins() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            "[dependencies]\nserde = \"1.0\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"react": "18"}}"#,
        )
        .unwrap();

        let deps = dependency_snapshot(dir.path()).unwrap();
        assert!(deps.starts_with("Rust"));
        assert!(!deps.contains("react"));
    }

    #[test]
    fn test_no_dependencies() {
        let dir = TempDir::new().unwrap();
        assert!(dependency_snapshot(dir.path()).is_none());
    }
}
