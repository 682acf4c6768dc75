//! Project language detection.
//!
//! One static table drives everything: each entry names a language, its
//! rule file, its source extensions, and its manifest files. Detection
//! probes manifests first (more reliable than scanning), then falls back to
//! extension scanning of the working directory and `src/` directories.

use std::collections::HashSet;
use std::path::Path;

/// Substituted when no language can be detected, so advisory templates
/// never produce an empty subject.
pub const LANGUAGE_FALLBACK: &str = "this project";

/// A recognized language and how to detect it.
#[derive(Debug, PartialEq, Eq)]
pub struct LanguageSpec {
    /// Display name used in advisory text.
    pub name: &'static str,
    /// Rule file name under `.chainlink/rules/`.
    pub rule_file: &'static str,
    /// Source file extensions (with leading dot).
    pub extensions: &'static [&'static str],
    /// Manifest files whose presence indicates the language.
    pub manifests: &'static [&'static str],
}

/// The recognition table, in display order.
pub const LANGUAGES: &[LanguageSpec] = &[
    LanguageSpec {
        name: "Rust",
        rule_file: "rust.md",
        extensions: &[".rs"],
        manifests: &["Cargo.toml"],
    },
    LanguageSpec {
        name: "Python",
        rule_file: "python.md",
        extensions: &[".py"],
        manifests: &["pyproject.toml", "requirements.txt"],
    },
    LanguageSpec {
        name: "JavaScript",
        rule_file: "javascript.md",
        extensions: &[".js"],
        manifests: &["package.json"],
    },
    LanguageSpec {
        name: "TypeScript",
        rule_file: "typescript.md",
        extensions: &[".ts"],
        manifests: &["tsconfig.json"],
    },
    LanguageSpec {
        name: "TypeScript/React",
        rule_file: "typescript-react.md",
        extensions: &[".tsx"],
        manifests: &[],
    },
    LanguageSpec {
        name: "JavaScript/React",
        rule_file: "javascript-react.md",
        extensions: &[".jsx"],
        manifests: &[],
    },
    LanguageSpec {
        name: "Go",
        rule_file: "go.md",
        extensions: &[".go"],
        manifests: &["go.mod"],
    },
    LanguageSpec {
        name: "Java",
        rule_file: "java.md",
        extensions: &[".java"],
        manifests: &["pom.xml", "build.gradle"],
    },
    LanguageSpec {
        name: "C",
        rule_file: "c.md",
        extensions: &[".c"],
        manifests: &[],
    },
    LanguageSpec {
        name: "C++",
        rule_file: "cpp.md",
        extensions: &[".cpp"],
        manifests: &[],
    },
    LanguageSpec {
        name: "C#",
        rule_file: "csharp.md",
        extensions: &[".cs"],
        manifests: &[],
    },
    LanguageSpec {
        name: "Ruby",
        rule_file: "ruby.md",
        extensions: &[".rb"],
        manifests: &["Gemfile"],
    },
    LanguageSpec {
        name: "PHP",
        rule_file: "php.md",
        extensions: &[".php"],
        manifests: &["composer.json"],
    },
    LanguageSpec {
        name: "Swift",
        rule_file: "swift.md",
        extensions: &[".swift"],
        manifests: &["Package.swift"],
    },
    LanguageSpec {
        name: "Kotlin",
        rule_file: "kotlin.md",
        extensions: &[".kt"],
        manifests: &[],
    },
    LanguageSpec {
        name: "Zig",
        rule_file: "zig.md",
        extensions: &[".zig"],
        manifests: &[],
    },
];

/// Detect the languages active in a project.
///
/// Probes manifests in the working directory and its immediate non-hidden
/// subdirectories, then scans file extensions in the working directory and
/// any `src/` directories found at those levels. Results keep table order.
pub fn detect_languages(cwd: &Path) -> Vec<&'static LanguageSpec> {
    let mut found: HashSet<&'static str> = HashSet::new();

    let mut check_dirs = vec![cwd.to_path_buf()];
    if let Ok(entries) = std::fs::read_dir(cwd) {
        for entry in entries.flatten() {
            let path = entry.path();
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if path.is_dir() && !hidden {
                check_dirs.push(path);
            }
        }
    }

    // Manifest probes
    for dir in &check_dirs {
        for spec in LANGUAGES {
            if spec.manifests.iter().any(|m| dir.join(m).exists()) {
                found.insert(spec.name);
            }
        }
    }

    // Extension scan of check dirs and their src/ subdirectories
    let mut scan_dirs = check_dirs.clone();
    for dir in &check_dirs {
        let src = dir.join("src");
        if src.is_dir() {
            scan_dirs.push(src);
        }
    }

    for dir in &scan_dirs {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            for spec in LANGUAGES {
                if spec.extensions.iter().any(|ext| name.ends_with(ext)) {
                    found.insert(spec.name);
                }
            }
        }
    }

    LANGUAGES
        .iter()
        .filter(|spec| found.contains(spec.name))
        .collect()
}

/// Render a detected-language list for advisory text.
pub fn language_list(languages: &[&LanguageSpec]) -> String {
    if languages.is_empty() {
        LANGUAGE_FALLBACK.to_string()
    } else {
        languages
            .iter()
            .map(|spec| spec.name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
