//! Stub pattern detection.
//!
//! A fixed ordered table of pattern/label pairs is applied line by line,
//! case-insensitive. A line may match several patterns and every match is
//! reported, in table order. The one exception: a not-implemented signal
//! carrying a descriptive message literal is a documented deferral, not a
//! placeholder, and suppresses all findings on that line.

use std::path::Path;
use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use crate::util::clip;

/// One stub finding. Produced and consumed within a single invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintFinding {
    /// 1-based line number.
    pub line: usize,
    /// Pattern label, e.g. "TODO comment".
    pub kind: &'static str,
    /// Trimmed line content, clipped for display.
    pub excerpt: String,
}

/// Maximum excerpt length in characters.
const EXCERPT_LEN: usize = 60;

/// The pattern table, in report order.
const STUB_PATTERNS: &[(&str, &str)] = &[
    (r"\bTODO\b", "TODO comment"),
    (r"\bFIXME\b", "FIXME comment"),
    (r"\bXXX\b", "XXX marker"),
    (r"\bHACK\b", "HACK marker"),
    (r"^\s*pass\s*$", "bare pass statement"),
    (r"^\s*\.\.\.\s*$", "ellipsis placeholder"),
    (r"\bunimplemented!\s*\(\s*\)", "unimplemented!() macro"),
    (r"\btodo!\s*\(\s*\)", "todo!() macro"),
    (r#"\bpanic!\s*\(\s*"not implemented"#, "panic not implemented"),
    (
        r"raise\s+NotImplementedError\s*\(\s*\)",
        "bare NotImplementedError",
    ),
    (r"#\s*implement\s*(later|this|here)", "implement later comment"),
    (r"//\s*implement\s*(later|this|here)", "implement later comment"),
    (
        r"def\s+\w+\s*\([^)]*\)\s*:\s*(pass|\.\.\.)\s*$",
        "empty function",
    ),
    (r"fn\s+\w+\s*\([^)]*\)\s*\{\s*\}", "empty function body"),
    (r"return\s+None\s*#.*stub", "stub return"),
];

fn compiled_patterns() -> &'static Vec<(Regex, &'static str)> {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        STUB_PATTERNS
            .iter()
            .map(|(pattern, kind)| {
                let re = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .expect("valid stub pattern");
                (re, *kind)
            })
            .collect()
    })
}

/// Matches a not-implemented signal that carries a descriptive message.
fn documented_deferral_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"NotImplementedError\s*\(\s*["'][^"']+["']"#).expect("valid regex")
    })
}

/// Scan content for stub patterns.
pub fn scan_content(content: &str) -> Vec<LintFinding> {
    let mut findings = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let documented =
            line.contains("NotImplementedError") && documented_deferral_re().is_match(line);

        for &(ref re, kind) in compiled_patterns() {
            if re.is_match(line) {
                if documented {
                    continue;
                }
                findings.push(LintFinding {
                    line: idx + 1,
                    kind,
                    excerpt: clip(line.trim(), EXCERPT_LEN),
                });
            }
        }
    }

    findings
}

/// Scan a file for stub patterns. Unreadable files yield no findings.
pub fn scan_file(path: &Path) -> Vec<LintFinding> {
    match std::fs::read_to_string(path) {
        Ok(content) => scan_content(&content),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_comment_single_finding() {
        let findings = scan_content("fn main() { run(); }\n// TODO fix this later\n");

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 2);
        assert_eq!(findings[0].kind, "TODO comment");
        assert_eq!(findings[0].excerpt, "// TODO fix this later");
    }

    #[test]
    fn test_case_insensitive() {
        let findings = scan_content("// fixme: broken\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, "FIXME comment");
    }

    #[test]
    fn test_multiple_patterns_per_line_in_table_order() {
        let findings = scan_content("// TODO and FIXME both here\n");

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].kind, "TODO comment");
        assert_eq!(findings[1].kind, "FIXME comment");
    }

    #[test]
    fn test_rust_placeholder_macros() {
        let findings = scan_content("fn f() { unimplemented!() }\nfn g() { todo!() }\n");

        let kinds: Vec<&str> = findings.iter().map(|f| f.kind).collect();
        assert!(kinds.contains(&"unimplemented!() macro"));
        assert!(kinds.contains(&"todo!() macro"));
    }

    #[test]
    fn test_bare_pass_statement() {
        let findings = scan_content("def f():\n    pass\n");

        let kinds: Vec<&str> = findings.iter().map(|f| f.kind).collect();
        assert!(kinds.contains(&"bare pass statement"));
    }

    #[test]
    fn test_bare_not_implemented_flagged() {
        let findings = scan_content("raise NotImplementedError()\n");

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, "bare NotImplementedError");
    }

    #[test]
    fn test_documented_deferral_not_flagged() {
        let findings =
            scan_content("raise NotImplementedError(\"explain why: batching lands in v2\")\n");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_empty_rust_function_body() {
        let findings = scan_content("fn handler(x: u32) {}\n");

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, "empty function body");
    }

    #[test]
    fn test_clean_content_yields_nothing() {
        let findings = scan_content("fn main() {\n    println!(\"hello\");\n}\n");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_excerpt_is_clipped() {
        let long = format!("// TODO {}", "x".repeat(200));
        let findings = scan_content(&long);

        assert_eq!(findings[0].excerpt.chars().count(), EXCERPT_LEN);
    }

    #[test]
    fn test_line_numbers_are_one_based() {
        let findings = scan_content("a\nb\n# HACK quick patch\n");
        assert_eq!(findings[0].line, 3);
    }

    #[test]
    fn test_scan_file_missing() {
        let findings = scan_file(Path::new("/nonexistent/file.rs"));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_scan_file_reads_content() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lib.rs");
        std::fs::write(&path, "// XXX revisit\n").unwrap();

        let findings = scan_file(&path);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, "XXX marker");
    }
}
