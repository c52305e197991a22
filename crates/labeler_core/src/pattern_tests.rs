//! Tests for glob pattern matching.

use super::*;

fn matches(pattern: &str, path: &str) -> bool {
    PathPattern::new(pattern)
        .expect("pattern should compile")
        .matches(path)
}

#[test]
fn test_literal_pattern_matches_exactly() {
    assert!(matches("tox.ini", "tox.ini"));
    assert!(!matches("tox.ini", "docs/tox.ini"));
    assert!(!matches("tox.ini", "tox.ini.bak"));
}

#[test]
fn test_matching_is_case_sensitive() {
    assert!(matches("README.md", "README.md"));
    assert!(!matches("README.md", "readme.md"));
}

#[test]
fn test_single_star_stays_within_segment() {
    assert!(matches("*.py", "setup.py"));
    assert!(!matches("*.py", "plasmapy/setup.py"));
    assert!(matches("docs/*.rst", "docs/index.rst"));
    assert!(!matches("docs/*.rst", "docs/api/index.rst"));
}

#[test]
fn test_double_star_crosses_segments() {
    assert!(matches("docs/**/*", "docs/api/foo.rst"));
    assert!(matches("docs/**/*", "docs/foo.rst"));
    assert!(matches("docs/**/*", "docs/a/b/c/d.txt"));
    assert!(!matches("docs/**/*", "changelog/docs.rst"));
}

#[test]
fn test_leading_double_star_matches_root_files() {
    assert!(matches("**/test*.py", "test_ion.py"));
    assert!(matches("**/test*.py", "plasmapy/particles/tests/test_ion.py"));
    assert!(!matches("**/test*.py", "plasmapy/particles/ion.py"));
}

#[test]
fn test_wildcards_match_dot_files() {
    assert!(matches(".github/**/*", ".github/workflows/ci.yml"));
    assert!(matches("**/*.yml", ".github/workflows/ci.yml"));
    assert!(matches("*", ".pre-commit-config.yaml"));
}

#[test]
fn test_question_mark_and_character_class() {
    assert!(matches("changelog/?.rst", "changelog/1.rst"));
    assert!(!matches("changelog/?.rst", "changelog/12.rst"));
    assert!(matches("requirements/[a-c]*.txt", "requirements/build.txt"));
    assert!(!matches("requirements/[a-c]*.txt", "requirements/tests.txt"));
}

#[test]
fn test_negated_pattern_inverts_match() {
    let pattern = PathPattern::new("!docs/**/*").unwrap();
    assert!(pattern.is_negated());
    assert!(!pattern.matches("docs/index.rst"));
    assert!(pattern.matches("plasmapy/__init__.py"));
    assert_eq!(pattern.as_str(), "!docs/**/*");
}

#[test]
fn test_brace_alternation_matches_either_branch() {
    assert!(matches("**/*.{yml,yaml}", "ci.yml"));
    assert!(matches("**/*.{yml,yaml}", ".github/workflows/x.yaml"));
    assert!(!matches("**/*.{yml,yaml}", "ci.json"));
    assert!(matches("{docs,changelog}/**/*", "changelog/1234.bugfix.rst"));
    assert!(!matches("{docs,changelog}/**/*", "plasmapy/docs/index.rst"));
}

#[test]
fn test_negated_brace_alternation() {
    let pattern = PathPattern::new("!**/*.{md,rst}").unwrap();
    assert!(!pattern.matches("docs/index.rst"));
    assert!(!pattern.matches("README.md"));
    assert!(pattern.matches("setup.py"));
}

#[test]
fn test_partial_segment_double_star_acts_as_single_star() {
    assert!(matches("docs/**.rst", "docs/index.rst"));
    assert!(!matches("docs/**.rst", "docs/api/index.rst"));
    assert!(matches("a**", "abc"));
    assert!(!matches("a**", "a/b"));
    assert!(matches("**a", "data"));
    assert!(matches("src/**foo/*", "src/barfoo/lib.rs"));
    assert!(!matches("src/**foo/*", "src/x/barfoo/lib.rs"));
}

#[test]
fn test_triple_star_segment_acts_as_double_star() {
    assert!(matches("***", "a/b/c"));
    assert!(matches("docs/***/*", "docs/api/foo.rst"));
}

#[test]
fn test_backslash_escapes_metacharacters() {
    assert!(matches("docs/\\*.rst", "docs/*.rst"));
    assert!(!matches("docs/\\*.rst", "docs/index.rst"));
}

#[test]
fn test_normalize_recursive_wildcards() {
    assert_eq!(normalize_recursive_wildcards("docs/**/*"), "docs/**/*");
    assert_eq!(normalize_recursive_wildcards("**"), "**");
    assert_eq!(normalize_recursive_wildcards("docs/**.rst"), "docs/*.rst");
    assert_eq!(normalize_recursive_wildcards("a***b"), "a*b");
    assert_eq!(normalize_recursive_wildcards("{**,docs}/x"), "{**,docs}/x");
    assert_eq!(normalize_recursive_wildcards("[**]a**"), "[**]a*");
    assert_eq!(normalize_recursive_wildcards("\\**a"), "\\**a");
}

#[test]
fn test_malformed_patterns_are_rejected() {
    assert!(PathPattern::new("docs/[abc").is_err());
    assert!(PathPattern::new("**/*.{yml,yaml").is_err());
    assert!(PathPattern::new("docs\\").is_err());
}

#[test]
fn test_empty_patterns_are_rejected() {
    let error = PathPattern::new("").unwrap_err();
    assert_eq!(error.reason, "pattern is empty");

    let error = PathPattern::new("!").unwrap_err();
    assert_eq!(error.reason, "pattern is empty");
}

#[test]
fn test_display_uses_source_text() {
    let pattern = PathPattern::new("plasmapy/particles/**/*").unwrap();
    assert_eq!(pattern.to_string(), "plasmapy/particles/**/*");
}
