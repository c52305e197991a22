//! Tests for the rule table model and loader.

use super::*;
use std::fs;
use tempfile::TempDir;
use tracing_test::traced_test;

// ============================================================================
// Model Tests
// ============================================================================

#[test]
fn test_rule_new_creates_one_group_per_pattern() {
    let rule = Rule::new("Documentation", ["docs/**/*", "*.rst"]);

    assert_eq!(rule.label, "Documentation");
    assert_eq!(rule.groups.len(), 2);
    assert_eq!(rule.groups[0], MatchGroup::pattern("docs/**/*"));
    assert_eq!(
        rule.patterns().collect::<Vec<_>>(),
        vec!["docs/**/*", "*.rst"]
    );
}

#[test]
fn test_rule_without_patterns_is_empty() {
    let rule = Rule::new("Unused", Vec::<String>::new());
    assert!(rule.is_empty());

    let rule = Rule::with_groups("Unused", vec![MatchGroup::default()]);
    assert!(rule.is_empty());

    let rule = Rule::with_groups("Unused", vec![MatchGroup::any_of(Vec::<String>::new())]);
    assert!(rule.is_empty());
}

#[test]
fn test_match_group_patterns_lists_any_before_all() {
    let group = MatchGroup {
        any: Some(vec!["src/**/*".to_string()]),
        all: Some(vec!["!**/*.md".to_string()]),
    };

    assert_eq!(group.patterns().collect::<Vec<_>>(), vec!["src/**/*", "!**/*.md"]);
    assert!(!group.is_empty());
}

#[test]
fn test_rule_table_labels_are_deduplicated_in_order() {
    let table = RuleTable::new(vec![
        Rule::new("Testing", ["**/test*.py"]),
        Rule::new("Documentation", ["docs/**/*"]),
        Rule::new("Testing", ["tox.ini"]),
    ]);

    assert_eq!(table.len(), 3);
    assert_eq!(table.labels(), vec!["Testing", "Documentation"]);
    assert!(table.contains_label("Documentation"));
    assert!(!table.contains_label("Packaging"));
}

// ============================================================================
// YAML Parsing Tests
// ============================================================================

#[test]
fn test_from_yaml_str_parses_plain_lists() {
    let yaml = r#"
Documentation:
  - docs/**/*
  - "*.rst"
Continuous Integration:
  - tox.ini
  - .github/**/*
"#;

    let table = RuleTable::from_yaml_str(yaml).expect("Failed to parse");

    assert_eq!(table.len(), 2);
    assert_eq!(table.rules()[0], Rule::new("Documentation", ["docs/**/*", "*.rst"]));
    assert_eq!(
        table.rules()[1],
        Rule::new("Continuous Integration", ["tox.ini", ".github/**/*"])
    );
}

#[test]
fn test_from_yaml_str_preserves_rule_order() {
    let yaml = r#"
zeta: ["z/**/*"]
alpha: ["a/**/*"]
mid: ["m/**/*"]
"#;

    let table = RuleTable::from_yaml_str(yaml).expect("Failed to parse");
    assert_eq!(table.labels(), vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_from_yaml_str_accepts_single_string_value() {
    let table = RuleTable::from_yaml_str("plasmapy.particles: plasmapy/particles/**/*\n")
        .expect("Failed to parse");

    assert_eq!(
        table.rules()[0],
        Rule::new("plasmapy.particles", ["plasmapy/particles/**/*"])
    );
}

#[test]
fn test_from_yaml_str_parses_any_and_all_groups() {
    let yaml = r#"
Testing:
  - any: ["**/test*.py", "!docs/**/*"]
Docs only:
  - all: docs/**/*
Mixed:
  - setup.cfg
  - any: src/**/*
    all: ["!**/*.md"]
"#;

    let table = RuleTable::from_yaml_str(yaml).expect("Failed to parse");

    assert_eq!(
        table.rules()[0].groups,
        vec![MatchGroup::any_of(["**/test*.py", "!docs/**/*"])]
    );
    assert_eq!(table.rules()[1].groups, vec![MatchGroup::all_of(["docs/**/*"])]);
    assert_eq!(
        table.rules()[2].groups,
        vec![
            MatchGroup::pattern("setup.cfg"),
            MatchGroup {
                any: Some(vec!["src/**/*".to_string()]),
                all: Some(vec!["!**/*.md".to_string()]),
            },
        ]
    );
}

#[test]
fn test_from_yaml_str_converts_numeric_labels() {
    let table = RuleTable::from_yaml_str("1.0:\n  - changelog/**/*\n").expect("Failed to parse");
    assert_eq!(table.labels(), vec!["1.0"]);
}

#[test]
fn test_from_yaml_str_null_value_gives_empty_rule() {
    let table = RuleTable::from_yaml_str("Someday:\n").expect("Failed to parse");

    assert_eq!(table.len(), 1);
    assert!(table.rules()[0].is_empty());
}

#[test]
fn test_from_yaml_str_empty_document_gives_empty_table() {
    assert!(RuleTable::from_yaml_str("").unwrap().is_empty());
    assert!(RuleTable::from_yaml_str("   \n\n").unwrap().is_empty());
    assert!(RuleTable::from_yaml_str("# no rules yet\n").unwrap().is_empty());
}

#[test]
fn test_from_yaml_str_rejects_non_mapping_document() {
    let result = RuleTable::from_yaml_str("- docs/**/*\n- tox.ini\n");

    match result {
        Err(ConfigurationError::ParseError { reason }) => {
            assert!(reason.contains("mapping of label names"));
        }
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_from_yaml_str_rejects_invalid_yaml() {
    let result = RuleTable::from_yaml_str("Documentation: [docs/**/*\n");
    assert!(matches!(result, Err(ConfigurationError::ParseError { .. })));
}

#[test]
fn test_from_yaml_str_rejects_unknown_group_keys() {
    let result = RuleTable::from_yaml_str("Testing:\n  - some: ['**/test*.py']\n");

    match result {
        Err(ConfigurationError::InvalidRule { label, .. }) => assert_eq!(label, "Testing"),
        other => panic!("Expected InvalidRule, got {:?}", other),
    }
}

#[test]
fn test_from_yaml_str_rejects_non_string_patterns() {
    let result = RuleTable::from_yaml_str("Numbers:\n  - nested:\n      deeper: [1, 2]\n");
    assert!(matches!(
        result,
        Err(ConfigurationError::InvalidRule { ref label, .. }) if label == "Numbers"
    ));
}

// ============================================================================
// File Loading Tests
// ============================================================================

#[test]
fn test_load_reads_rule_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("labeler.yml");
    fs::write(&path, "Documentation:\n  - docs/**/*\n").expect("Failed to write rules");

    let table = RuleTable::load(&path).expect("Failed to load");

    assert_eq!(table.rules(), &[Rule::new("Documentation", ["docs/**/*"])]);
}

#[test]
#[traced_test]
fn test_load_missing_file_gives_empty_table() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("missing.yml");

    let table = RuleTable::load(&path).expect("Missing file should not be fatal");
    assert!(table.is_empty());
    assert!(logs_contain("Rule file not found"));
}

#[test]
fn test_load_directory_is_access_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let result = RuleTable::load(temp_dir.path());
    assert!(matches!(
        result,
        Err(ConfigurationError::FileAccessError { .. })
    ));
}
