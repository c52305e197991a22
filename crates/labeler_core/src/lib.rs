//! Path based pull request labelling.
//!
//! This crate decides which labels apply to a pull request by matching the
//! paths it changes against a table of `label -> glob patterns` rules, the
//! format used by `.github/labeler.yml`.
//!
//! ```rust
//! use labeler_core::{ChangeSet, LabelClassifier, RuleTable};
//!
//! let table = RuleTable::from_yaml_str(
//!     "Continuous Integration: [tox.ini]\nTesting: [tox.ini, '**/test*.py']\n",
//! )
//! .expect("valid rule file");
//! let classifier = LabelClassifier::new(&table).expect("valid patterns");
//!
//! let labels = classifier.classify(&ChangeSet::new(["tox.ini"]));
//! assert_eq!(
//!     labels.iter().collect::<Vec<_>>(),
//!     vec!["Continuous Integration", "Testing"]
//! );
//! ```

pub mod change_set;
pub mod classifier;
pub mod errors;
pub mod pattern;
pub mod plan;
pub mod rules;
pub mod validator;

pub use change_set::ChangeSet;
pub use classifier::{LabelAssignment, LabelClassifier, LabelMatch, MatchEvidence, MatchReport};
pub use errors::{
    ChangeSetError, ChangeSetResult, ConfigurationError, ConfigurationResult, LabelerError,
    LabelerResult, PatternError,
};
pub use pattern::PathPattern;
pub use plan::LabelPlan;
pub use rules::{MatchGroup, Rule, RuleTable, DEFAULT_RULES_PATH};
pub use validator::{
    RuleTableValidator, ValidationError, ValidationErrorType, ValidationResult, ValidationWarning,
};

/// Loads the rule file at `rules_path` and classifies `changes` in one step.
///
/// # Errors
///
/// Returns `LabelerError::Configuration` if the rule file cannot be read,
/// parsed or compiled.
pub fn classify_with_rule_file(
    rules_path: &std::path::Path,
    changes: &ChangeSet,
) -> LabelerResult<LabelAssignment> {
    let table = RuleTable::load(rules_path)?;
    let classifier = LabelClassifier::new(&table)?;
    Ok(classifier.classify(changes))
}
