//! Rule table validation.
//!
//! The validator inspects a [`RuleTable`] without compiling it into a
//! classifier, so that every problem can be reported in a single pass
//! instead of stopping at the first malformed pattern.
//!
//! # Examples
//!
//! ```rust
//! use labeler_core::{Rule, RuleTable, RuleTableValidator};
//!
//! let table = RuleTable::new(vec![
//!     Rule::new("Documentation", ["docs/**/*"]),
//!     Rule::new("Broken", ["src/[a"]),
//! ]);
//!
//! let result = RuleTableValidator::new().validate(&table);
//! assert!(!result.is_valid());
//! assert_eq!(result.errors.len(), 1);
//! ```

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use crate::pattern::PathPattern;
use crate::rules::{MatchGroup, RuleTable};

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

/// Result of rule table validation.
///
/// Validation is considered successful only if no errors are present.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    /// List of validation errors (blocking issues).
    pub errors: Vec<ValidationError>,
    /// List of validation warnings (non-blocking suggestions).
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// Individual validation error with context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The category of validation error.
    pub error_type: ValidationErrorType,
    /// Location of the offending pattern, e.g. `Documentation[1].any[0]`.
    pub field_path: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    pub suggestion: Option<String>,
}

/// Validation error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValidationErrorType {
    /// The glob syntax cannot be compiled.
    InvalidPattern,
    /// A pattern is an empty string (or a bare `!`).
    EmptyPattern,
}

impl fmt::Display for ValidationErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern => write!(f, "InvalidPattern"),
            Self::EmptyPattern => write!(f, "EmptyPattern"),
        }
    }
}

/// Non-blocking validation warning.
///
/// Warnings point at rules that load fine but will not behave the way the
/// maintainer probably intended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    pub field_path: String,
    pub message: String,
    pub recommendation: Option<String>,
}

/// Checks rule tables for malformed or suspicious patterns.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTableValidator;

impl RuleTableValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validates every rule, collecting all errors and warnings.
    pub fn validate(&self, table: &RuleTable) -> ValidationResult {
        let mut result = ValidationResult::new();
        let mut seen_labels = HashSet::new();

        for rule in table.rules() {
            if !seen_labels.insert(rule.label.as_str()) {
                result.add_warning(ValidationWarning {
                    field_path: rule.label.clone(),
                    message: format!("Label '{}' is defined more than once", rule.label),
                    recommendation: Some(
                        "Merge the pattern lists into a single entry".to_string(),
                    ),
                });
            }

            if rule.is_empty() {
                result.add_warning(ValidationWarning {
                    field_path: rule.label.clone(),
                    message: format!(
                        "Label '{}' has no patterns and will never be applied",
                        rule.label
                    ),
                    recommendation: Some("Add at least one glob pattern or remove the label".to_string()),
                });
            }

            for (group_index, group) in rule.groups.iter().enumerate() {
                let group_path = format!("{}[{}]", rule.label, group_index);
                self.validate_group(&group_path, group, &mut result);
            }
        }

        debug!(
            rule_count = table.len(),
            error_count = result.errors.len(),
            warning_count = result.warnings.len(),
            "Validated rule table"
        );
        result
    }

    fn validate_group(&self, group_path: &str, group: &MatchGroup, result: &mut ValidationResult) {
        if group.is_empty() {
            result.add_warning(ValidationWarning {
                field_path: group_path.to_string(),
                message: "Pattern group has neither 'any' nor 'all' patterns and never matches"
                    .to_string(),
                recommendation: Some("Remove the empty group".to_string()),
            });
            return;
        }

        let shorthand = matches!((&group.any, &group.all), (Some(any), None) if any.len() == 1);
        for (key, patterns) in [("any", &group.any), ("all", &group.all)] {
            for (index, pattern) in patterns.iter().flatten().enumerate() {
                let field_path = if shorthand {
                    group_path.to_string()
                } else {
                    format!("{}.{}[{}]", group_path, key, index)
                };
                self.validate_pattern(field_path, pattern, result);
            }
        }
    }

    fn validate_pattern(&self, field_path: String, pattern: &str, result: &mut ValidationResult) {
        let body = pattern.strip_prefix('!').unwrap_or(pattern);
        if body.is_empty() {
            result.add_error(ValidationError {
                error_type: ValidationErrorType::EmptyPattern,
                field_path,
                message: "Pattern is empty".to_string(),
                suggestion: Some("Remove the entry or provide a glob pattern".to_string()),
            });
            return;
        }

        if let Err(e) = PathPattern::new(pattern) {
            result.add_error(ValidationError {
                error_type: ValidationErrorType::InvalidPattern,
                field_path,
                message: format!("Invalid glob pattern '{}': {}", pattern, e.reason),
                suggestion: Some(
                    "Close every '[' with ']' and every '{' with '}', and escape literal metacharacters with '\\'"
                        .to_string(),
                ),
            });
            return;
        }

        if body.starts_with('/') || body.starts_with("./") {
            result.add_warning(ValidationWarning {
                field_path: field_path.clone(),
                message: format!(
                    "Pattern '{}' is anchored with '/' or './' and never matches repository-relative paths",
                    pattern
                ),
                recommendation: Some(format!(
                    "Use '{}' instead",
                    body.trim_start_matches("./").trim_start_matches('/')
                )),
            });
        }

        if body.contains('\\') {
            result.add_warning(ValidationWarning {
                field_path,
                message: format!(
                    "Pattern '{}' contains a backslash, which escapes the next character",
                    pattern
                ),
                recommendation: Some("Changed paths always use '/' as the separator".to_string()),
            });
        }
    }
}
