//! Label classification of change sets.
//!
//! The [`LabelClassifier`] compiles a [`RuleTable`] once and can then
//! classify any number of change sets. Compilation is where malformed glob
//! syntax is reported; classification itself cannot fail.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::change_set::ChangeSet;
use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::pattern::PathPattern;
use crate::rules::{MatchGroup, RuleTable};

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;

/// The labels that apply to a change set.
///
/// Labels are idempotent to reapply, so this is a set. Iteration order is
/// sorted, which keeps output stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelAssignment {
    labels: BTreeSet<String>,
}

impl LabelAssignment {
    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.labels.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for LabelAssignment {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            labels: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Why a single pattern group was satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchEvidence {
    /// The group as written, e.g. `docs/**/*` or `any: [src/**/*, !**/*.md]`.
    pub pattern: String,
    /// Changed paths that satisfied the group.
    pub paths: Vec<String>,
}

/// All evidence for one produced label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelMatch {
    pub label: String,
    pub evidence: Vec<MatchEvidence>,
}

/// Per label explanation of a classification, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub matches: Vec<LabelMatch>,
}

impl MatchReport {
    pub fn label_match(&self, label: &str) -> Option<&LabelMatch> {
        self.matches.iter().find(|m| m.label == label)
    }

    pub fn assignment(&self) -> LabelAssignment {
        self.matches.iter().map(|m| m.label.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

#[derive(Debug, Clone)]
struct CompiledGroup {
    description: String,
    any: Vec<PathPattern>,
    all: Vec<PathPattern>,
}

impl CompiledGroup {
    fn compile(label: &str, group: &MatchGroup) -> ConfigurationResult<Self> {
        Ok(Self {
            description: describe_group(group),
            any: compile_patterns(label, group.any.as_deref())?,
            all: compile_patterns(label, group.all.as_deref())?,
        })
    }

    /// Returns the paths that satisfy the group, or `None` if it is not satisfied.
    fn evaluate<'a>(&self, paths: &'a [String]) -> Option<Vec<&'a str>> {
        if paths.is_empty() || (self.any.is_empty() && self.all.is_empty()) {
            return None;
        }

        if !self.all.is_empty() && !paths.iter().all(|path| matches_every(&self.all, path)) {
            return None;
        }

        if self.any.is_empty() {
            return Some(paths.iter().map(String::as_str).collect());
        }

        let hits: Vec<&str> = paths
            .iter()
            .filter(|path| matches_every(&self.any, path))
            .map(String::as_str)
            .collect();
        if hits.is_empty() {
            None
        } else {
            Some(hits)
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    label: String,
    groups: Vec<CompiledGroup>,
}

/// Matches change sets against a compiled rule table.
///
/// # Examples
///
/// ```rust
/// use labeler_core::{ChangeSet, LabelClassifier, Rule, RuleTable};
///
/// let table = RuleTable::new(vec![Rule::new("Documentation", ["docs/**/*"])]);
/// let classifier = LabelClassifier::new(&table).expect("valid patterns");
///
/// let labels = classifier.classify(&ChangeSet::new(["docs/api/foo.rst"]));
/// assert!(labels.contains("Documentation"));
/// ```
#[derive(Debug, Clone)]
pub struct LabelClassifier {
    rules: Vec<CompiledRule>,
}

impl LabelClassifier {
    /// Compiles every pattern in the table.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidPattern` for the first pattern
    /// with malformed glob syntax or an empty pattern string.
    pub fn new(table: &RuleTable) -> ConfigurationResult<Self> {
        let mut rules = Vec::with_capacity(table.len());
        for rule in table.rules() {
            let groups = rule
                .groups
                .iter()
                .map(|group| CompiledGroup::compile(&rule.label, group))
                .collect::<ConfigurationResult<Vec<_>>>()?;
            rules.push(CompiledRule {
                label: rule.label.clone(),
                groups,
            });
        }

        debug!(rule_count = rules.len(), "Compiled rule table");
        Ok(Self { rules })
    }

    /// Computes the labels whose rules are satisfied by the change set.
    pub fn classify(&self, changes: &ChangeSet) -> LabelAssignment {
        self.explain(changes).assignment()
    }

    /// Like [`LabelClassifier::classify`], but records which paths satisfied
    /// which pattern groups.
    pub fn explain(&self, changes: &ChangeSet) -> MatchReport {
        let mut report = MatchReport::default();
        if changes.is_empty() {
            debug!("Change set is empty, no labels apply");
            return report;
        }

        for rule in &self.rules {
            let evidence: Vec<MatchEvidence> = rule
                .groups
                .iter()
                .filter_map(|group| {
                    group.evaluate(changes.paths()).map(|paths| MatchEvidence {
                        pattern: group.description.clone(),
                        paths: paths.into_iter().map(str::to_string).collect(),
                    })
                })
                .collect();

            if evidence.is_empty() {
                debug!(label = %rule.label, "Rule not satisfied");
                continue;
            }

            debug!(
                label = %rule.label,
                group_count = evidence.len(),
                "Rule satisfied"
            );
            match report.matches.iter_mut().find(|m| m.label == rule.label) {
                Some(existing) => existing.evidence.extend(evidence),
                None => report.matches.push(LabelMatch {
                    label: rule.label.clone(),
                    evidence,
                }),
            }
        }

        info!(
            path_count = changes.len(),
            label_count = report.matches.len(),
            "Classified change set"
        );
        report
    }

    /// Labels configured in the compiled table, in rule order.
    pub fn configured_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            if !labels.contains(&rule.label.as_str()) {
                labels.push(&rule.label);
            }
        }
        labels
    }
}

fn compile_patterns(label: &str, patterns: Option<&[String]>) -> ConfigurationResult<Vec<PathPattern>> {
    patterns
        .unwrap_or_default()
        .iter()
        .map(|pattern| {
            PathPattern::new(pattern).map_err(|e| ConfigurationError::InvalidPattern {
                label: label.to_string(),
                pattern: pattern.clone(),
                reason: e.reason,
            })
        })
        .collect()
}

fn matches_every(patterns: &[PathPattern], path: &str) -> bool {
    patterns.iter().all(|pattern| pattern.matches(path))
}

fn describe_group(group: &MatchGroup) -> String {
    match (&group.any, &group.all) {
        (Some(any), None) if any.len() == 1 => any[0].clone(),
        (any, all) => {
            let mut parts = Vec::new();
            if let Some(any) = any {
                parts.push(format!("any: [{}]", any.join(", ")));
            }
            if let Some(all) = all {
                parts.push(format!("all: [{}]", all.join(", ")));
            }
            parts.join(" ")
        }
    }
}
