//! Rule table model and the labeler mapping-file loader.
//!
//! A rule file is a YAML mapping from label name to glob patterns:
//!
//! ```yaml
//! Documentation:
//!   - docs/**/*
//!   - "*.rst"
//!
//! plasmapy.particles: plasmapy/particles/**/*
//!
//! Testing:
//!   - any: ["**/test*.py", "!docs/**/*"]
//!
//! Docs only:
//!   - all: ["docs/**/*"]
//! ```
//!
//! A plain string entry is shorthand for `{ any: [pattern] }`.

use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::errors::{ConfigurationError, ConfigurationResult};

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;

/// Default location of the rule file, relative to the repository root.
pub const DEFAULT_RULES_PATH: &str = ".github/labeler.yml";

/// A combination of patterns evaluated against the change set.
///
/// - `any`: satisfied when at least one changed path matches every pattern in the list.
/// - `all`: satisfied when every changed path matches every pattern in the list.
///
/// When both are present both must be satisfied. A group without any
/// patterns is never satisfied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchGroup {
    pub any: Option<Vec<String>>,
    pub all: Option<Vec<String>>,
}

impl MatchGroup {
    /// A group holding a single pattern, the shape of a plain list entry.
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            any: Some(vec![pattern.into()]),
            all: None,
        }
    }

    pub fn any_of<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            any: Some(patterns.into_iter().map(Into::into).collect()),
            all: None,
        }
    }

    pub fn all_of<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            any: None,
            all: Some(patterns.into_iter().map(Into::into).collect()),
        }
    }

    /// Iterates over every pattern in the group, `any` patterns first.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.any
            .iter()
            .chain(self.all.iter())
            .flatten()
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns().next().is_none()
    }
}

/// A label and the pattern groups that select it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub label: String,
    pub groups: Vec<MatchGroup>,
}

impl Rule {
    /// Creates a rule from a plain list of patterns, each of which is
    /// sufficient on its own.
    pub fn new<I, S>(label: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            groups: patterns.into_iter().map(MatchGroup::pattern).collect(),
        }
    }

    pub fn with_groups(label: impl Into<String>, groups: Vec<MatchGroup>) -> Self {
        Self {
            label: label.into(),
            groups,
        }
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().flat_map(MatchGroup::patterns)
    }

    /// True when the rule has no patterns and therefore can never produce its label.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(MatchGroup::is_empty)
    }
}

/// Ordered list of labelling rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Loads the rule table from a YAML file.
    ///
    /// A missing file is not an error: it yields an empty table, which in
    /// turn never produces any labels.
    ///
    /// # Errors
    ///
    /// * `ConfigurationError::FileAccessError` - the file exists but cannot be read
    /// * `ConfigurationError::ParseError` - the file is not valid YAML or not a mapping
    /// * `ConfigurationError::InvalidRule` - a label's value has the wrong shape
    pub fn load(path: &Path) -> ConfigurationResult<Self> {
        debug!(path = %path.display(), "Loading rule table");

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    path = %path.display(),
                    "Rule file not found, no labels will be applied"
                );
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigurationError::FileAccessError {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };

        let table = Self::from_yaml_str(&content)?;
        info!(
            path = %path.display(),
            rule_count = table.len(),
            "Loaded rule table"
        );
        Ok(table)
    }

    /// Parses a rule table from YAML text.
    pub fn from_yaml_str(content: &str) -> ConfigurationResult<Self> {
        let blank = content.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if blank {
            return Ok(Self::default());
        }

        let document: Value =
            serde_yaml::from_str(content).map_err(|e| ConfigurationError::ParseError {
                reason: e.to_string(),
            })?;

        let mapping = match document {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mapping) => mapping,
            _ => {
                return Err(ConfigurationError::ParseError {
                    reason: "rule file must be a mapping of label names to glob patterns"
                        .to_string(),
                })
            }
        };

        let mut rules = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let label = label_from_key(&key)?;
            let groups = groups_from_value(&label, value)?;
            rules.push(Rule { label, groups });
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Configured labels in rule order. Duplicates are reported once.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            if !labels.contains(&rule.label.as_str()) {
                labels.push(&rule.label);
            }
        }
        labels
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.rules.iter().any(|rule| rule.label == label)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<Rule> for RuleTable {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRule {
    Single(String),
    Entries(Vec<RawEntry>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Pattern(String),
    Group(RawGroup),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGroup {
    #[serde(default)]
    any: Option<OneOrMany>,
    #[serde(default)]
    all: Option<OneOrMany>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(pattern) => vec![pattern],
            OneOrMany::Many(patterns) => patterns,
        }
    }
}

fn label_from_key(key: &Value) -> ConfigurationResult<String> {
    match key {
        Value::String(label) => Ok(label.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(ConfigurationError::ParseError {
            reason: format!("label names must be scalars, found {:?}", other),
        }),
    }
}

fn groups_from_value(label: &str, value: Value) -> ConfigurationResult<Vec<MatchGroup>> {
    if value.is_null() {
        return Ok(Vec::new());
    }

    let raw: RawRule =
        serde_yaml::from_value(value).map_err(|_| ConfigurationError::InvalidRule {
            label: label.to_string(),
            reason: "expected a glob pattern, or a list of glob patterns and any/all groups"
                .to_string(),
        })?;

    let groups = match raw {
        RawRule::Single(pattern) => vec![MatchGroup::pattern(pattern)],
        RawRule::Entries(entries) => entries
            .into_iter()
            .map(|entry| match entry {
                RawEntry::Pattern(pattern) => MatchGroup::pattern(pattern),
                RawEntry::Group(group) => MatchGroup {
                    any: group.any.map(Into::into),
                    all: group.all.map(Into::into),
                },
            })
            .collect(),
    };

    Ok(groups)
}
