//! Error types for rule loading, change-set acquisition and classification.
//!
//! Configuration problems (unreadable or malformed rule files, bad glob
//! syntax) are reported through [`ConfigurationError`]. Problems obtaining
//! the list of changed paths are reported through [`ChangeSetError`].
//! [`LabelerError`] unifies both for callers that drive a whole run.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Rule table configuration errors.
///
/// These errors are surfaced to the repository maintainer. None of them is
/// recoverable at runtime: a rule table that fails to load or compile is
/// never partially applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Failed to access rule file: {path} - {reason}")]
    FileAccessError { path: String, reason: String },

    #[error("Failed to parse rule file: {reason}")]
    ParseError { reason: String },

    #[error("Invalid rule for label '{label}': {reason}")]
    InvalidRule { label: String, reason: String },

    #[error("Invalid glob pattern '{pattern}' for label '{label}': {reason}")]
    InvalidPattern {
        label: String,
        pattern: String,
        reason: String,
    },
}

/// A glob pattern that cannot be compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct PatternError {
    pub reason: String,
}

/// Errors raised while collecting the paths changed by a pull request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChangeSetError {
    #[error("Failed to read changed paths from {source_name}: {reason}")]
    ReadFailed { source_name: String, reason: String },

    #[error("Failed to open git repository at {path}: {reason}")]
    RepositoryNotFound { path: String, reason: String },

    #[error("Failed to resolve git revision '{revision}': {reason}")]
    RevisionNotFound { revision: String, reason: String },

    #[error("Failed to compute git diff: {reason}")]
    DiffFailed { reason: String },
}

/// Top level error for a classification run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelerError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    ChangeSet(#[from] ChangeSetError),
}

/// Result type alias for configuration operations.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;

/// Result type alias for change-set operations.
pub type ChangeSetResult<T> = Result<T, ChangeSetError>;

/// Result type alias for a full classification run.
pub type LabelerResult<T> = Result<T, LabelerError>;
