use std::io;

use labeler_core::{ChangeSetError, ConfigurationError, LabelerError};
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the path-labeler CLI application.
///
/// Every variant maps to a process exit code through [`Error::exit_code`]:
/// configuration and validation problems exit with `1`, bad arguments and
/// I/O failures exit with `2`.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error occurred while loading or parsing the CLI settings file.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line arguments were provided.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Failed to read an input file.
    #[error("Failed to load file '{path}': {source}")]
    LoadFile {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Loading the rule table, compiling it, or collecting changed paths failed.
    #[error(transparent)]
    Labeler(#[from] LabelerError),

    /// The rule table loaded but failed validation.
    #[error("Rule validation failed with {error_count} error(s)")]
    ValidationFailed { error_count: usize },

    /// Failed to render command output.
    #[error("Failed to format output: {0}")]
    Output(String),
}

impl From<ConfigurationError> for Error {
    fn from(error: ConfigurationError) -> Self {
        Error::Labeler(error.into())
    }
}

impl From<ChangeSetError> for Error {
    fn from(error: ChangeSetError) -> Self {
        Error::Labeler(error.into())
    }
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) | Error::ValidationFailed { .. } => 1,
            Error::Labeler(LabelerError::Configuration(_)) => 1,
            Error::Labeler(LabelerError::ChangeSet(_)) => 2,
            Error::InvalidArguments(_) | Error::LoadFile { .. } | Error::Output(_) => 2,
        }
    }
}
