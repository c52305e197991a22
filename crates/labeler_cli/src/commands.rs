//! Command modules for the path-labeler CLI.
//!
//! - `classify_cmd`: compute the labels for a change set, optionally with a sync plan
//! - `validate_cmd`: check a rule file for malformed and suspicious patterns
//! - `config_cmd`: create and inspect the CLI settings file

pub mod classify_cmd;
pub mod config_cmd;
pub mod validate_cmd;

use crate::config::AppConfig;
use crate::errors::Error;

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

/// Output formats shared by all commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Coloured, human readable output.
    Pretty,
    Json,
    /// One item per line, for shell pipelines.
    Plain,
}

impl OutputFormat {
    /// Picks the format requested on the command line, falling back to the
    /// configured default.
    pub fn resolve(requested: Option<&str>, config: &AppConfig) -> Result<Self, Error> {
        let name = requested.unwrap_or(&config.output.format);
        match name {
            "pretty" => Ok(OutputFormat::Pretty),
            "json" => Ok(OutputFormat::Json),
            "plain" => Ok(OutputFormat::Plain),
            _ => Err(Error::InvalidArguments(format!(
                "Invalid format: '{}'. Use 'pretty', 'json' or 'plain'.",
                name
            ))),
        }
    }
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String, Error> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::Output(format!("Failed to serialize to JSON: {}", e)))
}
