//! Rule file validation command.
//!
//! Loads a rule file and reports every malformed or suspicious pattern in
//! one pass. The command fails when any error is found;
//! warnings are printed but do not change the exit code.

use std::path::Path;

use clap::Args;
use colored::Colorize;
use labeler_core::{RuleTable, RuleTableValidator, ValidationResult};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::commands::{to_json, OutputFormat};
use crate::config::AppConfig;
use crate::errors::Error;

#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Rule file [default: the configured rules_file]
    #[arg(long, value_name = "FILE")]
    pub rules: Option<String>,

    /// Output format: pretty, json or plain
    #[arg(long)]
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
struct ValidationOutput<'a> {
    rules_file: &'a str,
    valid: bool,
    #[serde(flatten)]
    result: &'a ValidationResult,
}

/// Executes the validate command.
///
/// # Errors
///
/// Returns `Error::ValidationFailed` when the rule file contains errors, after
/// the report has been printed.
#[instrument(skip(config))]
pub fn execute(args: &ValidateArgs, config: &AppConfig) -> Result<(), Error> {
    let (output, result) = run_validate(args, config)?;
    println!("{}", output);

    if result.is_valid() {
        Ok(())
    } else {
        Err(Error::ValidationFailed {
            error_count: result.errors.len(),
        })
    }
}

/// Validates the rule file and renders the report.
pub fn run_validate(
    args: &ValidateArgs,
    config: &AppConfig,
) -> Result<(String, ValidationResult), Error> {
    let format = OutputFormat::resolve(args.format.as_deref(), config)?;
    let rules_path = args.rules.as_deref().unwrap_or(&config.rules_file);

    let table = RuleTable::load(Path::new(rules_path))?;
    let result = RuleTableValidator::new().validate(&table);

    if result.is_valid() {
        info!(
            rules = rules_path,
            warning_count = result.warnings.len(),
            "Rule file is valid"
        );
    } else {
        warn!(
            rules = rules_path,
            error_count = result.errors.len(),
            "Rule file has errors"
        );
    }

    let output = match format {
        OutputFormat::Json => to_json(&ValidationOutput {
            rules_file: rules_path,
            valid: result.is_valid(),
            result: &result,
        })?,
        OutputFormat::Plain => format_validation_result_plain(&result),
        OutputFormat::Pretty => format_validation_result_pretty(rules_path, &result),
    };

    Ok((output, result))
}

/// One `error <location>: <message>` or `warning ...` line per finding.
fn format_validation_result_plain(result: &ValidationResult) -> String {
    let errors = result
        .errors
        .iter()
        .map(|e| format!("error {}: {}", e.field_path, e.message));
    let warnings = result
        .warnings
        .iter()
        .map(|w| format!("warning {}: {}", w.field_path, w.message));

    errors.chain(warnings).collect::<Vec<_>>().join("\n")
}

fn format_validation_result_pretty(rules_path: &str, result: &ValidationResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{} {}\n\n",
        "Validating rules:".bold(),
        rules_path.bright_cyan()
    ));

    if result.is_valid() {
        output.push_str(&format!("{}\n\n", "✓ Rules are VALID".green().bold()));
    } else {
        output.push_str(&format!(
            "{}\n\n",
            "✗ Rule validation FAILED".red().bold()
        ));
    }

    if !result.errors.is_empty() {
        output.push_str(&format!(
            "{} ({}):\n",
            "Errors".red().bold(),
            result.errors.len()
        ));
        for error in &result.errors {
            output.push_str(&format!(
                "  {} {}: {}\n",
                "✗".red(),
                error.field_path.dimmed(),
                error.message
            ));
            if let Some(suggestion) = &error.suggestion {
                output.push_str(&format!("      {}\n", suggestion.dimmed()));
            }
        }
        output.push('\n');
    }

    if !result.warnings.is_empty() {
        output.push_str(&format!(
            "{} ({}):\n",
            "Warnings".yellow().bold(),
            result.warnings.len()
        ));
        for warning in &result.warnings {
            output.push_str(&format!(
                "  {} {}: {}\n",
                "⚠".yellow(),
                warning.field_path.dimmed(),
                warning.message
            ));
            if let Some(recommendation) = &warning.recommendation {
                output.push_str(&format!("      {}\n", recommendation.dimmed()));
            }
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
#[path = "validate_cmd_tests.rs"]
mod tests;
