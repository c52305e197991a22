//! Classification commands for the path-labeler CLI.
//!
//! # Examples
//!
//! ```bash
//! # Label explicit paths
//! path-labeler classify docs/index.rst tox.ini
//!
//! # Label the files changed on a branch, compared with main
//! path-labeler classify --git-base origin/main --git-head HEAD
//!
//! # Pipe in a file list and show what to add and remove
//! git diff --name-only origin/main... | path-labeler classify --paths-from - --current Testing
//!
//! # Show which pattern matched which path
//! path-labeler explain --git-base origin/main
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use clap::Args;
use colored::Colorize;
use labeler_core::{
    ChangeSet, LabelAssignment, LabelClassifier, LabelPlan, MatchReport, RuleTable,
};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::commands::{to_json, OutputFormat};
use crate::config::AppConfig;
use crate::errors::Error;

/// Where to take the changed paths from. Sources can be combined.
#[derive(Args, Debug, Clone, Default)]
pub struct ChangeArgs {
    /// Changed paths, relative to the repository root
    pub paths: Vec<String>,

    /// Read newline separated changed paths from a file ('-' for stdin)
    #[arg(long, value_name = "FILE")]
    pub paths_from: Option<String>,

    /// Base revision of a git diff (e.g. origin/main)
    #[arg(long, value_name = "REV")]
    pub git_base: Option<String>,

    /// Head revision of a git diff [default: HEAD]
    #[arg(long, value_name = "REV", requires = "git_base")]
    pub git_head: Option<String>,

    /// Repository to diff [default: the configured git.repository]
    #[arg(long, value_name = "DIR")]
    pub repo: Option<String>,

    /// Diff base and head directly instead of from their merge base
    #[arg(long)]
    pub no_merge_base: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub changes: ChangeArgs,

    /// Rule file [default: the configured rules_file]
    #[arg(long, value_name = "FILE")]
    pub rules: Option<String>,

    /// Output format: pretty, json or plain
    #[arg(long)]
    pub format: Option<String>,

    /// A label currently on the pull request; repeat for each label.
    /// When given, the labels to add and remove are reported as well.
    #[arg(long, value_name = "LABEL")]
    pub current: Option<Vec<String>>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExplainArgs {
    #[command(flatten)]
    pub changes: ChangeArgs,

    /// Rule file [default: the configured rules_file]
    #[arg(long, value_name = "FILE")]
    pub rules: Option<String>,

    /// Output format: pretty, json or plain
    #[arg(long)]
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
struct ClassifyOutput<'a> {
    labels: &'a LabelAssignment,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<&'a LabelPlan>,
}

/// Executes the classify command, printing the result to stdout.
#[instrument(skip(config))]
pub fn execute_classify(args: &ClassifyArgs, config: &AppConfig) -> Result<(), Error> {
    let stdin = io::stdin();
    let output = run_classify(args, config, stdin.lock())?;
    println!("{}", output);
    Ok(())
}

/// Executes the explain command, printing the result to stdout.
#[instrument(skip(config))]
pub fn execute_explain(args: &ExplainArgs, config: &AppConfig) -> Result<(), Error> {
    let stdin = io::stdin();
    let output = run_explain(args, config, stdin.lock())?;
    println!("{}", output);
    Ok(())
}

/// Classifies the requested change set and renders the result.
///
/// `stdin` is only read when `--paths-from -` was given.
pub fn run_classify<R: BufRead>(
    args: &ClassifyArgs,
    config: &AppConfig,
    stdin: R,
) -> Result<String, Error> {
    let format = OutputFormat::resolve(args.format.as_deref(), config)?;
    let classifier = load_classifier(args.rules.as_deref(), config)?;
    let changes = collect_changes(&args.changes, config, stdin)?;

    let assignment = classifier.classify(&changes);
    let plan = args.current.as_ref().map(|current| {
        LabelPlan::new(
            &assignment,
            current
                .iter()
                .map(|label| label.trim())
                .filter(|label| !label.is_empty()),
            classifier.configured_labels(),
        )
    });

    format_classification(&assignment, plan.as_ref(), format)
}

/// Explains the classification of the requested change set.
pub fn run_explain<R: BufRead>(
    args: &ExplainArgs,
    config: &AppConfig,
    stdin: R,
) -> Result<String, Error> {
    let format = OutputFormat::resolve(args.format.as_deref(), config)?;
    let classifier = load_classifier(args.rules.as_deref(), config)?;
    let changes = collect_changes(&args.changes, config, stdin)?;

    let report = classifier.explain(&changes);
    format_report(&report, format)
}

/// Loads and compiles the rule table.
pub fn load_classifier(rules: Option<&str>, config: &AppConfig) -> Result<LabelClassifier, Error> {
    let rules_path = rules.unwrap_or(&config.rules_file);
    debug!(rules = rules_path, "Loading classifier");

    let table = RuleTable::load(Path::new(rules_path))?;
    Ok(LabelClassifier::new(&table)?)
}

/// Builds the change set from every source given on the command line.
pub fn collect_changes<R: BufRead>(
    args: &ChangeArgs,
    config: &AppConfig,
    stdin: R,
) -> Result<ChangeSet, Error> {
    let mut changes = ChangeSet::new(&args.paths);

    if let Some(source) = args.paths_from.as_deref() {
        let from_source = if source == "-" {
            ChangeSet::from_reader(stdin, "stdin")?
        } else {
            let file = File::open(source).map_err(|e| Error::LoadFile {
                path: source.to_string(),
                source: e,
            })?;
            ChangeSet::from_reader(BufReader::new(file), source)?
        };
        changes.extend(from_source);
    }

    if let Some(base) = args.git_base.as_deref() {
        let head = args.git_head.as_deref().unwrap_or("HEAD");
        let repository = args.repo.as_deref().unwrap_or(&config.git.repository);
        let use_merge_base = config.git.use_merge_base && !args.no_merge_base;

        changes.extend(ChangeSet::from_git_diff(
            Path::new(repository),
            base,
            head,
            use_merge_base,
        )?);
    } else if args.no_merge_base || args.repo.is_some() {
        return Err(Error::InvalidArguments(
            "--repo and --no-merge-base require --git-base".to_string(),
        ));
    }

    if changes.is_empty() {
        warn!("No changed paths supplied, no labels will be applied");
    }
    Ok(changes)
}

fn format_classification(
    assignment: &LabelAssignment,
    plan: Option<&LabelPlan>,
    format: OutputFormat,
) -> Result<String, Error> {
    match format {
        OutputFormat::Json => to_json(&ClassifyOutput {
            labels: assignment,
            plan,
        }),
        OutputFormat::Plain => Ok(format_classification_plain(assignment, plan)),
        OutputFormat::Pretty => Ok(format_classification_pretty(assignment, plan)),
    }
}

/// Labels one per line, or `+label` / `-label` lines when a plan was requested.
fn format_classification_plain(assignment: &LabelAssignment, plan: Option<&LabelPlan>) -> String {
    let lines: Vec<String> = match plan {
        Some(plan) => plan
            .add
            .iter()
            .map(|label| format!("+{}", label))
            .chain(plan.remove.iter().map(|label| format!("-{}", label)))
            .collect(),
        None => assignment.iter().map(str::to_string).collect(),
    };
    lines.join("\n")
}

fn format_classification_pretty(assignment: &LabelAssignment, plan: Option<&LabelPlan>) -> String {
    let mut output = String::new();

    if assignment.is_empty() {
        output.push_str(&format!("{}\n", "No labels apply".dimmed()));
    } else {
        output.push_str(&format!(
            "{} ({}):\n",
            "Labels".bold(),
            assignment.len()
        ));
        for label in assignment.iter() {
            output.push_str(&format!("  {} {}\n", "✓".green(), label.bold()));
        }
    }

    if let Some(plan) = plan {
        output.push('\n');
        if plan.is_noop() {
            output.push_str(&format!("{}\n", "Labels are up to date".green()));
        } else {
            output.push_str(&format!("{}:\n", "Label changes".bold()));
            for label in &plan.add {
                output.push_str(&format!("  {} {}\n", "+".green(), label));
            }
            for label in &plan.remove {
                output.push_str(&format!("  {} {}\n", "-".red(), label));
            }
        }
    }

    output
}

fn format_report(report: &MatchReport, format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Plain => Ok(format_report_plain(report)),
        OutputFormat::Pretty => Ok(format_report_pretty(report)),
    }
}

/// Tab separated `label`, `pattern`, `path` triples.
fn format_report_plain(report: &MatchReport) -> String {
    let mut lines = Vec::new();
    for label_match in &report.matches {
        for evidence in &label_match.evidence {
            for path in &evidence.paths {
                lines.push(format!(
                    "{}\t{}\t{}",
                    label_match.label, evidence.pattern, path
                ));
            }
        }
    }
    lines.join("\n")
}

fn format_report_pretty(report: &MatchReport) -> String {
    if report.is_empty() {
        return format!("{}\n", "No labels apply".dimmed());
    }

    let mut output = String::new();
    for label_match in &report.matches {
        output.push_str(&format!("{}\n", label_match.label.bold().bright_cyan()));
        for evidence in &label_match.evidence {
            output.push_str(&format!("  {}\n", evidence.pattern.yellow()));
            for path in &evidence.paths {
                output.push_str(&format!("    {}\n", path));
            }
        }
    }
    output
}

#[cfg(test)]
#[path = "classify_cmd_tests.rs"]
mod tests;
