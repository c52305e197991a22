use clap::{Parser, Subcommand};
use labeler_cli::commands::{
    classify_cmd::{self, ClassifyArgs, ExplainArgs},
    config_cmd::{self, ConfigCommands},
    validate_cmd::{self, ValidateArgs},
};
use labeler_cli::config::AppConfig;
use labeler_cli::errors::Error;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// path-labeler: Pick pull request labels from the paths a change touches
#[derive(Parser, Debug)]
#[command(name = "path-labeler")]
#[command(about = "Pick pull request labels from the paths a change touches", long_about = None)]
struct Cli {
    /// Settings file [default: ./path-labeler.toml when present]
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the labels that apply to a set of changed paths
    Classify(ClassifyArgs),

    /// Show which pattern matched which changed path
    Explain(ExplainArgs),

    /// Check a rule file for malformed and suspicious patterns
    Validate(ValidateArgs),

    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show the CLI version
    Version,
}

fn run(cli: &Cli) -> Result<(), Error> {
    let config_path = cli.config.as_deref();
    match &cli.command {
        Commands::Classify(args) => {
            classify_cmd::execute_classify(args, &AppConfig::load_or_default(config_path)?)
        }
        Commands::Explain(args) => {
            classify_cmd::execute_explain(args, &AppConfig::load_or_default(config_path)?)
        }
        Commands::Validate(args) => {
            validate_cmd::execute(args, &AppConfig::load_or_default(config_path)?)
        }
        Commands::Config(cmd) => config_cmd::execute(cmd, config_path),
        Commands::Version => {
            println!("path-labeler version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn main() {
    // Logs go to stderr so stdout only carries command output
    tracing_subscriber::registry()
        .with(fmt::layer().pretty().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("PATH_LABELER_LOG"))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        debug!(error = ?e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
