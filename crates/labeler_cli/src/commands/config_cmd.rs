use std::path::Path;

use clap::Subcommand;
use tracing::{debug, error, info, instrument};

use crate::config::{get_config_path, AppConfig};
use crate::errors::Error;

/// Subcommands for the config command
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Create a default configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,
}

/// Execute the config command
///
/// `config_path` is the global `--config` value.
#[instrument]
pub fn execute(cmd: &ConfigCommands, config_path: Option<&str>) -> Result<(), Error> {
    match cmd {
        ConfigCommands::Init { force } => {
            let path = get_config_path(config_path);
            init_config(&path, *force)?;
            println!("Configuration initialized at {:?}", path);
            Ok(())
        }
        ConfigCommands::Show => {
            let config = AppConfig::load_or_default(config_path)?;
            println!("{}", show_config(&config)?);
            Ok(())
        }
    }
}

/// Writes the default configuration to `path`.
fn init_config(path: &Path, force: bool) -> Result<(), Error> {
    debug!(message = "Initializing configuration", path = ?path, force = force);

    if path.exists() && !force {
        let err = Error::Config(format!(
            "Configuration file already exists at {:?} (use --force to overwrite)",
            path
        ));
        error!(
            message = "Configuration file already exists",
            path = ?path,
            error = ?err
        );
        return Err(err);
    }

    AppConfig::default().save(path)?;

    info!(message = "Configuration initialized", path = ?path);
    Ok(())
}

/// Renders the configuration as TOML.
fn show_config(config: &AppConfig) -> Result<String, Error> {
    toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))
}

#[cfg(test)]
#[path = "config_cmd_tests.rs"]
mod tests;
