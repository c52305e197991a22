//! Configuration management for the path-labeler CLI.
//!
//! Settings are stored in TOML and provide defaults for the command line
//! flags: where the rule file lives, the preferred output format and how
//! changed paths are computed from git. Every key is optional.

use std::{
    fs,
    path::{Path, PathBuf},
};

use labeler_core::DEFAULT_RULES_PATH;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "path-labeler.toml";

/// Default output format
pub const DEFAULT_OUTPUT_FORMAT: &str = "pretty";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Main configuration structure for the path-labeler CLI application.
///
/// # Example TOML Configuration
///
/// ```toml
/// rules_file = ".github/labeler.yml"
///
/// [output]
/// format = "json"
///
/// [git]
/// repository = "."
/// use_merge_base = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path of the label rule file.
    #[serde(default = "AppConfig::default_rules_file")]
    pub rules_file: String,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub git: GitConfig,
}

impl AppConfig {
    fn default_rules_file() -> String {
        DEFAULT_RULES_PATH.to_string()
    }

    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file does not exist, cannot be read or
    /// does not contain a valid configuration.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))?;

        Ok(config)
    }

    /// Loads the configuration used for a command invocation.
    ///
    /// An explicitly requested file must exist. Without one, the default file
    /// in the current directory is used when present and built-in defaults
    /// otherwise.
    pub fn load_or_default(config_path: Option<&str>) -> Result<Self, Error> {
        let path = get_config_path(config_path);
        if config_path.is_none() && !path.exists() {
            debug!("No configuration file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Saves the configuration to a TOML file at the specified path.
    ///
    /// Parent directories are created as needed and an existing file is
    /// overwritten.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        debug!("Saving configuration to {:?}", path);

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write configuration file: {}", e)))?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rules_file: AppConfig::default_rules_file(),
            output: OutputConfig::default(),
            git: GitConfig::default(),
        }
    }
}

/// Output preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// One of `pretty`, `json` or `plain`.
    #[serde(default = "OutputConfig::default_format")]
    pub format: String,
}

impl OutputConfig {
    fn default_format() -> String {
        DEFAULT_OUTPUT_FORMAT.to_string()
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputConfig::default_format(),
        }
    }
}

/// Settings for computing changed paths from a local repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitConfig {
    /// Path of the repository to diff.
    #[serde(default = "GitConfig::default_repository")]
    pub repository: String,

    /// Diff from the merge base of base and head, as a pull request does.
    #[serde(default = "GitConfig::default_use_merge_base")]
    pub use_merge_base: bool,
}

impl GitConfig {
    fn default_repository() -> String {
        ".".to_string()
    }

    fn default_use_merge_base() -> bool {
        true
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            repository: GitConfig::default_repository(),
            use_merge_base: GitConfig::default_use_merge_base(),
        }
    }
}

/// Resolves the path to the configuration file.
///
/// Uses `config_path` when given, otherwise `path-labeler.toml` in the
/// current directory.
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}
