//! Runner configuration via `eventtest.toml`
//!
//! Every field has a default, so a missing or empty file gives the default
//! configuration. The self-test binary reads the file from the working
//! directory, or from the path in `EVENTTEST_CONFIG`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "eventtest.toml";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "EVENTTEST_CONFIG";

/// Failure loading or writing a runner config
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        /// File path
        path: PathBuf,
        /// I/O failure
        source: std::io::Error,
    },

    /// File is not valid TOML for `RunnerConfig`
    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        /// File path
        path: PathBuf,
        /// TOML failure
        source: toml::de::Error,
    },

    /// File could not be written
    #[error("failed to write config file '{}': {source}", path.display())]
    Write {
        /// File path
        path: PathBuf,
        /// I/O failure
        source: std::io::Error,
    },

    /// Config could not be serialized
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// `log_filter` is not a valid filter directive
    #[error("invalid log_filter '{filter}': {reason}")]
    InvalidFilter {
        /// Directive as written
        filter: String,
        /// Parser message
        reason: String,
    },
}

/// Runner configuration loaded from `eventtest.toml`
///
/// # Example
///
/// ```toml
/// fail_fast = false
/// report_errors = true
/// log_filter = "info"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Stop at the first failing case; the rest are counted as skipped
    pub fail_fast: bool,
    /// Include the error message when logging a failed case
    pub report_errors: bool,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            report_errors: true,
            log_filter: "info".to_string(),
        }
    }
}

impl RunnerConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# eventtest runner configuration
#
# Stop at the first failing case (default: false).
# Remaining cases are reported as skipped.
fail_fast = false

# Log the error message of failing cases (default: true)
report_errors = true

# Log filter used when RUST_LOG is unset (default: "info")
#   "debug" also shows every trigger and assertion
log_filter = "info"
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this config or the
    /// log filter does not parse.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, Path::new("<inline>"))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Read config from `path` if it exists, otherwise use the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Config file location: `EVENTTEST_CONFIG` or `./eventtest.toml`
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: RunnerConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.env_filter()?;
        Ok(config)
    }

    /// Build the `tracing` filter named by `log_filter`.
    pub fn env_filter(&self) -> Result<EnvFilter, ConfigError> {
        EnvFilter::try_new(&self.log_filter).map_err(|e| ConfigError::InvalidFilter {
            filter: self.log_filter.clone(),
            reason: e.to_string(),
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
