//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read an explicitly requested config file.
    #[error("Failed to read config file at {path}: {reason}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML.
    #[error("Invalid TOML in {path}: {reason}")]
    Parse {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional; unset fields fall back to the defaults.
/// Corresponds to `~/.config/circ/config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Search endpoint base URL.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Path to the tracing log file.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Fully resolved configuration after the whole precedence chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Search endpoint base URL.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Path to the tracing log file.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            log_file_path: default_log_path(),
        }
    }
}

/// Default log file location: the local data dir, or the system temp dir
/// when none exists.
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("circ")
        .join("circ.log")
}

/// Default config file location under the user config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("circ").join("config.toml"))
}

/// Load a config file that may legitimately be absent.
///
/// # Errors
///
/// Returns [`ConfigError`] for unreadable files (other than missing) and
/// invalid TOML.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(ConfigError::Read {
                path,
                reason: err.to_string(),
            })
        }
    };
    toml::from_str(&raw).map(Some).map_err(|err| ConfigError::Parse {
        path,
        reason: err.to_string(),
    })
}

/// Load the config file with CLI-path precedence: an explicit `--config`
/// path must exist; the default location may be absent.
///
/// # Errors
///
/// Returns [`ConfigError`] when the explicit path cannot be read, or when
/// either location holds invalid TOML.
pub fn load_config_with_precedence(
    cli_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    match cli_path {
        Some(path) => {
            let raw = std::fs::read_to_string(&path).map_err(|err| ConfigError::Read {
                path: path.clone(),
                reason: err.to_string(),
            })?;
            toml::from_str(&raw)
                .map(Some)
                .map_err(|err| ConfigError::Parse {
                    path,
                    reason: err.to_string(),
                })
        }
        None => match default_config_path() {
            Some(path) => load_config_file(path),
            None => Ok(None),
        },
    }
}

/// Merge an optional config file over the defaults.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let mut config = ResolvedConfig::default();
    if let Some(file) = config_file {
        if let Some(endpoint) = file.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(timeout_secs) = file.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        if let Some(log_file_path) = file.log_file_path {
            config.log_file_path = log_file_path;
        }
    }
    config
}

/// Apply environment variable overrides: `CIRC_ENDPOINT`,
/// `CIRC_TIMEOUT_SECS`, `CIRC_LOG_FILE`.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(endpoint) = std::env::var("CIRC_ENDPOINT") {
        config.endpoint = endpoint;
    }
    if let Ok(raw) = std::env::var("CIRC_TIMEOUT_SECS") {
        match raw.parse() {
            Ok(timeout_secs) => config.timeout_secs = timeout_secs,
            Err(_) => tracing::warn!(%raw, "ignoring unparseable CIRC_TIMEOUT_SECS"),
        }
    }
    if let Ok(log_file_path) = std::env::var("CIRC_LOG_FILE") {
        config.log_file_path = PathBuf::from(log_file_path);
    }
    config
}

/// Apply CLI argument overrides; the last step of the chain.
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
) -> ResolvedConfig {
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
    }
    if let Some(timeout_secs) = timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    config
}
