//! Configuration file loading with precedence handling.
//!
//! Precedence, lowest to highest: built-in defaults → config file →
//! `LDBV_*` environment variables → CLI flags.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::export::DEFAULT_DUMP_DIR;
use crate::pager::DEFAULT_PAGE_SIZE;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read an existing config file.
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
/// All fields are optional; unset fields fall back to defaults. Lives at
/// `~/.config/ldbv/config.toml` unless overridden.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Keys per page segment.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Directory for exported files.
    #[serde(default)]
    pub dump_dir: Option<PathBuf>,

    /// Path to the tracing log file.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Keys per page segment.
    pub page_size: usize,
    /// Directory for exported files.
    pub dump_dir: PathBuf,
    /// Path to the tracing log file.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            dump_dir: PathBuf::from(DEFAULT_DUMP_DIR),
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve the default log file path (`~/.local/state/ldbv/ldbv.log` on
/// Unix-like systems). Falls back to the current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("ldbv").join("ldbv.log")
    } else {
        PathBuf::from("ldbv.log")
    }
}

/// Resolve the default config file path. `None` when no config directory
/// can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ldbv").join("config.toml"))
}

/// Load a config file from a specific path.
///
/// A missing file is not an error (`Ok(None)`, use defaults); a file that
/// exists but cannot be read or parsed is.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Load configuration, choosing the file by precedence: explicit path
/// (CLI `--config`), then `LDBV_CONFIG`, then the default location.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }
    if let Ok(env_path) = std::env::var("LDBV_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }
    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }
    Ok(None)
}

/// Merge an optional config file over the built-in defaults.
pub fn merge_config(file: Option<ConfigFile>) -> ResolvedConfig {
    let mut resolved = ResolvedConfig::default();
    if let Some(file) = file {
        if let Some(page_size) = file.page_size {
            resolved.page_size = page_size;
        }
        if let Some(dump_dir) = file.dump_dir {
            resolved.dump_dir = dump_dir;
        }
        if let Some(log_file_path) = file.log_file_path {
            resolved.log_file_path = log_file_path;
        }
    }
    resolved
}

/// Apply `LDBV_PAGE_SIZE` and `LDBV_DUMP_DIR` environment overrides.
/// Unparseable values are ignored rather than fatal.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var("LDBV_PAGE_SIZE") {
        if let Ok(page_size) = raw.parse::<usize>() {
            if page_size > 0 {
                config.page_size = page_size;
            }
        }
    }
    if let Ok(dir) = std::env::var("LDBV_DUMP_DIR") {
        if !dir.is_empty() {
            config.dump_dir = PathBuf::from(dir);
        }
    }
    config
}

/// CLI flag values that can override the config (highest precedence).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// `--page-size`.
    pub page_size: Option<usize>,
    /// `--dump-dir`.
    pub dump_dir: Option<PathBuf>,
    /// `--log-file`.
    pub log_file: Option<PathBuf>,
}

/// Apply CLI flag overrides (highest precedence).
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    if let Some(dump_dir) = cli.dump_dir {
        config.dump_dir = dump_dir;
    }
    if let Some(log_file) = cli.log_file {
        config.log_file_path = log_file;
    }
    config
}
