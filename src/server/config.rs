//! Configuration loading for packd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.packd/config.toml` (user)
//! 3. `/etc/packd/config.toml` (system)
//!
//! Without any of these, built-in defaults apply. Every section and field is
//! optional.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::access_log::DEFAULT_ACCESS_LOG_CAPACITY;
use crate::{PackError, Result};

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// HTTP bind address (default: 0.0.0.0:8005).
    #[serde(default = "default_http_address")]
    pub http_address: String,
    /// gRPC bind address (default: 0.0.0.0:50055).
    #[serde(default = "default_grpc_address")]
    pub grpc_address: String,
    /// Allow any origin on the HTTP surface (default: true).
    #[serde(default = "default_true")]
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_address: default_http_address(),
            grpc_address: default_grpc_address(),
            cors_permissive: true,
        }
    }
}

fn default_http_address() -> String {
    "0.0.0.0:8005".to_string()
}

fn default_grpc_address() -> String {
    "0.0.0.0:50055".to_string()
}

fn default_true() -> bool {
    true
}

/// Catalog source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// JSON fixture replacing the embedded dataset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Access records buffered before new ones are dropped (default: 1024).
    #[serde(default = "default_access_log_capacity")]
    pub access_log_capacity: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            access_log_capacity: default_access_log_capacity(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_access_log_capacity() -> usize {
    DEFAULT_ACCESS_LOG_CAPACITY
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Otherwise the first existing standard
    /// file wins, and defaults are used when there is none.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse one config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PackError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            PackError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(PackError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".packd").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/packd/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}
