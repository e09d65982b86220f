//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Command-line flags override both.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::query::Engine;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// `host:port` of the store, or a base URL with scheme
    #[serde(default = "default_store_address")]
    pub address: String,

    #[serde(default)]
    pub engine: Engine,

    /// Overall request timeout; the transport default applies when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_store_address() -> String {
    "localhost:7650".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            address: default_store_address(),
            engine: Engine::default(),
            request_timeout_secs: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path, else the first default location that
    /// exists, else the environment alone
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit.map(Path::to_path_buf).or_else(Self::locate) {
            Some(path) => Self::load_with_env(&path),
            None => Ok(Self::from_env()),
        }
    }

    /// First existing file among the default config locations
    pub fn locate() -> Option<PathBuf> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("sluice").join("config.toml")),
            Some(PathBuf::from("/etc/sluice/config.toml")),
            Some(PathBuf::from("./sluice.toml")),
        ];

        config_paths.into_iter().flatten().find(|path| path.exists())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Store overrides
        if let Some(address) = lookup("SLUICE_STORE") {
            self.store.address = address;
        }
        if let Some(engine) = lookup("SLUICE_ENGINE") {
            if let Ok(e) = engine.parse() {
                self.store.engine = e;
            }
        }

        // Logging overrides
        if let Some(level) = lookup("SLUICE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SLUICE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Sluice Configuration
#
# Environment variables override these settings:
# - SLUICE_STORE
# - SLUICE_ENGINE
# - SLUICE_LOG_LEVEL
# - SLUICE_LOG_FORMAT

[store]
# Store address (host:port, or a base URL such as https://logs.example.com)
address = "localhost:7650"

# Query engine: naïve, ripgrep, lazy
engine = "lazy"

# Request timeout in seconds (transport default when unset)
# request_timeout_secs = 30

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for terminals) or json (for collectors)
format = "pretty"
"#
    .to_string()
}
