//! Configuration file parsing for the HTTP service.
//!
//! Loads settings from a TOML file, then applies environment overrides:
//! `DATABASE_PATH`, `UPLOAD_DIR` and `MDX_BIND` (`host:port`).

use mdx_extractor::ExtractorConfig;
use mdx_store::LedgerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Service configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range or malformed
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Service configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Directory uploaded files are stored under
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Largest accepted request body (bytes)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Tracing filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Ledger settings
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Extractor settings
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8000
}

fn default_database_path() -> PathBuf {
    PathBuf::from("mdextractor.db")
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

/// Default body limit: 50 MiB
fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            database_path: default_database_path(),
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            log_filter: default_log_filter(),
            ledger: LedgerConfig::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServiceConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from an optional file, apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("DATABASE_PATH").filter(|v| !v.is_empty()) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("UPLOAD_DIR").filter(|v| !v.is_empty()) {
            self.upload_dir = PathBuf::from(dir);
        }
        if let Some(bind) = lookup("MDX_BIND").filter(|v| !v.is_empty()) {
            let (address, port) = bind
                .rsplit_once(':')
                .ok_or_else(|| {
                    ConfigError::Invalid(format!("MDX_BIND must be host:port, got '{}'", bind))
                })?;
            self.bind_port = port
                .parse()
                .map_err(|_| {
                    ConfigError::Invalid(format!("invalid port in MDX_BIND: '{}'", port))
                })?;
            self.bind_address = address.to_string();
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_upload_bytes must be greater than 0".to_string(),
            ));
        }
        self.ledger.validate().map_err(ConfigError::Invalid)?;
        self.extractor.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// Create a configuration for tests rooted at `dir`
    pub fn default_test_config(dir: &Path) -> Self {
        ServiceConfig {
            database_path: dir.join("test.db"),
            upload_dir: dir.join("uploads"),
            ..Self::default()
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
