//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where documents are stored
    #[serde(default)]
    pub storage: Storage,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Storage locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storage {
    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Directory uploaded files are stored under
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Tracing filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".mdextractor").join("config.toml"))
    }

    /// Load configuration from file, or defaults when none exists.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if path.exists() {
            Self::from_toml(&fs::read_to_string(&path)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            upload_dir: default_upload_dir(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            log_filter: default_log_filter(),
        }
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("mdextractor.db")
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_log_filter() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage.database_path, PathBuf::from("mdextractor.db"));
        assert_eq!(config.storage.upload_dir, PathBuf::from("uploads"));
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml(
            r#"
            [settings]
            format = "json"

            [storage]
            upload_dir = "/srv/uploads"
            "#,
        )
        .unwrap();

        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.settings.color);
        assert_eq!(config.storage.upload_dir, PathBuf::from("/srv/uploads"));
        assert_eq!(config.storage.database_path, PathBuf::from("mdextractor.db"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml("settings = 3"),
            Err(CliError::Toml(_))
        ));
    }
}
