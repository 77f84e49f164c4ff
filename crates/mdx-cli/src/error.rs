//! Error types for the CLI application.

use mdx_ingest::{IngestError, QueryError};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Blob store or ledger could not be opened
    #[error("Storage error: {0}")]
    Storage(String),

    /// Ingestion error
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Query error
    #[error(transparent)]
    Query(#[from] QueryError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Nothing to ingest
    #[error("No .docx files found under {}", .0.display())]
    NoDocuments(PathBuf),
}
