//! MDExtractor Storage Layer
//!
//! Implements the [`DocumentLedger`](mdx_domain::traits::DocumentLedger) trait
//! on SQLite and the [`BlobStore`](mdx_domain::traits::BlobStore) trait on the
//! local filesystem.
//!
//! # Architecture
//!
//! - SQLite for document rows and metadata records (`documents`,
//!   `metadata_standard`)
//! - One file per document under an upload root, named by the document id
//! - Status transitions validated against the domain transition table before
//!   anything is written
//!
//! # Examples
//!
//! ```no_run
//! use mdx_store::{FsBlobStore, LedgerConfig, SqliteLedger};
//!
//! let ledger = SqliteLedger::new("mdextractor.db", LedgerConfig::default()).unwrap();
//! let blobs = FsBlobStore::new("./data/uploads").unwrap();
//! ```

#![warn(missing_docs)]

pub mod blob;
pub mod codec;
pub mod ledger;

pub use blob::FsBlobStore;
pub use ledger::{LedgerConfig, SqliteLedger};

use mdx_domain::{DocumentId, TransitionError};
use thiserror::Error;

/// Errors that can occur during ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Database error (unreachable store, constraint violation)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Document not found
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    /// Status change outside the transition table
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// Invalid data format in a stored row
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Metadata record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The connection could not be acquired
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur during blob storage operations
#[derive(Error, Debug)]
pub enum BlobError {
    /// I/O failure (disk full, permission denied, ...)
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Empty or missing file name
    #[error("Missing filename")]
    MissingFilename,
}
