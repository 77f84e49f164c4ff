//! Error types for ingestion and queries

use mdx_domain::{DocumentId, DocumentStatus};
use thiserror::Error;

/// Errors surfaced by the ingestion pipeline
///
/// Extraction failures are not errors here: they are recorded on the
/// document as its `failed` status.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The upload could not be stored; no document was created
    #[error("Storage error: {0}")]
    Storage(String),

    /// The document row could not be written
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// No document with this id
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    /// Only `failed` documents can be sent through extraction again
    #[error("Document {id} is {status}; only failed documents can be reprocessed")]
    NotRetryable {
        /// Document id
        id: DocumentId,
        /// Its current status
        status: DocumentStatus,
    },

    /// The input file could not be read
    #[error("Cannot read input: {0}")]
    Input(String),
}

/// Errors surfaced by the query surface
#[derive(Error, Debug)]
pub enum QueryError {
    /// No document with this id
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    /// The ledger could not be read
    #[error("Ledger error: {0}")]
    Ledger(String),
}
