//! MDExtractor Ingestion
//!
//! Orchestrates the blob store, ledger and extractor into a single ingestion
//! operation, and exposes read-only views for the outer surfaces.
//!
//! # Architecture
//!
//! ```text
//! bytes → BlobStore → Ledger (processing) → Extractor → Ledger (done | failed)
//! ```
//!
//! An upload that reached the ledger always yields a document id. Extraction
//! failures are recorded on the document rather than returned to the caller.

#![warn(missing_docs)]

mod error;
pub mod pipeline;
pub mod query;

pub use error::{IngestError, QueryError};
pub use pipeline::IngestionPipeline;
pub use query::{DocumentDetailView, DocumentPage, DocumentView, QuerySurface};
