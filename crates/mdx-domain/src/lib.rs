//! MDExtractor Domain Layer
//!
//! This crate contains the document model and the trait interfaces that the
//! storage, extraction and ingestion layers depend upon. It carries no I/O.
//!
//! ## Key Concepts
//!
//! - **Document**: one ingested file and its lifecycle status
//! - **Status**: `uploaded | queued | processing | done | failed`, with a closed
//!   transition table enforced at the ledger boundary
//! - **FieldMap**: the fixed set of core metadata fields extracted from a file,
//!   with absent fields represented explicitly
//! - **Page**: a clamped limit/offset pair for list reads
//!
//! ## Architecture
//!
//! - Pure data types and validation only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for every external interaction (blob storage, ledger,
//!   metadata extraction)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod metadata;
pub mod page;
pub mod status;
pub mod traits;

// Re-exports for convenience
pub use document::{Document, DocumentDetail, DocumentId, StorageReference};
pub use metadata::{CoreField, FieldMap, FieldValue, MetadataRecord};
pub use page::Page;
pub use status::{DocumentStatus, TransitionError};
