//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Document, DocumentDetail, DocumentId, DocumentStatus, FieldMap, Page, StorageReference};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Trait for durable byte storage
///
/// Implemented by the infrastructure layer (mdx-store)
pub trait BlobStore {
    /// Error type for storage operations
    type Error;

    /// Write a byte stream under a freshly allocated identifier
    ///
    /// `name_hint` is the user-supplied file name; implementations may only
    /// derive a file extension from it. Either the whole stream is stored and
    /// a reference returned, or nothing is left behind.
    fn store(
        &self,
        name_hint: &str,
        reader: &mut dyn Read,
    ) -> Result<StorageReference, Self::Error>;

    /// Remove stored bytes; removing a missing blob is not an error
    fn remove(&self, reference: &StorageReference) -> Result<(), Self::Error>;

    /// Resolve the local path of stored bytes
    fn path(&self, reference: &StorageReference) -> PathBuf;
}

/// Trait for the document system of record
///
/// Implemented by the infrastructure layer (mdx-store). Every mutating
/// operation validates its transition against the status table and is a
/// single atomic unit against the backing store.
pub trait DocumentLedger {
    /// Error type for ledger operations
    type Error;

    /// Create a document at `processing` for the given blob
    fn create(
        &self,
        original_filename: &str,
        storage_reference: &StorageReference,
    ) -> Result<DocumentId, Self::Error>;

    /// Insert the metadata record and move `processing -> done` atomically
    fn attach_metadata_and_complete(
        &self,
        id: DocumentId,
        fields: &FieldMap,
    ) -> Result<(), Self::Error>;

    /// Move `processing -> failed` with a reason; idempotent on failed documents
    fn mark_failed(&self, id: DocumentId, error_message: &str) -> Result<(), Self::Error>;

    /// Move `failed -> processing` for another attempt, clearing the reason
    fn begin_reprocessing(&self, id: DocumentId) -> Result<(), Self::Error>;

    /// Get a document and its metadata record
    fn get(&self, id: DocumentId) -> Result<Option<DocumentDetail>, Self::Error>;

    /// List documents, most recently created first
    fn list(&self, page: Page) -> Result<Vec<Document>, Self::Error>;

    /// Current status of a document, if it exists
    fn status(&self, id: DocumentId) -> Result<Option<DocumentStatus>, Self::Error> {
        Ok(self.get(id)?.map(|detail| detail.document.status))
    }
}

/// Trait for reading core metadata out of a document file
///
/// Implemented by the infrastructure layer (mdx-extractor). Implementations
/// are pure reads over the input file.
pub trait MetadataExtractor {
    /// Error type for extraction operations
    type Error;

    /// Extract the complete core field map from a file
    fn extract(&self, path: &Path) -> Result<FieldMap, Self::Error>;
}
