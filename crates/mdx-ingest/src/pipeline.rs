//! Ingestion pipeline: store, record, extract, settle

use crate::IngestError;
use mdx_domain::traits::{BlobStore, DocumentLedger, MetadataExtractor};
use mdx_domain::{DocumentId, DocumentStatus, StorageReference};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn};

/// Drives one upload from raw bytes to a settled document
///
/// The ledger handle is shared with the query side; the blob store and
/// extractor belong to the pipeline.
///
/// # Examples
///
/// ```no_run
/// use mdx_ingest::IngestionPipeline;
/// use mdx_store::{FsBlobStore, LedgerConfig, SqliteLedger};
/// # use mdx_domain::traits::MetadataExtractor;
/// # use mdx_domain::FieldMap;
/// # struct Extractor;
/// # impl MetadataExtractor for Extractor {
/// #     type Error = String;
/// #     fn extract(&self, _: &std::path::Path) -> Result<FieldMap, String> { Ok(FieldMap::absent()) }
/// # }
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let ledger = Arc::new(SqliteLedger::new("mdextractor.db", LedgerConfig::default())?);
/// let blobs = FsBlobStore::new("uploads")?;
/// let pipeline = IngestionPipeline::new(blobs, ledger, Extractor);
///
/// let id = pipeline.ingest("report.docx", &mut std::io::empty())?;
/// println!("ingested {}", id);
/// # Ok(())
/// # }
/// ```
pub struct IngestionPipeline<B, L, E> {
    blobs: B,
    ledger: Arc<L>,
    extractor: E,
}

impl<B, L, E> IngestionPipeline<B, L, E>
where
    B: BlobStore,
    L: DocumentLedger,
    E: MetadataExtractor,
    B::Error: Display,
    L::Error: Display,
    E::Error: Display,
{
    /// Create a pipeline over explicit collaborators
    pub fn new(blobs: B, ledger: Arc<L>, extractor: E) -> Self {
        Self {
            blobs,
            ledger,
            extractor,
        }
    }

    /// Shared ledger handle
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// Blob store the pipeline writes to
    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Ingest one upload
    ///
    /// Returns the document id once the document has settled, whether
    /// extraction succeeded or not. Errors mean no document exists for the
    /// upload.
    pub fn ingest(
        &self,
        original_filename: &str,
        reader: &mut dyn Read,
    ) -> Result<DocumentId, IngestError> {
        let reference = self
            .blobs
            .store(original_filename, reader)
            .map_err(|e| IngestError::Storage(e.to_string()))?;

        let id = match self.ledger.create(original_filename, &reference) {
            Ok(id) => id,
            Err(e) => {
                if let Err(cleanup) = self.blobs.remove(&reference) {
                    warn!(
                        locator = reference.locator(),
                        error = %cleanup,
                        "failed to remove blob after ledger error"
                    );
                }
                return Err(IngestError::Persistence(e.to_string()));
            }
        };

        self.process(id, &reference);
        Ok(id)
    }

    /// Ingest a file from disk under its own file name
    pub fn ingest_path(&self, path: &Path) -> Result<DocumentId, IngestError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| IngestError::Input(format!("{}: not a file", path.display())))?;
        let file = File::open(path)
            .map_err(|e| IngestError::Input(format!("{}: {}", path.display(), e)))?;

        self.ingest(&name, &mut BufReader::new(file))
    }

    /// Run extraction again for a failed document
    ///
    /// Returns the status the document settled at.
    pub fn reprocess(&self, id: DocumentId) -> Result<DocumentStatus, IngestError> {
        let detail = self
            .ledger
            .get(id)
            .map_err(|e| IngestError::Persistence(e.to_string()))?
            .ok_or(IngestError::NotFound(id))?;

        let status = detail.document.status;
        if status != DocumentStatus::Failed {
            return Err(IngestError::NotRetryable { id, status });
        }

        self.ledger
            .begin_reprocessing(id)
            .map_err(|e| IngestError::Persistence(e.to_string()))?;
        self.process(id, &detail.document.storage_reference);

        self.ledger
            .status(id)
            .map_err(|e| IngestError::Persistence(e.to_string()))?
            .ok_or(IngestError::NotFound(id))
    }

    /// Extract metadata and settle a `processing` document
    ///
    /// Ledger failures here are logged, not returned: the upload is already
    /// accepted, and a document left at `processing` shows up in stuck reports.
    fn process(&self, id: DocumentId, reference: &StorageReference) {
        let span = info_span!("extract", document_id = %id);
        let _guard = span.enter();

        let path = self.blobs.path(reference);
        debug!(path = %path.display(), "extracting metadata");

        match self.extractor.extract(&path) {
            Ok(fields) => match self.ledger.attach_metadata_and_complete(id, &fields) {
                Ok(()) => info!(fields = fields.present_count(), "document done"),
                Err(e) => error!(error = %e, "failed to record metadata; document left processing"),
            },
            Err(e) => {
                let mut message = e.to_string();
                if message.trim().is_empty() {
                    message = "extraction failed".to_string();
                }
                warn!(error = %message, "extraction failed");
                if let Err(e) = self.ledger.mark_failed(id, &message) {
                    error!(
                        error = %e,
                        "failed to record extraction failure; document left processing"
                    );
                }
            }
        }
    }
}
