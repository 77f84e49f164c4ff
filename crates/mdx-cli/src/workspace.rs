//! Local storage the CLI operates on.

use crate::error::{CliError, Result};
use mdx_extractor::DocxExtractor;
use mdx_ingest::{IngestionPipeline, QuerySurface};
use mdx_store::{FsBlobStore, LedgerConfig, SqliteLedger};
use std::path::Path;
use std::sync::Arc;

/// Pipeline wired to the local database and upload directory
pub type Pipeline = IngestionPipeline<FsBlobStore, SqliteLedger, DocxExtractor>;

/// Opened database and upload directory
pub struct Workspace {
    /// Ingestion pipeline
    pub pipeline: Pipeline,
    /// Read-only views
    pub query: QuerySurface<SqliteLedger>,
}

impl Workspace {
    /// Open (creating if needed) the database and upload directory
    pub fn open(database: &Path, upload_dir: &Path) -> Result<Self> {
        let blobs = FsBlobStore::new(upload_dir)
            .map_err(|e| CliError::Storage(format!("{}: {}", upload_dir.display(), e)))?;
        let ledger = SqliteLedger::new(database, LedgerConfig::default())
            .map_err(|e| CliError::Storage(format!("{}: {}", database.display(), e)))?;

        let ledger = Arc::new(ledger);
        Ok(Self {
            pipeline: IngestionPipeline::new(
                blobs,
                Arc::clone(&ledger),
                DocxExtractor::default_config(),
            ),
            query: QuerySurface::new(ledger),
        })
    }

    /// Shared ledger handle
    pub fn ledger(&self) -> &SqliteLedger {
        self.pipeline.ledger()
    }
}
