//! MDExtractor HTTP service
//!
//! Accepts `.docx` uploads, runs them through the ingestion pipeline, and
//! serves the resulting documents and their core metadata as JSON.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServiceConfig;
use handlers::{create_router, AppState};
use mdx_extractor::DocxExtractor;
use mdx_ingest::{IngestionPipeline, QuerySurface};
use mdx_store::{FsBlobStore, SqliteLedger};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Service error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Blob store or ledger could not be opened
    #[error("Storage error: {0}")]
    Storage(String),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the configured filter.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A subscriber may already be installed (tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Open storage and wire the pipeline and query surface
pub fn build_state(config: &ServiceConfig) -> Result<AppState, ServerError> {
    let blobs = FsBlobStore::new(&config.upload_dir)
        .map_err(|e| ServerError::Storage(format!("{}: {}", config.upload_dir.display(), e)))?;
    let ledger = SqliteLedger::new(&config.database_path, config.ledger.clone())
        .map_err(|e| ServerError::Storage(format!("{}: {}", config.database_path.display(), e)))?;
    let extractor = DocxExtractor::new(config.extractor.clone())
        .map_err(|e| ServerError::Server(e.to_string()))?;

    let ledger = Arc::new(ledger);
    let query = QuerySurface::new(Arc::clone(&ledger)).with_max_limit(config.ledger.max_list_limit);
    let pipeline = IngestionPipeline::new(blobs, ledger, extractor);

    Ok(AppState {
        pipeline: Arc::new(pipeline),
        query,
        max_upload_bytes: config.max_upload_bytes,
    })
}

/// Start the HTTP server
///
/// Opens storage, builds the router and serves until the process exits.
pub async fn start_server(config: ServiceConfig) -> Result<(), ServerError> {
    info!("Starting MDExtractor service");
    info!("Database: {}", config.database_path.display());
    info!("Upload directory: {}", config.upload_dir.display());

    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_creates_storage() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ServiceConfig::default_test_config(dir.path());

        let state = build_state(&config).unwrap();
        assert!(dir.path().join("uploads").is_dir());
        assert!(dir.path().join("test.db").exists());
        assert_eq!(state.query.max_limit(), 200);
    }
}
