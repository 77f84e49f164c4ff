//! HTTP request handlers for the document service.
//!
//! Implements upload, listing, detail and health endpoints using axum.

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router as AxumRouter,
};
use mdx_domain::DocumentId;
use mdx_extractor::DocxExtractor;
use mdx_ingest::{
    DocumentDetailView, DocumentPage, DocumentView, IngestError, IngestionPipeline, QueryError,
    QuerySurface,
};
use mdx_store::{FsBlobStore, SqliteLedger};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::sync::Arc;
use tracing::{error, info};

/// Pipeline wired to the production collaborators
pub type Pipeline = IngestionPipeline<FsBlobStore, SqliteLedger, DocxExtractor>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Ingestion pipeline; uploads run on the blocking pool
    pub pipeline: Arc<Pipeline>,
    /// Read-only document views
    pub query: QuerySurface<SqliteLedger>,
    /// Largest accepted request body (bytes)
    pub max_upload_bytes: usize,
}

/// Query parameters for `GET /documents`
///
/// Signed so that negative values are reported as a bad request rather than
/// a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Page size
    pub limit: Option<i64>,
    /// Items to skip
    pub offset: Option<i64>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Malformed request
    BadRequest(String),
    /// Multipart body could not be read
    Upload(MultipartError),
    /// Ingestion failed before a document existed
    Ingest(IngestError),
    /// Read failed
    Query(QueryError),
    /// Internal server error
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upload(e) => (e.status(), e.body_text()),
            AppError::Ingest(e) => match e {
                IngestError::Input(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                IngestError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
                IngestError::NotRetryable { .. } => (StatusCode::CONFLICT, e.to_string()),
                IngestError::Storage(_) | IngestError::Persistence(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
            },
            AppError::Query(QueryError::NotFound(id)) => {
                (StatusCode::NOT_FOUND, format!("Document not found: {}", id))
            }
            AppError::Query(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %message, "request failed");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<IngestError> for AppError {
    fn from(e: IngestError) -> Self {
        AppError::Ingest(e)
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        AppError::Query(e)
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Upload(e)
    }
}

/// POST /documents - Upload a file for ingestion
///
/// Responds once the document has settled at `done` or `failed`.
async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentView>), AppError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("file field has no filename".to_string()))?;
        let bytes = field.bytes().await?;
        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) =
        upload.ok_or_else(|| AppError::BadRequest("missing file field".to_string()))?;

    // Runs to completion even if the client disconnects
    let pipeline = Arc::clone(&state.pipeline);
    let query = state.query.clone();
    let view = tokio::task::spawn_blocking(move || -> Result<DocumentView, AppError> {
        let id = pipeline.ingest(&filename, &mut Cursor::new(bytes))?;
        Ok(query.get(id)?.document)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("ingestion task failed: {}", e)))??;

    info!(document_id = %view.id, status = %view.status, "upload ingested");
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /documents - List documents, newest first
async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<DocumentPage>, AppError> {
    let max = state.query.max_limit();
    let limit = match params.limit {
        None => None,
        Some(limit) if (1..=i64::from(max)).contains(&limit) => Some(limit as u32),
        Some(_) => {
            return Err(AppError::BadRequest(format!(
                "limit must be between 1 and {}",
                max
            )))
        }
    };
    let offset = match params.offset {
        None => None,
        Some(offset) if offset >= 0 => Some(offset as u64),
        Some(_) => return Err(AppError::BadRequest("offset must be >= 0".to_string())),
    };

    Ok(Json(state.query.list(limit, offset)?))
}

/// GET /documents/:id - One document with its core fields
async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentDetailView>, AppError> {
    let id = DocumentId::from_string(&id)
        .map_err(|e| AppError::BadRequest(format!("invalid document id: {}", e)))?;
    Ok(Json(state.query.get(id)?))
}

/// GET /health - Liveness check
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    let body_limit = state.max_upload_bytes;
    AxumRouter::new()
        .route("/documents", get(list_documents).post(upload_document))
        .route("/documents/:id", get(get_document))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
