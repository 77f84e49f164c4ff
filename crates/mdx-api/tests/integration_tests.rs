//! Integration tests for the HTTP service

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use mdx_api::{
    build_state,
    config::ServiceConfig,
    handlers::{create_router, ErrorResponse, HealthCheckResponse},
};
use mdx_extractor::fixtures::DocxBuilder;
use mdx_ingest::{DocumentDetailView, DocumentPage, DocumentView};
use serde::de::DeserializeOwned;
use tempfile::TempDir;
use tower::ServiceExt; // for oneshot

const BOUNDARY: &str = "mdx-test-boundary";

/// Helper to create a router over scratch storage
fn create_test_app() -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    let config = ServiceConfig::default_test_config(dir.path());
    let app = create_router(build_state(&config).unwrap());
    (dir, app)
}

fn multipart_body(field: &str, filename: Option<&str>, bytes: &[u8]) -> Vec<u8> {
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
        None => format!("form-data; name=\"{}\"", field),
    };
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(field: &str, filename: Option<&str>, bytes: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/documents")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field, filename, bytes)))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send<T: DeserializeOwned>(app: &Router, request: Request<Body>) -> (StatusCode, T) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn upload(app: &Router, filename: &str, bytes: &[u8]) -> DocumentView {
    let (status, view) = send(app, upload_request("file", Some(filename), bytes)).await;
    assert_eq!(status, StatusCode::CREATED);
    view
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let (_dir, app) = create_test_app();

    let (status, health): (_, HealthCheckResponse) = send(&app, get_request("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_upload_valid_document() {
    let (_dir, app) = create_test_app();
    let bytes = DocxBuilder::new().title("Quarterly Report").build().unwrap();

    let view = upload(&app, "report.docx", &bytes).await;
    assert_eq!(view.status, "done");
    assert_eq!(view.original_filename, "report.docx");
    assert!(view.storage_url.ends_with(&format!("{}.docx", view.id)));

    let (status, detail): (_, DocumentDetailView) =
        send(&app, get_request(&format!("/documents/{}", view.id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail.document.id, view.id);
    assert_eq!(detail.core["title"], "Quarterly Report");
}

#[tokio::test]
async fn test_upload_zero_byte_document_is_created_failed() {
    let (_dir, app) = create_test_app();

    let view = upload(&app, "x.docx", b"").await;
    assert_eq!(view.status, "failed");
    assert!(!view.error_message.unwrap_or_default().is_empty());

    let (_, detail): (_, DocumentDetailView) =
        send(&app, get_request(&format!("/documents/{}", view.id))).await;
    assert_eq!(detail.core, serde_json::json!({}));
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let (_dir, app) = create_test_app();

    let (status, error): (_, ErrorResponse) =
        send(&app, upload_request("attachment", Some("a.docx"), b"data")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error.error.contains("file"));
}

#[tokio::test]
async fn test_upload_without_filename() {
    let (_dir, app) = create_test_app();

    let (status, _): (_, ErrorResponse) = send(&app, upload_request("file", None, b"data")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, page): (_, DocumentPage) = send(&app, get_request("/documents")).await;
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_list_documents_newest_first() {
    let (_dir, app) = create_test_app();
    let bytes = DocxBuilder::new().build().unwrap();

    let mut ids = Vec::new();
    for i in 0..10 {
        ids.push(upload(&app, &format!("doc-{}.docx", i), &bytes).await.id);
    }

    let (status, page): (_, DocumentPage) = send(&app, get_request("/documents?limit=5")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.limit, 5);
    assert_eq!(page.offset, 0);

    let returned: Vec<String> = page.items.into_iter().map(|d| d.id).collect();
    let expected: Vec<String> = ids.iter().rev().take(5).cloned().collect();
    assert_eq!(returned, expected);

    let (_, page): (_, DocumentPage) =
        send(&app, get_request("/documents?limit=5&offset=8")).await;
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn test_list_defaults() {
    let (_dir, app) = create_test_app();

    let (status, page): (_, DocumentPage) = send(&app, get_request("/documents")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.limit, 20);
    assert_eq!(page.offset, 0);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_list_rejects_out_of_range_parameters() {
    let (_dir, app) = create_test_app();

    for uri in [
        "/documents?limit=0",
        "/documents?limit=201",
        "/documents?limit=-3",
        "/documents?offset=-1",
    ] {
        let (status, error): (_, ErrorResponse) = send(&app, get_request(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(!error.error.is_empty());
    }

    let (status, _): (_, DocumentPage) = send(&app, get_request("/documents?limit=200")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_unknown_document() {
    let (_dir, app) = create_test_app();

    let (status, error): (_, ErrorResponse) = send(
        &app,
        get_request("/documents/00000000-0000-4000-8000-000000000000"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error.error.contains("not found"));
}

#[tokio::test]
async fn test_get_malformed_id() {
    let (_dir, app) = create_test_app();

    let (status, _): (_, ErrorResponse) = send(&app, get_request("/documents/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_over_body_limit() {
    let dir = TempDir::new().unwrap();
    let mut config = ServiceConfig::default_test_config(dir.path());
    config.max_upload_bytes = 1024;
    let app = create_router(build_state(&config).unwrap());

    let response = app
        .oneshot(upload_request("file", Some("big.docx"), &vec![0u8; 8192]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
