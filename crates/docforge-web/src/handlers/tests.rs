use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use docforge_core::mock::MockEngine;
use docforge_core::{
    ConversionEngine, ConvertedDocument, Picture, Table, TableData, TextItem, TextLabel,
};
use docforge_mupdf::test_pdf::minimal_pdf;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::app;
use crate::state::AppState;

const BOUNDARY: &str = "----docforge-test-boundary";

fn app_with(engine: Arc<dyn ConversionEngine>) -> Router {
    app::router(Arc::new(AppState::with_engine(engine)))
}

fn rich_doc() -> ConvertedDocument {
    ConvertedDocument {
        page_count: Some(2),
        texts: Some(vec![
            TextItem {
                text: "Annual Report".into(),
                label: TextLabel::Title,
            },
            TextItem {
                text: "Revenue grew this year.".into(),
                label: TextLabel::Paragraph,
            },
        ]),
        tables: Some(vec![Table {
            data: Some(TableData {
                columns: vec!["quarter".into(), "revenue".into()],
                rows: vec![vec!["Q1".into(), "10".into()]],
            }),
            num_rows: 1,
            num_cols: 2,
        }]),
        pictures: Some(vec![Picture {
            caption: Some("Figure 1".into()),
            format: Some("png".into()),
        }]),
    }
}

fn file_part(name: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    out.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    out.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    out.extend_from_slice(data);
    out.extend_from_slice(b"\r\n");
    out
}

fn text_part(name: &str, value: &str) -> Vec<u8> {
    format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
        .into_bytes()
}

fn multipart_request(uri: &str, parts: &[Vec<u8>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(part);
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_is_always_healthy() {
    let app = app_with(Arc::new(MockEngine::failing("down")));
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "docforge-web");
}

#[tokio::test]
async fn root_reports_service_metadata() {
    let app = app_with(Arc::new(MockEngine::single_paragraph("x")));
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "docforge");
    assert_eq!(body["status"], "running");
    assert!(!body["supported_formats"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn process_success_has_content_and_no_error() {
    let app = app_with(Arc::new(MockEngine::returning(rich_doc())));
    let request = multipart_request(
        "/process",
        &[file_part("file", "report.pdf", "application/pdf", b"%PDF-fake")],
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["content"].as_str().unwrap().contains("# Annual Report"));
    assert!(body["error"].is_null());
    assert_eq!(body["sections"].as_array().unwrap().len(), 2);
    assert_eq!(body["tables"].as_array().unwrap().len(), 1);
    assert_eq!(body["images"].as_array().unwrap().len(), 1);
    assert_eq!(body["metadata"]["filename"], "report.pdf");
    assert_eq!(body["metadata"]["num_pages"], 2);
    assert!(body["processing_time_ms"].is_u64());
}

#[tokio::test]
async fn process_respects_extract_flags() {
    let app = app_with(Arc::new(MockEngine::returning(rich_doc())));
    let request = multipart_request(
        "/process",
        &[
            file_part("file", "report.pdf", "application/pdf", b"%PDF-fake"),
            text_part("extract_tables", "false"),
            text_part("extract_images", "0"),
        ],
    );
    let (_, body) = send(app, request).await;

    assert_eq!(body["success"], true);
    assert!(body["tables"].is_null());
    assert!(body["images"].is_null());
    assert!(!body["sections"].is_null());
}

#[tokio::test]
async fn process_unknown_format_falls_back_to_markdown() {
    let app = app_with(Arc::new(MockEngine::single_paragraph("hello")));
    let request = multipart_request(
        "/process",
        &[
            file_part("file", "doc.pdf", "application/pdf", b"%PDF-fake"),
            text_part("export_format", "yaml"),
        ],
    );
    let (_, body) = send(app, request).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["metadata"]["format"], "markdown");
    assert_eq!(body["content"], "hello");
}

#[tokio::test]
async fn process_without_file_reports_failure() {
    let app = app_with(Arc::new(MockEngine::single_paragraph("x")));
    let request = multipart_request("/process", &[text_part("export_format", "json")]);
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Processing failed:"), "got: {error}");
    assert!(error.contains("No file uploaded"));
    assert!(body["content"].is_null());
}

#[tokio::test]
async fn process_engine_error_reports_failure() {
    let app = app_with(Arc::new(MockEngine::failing("corrupt stream")));
    let request = multipart_request(
        "/process",
        &[file_part("file", "bad.pdf", "application/pdf", b"%PDF-fake")],
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Processing failed:"), "got: {error}");
    assert!(error.contains("corrupt stream"));
}

#[tokio::test]
async fn process_removes_temp_file() {
    let mock = Arc::new(MockEngine::single_paragraph("x"));
    let app = app_with(mock.clone());
    let request = multipart_request(
        "/process",
        &[file_part("file", "doc.pdf", "application/pdf", b"%PDF-fake")],
    );
    let (_, body) = send(app, request).await;
    assert_eq!(body["success"], true);

    let paths = mock.seen_paths();
    assert_eq!(paths.len(), 1);
    // Suffix carried the upload's extension, and the file is gone.
    assert_eq!(paths[0].extension().unwrap(), "pdf");
    assert!(!paths[0].exists());
}

#[tokio::test]
async fn process_url_without_url_reports_failure() {
    let app = app_with(Arc::new(MockEngine::single_paragraph("x")));
    let request = Request::builder()
        .method("POST")
        .uri("/process-url")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("URL processing failed:"), "got: {error}");
    assert!(error.contains("No URL provided"));
}

#[tokio::test]
async fn process_url_success_has_content_and_metadata_only() {
    // Serve a canned document from an ephemeral local port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let file_server = Router::new().route(
        "/doc.pdf",
        axum::routing::get(|| async { b"%PDF-fake".to_vec() }),
    );
    tokio::spawn(async move {
        axum::serve(listener, file_server).await.unwrap();
    });

    let app = app_with(Arc::new(MockEngine::returning(rich_doc())));
    let url = format!("http://{addr}/doc.pdf");
    let request = Request::builder()
        .method("POST")
        .uri(format!("/process-url?url={url}&export_format=markdown"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["content"].as_str().unwrap().contains("# Annual Report"));
    assert_eq!(body["metadata"]["source"], url);
    assert_eq!(body["metadata"]["format"], "markdown");
    assert!(body["error"].is_null());
    // URL requests carry content and metadata only
    assert!(body["sections"].is_null());
    assert!(body["tables"].is_null());
    assert!(body["images"].is_null());
}

#[tokio::test]
async fn extract_page_images_renders_pages() {
    let app = app_with(Arc::new(MockEngine::single_paragraph("x")));
    let request = multipart_request(
        "/extract-page-images",
        &[
            file_part("file", "doc.pdf", "application/pdf", &minimal_pdf(3)),
            text_part("max_pages", "2"),
            text_part("dpi", "72"),
        ],
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["num_pages"], 2);
    let images = body["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0]["page"], 1);
    assert_eq!(images[1]["page"], 2);
    assert_eq!(images[0]["format"], "png");
    assert!(images[0]["base64"].as_str().unwrap().len() > 100);
}

#[tokio::test]
async fn extract_page_images_rejects_non_pdf() {
    let app = app_with(Arc::new(MockEngine::single_paragraph("x")));
    let request = multipart_request(
        "/extract-page-images",
        &[file_part("file", "doc.pdf", "application/pdf", b"not a pdf")],
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Page extraction failed:"), "got: {error}");
    assert_eq!(body["num_pages"], 0);
    assert!(body["images"].as_array().unwrap().is_empty());
}
