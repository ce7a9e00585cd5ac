//! Document processing endpoints: multipart upload and URL fetch.
//!
//! Both endpoints always answer HTTP 200; failures are reported in the
//! body with `success: false` and an `error` message, so clients branch
//! on the payload rather than the status code.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Json;
use axum::extract::{Multipart, Query, State};
use docforge_core::{ConversionEngine, ConvertedDocument, ExportFormat, export};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::fetch::fetch_to_temp;
use crate::handlers::elapsed_ms;
use crate::models::ProcessingResponse;
use crate::shape;
use crate::state::AppState;
use crate::upload::{self, ProcessForm};

const URL_FETCH_TIMEOUT: Duration = Duration::from_secs(120);

pub async fn process(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Json<ProcessingResponse> {
    let started = Instant::now();
    match handle_process(&state, multipart).await {
        Ok(mut response) => {
            response.processing_time_ms = elapsed_ms(started);
            Json(response)
        }
        Err(e) => Json(ProcessingResponse::failure(
            format!("Processing failed: {e}"),
            elapsed_ms(started),
        )),
    }
}

async fn handle_process(
    state: &AppState,
    multipart: Multipart,
) -> Result<ProcessingResponse, String> {
    let ProcessForm {
        file,
        export_format,
        ocr_enabled,
        extract_tables,
        extract_images,
        preserve_layout,
    } = upload::parse_process_form(multipart).await?;

    debug!(
        filename = %file.filename,
        size = file.data.len(),
        format = export_format.as_str(),
        ocr_enabled,
        extract_tables,
        extract_images,
        preserve_layout,
        "processing upload"
    );

    // The engine opens files by path, so the upload goes through a temp
    // file. The suffix carries the upload's extension for format sniffing.
    let suffix = upload::temp_suffix(&file.filename);
    let tmp = tempfile::Builder::new()
        .prefix("docforge-")
        .suffix(&suffix)
        .tempfile()
        .map_err(|e| format!("Failed to create temp file: {e}"))?;
    std::fs::write(tmp.path(), &file.data)
        .map_err(|e| format!("Failed to write temp file: {e}"))?;

    let doc = convert_blocking(state.engine(), tmp.path().to_path_buf()).await?;

    // Remove the temp file as soon as conversion is done; Drop covers the
    // error paths above.
    if let Err(e) = tmp.close() {
        warn!(error = %e, "failed to remove temp file");
    }

    let content = export(&doc, export_format).map_err(|e| e.to_string())?;

    let metadata = json!({
        "filename": file.filename,
        "content_type": file.content_type,
        "size_bytes": file.data.len(),
        "num_pages": doc.page_count,
        "format": export_format.as_str(),
    });

    Ok(ProcessingResponse {
        success: true,
        content: Some(content),
        metadata: Some(metadata),
        sections: shape::sections(&doc),
        tables: shape::tables(&doc, extract_tables),
        images: shape::images(&doc, extract_images),
        error: None,
        // Filled in by the caller from the full request duration.
        processing_time_ms: 0,
    })
}

/// Parameters for `/process-url`, accepted from the query string, a JSON
/// body, or both; query values win when both are present.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessUrlParams {
    pub url: Option<String>,
    pub export_format: Option<String>,
}

impl ProcessUrlParams {
    fn or(self, fallback: Self) -> Self {
        Self {
            url: self.url.or(fallback.url),
            export_format: self.export_format.or(fallback.export_format),
        }
    }
}

pub async fn process_url(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProcessUrlParams>,
    body: Option<Json<ProcessUrlParams>>,
) -> Json<ProcessingResponse> {
    let started = Instant::now();
    let params = query.or(body.map(|Json(b)| b).unwrap_or_default());

    match handle_process_url(&state, params).await {
        Ok(mut response) => {
            response.processing_time_ms = elapsed_ms(started);
            Json(response)
        }
        Err(e) => Json(ProcessingResponse::failure(
            format!("URL processing failed: {e}"),
            elapsed_ms(started),
        )),
    }
}

async fn handle_process_url(
    state: &AppState,
    params: ProcessUrlParams,
) -> Result<ProcessingResponse, String> {
    let url = params.url.ok_or("No URL provided")?;
    let export_format = ExportFormat::from_param(params.export_format.as_deref().unwrap_or(""));

    debug!(url = %url, format = export_format.as_str(), "processing remote document");

    let fetched = fetch_to_temp(&url, URL_FETCH_TIMEOUT)
        .await
        .map_err(|e| e.to_string())?;
    let doc = convert_blocking(state.engine(), fetched.path.clone()).await?;
    // Dropping removes the downloaded file and its directory.
    drop(fetched);

    let content = export(&doc, export_format).map_err(|e| e.to_string())?;

    let metadata = json!({
        "source": url,
        "num_pages": doc.page_count,
        "format": export_format.as_str(),
    });

    // URL requests carry content and metadata only; the structured
    // collections stay null.
    Ok(ProcessingResponse {
        success: true,
        content: Some(content),
        metadata: Some(metadata),
        sections: None,
        tables: None,
        images: None,
        error: None,
        processing_time_ms: 0,
    })
}

/// Run the blocking engine conversion off the async runtime.
async fn convert_blocking(
    engine: Arc<dyn ConversionEngine>,
    path: PathBuf,
) -> Result<ConvertedDocument, String> {
    tokio::task::spawn_blocking(move || engine.convert(&path))
        .await
        .map_err(|e| format!("conversion task failed: {e}"))?
        .map_err(|e| e.to_string())
}
