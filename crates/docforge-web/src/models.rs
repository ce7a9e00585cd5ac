use docforge_mupdf::PageImage;
use serde::Serialize;

// ── Processing response (shared by /process and /process-url) ───────────
//
// Optional fields serialize as explicit `null` rather than being omitted:
// callers distinguish "collection not applicable" (null) from "collection
// present but empty" by the difference, and rely on `content`/`error`
// being mutually exclusive.

#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResponse {
    pub success: bool,
    pub content: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub sections: Option<Vec<SectionJson>>,
    pub tables: Option<Vec<TableJson>>,
    pub images: Option<Vec<ImageJson>>,
    pub error: Option<String>,
    pub processing_time_ms: u64,
}

impl ProcessingResponse {
    pub fn failure(error: String, processing_time_ms: u64) -> Self {
        Self {
            success: false,
            content: None,
            metadata: None,
            sections: None,
            tables: None,
            images: None,
            error: Some(error),
            processing_time_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionJson {
    pub index: usize,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableJson {
    pub index: usize,
    /// Cell data keyed by column name; an empty object when the engine
    /// detected the table but recovered no cells.
    pub data: serde_json::Value,
    pub num_rows: usize,
    pub num_cols: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageJson {
    pub index: usize,
    pub caption: Option<String>,
    pub format: Option<String>,
}

// ── Page image extraction ───────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PageImagesResponse {
    pub success: bool,
    /// Pages attempted: `min(total pages, max_pages)`. Skipped pages are
    /// still counted here.
    pub num_pages: usize,
    pub images: Vec<PageImage>,
    pub error: Option<String>,
    pub processing_time_ms: u64,
}

impl PageImagesResponse {
    pub fn failure(error: String, processing_time_ms: u64) -> Self {
        Self {
            success: false,
            num_pages: 0,
            images: Vec::new(),
            error: Some(error),
            processing_time_ms,
        }
    }
}

// ── Service metadata ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub supported_formats: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}
