use std::path::Path;

use thiserror::Error;

use crate::ConvertedDocument;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to open document: {0}")]
    Open(String),
    #[error("failed to extract content: {0}")]
    Extraction(String),
    #[error("failed to export document: {0}")]
    Export(String),
    #[error("failed to fetch '{url}': {reason}")]
    Fetch { url: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fixed engine configuration, read from the environment once when the
/// engine is constructed. Per-request flags never reconfigure a live
/// engine; construction is the only point where these apply.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// OCR costs a few hundred MB of resident memory, so it is opt-in.
    pub ocr_enabled: bool,
    /// Table structure recovery is cheap and always on.
    pub table_structure: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            ocr_enabled: false,
            table_structure: true,
        }
    }
}

impl EngineOptions {
    /// Read options from the environment (`DOCFORGE_ENABLE_OCR`).
    pub fn from_env() -> Self {
        let ocr_enabled = std::env::var("DOCFORGE_ENABLE_OCR")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self {
            ocr_enabled,
            table_structure: true,
        }
    }
}

/// Trait for document conversion engines.
///
/// Implementors own the document understanding step entirely; the service
/// layer only marshals uploads to a path, calls [`convert`](Self::convert)
/// and reshapes the result. `convert` blocks — callers on an async runtime
/// wrap it in `spawn_blocking`.
pub trait ConversionEngine: Send + Sync {
    /// Short engine identifier for logs and service metadata.
    fn name(&self) -> &str;

    /// Input formats this engine can open, as display strings.
    fn supported_formats(&self) -> &[&'static str];

    /// Parse the file at `path` into a structured document.
    fn convert(&self, path: &Path) -> Result<ConvertedDocument, EngineError>;
}
