//! PDF page rasterization: render the first pages of a PDF to base64 PNGs.
//!
//! The zoom factor is `dpi / 72` — 72 DPI is MuPDF's base resolution, so a
//! 150 DPI request scales every page dimension by 150/72. A page that
//! fails to render is logged and skipped; partial output is normal and the
//! caller still learns how many pages were attempted.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use mupdf::{Colorspace, Document, ImageFormat, Matrix};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("not a PDF file")]
    NotAPdf,
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to read page count: {0}")]
    PageCount(String),
}

/// One rendered page, ready for a JSON response.
#[derive(Debug, Clone, Serialize)]
pub struct PageImage {
    /// 1-based page number.
    pub page: usize,
    pub width: u32,
    pub height: u32,
    pub format: &'static str,
    pub base64: String,
}

/// The outcome of a rasterization run. `num_pages` counts the pages that
/// were attempted (`min(total, max_pages)`), not the pages that succeeded,
/// so callers can tell when pages were skipped.
#[derive(Debug)]
pub struct PageImageSet {
    pub num_pages: usize,
    pub images: Vec<PageImage>,
}

/// Render up to `max_pages` pages of the PDF in `bytes` at `dpi`.
///
/// Blocking — wrap in `spawn_blocking` on an async runtime.
pub fn render_page_images(
    bytes: &[u8],
    max_pages: usize,
    dpi: u32,
) -> Result<PageImageSet, RenderError> {
    if !bytes.starts_with(b"%PDF-") {
        return Err(RenderError::NotAPdf);
    }

    let document =
        Document::from_bytes(bytes, "pdf").map_err(|e| RenderError::Open(e.to_string()))?;

    let total_pages = document
        .page_count()
        .map_err(|e| RenderError::PageCount(e.to_string()))? as usize;

    let num_pages = total_pages.min(max_pages);
    let zoom = dpi as f32 / 72.0;

    let mut images = Vec::with_capacity(num_pages);
    for idx in 0..num_pages {
        match render_single(&document, idx, zoom) {
            Ok(image) => {
                debug!(page = image.page, width = image.width, height = image.height, "rendered page");
                images.push(image);
            }
            Err(e) => {
                warn!(page = idx + 1, error = %e, "failed to render page, skipping");
            }
        }
    }

    Ok(PageImageSet { num_pages, images })
}

fn render_single(document: &Document, idx: usize, zoom: f32) -> Result<PageImage, mupdf::Error> {
    let page = document.load_page(idx as i32)?;
    let matrix = Matrix::new_scale(zoom, zoom);
    let pixmap = page.to_pixmap(&matrix, &Colorspace::device_rgb(), false, false)?;

    let mut png = Vec::new();
    pixmap.write_to(&mut png, ImageFormat::PNG)?;

    Ok(PageImage {
        page: idx + 1,
        width: pixmap.width() as u32,
        height: pixmap.height() as u32,
        format: "png",
        base64: STANDARD.encode(&png),
    })
}
