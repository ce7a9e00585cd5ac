use std::path::Path;

use mupdf::{Document, TextPageFlags};
use tracing::info;

use docforge_core::{ConversionEngine, ConvertedDocument, EngineError, EngineOptions, TextItem, TextLabel};

pub mod render;

pub use render::{PageImage, PageImageSet, RenderError, render_page_images};

/// Input formats MuPDF can open, as advertised in service metadata.
pub const SUPPORTED_FORMATS: &[&str] = &[
    "PDF",
    "XPS",
    "EPUB",
    "MOBI",
    "CBZ",
    "Images (PNG, JPEG, TIFF, BMP)",
];

/// MuPDF-based implementation of [`ConversionEngine`].
///
/// This crate is the sole AGPL island — it isolates the mupdf dependency
/// (which is AGPL-3.0) so that the service and seam crates do not
/// transitively depend on it for anything but this engine.
///
/// Text comes out as one item per MuPDF text block in reading order.
/// MuPDF recovers no table structure and no picture inventory, so those
/// collections are reported as absent rather than empty.
pub struct MupdfEngine {
    options: EngineOptions,
}

impl MupdfEngine {
    /// Construct the engine with a fixed configuration. The options never
    /// change for the lifetime of the engine.
    pub fn new(options: EngineOptions) -> Self {
        info!(
            ocr = options.ocr_enabled,
            table_structure = options.table_structure,
            "MuPDF engine initialized"
        );
        Self { options }
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }
}

impl ConversionEngine for MupdfEngine {
    fn name(&self) -> &str {
        "mupdf"
    }

    fn supported_formats(&self) -> &[&'static str] {
        SUPPORTED_FORMATS
    }

    fn convert(&self, path: &Path) -> Result<ConvertedDocument, EngineError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| EngineError::Open("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| EngineError::Open(e.to_string()))?;

        let page_count = document
            .page_count()
            .map_err(|e| EngineError::Extraction(e.to_string()))? as usize;

        let mut texts: Vec<TextItem> = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| EngineError::Extraction(e.to_string()))?
        {
            let page = page_result.map_err(|e| EngineError::Extraction(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| EngineError::Extraction(e.to_string()))?;

            for block in text_page.blocks() {
                let mut block_text = String::new();
                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    block_text.push_str(line_text.trim_end());
                    block_text.push('\n');
                }
                let trimmed = block_text.trim();
                if !trimmed.is_empty() {
                    texts.push(TextItem {
                        text: trimmed.to_string(),
                        label: TextLabel::Paragraph,
                    });
                }
            }
        }

        Ok(ConvertedDocument {
            page_count: Some(page_count),
            texts: Some(texts),
            // MuPDF does not expose table structure or a picture list;
            // absent, not empty.
            tables: None,
            pictures: None,
        })
    }
}

/// Test-support PDF generation, shared with dependent crates' tests via
/// the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
pub mod test_pdf {
    /// Build a minimal n-page PDF with one line of text per page.
    /// Offsets in the xref table are computed from the actual byte
    /// positions, so the output is well-formed for any page count.
    pub fn minimal_pdf(pages: usize) -> Vec<u8> {
        let kids: Vec<String> = (0..pages).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();

        let mut objects: Vec<(usize, String)> = vec![
            (1, "<< /Type /Catalog /Pages 2 0 R >>".to_string()),
            (
                2,
                format!(
                    "<< /Type /Pages /Kids [{}] /Count {} >>",
                    kids.join(" "),
                    pages
                ),
            ),
            (
                3,
                "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
            ),
        ];

        for i in 0..pages {
            let content = format!("BT /F1 24 Tf 72 712 Td (Hello page {}) Tj ET", i + 1);
            objects.push((
                4 + 2 * i,
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                     /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                    5 + 2 * i
                ),
            ));
            objects.push((
                5 + 2 * i,
                format!(
                    "<< /Length {} >>\nstream\n{}\nendstream",
                    content.len(),
                    content
                ),
            ));
        }

        objects.sort_by_key(|(id, _)| *id);

        let mut out: Vec<u8> = b"%PDF-1.4\n".to_vec();
        let mut offsets = vec![0usize; objects.len() + 1];
        for (id, body) in &objects {
            offsets[*id] = out.len();
            out.extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
        }

        let xref_pos = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for id in 1..=objects.len() {
            out.extend_from_slice(format!("{:010} 00000 n \n", offsets[id]).as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref_pos
            )
            .as_bytes(),
        );
        out
    }
}
