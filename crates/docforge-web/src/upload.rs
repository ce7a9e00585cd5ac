//! Multipart form parsing for the upload endpoints.

use std::path::Path;

use axum::extract::Multipart;
use docforge_core::ExportFormat;

/// An uploaded file with its declared metadata.
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Parsed fields of the `/process` form.
pub struct ProcessForm {
    pub file: UploadedFile,
    pub export_format: ExportFormat,
    /// Accepted for API compatibility; OCR is fixed at engine construction.
    pub ocr_enabled: bool,
    pub extract_tables: bool,
    pub extract_images: bool,
    /// Accepted for API compatibility; layout is always preserved.
    pub preserve_layout: bool,
}

/// Parsed fields of the `/extract-page-images` form.
pub struct PageImagesForm {
    pub file: UploadedFile,
    pub max_pages: usize,
    pub dpi: u32,
}

pub async fn parse_process_form(mut multipart: Multipart) -> Result<ProcessForm, String> {
    let mut file: Option<UploadedFile> = None;
    let mut export_format = ExportFormat::Markdown;
    let mut ocr_enabled = true;
    let mut extract_tables = true;
    let mut extract_images = true;
    let mut preserve_layout = true;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form field: {}", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => file = Some(read_file_field(field).await?),
            "export_format" => {
                let val = read_text_field(field, "export_format").await?;
                export_format = ExportFormat::from_param(&val);
            }
            "ocr_enabled" => {
                ocr_enabled = parse_bool(&read_text_field(field, "ocr_enabled").await?, true);
            }
            "extract_tables" => {
                extract_tables =
                    parse_bool(&read_text_field(field, "extract_tables").await?, true);
            }
            "extract_images" => {
                extract_images =
                    parse_bool(&read_text_field(field, "extract_images").await?, true);
            }
            "preserve_layout" => {
                preserve_layout =
                    parse_bool(&read_text_field(field, "preserve_layout").await?, true);
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    let file = file.ok_or("No file uploaded")?;

    Ok(ProcessForm {
        file,
        export_format,
        ocr_enabled,
        extract_tables,
        extract_images,
        preserve_layout,
    })
}

pub async fn parse_page_images_form(mut multipart: Multipart) -> Result<PageImagesForm, String> {
    let mut file: Option<UploadedFile> = None;
    let mut max_pages: usize = 10;
    let mut dpi: u32 = 150;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form field: {}", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => file = Some(read_file_field(field).await?),
            "max_pages" => {
                if let Ok(v) = read_text_field(field, "max_pages").await?.trim().parse() {
                    max_pages = v;
                }
            }
            "dpi" => {
                if let Ok(v) = read_text_field(field, "dpi").await?.trim().parse() {
                    dpi = v;
                }
            }
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    let file = file.ok_or("No file uploaded")?;

    Ok(PageImagesForm {
        file,
        max_pages,
        dpi,
    })
}

async fn read_file_field(field: axum::extract::multipart::Field<'_>) -> Result<UploadedFile, String> {
    let filename = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().map(str::to_string);
    let data = field
        .bytes()
        .await
        .map_err(|e| format!("Failed to read file data: {}", e))?
        .to_vec();

    Ok(UploadedFile {
        filename,
        content_type,
        data,
    })
}

async fn read_text_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, String> {
    field
        .text()
        .await
        .map_err(|e| format!("Failed to read {}: {}", name, e))
}

/// Parse a form bool the way lenient HTTP clients send them.
fn parse_bool(value: &str, default: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => default,
    }
}

/// Temp-file suffix from the upload's filename extension. The engine
/// sniffs input format by extension, so the suffix must survive.
pub fn temp_suffix(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}
