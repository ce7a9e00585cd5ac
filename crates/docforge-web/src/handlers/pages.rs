//! PDF page rasterization endpoint.

use std::time::Instant;

use axum::Json;
use axum::extract::Multipart;
use docforge_mupdf::render_page_images;
use tracing::debug;

use crate::handlers::elapsed_ms;
use crate::models::PageImagesResponse;
use crate::upload::{self, PageImagesForm};

pub async fn extract_page_images(multipart: Multipart) -> Json<PageImagesResponse> {
    let started = Instant::now();
    match handle_extract_page_images(multipart).await {
        Ok(mut response) => {
            response.processing_time_ms = elapsed_ms(started);
            Json(response)
        }
        Err(e) => Json(PageImagesResponse::failure(
            format!("Page extraction failed: {e}"),
            elapsed_ms(started),
        )),
    }
}

async fn handle_extract_page_images(
    multipart: Multipart,
) -> Result<PageImagesResponse, String> {
    let PageImagesForm {
        file,
        max_pages,
        dpi,
    } = upload::parse_page_images_form(multipart).await?;

    debug!(
        filename = %file.filename,
        size = file.data.len(),
        max_pages,
        dpi,
        "rasterizing pages"
    );

    let set = tokio::task::spawn_blocking(move || render_page_images(&file.data, max_pages, dpi))
        .await
        .map_err(|e| format!("render task failed: {e}"))?
        .map_err(|e| e.to_string())?;

    Ok(PageImagesResponse {
        success: true,
        num_pages: set.num_pages,
        images: set.images,
        error: None,
        processing_time_ms: 0,
    })
}
