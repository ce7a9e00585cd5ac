use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Upload size cap: 100 MB.
const MAX_BODY_BYTES: usize = 100 * 1024 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::info::root))
        .route("/health", get(handlers::info::health))
        .route("/process", post(handlers::process::process))
        .route("/process-url", post(handlers::process::process_url))
        .route(
            "/extract-page-images",
            post(handlers::pages::extract_page_images),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
