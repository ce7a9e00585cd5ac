use axum::Json;

use crate::models::{HealthResponse, ServiceInfo};

pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "docforge",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        supported_formats: docforge_mupdf::SUPPORTED_FORMATS,
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "docforge-web",
        version: env!("CARGO_PKG_VERSION"),
    })
}
