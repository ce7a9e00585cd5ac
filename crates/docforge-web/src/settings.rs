//! Environment-derived server settings.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub const DEFAULT_PORT: u16 = 8001;
const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:3001";

/// Hosting platforms set at least one of these; their presence means we
/// are not running on a developer machine.
const PLATFORM_VARS: [&str; 6] = [
    "RAILWAY_ENVIRONMENT_NAME",
    "RAILWAY_ENVIRONMENT",
    "RAILWAY_STATIC_URL",
    "FLY_APP_NAME",
    "RENDER",
    "VERCEL",
];

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    /// Selects the production log format (compact, no ANSI).
    pub is_production: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup; `from_env` is the
    /// thin wrapper over the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let on_platform = PLATFORM_VARS
            .iter()
            .any(|var| lookup(var).is_some_and(|v| !v.is_empty()));

        // A non-default PORT means the port was assigned by a deployment
        // environment, so treat that as production too.
        let is_production = on_platform || port != DEFAULT_PORT;

        Self {
            host,
            port,
            allowed_origins,
            is_production,
        }
    }

    /// CORS layer for the configured origins, with credentials. Methods
    /// and headers are explicit because tower-http rejects wildcards in
    /// combination with credentials.
    pub fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse::<HeaderValue>().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
    }
}
