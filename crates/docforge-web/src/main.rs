mod app;
mod fetch;
mod handlers;
mod models;
mod settings;
mod shape;
mod state;
mod upload;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    init_tracing(settings.is_production);

    let state = Arc::new(AppState::new());
    let router = app::router(state).layer(settings.cors_layer());

    let addr = SocketAddr::new(
        settings.host.parse().context("invalid HOST address")?,
        settings.port,
    );

    info!(%addr, production = settings.is_production, "starting docforge");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

fn init_tracing(production: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if production {
        builder.compact().with_ansi(false).init();
    } else {
        builder.init();
    }
}
