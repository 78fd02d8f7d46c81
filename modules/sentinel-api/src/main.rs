use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ai_client::Gemini;
use sentinel_api::{build_router, AppState, Narrator};
use sentinel_common::Config;
use sentinel_store::JsonFileStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    info!("Starting sentinel-api");

    let config = Config::from_env().context("Invalid configuration")?;

    let store = JsonFileStore::open(&config.db_path)
        .await
        .with_context(|| format!("Failed to open store at {}", config.db_path.display()))?;

    let narrator = match &config.gemini_api_key {
        Some(key) => {
            let gemini = Gemini::new(key, &config.gemini_model)
                .with_timeout(config.ai_timeout)
                .with_temperature(0.2)
                .json_output();
            info!(model = %config.gemini_model, "AI narratives enabled");
            Narrator::new(Arc::new(gemini), config.ai_timeout)
        }
        None => {
            warn!("GEMINI_API_KEY not set, AI narratives will use the fallback");
            Narrator::disabled()
        }
    };

    let state = AppState::new(Arc::new(store), Arc::new(narrator));
    let app = build_router(state, &config.allowed_origins);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Sentinel City API listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
