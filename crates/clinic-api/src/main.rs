//! Clinic REST API server binary.

use std::sync::Arc;

use clinic_api::config::{ApiConfig, DEFAULT_LOG_FILTER};
use clinic_api::{app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Starts the REST server on the configured address.
///
/// # Errors
/// Returns an error if:
/// - the database cannot be opened or its schema applied,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();
    let db = Arc::new(config.open_database()?);

    if config.api_key.is_none() {
        tracing::warn!("CLINIC_API_KEY not set; /v1 routes accept unauthenticated requests");
    }

    let state = AppState::new(db, config.api_key.clone());

    tracing::info!("-- Starting clinic REST API on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
