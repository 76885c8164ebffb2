//! Same-origin relay: holds the upstream API key and forwards chat requests.

mod error;
mod routes;
mod upstream;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use reqwest::Url;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::core::config::RelayConfig;

pub use error::{ErrorBody, RelayError};
pub use routes::HealthReport;

/// Shared per-request state. The key never leaves this process.
#[derive(Clone)]
pub struct RelayState {
    http: reqwest::Client,
    upstream_url: Url,
    api_key: Arc<str>,
}

impl RelayState {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            upstream_url: config.upstream_url.clone(),
            api_key: Arc::from(config.api_key.as_str()),
        }
    }
}

/// Build the relay router.
pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/api/chat/{model}/{message}", get(routes::chat))
        .route("/api/meee/{*path}", get(routes::passthrough))
        .route("/health", get(routes::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until Ctrl+C.
pub async fn serve(config: RelayConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    let addr = listener.local_addr()?;
    log::info!("Relay config: {:?}", config);
    log::info!("Proxy server running on http://{}", addr);
    log::info!("Health check: http://{}/health", addr);

    axum::serve(listener, router(RelayState::new(&config)))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down relay");
}
