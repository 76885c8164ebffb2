//! Relay route handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::core::assistant::{MAX_CONTENT_BYTES, read_capped};

use super::RelayState;
use super::error::RelayError;
use super::upstream;

/// Payload of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: String,
}

impl HealthReport {
    pub fn now() -> Self {
        Self {
            status: "OK".to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

pub async fn health() -> Json<HealthReport> {
    Json(HealthReport::now())
}

/// `GET /api/chat/{model}/{message}`: forward to the upstream with the key injected.
pub async fn chat(
    State(state): State<RelayState>,
    Path((model, message)): Path<(String, String)>,
) -> Result<Response, RelayError> {
    let url = upstream::chat_url(&state.upstream_url, &model, &message, &state.api_key)?;
    log::info!(
        "Proxying request to: {}",
        upstream::redact(&url, &state.api_key)
    );
    forward(&state, url).await
}

/// `GET /api/meee/{*path}`: development passthrough, no key injected.
pub async fn passthrough(
    State(state): State<RelayState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, RelayError> {
    let url = upstream::passthrough_url(&state.upstream_url, &path, query.as_deref())?;
    log::info!("Passthrough request to: {}", url);
    forward(&state, url).await
}

/// The request URL carries the key, so it is stripped before logging.
fn transport_error(e: reqwest::Error) -> RelayError {
    let e = e.without_url();
    log::error!("Proxy error: {}", e);
    RelayError::Transport(e)
}

async fn forward(state: &RelayState, url: reqwest::Url) -> Result<Response, RelayError> {
    let res = state.http.get(url).send().await.map_err(transport_error)?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        log::error!("API Error: {} - {}", status.as_u16(), body);
        return Err(RelayError::Upstream(status.as_u16()));
    }

    let content_type = res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if content_type.starts_with("text/event-stream") {
        let mut out = Response::new(Body::from_stream(res.bytes_stream()));
        let headers = out.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/event-stream"),
        );
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-transform"),
        );
        headers.insert("x-accel-buffering", HeaderValue::from_static("no"));
        return Ok(out);
    }

    let (text, truncated) = read_capped(res, MAX_CONTENT_BYTES)
        .await
        .map_err(transport_error)?;
    if truncated {
        log::warn!("Upstream reply exceeded {} bytes; truncated", MAX_CONTENT_BYTES);
    }
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    )
        .into_response())
}
