//! Live HTTP servers for tests: a fake upstream and an in-process relay in front of it.

use std::convert::Infallible;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::{Path, RawQuery};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use futures::{StreamExt, stream};
use reqwest::Url;

use crate::core::config::RelayConfig;
use crate::core::models::ModelInfo;
use crate::relay;

pub const TEST_KEY: &str = "test-key";

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{}", addr)).unwrap()
}

/// Upstream stand-in. Behavior depends on the model segment:
///
/// * `a4`: plain text `echo: {message}`
/// * `json`: OpenAI-style completion JSON
/// * `sse`: event stream `Hel`, `lo`, `[DONE]`
/// * `empty`: empty body
/// * `broken`: 503
/// * `endless`: event stream of 8 KiB `data:` events that never ends
/// * `endless-text`: plain text body that never ends
/// * `stall`: event stream `partial`, then nothing
/// * `cut`: event stream `partial`, then the connection fails
///
/// Any key other than [`TEST_KEY`] gets 401.
pub fn fake_upstream() -> Router {
    Router::new()
        .route("/chat/{model}/{message}/{key}", get(fake_chat))
        .route(
            "/models",
            get(|RawQuery(q): RawQuery| async move { format!("models?{}", q.unwrap_or_default()) }),
        )
}

async fn fake_chat(Path((model, message, key)): Path<(String, String, String)>) -> Response {
    if key != format!("key={}", TEST_KEY) {
        return (StatusCode::UNAUTHORIZED, "bad key").into_response();
    }
    match model.as_str() {
        "json" => (
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"choices":[{"message":{"role":"assistant","content":"json reply"}}]}"#,
        )
            .into_response(),
        "sse" => (
            [(header::CONTENT_TYPE, "text/event-stream")],
            "data: Hel\n\n: ping\n\ndata: lo\n\ndata: [DONE]\n\n",
        )
            .into_response(),
        "endless" => {
            let event = Bytes::from(format!("data: {}\n\n", "x".repeat(8 * 1024)));
            event_stream(Body::from_stream(stream::repeat(Ok::<_, Infallible>(event))))
        }
        "endless-text" => {
            let piece = Bytes::from("x".repeat(8 * 1024));
            Body::from_stream(stream::repeat(Ok::<_, Infallible>(piece))).into_response()
        }
        "stall" => {
            let first = stream::once(async { Ok::<_, Infallible>(Bytes::from_static(PARTIAL)) });
            event_stream(Body::from_stream(first.chain(stream::pending())))
        }
        "cut" => {
            let pieces = stream::iter([
                Ok(Bytes::from_static(PARTIAL)),
                Err(std::io::Error::other("upstream went away")),
            ])
            .then(|piece| async move {
                if piece.is_err() {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
                piece
            });
            event_stream(Body::from_stream(pieces))
        }
        "empty" => "".into_response(),
        "broken" => (StatusCode::SERVICE_UNAVAILABLE, "down").into_response(),
        _ => format!("echo: {}", message).into_response(),
    }
}

const PARTIAL: &[u8] = b"data: partial\n\n";

fn event_stream(body: Body) -> Response {
    ([(header::CONTENT_TYPE, "text/event-stream")], body).into_response()
}

/// Relay config pointing at `upstream`.
pub fn relay_config(upstream: Url) -> RelayConfig {
    RelayConfig {
        api_key: TEST_KEY.to_string(),
        upstream_url: upstream,
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

/// Fake upstream plus a relay in front of it. Returns the relay base URL.
pub async fn spawn_relay() -> Url {
    let upstream = spawn(fake_upstream()).await;
    spawn(relay::router(relay::RelayState::new(&relay_config(upstream)))).await
}

/// Catalog covering every fake upstream behavior, plus one inactive model.
pub fn test_catalog() -> Vec<ModelInfo> {
    let mut models: Vec<ModelInfo> = [
        "a4",
        "json",
        "sse",
        "empty",
        "broken",
        "endless",
        "endless-text",
        "stall",
        "cut",
    ]
        .into_iter()
        .map(|id| ModelInfo::new(id, "Meee API"))
        .collect();
    let mut off = ModelInfo::new("off", "Meee API");
    off.active = false;
    models.push(off);
    models
}
