use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Url;
use tokio_util::sync::CancellationToken;

use super::*;
use crate::test_support;

async fn assistant(model: &str) -> Assistant {
    let relay = test_support::spawn_relay().await;
    let client = RelayClient::new(relay.join("/api/chat").unwrap());
    Assistant::with_client(client, test_support::test_catalog(), model)
}

fn collector() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Send + Sync) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |s: &str| sink.lock().unwrap().push(s.to_string()))
}

fn health_of(a: &Assistant, id: &str) -> ModelHealth {
    a.available_models()
        .into_iter()
        .find(|m| m.id == id)
        .map(|m| m.health)
        .unwrap()
}

#[tokio::test]
async fn chat_returns_plain_reply_and_marks_available() {
    let a = assistant("a4").await;
    assert_eq!(health_of(&a, "a4"), ModelHealth::Unknown);
    assert_eq!(a.chat("hi there").await, "echo: hi there");
    assert_eq!(health_of(&a, "a4"), ModelHealth::Available);
}

#[tokio::test]
async fn chat_unwraps_completion_json() {
    let a = assistant("json").await;
    assert_eq!(a.chat("hi").await, "json reply");
}

#[tokio::test]
async fn chat_empty_reply_placeholder() {
    let a = assistant("empty").await;
    assert_eq!(a.chat("hi").await, EMPTY_REPLY);
}

#[tokio::test]
async fn chat_http_failure_is_fallback_and_marks_unavailable() {
    let a = assistant("broken").await;
    let reply = a.chat("hi").await;
    assert_eq!(
        reply,
        "I'm sorry, there was an error communicating with the model \"broken\". Please try a different model."
    );
    assert_eq!(health_of(&a, "broken"), ModelHealth::Unavailable);
    // A failed model can still be retried.
    assert!(a.is_current_model_active());
}

#[tokio::test]
async fn inactive_or_unknown_model_short_circuits() {
    let a = assistant("off").await;
    assert_eq!(a.chat("hi").await, unavailable_message("off"));
    a.set_model("missing");
    assert!(!a.is_current_model_active());
    let (seen, cb) = collector();
    let outcome = a.chat_stream("hi", Some(&cb), None).await;
    let expected = unavailable_stream_message("missing");
    assert_eq!(outcome, TurnOutcome::Fallback(expected.clone()));
    assert_eq!(*seen.lock().unwrap(), vec![expected]);
}

#[tokio::test]
async fn stream_emits_event_chunks() {
    let a = assistant("sse").await;
    let (seen, cb) = collector();
    let outcome = a.chat_stream("hi", Some(&cb), None).await;
    assert_eq!(outcome, TurnOutcome::Replied("Hello".to_string()));
    assert_eq!(*seen.lock().unwrap(), vec!["Hel".to_string(), "lo".to_string()]);
}

#[tokio::test]
async fn stream_simulates_single_chunk_for_plain_text() {
    let a = assistant("a4").await;
    let (seen, cb) = collector();
    let outcome = a.chat_stream("¿qué tal?", Some(&cb), None).await;
    assert_eq!(outcome, TurnOutcome::Replied("echo: ¿qué tal?".to_string()));
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn stream_failure_emits_error_text() {
    let a = assistant("broken").await;
    let (seen, cb) = collector();
    let TurnOutcome::Fallback(msg) = a.chat_stream("hi", Some(&cb), None).await else {
        panic!("expected fallback");
    };
    assert!(msg.starts_with("I'm sorry, there was an error communicating with the model \"broken\". Error: HTTP 503"));
    assert_eq!(*seen.lock().unwrap(), vec![msg]);
}

#[tokio::test]
async fn stream_transport_failure() {
    let client = RelayClient::new(Url::parse("http://127.0.0.1:1/api/chat").unwrap());
    let a = Assistant::with_client(client, test_support::test_catalog(), "a4");
    let TurnOutcome::Fallback(msg) = a.chat_stream("hi", None, None).await else {
        panic!("expected fallback");
    };
    assert!(msg.starts_with("Sorry, I couldn't process your streaming request. Error: "));
    assert_eq!(
        a.chat("hi").await,
        "Sorry, I couldn't process your request. The model may be temporarily unavailable."
    );
}

#[tokio::test]
async fn cancelled_turn_emits_nothing() {
    let a = assistant("a4").await;
    let token = CancellationToken::new();
    token.cancel();
    let (seen, cb) = collector();
    let outcome = a.chat_stream("hi", Some(&cb), Some(&token)).await;
    assert_eq!(outcome, TurnOutcome::Cancelled);
    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(health_of(&a, "a4"), ModelHealth::Unknown);
}

#[tokio::test]
async fn cancel_mid_stream_keeps_partial_reply_and_health() {
    let a = assistant("stall").await;
    let token = CancellationToken::new();
    let first_chunk = CancellationToken::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let signal = first_chunk.clone();
    let cb = move |s: &str| {
        sink.lock().unwrap().push(s.to_string());
        signal.cancel();
    };
    let cancel_after_first = async {
        first_chunk.cancelled().await;
        token.cancel();
    };
    let (outcome, ()) = tokio::time::timeout(Duration::from_secs(10), async {
        tokio::join!(a.chat_stream("hi", Some(&cb), Some(&token)), cancel_after_first)
    })
    .await
    .expect("cancellation ends the turn");
    assert_eq!(outcome, TurnOutcome::Cancelled);
    assert_eq!(*seen.lock().unwrap(), vec!["partial".to_string()]);
    assert_eq!(health_of(&a, "stall"), ModelHealth::Unknown);
}

#[tokio::test]
async fn stream_failing_after_chunks_separates_fallback() {
    let a = assistant("cut").await;
    let (seen, cb) = collector();
    let outcome = tokio::time::timeout(Duration::from_secs(10), a.chat_stream("hi", Some(&cb), None))
        .await
        .expect("broken stream ends the turn");
    let TurnOutcome::Fallback(msg) = outcome else {
        panic!("expected fallback, got {:?}", outcome);
    };
    assert!(msg.starts_with("Sorry, I couldn't process your streaming request. Error: "));
    let seen = seen.lock().unwrap();
    assert_eq!(seen.first().map(String::as_str), Some("partial"));
    assert_eq!(seen.last(), Some(&format!("\n\n{}", msg)));
    assert_eq!(health_of(&a, "cut"), ModelHealth::Unavailable);
}

#[tokio::test]
async fn endless_event_stream_stops_at_size_limit() {
    let a = assistant("endless").await;
    let outcome = tokio::time::timeout(Duration::from_secs(10), a.chat_stream("hi", None, None))
        .await
        .expect("reading stops at the limit");
    let TurnOutcome::Replied(reply) = outcome else {
        panic!("expected reply, got {:?}", outcome);
    };
    assert_eq!(reply.len(), MAX_CONTENT_BYTES);
}

#[tokio::test]
async fn endless_plain_body_stops_at_size_limit() {
    let a = assistant("endless-text").await;
    let reply = tokio::time::timeout(Duration::from_secs(10), a.chat("hi"))
        .await
        .expect("reading stops at the limit");
    assert_eq!(reply.len(), MAX_CONTENT_BYTES);
    assert!(reply.bytes().all(|b| b == b'x'));
}

#[tokio::test]
async fn test_model_keeps_current_model() {
    let a = assistant("a4").await;
    assert!(!a.test_model("broken").await);
    assert!(a.test_model("json").await);
    assert_eq!(a.model(), "a4");
    assert_eq!(health_of(&a, "broken"), ModelHealth::Unavailable);
    assert_eq!(health_of(&a, "json"), ModelHealth::Available);
}

#[tokio::test]
async fn test_api_uses_greeting() {
    let a = assistant("a4").await;
    assert_eq!(a.test_api().await.unwrap(), "echo: Hola");
}

#[tokio::test]
async fn relay_health_is_ok() {
    let a = assistant("a4").await;
    assert!(a.relay_health().await.unwrap().is_ok());
}
