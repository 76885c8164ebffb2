//! Spawns chat turns and model probes in background threads with stream/result channels.

use std::sync::Arc;
use std::sync::mpsc;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::core::assistant::Assistant;

use super::PendingChat;

/// Spawn a streaming chat turn. Returns PendingChat with channels for chunks and the outcome.
pub fn spawn_chat(rt: &Arc<Runtime>, assistant: Arc<Assistant>, prompt: String) -> PendingChat {
    let (stream_tx, stream_rx) = mpsc::channel();
    let (result_tx, result_rx) = mpsc::channel();
    let cancel_token = CancellationToken::new();
    let cancel_token_clone = cancel_token.clone();
    let rt_clone = Arc::clone(rt);

    std::thread::spawn(move || {
        let on_chunk = move |s: &str| {
            let _ = stream_tx.send(s.to_string());
        };
        let outcome = rt_clone.block_on(assistant.chat_stream(
            &prompt,
            Some(&on_chunk),
            Some(&cancel_token_clone),
        ));
        let _ = result_tx.send(outcome);
    });

    PendingChat {
        stream_rx,
        result_rx,
        cancel_token,
    }
}

/// Probe `model` in the background. The receiver yields `(model, ok)`.
pub fn spawn_probe(
    rt: &Arc<Runtime>,
    assistant: Arc<Assistant>,
    model: String,
) -> mpsc::Receiver<(String, bool)> {
    let (tx, rx) = mpsc::channel();
    let rt_clone = Arc::clone(rt);
    std::thread::spawn(move || {
        let ok = rt_clone.block_on(assistant.test_model(&model));
        let _ = tx.send((model, ok));
    });
    rx
}
