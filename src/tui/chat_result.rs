//! Draining in-flight chat turns and model probes into the app state.

use std::sync::mpsc::{Receiver, TryRecvError};

use crate::core::assistant::{Assistant, TurnOutcome};

use super::app;
use super::handlers::PendingChat;

/// Apply streamed chunks and, once available, the final outcome of the pending turn.
pub(super) fn poll_pending_chat(app: &mut app::App, pending_chat: &mut Option<PendingChat>) {
    let Some(chat) = pending_chat.as_ref() else {
        return;
    };
    while let Ok(chunk) = chat.stream_rx.try_recv() {
        app.append_assistant_chunk(&chunk);
    }
    match chat.result_rx.try_recv() {
        Ok(outcome) => {
            // Chunks sent before the outcome are already queued.
            while let Ok(chunk) = chat.stream_rx.try_recv() {
                app.append_assistant_chunk(&chunk);
            }
            handle_turn_outcome(app, outcome);
            *pending_chat = None;
        }
        Err(TryRecvError::Empty) => {}
        Err(TryRecvError::Disconnected) => {
            log::error!("Chat task ended without a result");
            app.fail_turn();
            *pending_chat = None;
        }
    }
}

/// Process a finished turn. Replies and fallbacks were already streamed into the transcript.
pub(super) fn handle_turn_outcome(app: &mut app::App, outcome: TurnOutcome) {
    match outcome {
        TurnOutcome::Replied(_) | TurnOutcome::Fallback(_) => app.finish_turn(),
        TurnOutcome::Cancelled => app.append_cancelled_notice(),
    }
}

/// Apply a finished model probe to the open selector.
pub(super) fn poll_pending_probe(
    app: &mut app::App,
    assistant: &Assistant,
    pending_probe: &mut Option<Receiver<(String, bool)>>,
) {
    let Some(rx) = pending_probe.as_ref() else {
        return;
    };
    match rx.try_recv() {
        Ok((model, ok)) => {
            log::info!("Probe {}: {}", model, if ok { "available" } else { "unavailable" });
            if let Some(selector) = app.model_selector.as_mut() {
                selector.models = assistant.available_models();
                selector.probing = None;
            }
            *pending_probe = None;
        }
        Err(TryRecvError::Empty) => {}
        Err(TryRecvError::Disconnected) => {
            if let Some(selector) = app.model_selector.as_mut() {
                selector.probing = None;
            }
            *pending_probe = None;
        }
    }
}
