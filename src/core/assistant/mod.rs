//! Chat-turn orchestration: model selection, request construction, response normalization
//! and streaming consumption, with user-facing fallbacks for every failure.

mod client;
mod error;
mod normalize;
mod stream;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;

use crate::core::config::Config;
use crate::core::models::{self, ModelHealth, ModelInfo};
use crate::relay::HealthReport;

pub use client::RelayClient;
pub use error::{
    ChatError, EMPTY_REPLY, chat_failure_message, stream_failure_message, unavailable_message,
    unavailable_stream_message,
};
pub use stream::OnContentChunk;
pub(crate) use stream::{MAX_CONTENT_BYTES, read_capped};

/// Prompt used by [`Assistant::test_model`].
pub const TEST_PROMPT: &str = "Hello, this is a test message.";
/// Prompt used by [`Assistant::test_api`].
pub const API_TEST_PROMPT: &str = "Hola";

/// Result of a streaming turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model replied; the text was emitted chunk by chunk.
    Replied(String),
    /// Something failed; the fallback message was emitted as a single chunk.
    Fallback(String),
    /// The user cancelled the request.
    Cancelled,
}

struct AssistantState {
    model: String,
    models: Vec<ModelInfo>,
    /// Probe results by model id.
    tested: HashMap<String, bool>,
}

/// The chat assistant. All methods take `&self`; share it behind an `Arc`.
pub struct Assistant {
    client: RelayClient,
    catalog: Vec<ModelInfo>,
    state: Mutex<AssistantState>,
}

impl Assistant {
    pub fn new(config: &Config) -> Self {
        Self::with_client(
            RelayClient::new(config.relay_url.clone()),
            config.models.clone(),
            &config.model_id,
        )
    }

    pub fn with_client(client: RelayClient, catalog: Vec<ModelInfo>, model: &str) -> Self {
        Self {
            client,
            catalog,
            state: Mutex::new(AssistantState {
                model: model.to_string(),
                models: Vec::new(),
                tested: HashMap::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, AssistantState> {
        // State stays consistent even if a holder panicked: every write is a single assignment.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current model id.
    pub fn model(&self) -> String {
        self.state().model.clone()
    }

    pub fn set_model(&self, model: &str) {
        log::info!("Model set to {}", model);
        self.state().model = model.to_string();
    }

    /// Rebuild the model list from the catalog, attaching recorded probe results.
    pub fn available_models(&self) -> Vec<ModelInfo> {
        let mut state = self.state();
        let models: Vec<ModelInfo> = self
            .catalog
            .iter()
            .map(|m| ModelInfo {
                health: state
                    .tested
                    .get(&m.id)
                    .map(|ok| ModelHealth::from_probe(*ok))
                    .unwrap_or_default(),
                ..m.clone()
            })
            .collect();
        state.models = models.clone();
        models
    }

    /// True iff the current model is in the catalog and active.
    pub fn is_current_model_active(&self) -> bool {
        let models = self.available_models();
        let model = self.model();
        models::find_model(&models, &model).is_some_and(|m| m.active)
    }

    /// Record a probe result and update the stored list entry.
    pub fn update_model_status(&self, model: &str, ok: bool) {
        let mut state = self.state();
        state.tested.insert(model.to_string(), ok);
        if let Some(entry) = state.models.iter_mut().find(|m| m.id == model) {
            entry.health = ModelHealth::from_probe(ok);
        }
    }

    /// Send one request and consume the response, honoring cancellation.
    async fn request(
        &self,
        model: &str,
        content: &str,
        on_chunk: Option<&(dyn Fn(&str) + Send + Sync)>,
        cancel: Option<&CancellationToken>,
    ) -> Result<String, ChatError> {
        let work = async {
            let response = self.client.chat_get(content, model).await?;
            stream::consume(response, on_chunk).await
        };
        match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(ChatError::Cancelled),
                result = work => result,
            },
            None => work.await,
        }
    }

    /// Non-streaming turn. Always returns text to show: the reply or a fallback.
    pub async fn chat(&self, content: &str) -> String {
        let model = self.model();
        if !self.is_current_model_active() {
            return unavailable_message(&model);
        }
        match self.request(&model, content, None, None).await {
            Ok(reply) => {
                self.update_model_status(&model, true);
                if reply.is_empty() {
                    EMPTY_REPLY.to_string()
                } else {
                    reply
                }
            }
            Err(e) => {
                log::error!("Chat error: {}", e);
                self.update_model_status(&model, false);
                chat_failure_message(&model, &e)
            }
        }
    }

    /// Streaming turn. Every piece of text to display (reply chunks or the fallback) goes
    /// through `on_chunk`.
    pub async fn chat_stream(
        &self,
        content: &str,
        on_chunk: Option<&(dyn Fn(&str) + Send + Sync)>,
        cancel: Option<&CancellationToken>,
    ) -> TurnOutcome {
        let emit = |s: &str| {
            if let Some(cb) = on_chunk {
                cb(s);
            }
        };
        let model = self.model();
        log::debug!("ChatStream started, model: {}", model);

        if !self.is_current_model_active() {
            let msg = unavailable_stream_message(&model);
            emit(&msg);
            return TurnOutcome::Fallback(msg);
        }

        let streamed = AtomicBool::new(false);
        let tracking = |s: &str| {
            streamed.store(true, Ordering::Relaxed);
            emit(s);
        };
        match self.request(&model, content, Some(&tracking), cancel).await {
            Ok(reply) => {
                self.update_model_status(&model, true);
                if reply.is_empty() {
                    emit(EMPTY_REPLY);
                    TurnOutcome::Replied(EMPTY_REPLY.to_string())
                } else {
                    TurnOutcome::Replied(reply)
                }
            }
            Err(ChatError::Cancelled) => {
                log::info!("Chat stream cancelled");
                TurnOutcome::Cancelled
            }
            Err(e) => {
                log::error!("Chat stream error: {}", e);
                self.update_model_status(&model, false);
                let msg = stream_failure_message(&model, &e);
                if streamed.load(Ordering::Relaxed) {
                    emit(&format!("\n\n{}", msg));
                } else {
                    emit(&msg);
                }
                TurnOutcome::Fallback(msg)
            }
        }
    }

    /// Probe `model` with a short message without changing the current model.
    pub async fn test_model(&self, model: &str) -> bool {
        let ok = match self.request(model, TEST_PROMPT, None, None).await {
            Ok(_) => true,
            Err(e) => {
                log::error!("Error testing model {}: {}", model, e);
                false
            }
        };
        self.update_model_status(model, ok);
        ok
    }

    /// Probe the current model with a greeting, returning the raw reply.
    pub async fn test_api(&self) -> Result<String, ChatError> {
        let model = self.model();
        log::info!("Testing API...");
        let reply = self.request(&model, API_TEST_PROMPT, None, None).await;
        self.update_model_status(&model, reply.is_ok());
        reply
    }

    /// Relay health report.
    pub async fn relay_health(&self) -> Result<HealthReport, ChatError> {
        self.client.health().await
    }
}

#[cfg(test)]
mod tests;
