//! Chat error type and the user-facing fallback strings built from it.

/// Errors from a single chat request to the relay.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The relay answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// Connection, TLS, timeout or body read failure.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid relay URL: {0}")]
    InvalidUrl(String),
    /// The request was cancelled by the user.
    #[error("Request cancelled")]
    Cancelled,
}

impl ChatError {
    /// True for errors carrying an HTTP status from the relay.
    pub fn is_http(&self) -> bool {
        matches!(self, ChatError::Http { .. })
    }
}

/// Reply used when a request succeeded but carried no text.
pub const EMPTY_REPLY: &str = "No response content";

/// Reply for a model that is not active (non-streaming turn).
pub fn unavailable_message(model: &str) -> String {
    format!(
        "I'm sorry, the model {} is currently unavailable. Please try a different model.",
        model
    )
}

/// Reply for a model that is not active (streaming turn).
pub fn unavailable_stream_message(model: &str) -> String {
    format!(
        "I'm sorry, the model \"{}\" is currently unavailable. Please try a different model.",
        model
    )
}

/// Fallback reply for a failed non-streaming turn. The raw error is never shown.
pub fn chat_failure_message(model: &str, err: &ChatError) -> String {
    if err.is_http() {
        format!(
            "I'm sorry, there was an error communicating with the model \"{}\". Please try a different model.",
            model
        )
    } else {
        "Sorry, I couldn't process your request. The model may be temporarily unavailable."
            .to_string()
    }
}

/// Fallback reply for a failed streaming turn, including the error text.
pub fn stream_failure_message(model: &str, err: &ChatError) -> String {
    if err.is_http() {
        format!(
            "I'm sorry, there was an error communicating with the model \"{}\". Error: {}",
            model, err
        )
    } else {
        format!(
            "Sorry, I couldn't process your streaming request. Error: {}",
            err
        )
    }
}
