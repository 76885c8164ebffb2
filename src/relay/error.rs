//! Relay errors and their JSON response bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Upstream answered with a non-success status.
    #[error("API Error: {0}")]
    Upstream(u16),
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),
}

/// JSON error body returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Upstream(code) => {
                StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            RelayError::Upstream(code) => ErrorBody {
                error: format!("API Error: {}", code),
                message: "Failed to communicate with AI service".to_string(),
            },
            _ => ErrorBody {
                error: "Internal server error".to_string(),
                message: "Failed to process request".to_string(),
            },
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
