//! Error types for the search gateway
//!
//! Provides unified error handling using thiserror. Upstream and credential
//! failures never reach HTTP clients from the search paths (they degrade to
//! sample data), but they still flow through this type internally.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Search Error Enum ==
/// Unified error type for the search gateway.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Invalid request data
    #[error("{0}")]
    InvalidRequest(String),

    /// Retrieval service answered with a non-success status
    #[error("Upstream error: {status} - {body}")]
    Upstream { status: u16, body: String },

    /// Connection-level failure talking to the retrieval service
    #[error("Transport error: {0}")]
    Transport(String),

    /// Access token could not be obtained
    #[error("Credential error: {0}")]
    Credentials(String),

    /// Upstream payload was not valid JSON
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Decode(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = match &self {
            SearchError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            SearchError::Upstream { .. }
            | SearchError::Transport(_)
            | SearchError::Credentials(_)
            | SearchError::Decode(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the search gateway.
pub type Result<T> = std::result::Result<T, SearchError>;
