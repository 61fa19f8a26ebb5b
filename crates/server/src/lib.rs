//! vidya HTTP server
//!
//! Thin request-handling layer over the quality scorer, the interaction
//! store and the feedback analyzer.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, record_quality_score, record_request};
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use vidya_llm::PromptError;
use vidya_persistence::PersistenceError;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServerError> for StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Persistence(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PersistenceError> for ServerError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound(id) => ServerError::NotFound(format!("interaction {}", id)),
            PersistenceError::AlreadyExists(_) | PersistenceError::FieldAlreadySet(_) => {
                ServerError::Conflict(err.to_string())
            }
            PersistenceError::Validation(msg) => ServerError::InvalidRequest(msg),
            other => ServerError::Persistence(other.to_string()),
        }
    }
}

impl From<PromptError> for ServerError {
    fn from(err: PromptError) -> Self {
        ServerError::InvalidRequest(err.to_string())
    }
}

impl From<vidya_core::Error> for ServerError {
    fn from(err: vidya_core::Error) -> Self {
        ServerError::InvalidRequest(err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let status = StatusCode::from(self);
        if status.is_server_error() {
            tracing::error!(status = %status, "{}", message);
        } else {
            tracing::debug!(status = %status, "{}", message);
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
