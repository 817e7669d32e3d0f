//! Domain-specific error types for decision-helper

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the decision-helper service
#[derive(Error, Debug)]
pub enum DecisionError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// An unsuccessful call to the remote chat-completion API.
///
/// The variants only carry diagnostics. Every caller treats them as the same
/// outcome and substitutes its fallback payload.
#[derive(Error, Debug)]
pub enum RemoteCallError {
    #[error("no API key configured")]
    MissingCredential,

    #[error("model call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response envelope: {0}")]
    Envelope(String),
}

impl From<anyhow::Error> for DecisionError {
    fn from(err: anyhow::Error) -> Self {
        DecisionError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for DecisionError {
    fn from(err: serde_json::Error) -> Self {
        DecisionError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DecisionError {
    fn from(err: toml::de::Error) -> Self {
        DecisionError::Config {
            message: format!("TOML parse error: {}", err),
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for DecisionError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        DecisionError::InvalidParams {
            message: err.body_text(),
        }
    }
}

impl DecisionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DecisionError::InvalidParams { .. } => StatusCode::BAD_REQUEST,
            DecisionError::Config { .. }
            | DecisionError::Serialization { .. }
            | DecisionError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert DecisionError to a JSON HTTP response
impl IntoResponse for DecisionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }
        (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            json!({"error": {"code": status.as_u16(), "message": self.to_string()}}).to_string(),
        )
            .into_response()
    }
}

/// Result type alias for decision-helper operations
pub type Result<T> = std::result::Result<T, DecisionError>;
