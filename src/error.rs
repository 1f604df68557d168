//! Gateway error taxonomy and its HTTP rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors the gateway reports to clients.
///
/// Each variant renders as `{"error": <label>, "message": <detail>}`.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing or invalid client input (400).
    #[error("{0}")]
    BadRequest(String),

    /// Captured body exceeded the configured ceiling (413).
    #[error("request body exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    /// No route or local endpoint matches the path (404).
    #[error("no route matches {0}")]
    NotFound(String),

    /// Route exists but not for this method (405).
    #[error("{method} is not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },

    /// Backend could not be reached or failed in flight (502).
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// Backend did not answer within the request deadline (504).
    #[error("backend did not respond within {secs}s")]
    GatewayTimeout { secs: u64 },

    /// Unexpected failure in gateway logic (500). The detail is logged, never sent.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            GatewayError::GatewayTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fixed label placed in the `error` field.
    pub fn label(&self) -> &'static str {
        match self {
            GatewayError::BadRequest(_) => "Bad Request",
            GatewayError::PayloadTooLarge { .. } => "Payload Too Large",
            GatewayError::NotFound(_) => "Not Found",
            GatewayError::MethodNotAllowed { .. } => "Method Not Allowed",
            GatewayError::UpstreamUnavailable(_) => "Bad Gateway",
            GatewayError::GatewayTimeout { .. } => "Gateway Timeout",
            GatewayError::Internal(_) => "Internal Server Error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            GatewayError::Internal(_) => "An unexpected error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        if let GatewayError::Internal(detail) = &self {
            tracing::error!(error = %detail, "Internal gateway error");
        }
        let body = json!({
            "error": self.label(),
            "message": self.client_message(),
        });
        (self.status(), Json(body)).into_response()
    }
}

/// Render a description of an error and all of its sources.
///
/// hyper-util's client error only says "client error (Connect)"; the useful
/// part ("Connection refused") lives further down the chain.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
