//! Request pipeline error types and the failure reporting hook.

use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Errors surfaced by [`ApiClient`](super::ApiClient) operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (timeout, connection refused, DNS failure)
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Service returned {status}: {message}")]
    Service {
        status: StatusCode,
        /// The service's `detail` field, or the raw body when absent
        message: String,
        /// Raw response body
        body: String,
    },

    /// A success response whose body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),

    /// The configured base URL cannot be parsed
    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Build a service error from a status and raw body.
    ///
    /// The service wraps errors as `{"detail": ...}`; when that field is a
    /// string it becomes the message, otherwise the body is used verbatim.
    pub fn service(status: StatusCode, body: String) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| match value.get("detail") {
                Some(serde_json::Value::String(detail)) => Some(detail.clone()),
                Some(other) => Some(other.to_string()),
                None => None,
            })
            .unwrap_or_else(|| body.clone());

        ApiError::Service {
            status,
            message,
            body,
        }
    }

    /// HTTP status of a service error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the failure means the service could not be reached.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport(e) if e.is_timeout())
    }
}

/// Result type for request pipeline operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Observation point for failed requests.
///
/// The pipeline calls [`report`](ErrorReporter::report) exactly once per
/// failed request, before handing the error back to the caller.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, method: &Method, path: &str, error: &ApiError);
}

/// Reports failures through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, method: &Method, path: &str, error: &ApiError) {
        log::error!("API error: {} {}: {}", method, path, error);
    }
}
