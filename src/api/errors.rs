// Gateway error taxonomy and provider error classification

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::prompts::TaskType;
use crate::proxy::ProviderError;

pub const INVALID_API_KEY_MESSAGE: &str = "Invalid or incorrect API Key provided.";

// Provider wording for a rejected key. Matching is on message text only, so this
// list is the one place to touch when upstream wording changes.
static AUTH_FAILURE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"(?i)API key not valid", r"(?i)permission denied", r"(?i)invalid api key"]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("auth failure pattern must compile"))
        .collect()
});

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Missing or invalid request field. Never reaches the provider.
    #[error("{0}")]
    ValidationFailed(String),
    /// Request body over the configured size limit.
    #[error("{0}")]
    PayloadTooLarge(String),
    /// Provider rejected the API key.
    #[error("Invalid or incorrect API Key provided.")]
    AuthenticationFailed,
    /// Any other provider-side failure, original message preserved.
    #[error("{0}")]
    UpstreamFailure(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            GatewayError::UpstreamFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Attach the task so the response carries the right failure label.
    pub fn for_task(self, task: TaskType) -> TaskFailure {
        TaskFailure { task, error: self }
    }
}

pub fn is_auth_failure(message: &str) -> bool {
    AUTH_FAILURE_PATTERNS.iter().any(|re| re.is_match(message))
}

pub fn classify_provider_error(err: &ProviderError) -> GatewayError {
    let message = err.message();
    if is_auth_failure(&message) {
        tracing::warn!(original_error = %message, "API key authentication failed");
        GatewayError::AuthenticationFailed
    } else {
        tracing::error!(error = %message, "Unexpected provider error");
        GatewayError::UpstreamFailure(message)
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A [`GatewayError`] raised while serving a specific task endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub task: TaskType,
    pub error: GatewayError,
}

impl TaskFailure {
    pub fn body(&self) -> ErrorBody {
        match &self.error {
            GatewayError::ValidationFailed(message) | GatewayError::PayloadTooLarge(message) => ErrorBody {
                error: message.clone(),
                details: None,
            },
            other => ErrorBody {
                error: self.task.failure_label().to_string(),
                details: Some(other.to_string()),
            },
        }
    }
}

impl IntoResponse for TaskFailure {
    fn into_response(self) -> Response {
        (self.error.status_code(), Json(self.body())).into_response()
    }
}
