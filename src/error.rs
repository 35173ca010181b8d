use axum::{
    extract::{OriginalUri, Request},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::any::Any;
use std::fmt::Display;

use crate::services::hashing::HashingError;

// =============================================================================
// ERROR RESPONSE
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldViolation>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

// =============================================================================
// API ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldViolation>,
    },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Request timed out")]
    Timeout,

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Too many requests")]
    RateLimited,

    #[error("{0}")]
    NotImplemented(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Logs `cause` and returns a 500 carrying only `message`.
    pub fn internal(message: &str, cause: impl Display) -> Self {
        tracing::error!(error = %cause, "{message}");
        Self::Internal(message.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        let errors = match self {
            Self::Validation { errors, .. } => errors,
            _ => Vec::new(),
        };

        let body = ErrorResponse {
            success: false,
            message,
            status: status.as_u16(),
            errors,
        };

        (
            status,
            [(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"))],
            Json(body),
        )
            .into_response()
    }
}

/// Router fallback for paths no route matches.
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(format!("{method} {} not found", uri.path()))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Gives bodiless error responses produced by tower layers (timeouts, body
/// limits) the same JSON envelope handlers return.
pub async fn envelope_bare_errors(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error())
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }

    let (parts, _) = response.into_parts();
    let mut enveloped = match status {
        StatusCode::REQUEST_TIMEOUT => ApiError::Timeout.into_response(),
        StatusCode::PAYLOAD_TOO_LARGE => {
            ApiError::PayloadTooLarge("Request body too large".to_string()).into_response()
        }
        StatusCode::NOT_FOUND => ApiError::NotFound("Not found".to_string()).into_response(),
        StatusCode::METHOD_NOT_ALLOWED => ApiError::MethodNotAllowed.into_response(),
        other => {
            let body = ErrorResponse {
                success: false,
                message: other.canonical_reason().unwrap_or("Error").to_string(),
                status: other.as_u16(),
                errors: Vec::new(),
            };
            (other, Json(body)).into_response()
        }
    };

    // Keep headers such as `allow` the inner layer set.
    for (name, value) in parts.headers.iter() {
        if *name != header::CONTENT_LENGTH && !enveloped.headers().contains_key(name) {
            enveloped.headers_mut().insert(name.clone(), value.clone());
        }
    }
    enveloped
}

/// Renders a caught handler panic as a generic 500 without leaking detail.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    ApiError::internal("Internal server error", detail).into_response()
}

// =============================================================================
// STARTUP
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Hashing(#[from] HashingError),

    #[error("metrics registry: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("token lifetime out of range: {0}")]
    TokenLifetime(#[from] chrono::OutOfRangeError),
}
