//! API Gateway error types with HTTP status mapping.
//!
//! Every failure leaves the gateway as `{ "code": ..., "message": ... }`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rewards_core::{ErrorKind, RewardsError};
use serde::Serialize;
use std::fmt;
use std::net::SocketAddr;
use tracing::error;

use super::config::ConfigError;

/// Stable error codes carried in response bodies.
pub mod codes {
    pub const NOT_FOUND: &str = "not_found";
    pub const INVALID_REQUEST: &str = "invalid_request";
    pub const INVALID_STATE: &str = "invalid_state";
    pub const INSUFFICIENT_BALANCE: &str = "insufficient_balance";
    pub const CONFLICT: &str = "conflict";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const FORBIDDEN: &str = "forbidden";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// API error with HTTP status and wire code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status
    pub status: StatusCode,
    /// Wire code, see [`codes`]
    pub code: &'static str,
    /// Human readable message
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Malformed body, path or parameter
    pub fn invalid_request(details: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::INVALID_REQUEST, details)
    }

    /// Missing or unknown bearer token
    pub fn unauthorized(details: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, codes::UNAUTHORIZED, details)
    }

    /// Authenticated but not allowed
    pub fn forbidden(details: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, codes::FORBIDDEN, details)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, resource)
    }

    /// Internal error. Details stay in the logs.
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL_ERROR,
            "Internal server error",
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}] {}", self.status.as_u16(), self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<RewardsError> for ApiError {
    fn from(err: RewardsError) -> Self {
        let message = err.to_string();
        match (&err, err.kind()) {
            // Clients treat an unknown referrer as bad input.
            (RewardsError::UnknownReferrer(_), _) => Self::invalid_request(message),
            (_, ErrorKind::NotFound) => Self::not_found(message),
            (_, ErrorKind::InvalidRequest) => Self::invalid_request(message),
            (_, ErrorKind::InvalidState) => {
                Self::new(StatusCode::BAD_REQUEST, codes::INVALID_STATE, message)
            }
            (_, ErrorKind::InsufficientResource) => {
                Self::new(StatusCode::BAD_REQUEST, codes::INSUFFICIENT_BALANCE, message)
            }
            (_, ErrorKind::Conflict) => Self::new(StatusCode::CONFLICT, codes::CONFLICT, message),
            (_, ErrorKind::UpstreamFailure | ErrorKind::PartialFailure) => {
                error!(kind = err.kind().as_str(), error = %err, "request failed");
                Self::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_request(rejection.body_text())
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway-level errors (startup and serving, never sent to clients)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Server socket bind error
    #[error("server bind error on {addr}: {source}")]
    Bind {
        /// Requested address
        addr: SocketAddr,
        /// Underlying error
        source: std::io::Error,
    },

    /// Server loop failed
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
