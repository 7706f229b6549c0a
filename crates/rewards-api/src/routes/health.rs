//! Liveness and metrics.

use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use tracing::error;

use crate::domain::{ApiError, ApiResult, HealthResponse};

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

/// Prometheus text exposition.
pub async fn metrics() -> ApiResult<impl IntoResponse> {
    let body = rewards_telemetry::encode_metrics().map_err(|e| {
        error!(error = %e, "metrics encoding failed");
        ApiError::internal()
    })?;
    Ok(([(CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
