use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

/// Handler for GET /metrics endpoint
/// Returns Prometheus metrics in text format
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.export() {
        Ok(output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            output,
        )
            .into_response(),
        Err(e) => ApiError::internal("Failed to export metrics", e).into_response(),
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
