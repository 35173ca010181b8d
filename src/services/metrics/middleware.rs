use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

use crate::AppState;

/// Records request count and latency per method, endpoint and status.
pub async fn metrics_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = req.method().to_string();
    let endpoint = match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => normalize_path(req.uri().path()),
    };

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    state
        .metrics
        .http_requests_total
        .with_label_values(&[method.as_str(), endpoint.as_str(), status.as_str()])
        .inc();
    state
        .metrics
        .http_request_duration_seconds
        .with_label_values(&[method.as_str(), endpoint.as_str()])
        .observe(started.elapsed().as_secs_f64());

    response
}

/// Collapses id-like segments so unmatched paths keep label cardinality low.
/// `/api/v1/courses/123` becomes `/api/v1/courses/{id}`.
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| if is_id_like(segment) { "{id}" } else { segment })
        .collect();

    format!("/{}", segments.join("/"))
}

fn is_id_like(segment: &str) -> bool {
    let is_uuid = uuid::Uuid::try_parse(segment).is_ok();
    let is_numeric = segment.bytes().all(|b| b.is_ascii_digit());
    let is_digest = segment.len() >= 40 && segment.bytes().all(|b| b.is_ascii_hexdigit());

    is_uuid || is_numeric || is_digest
}
