//! Route groups whose handlers have not been built yet.
//!
//! Every path is registered with its real method so clients get a 501
//! envelope instead of a 404 or 405. Upload routes still enforce the
//! configured upload size.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, OriginalUri},
    http::{Method, StatusCode},
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

async fn not_implemented(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    tracing::debug!(%method, path = %uri.path(), "placeholder route hit");
    ApiError::NotImplemented(format!("{method} {} is not implemented yet", uri.path()))
}

async fn not_implemented_upload(
    method: Method,
    uri: OriginalUri,
    body: Result<Bytes, BytesRejection>,
) -> ApiError {
    match body {
        Ok(_) => not_implemented(method, uri).await,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            ApiError::PayloadTooLarge("Upload exceeds the maximum size".to_string())
        }
        Err(rejection) => ApiError::validation(rejection.body_text()),
    }
}

/// `max_upload_size` bounds request bodies on upload routes, replacing the
/// router-wide JSON body limit there.
pub fn placeholder_routes(max_upload_size: usize) -> Router<Arc<AppState>> {
    Router::new()
        .merge(course_routes())
        .merge(forum_routes())
        .merge(assessment_routes())
        .merge(analytics_routes())
        .merge(admin_routes())
        .merge(user_routes(max_upload_size))
}

fn course_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/courses", get(not_implemented).post(not_implemented))
        .route("/courses/{id}", get(not_implemented).put(not_implemented))
        .route("/courses/{id}/enroll", post(not_implemented))
        .route("/courses/{id}/modules", get(not_implemented))
        .route("/modules/{id}/lessons", get(not_implemented))
        .route("/lessons/{id}/complete", post(not_implemented))
}

fn forum_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/courses/{id}/forum", get(not_implemented))
        .route("/courses/{id}/threads", post(not_implemented))
        .route("/threads/{id}/posts", post(not_implemented))
        .route("/posts/{id}/report", post(not_implemented))
        .route("/posts/{id}", delete(not_implemented))
}

fn assessment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/courses/{id}/assessments",
            get(not_implemented).post(not_implemented),
        )
        .route("/assessments/{id}/attempt", post(not_implemented))
        .route("/assessments/{id}/results", get(not_implemented))
        .route("/attempts/{id}/submit", post(not_implemented))
}

fn analytics_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analytics/progress", get(not_implemented))
        .route("/courses/{id}/analytics/progress", get(not_implemented))
        .route("/courses/{id}/analytics/overview", get(not_implemented))
        .route("/courses/{id}/analytics/students", get(not_implemented))
}

fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/users", get(not_implemented))
        .route("/admin/users/{id}", delete(not_implemented))
        .route("/admin/users/{id}/role", put(not_implemented))
        .route("/admin/settings", get(not_implemented).put(not_implemented))
}

fn user_routes(max_upload_size: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/profile", get(not_implemented).put(not_implemented))
        .route(
            "/users/avatar",
            post(not_implemented_upload).layer(DefaultBodyLimit::max(max_upload_size)),
        )
}
