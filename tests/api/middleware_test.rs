use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use serde_json::{json, Value};

use crate::common::{register_body, test_email, TestContext};

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

#[tokio::test]
async fn request_id_is_generated_when_missing() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/health").await;

    response.assert_status_ok();
    let id = response.header(REQUEST_ID);
    assert!(uuid::Uuid::parse_str(id.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn request_id_is_propagated_when_present() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .get("/health")
        .add_header(REQUEST_ID, HeaderValue::from_static("req-12345"))
        .await;

    assert_eq!(response.header(REQUEST_ID), "req-12345");
}

#[tokio::test]
async fn security_headers_are_set() {
    let ctx = TestContext::new().await;

    let ok = ctx.server.get("/health").await;
    assert_eq!(ok.header("x-content-type-options"), "nosniff");
    assert_eq!(ok.header("x-frame-options"), "DENY");

    let unauthorized = ctx.server.post("/api/v1/auth/logout").await;
    unauthorized.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(unauthorized.header("x-content-type-options"), "nosniff");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .get("/health")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("https://app.example.com"),
        )
        .await;

    assert_eq!(response.header("access-control-allow-origin"), "*");
}

#[tokio::test]
async fn cors_preflight_lists_allowed_methods() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .method(Method::OPTIONS, "/api/v1/auth/login")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("https://app.example.com"),
        )
        .add_header(
            HeaderName::from_static("access-control-request-method"),
            HeaderValue::from_static("POST"),
        )
        .await;

    response.assert_status_ok();
    let methods = response.header("access-control-allow-methods");
    let methods = methods.to_str().unwrap();
    for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
        assert!(methods.contains(method), "missing {method} in {methods}");
    }
}

#[tokio::test]
async fn health_reports_version() {
    let ctx = TestContext::new().await;

    let body: Value = ctx.server.get("/health").await.json();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn rate_limit_rejects_excess_requests() {
    let ctx = TestContext::with_overrides(&[
        ("RATE_LIMIT_PER_SECOND", "1"),
        ("RATE_LIMIT_BURST", "2"),
    ]);

    ctx.server.get("/health").await.assert_status_ok();
    ctx.server.get("/health").await.assert_status_ok();

    let response = ctx.server.get("/health").await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 429);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let ctx = TestContext::new().await;
    let mut body = register_body(&test_email());
    body["bio"] = json!("x".repeat(200 * 1024));

    let response = ctx.server.post("/api/v1/auth/register").json(&body).await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.header("x-content-type-options"), "nosniff");
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 413);
    assert_eq!(body["message"], "Request body too large");
    assert_eq!(ctx.users.count(), 0);
}

#[tokio::test]
async fn root_prefix_mounts_api_at_root() {
    let ctx = TestContext::with_overrides(&[("API_PREFIX", "/")]);

    ctx.server
        .post("/auth/register")
        .json(&register_body(&test_email()))
        .await
        .assert_status(StatusCode::CREATED);

    ctx.server.get("/health").await.assert_status_ok();
}

#[tokio::test]
async fn custom_prefix_is_honoured() {
    let ctx = TestContext::with_overrides(&[("API_PREFIX", "/lms/")]);

    ctx.server
        .post("/lms/auth/register")
        .json(&register_body(&test_email()))
        .await
        .assert_status(StatusCode::CREATED);

    ctx.server
        .post("/api/v1/auth/register")
        .json(&register_body(&test_email()))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
