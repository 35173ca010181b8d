use axum::http::{Method, StatusCode};
use serde_json::Value;

use crate::common::TestContext;

#[tokio::test]
async fn placeholder_routes_return_not_implemented() {
    let ctx = TestContext::new().await;

    let routes = [
        (Method::GET, "/api/v1/courses"),
        (Method::POST, "/api/v1/courses"),
        (Method::PUT, "/api/v1/courses/42"),
        (Method::POST, "/api/v1/courses/42/enroll"),
        (Method::GET, "/api/v1/modules/7/lessons"),
        (Method::POST, "/api/v1/lessons/7/complete"),
        (Method::GET, "/api/v1/courses/42/forum"),
        (Method::DELETE, "/api/v1/posts/9"),
        (Method::POST, "/api/v1/assessments/3/attempt"),
        (Method::POST, "/api/v1/attempts/3/submit"),
        (Method::GET, "/api/v1/courses/42/analytics/overview"),
        (Method::PUT, "/api/v1/admin/users/5/role"),
        (Method::PUT, "/api/v1/admin/settings"),
        (Method::GET, "/api/v1/users/profile"),
        (Method::POST, "/api/v1/users/avatar"),
    ];

    for (method, path) in routes {
        let response = ctx.server.method(method.clone(), path).await;
        response.assert_status(StatusCode::NOT_IMPLEMENTED);

        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["status"], 501);
        assert_eq!(
            body["message"],
            format!("{method} {path} is not implemented yet")
        );
    }
}

#[tokio::test]
async fn unregistered_method_is_not_allowed() {
    let ctx = TestContext::new().await;

    let response = ctx.server.delete("/api/v1/courses").await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.header("x-content-type-options"), "nosniff");
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 405);
    assert_eq!(body["message"], "Method not allowed");
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/api/v1/quizzes").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.header("x-content-type-options"), "nosniff");
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 404);
    assert_eq!(body["message"], "GET /api/v1/quizzes not found");
}

#[tokio::test]
async fn unknown_path_outside_prefix_is_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx.server.post("/v2/anything").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["message"], "POST /v2/anything not found");
}

#[tokio::test]
async fn avatar_upload_over_configured_size_is_rejected() {
    let ctx = TestContext::with_overrides(&[("MAX_UPLOAD_SIZE", "16")]);

    let response = ctx
        .server
        .post("/api/v1/users/avatar")
        .bytes(vec![0u8; 64].into())
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["status"], 413);
    assert_eq!(body["message"], "Upload exceeds the maximum size");
}

#[tokio::test]
async fn avatar_upload_may_exceed_json_body_limit() {
    let ctx = TestContext::new().await;

    // Larger than the router-wide JSON limit, well under the 10 MiB default.
    let response = ctx
        .server
        .post("/api/v1/users/avatar")
        .bytes(vec![0u8; 200 * 1024].into())
        .await;

    response.assert_status(StatusCode::NOT_IMPLEMENTED);
}
