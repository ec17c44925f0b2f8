/// Integration tests for the JBSAAS API
///
/// These exercise the request path up to the first database access:
/// authentication enforcement, request validation, platform parsing, and
/// the OAuth callback's pre-exchange checks. The database pool is lazy
/// and unreachable, so anything that would hit it is out of scope here.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, TestContext};
use serde_json::json;
use tower::Service as _;

fn post_json(uri: &str, auth: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_health_reports_degraded_without_database() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = ctx.app.clone().call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .uri("/v1/posts")
        .body(Body::empty())
        .unwrap();
    let response = ctx.app.clone().call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .uri("/v1/posts")
        .header("authorization", "Bearer not.a.jwt")
        .body(Body::empty())
        .unwrap();
    let response = ctx.app.clone().call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validates_email() {
    let ctx = TestContext::new();

    let request = post_json(
        "/v1/auth/register",
        None,
        json!({ "email": "not-an-email", "password": "secret123" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "email");
}

#[tokio::test]
async fn test_register_validates_password_strength() {
    let ctx = TestContext::new();

    // Long enough for the length validator, but no digit
    let request = post_json(
        "/v1/auth/register",
        None,
        json!({ "email": "owner@example.com.au", "password": "passwordonly" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["details"][0]["field"], "password");
}

#[tokio::test]
async fn test_oauth_init_rejects_unknown_platform() {
    let ctx = TestContext::new();

    let request = post_json(
        "/v1/oauth/init",
        Some(&ctx.auth_header()),
        json!({ "platform": "myspace", "redirect_uri": "https://app.example.com/cb" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Unsupported platform"));
}

#[tokio::test]
async fn test_oauth_init_rejects_unconfigured_platform() {
    let ctx = TestContext::new();

    // Linkedin parses but has no credentials in the test registry
    let request = post_json(
        "/v1/oauth/init",
        Some(&ctx.auth_header()),
        json!({ "platform": "linkedin", "redirect_uri": "https://app.example.com/cb" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("not configured"));
}

#[tokio::test]
async fn test_oauth_callback_surfaces_consent_denial() {
    let ctx = TestContext::new();

    let request = post_json(
        "/v1/oauth/callback",
        Some(&ctx.auth_header()),
        json!({
            "platform": "facebook",
            "error": "access_denied",
            "error_description": "The user denied your request"
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("denied your request"));
}

#[tokio::test]
async fn test_oauth_callback_requires_code_and_state() {
    let ctx = TestContext::new();

    let request = post_json(
        "/v1/oauth/callback",
        Some(&ctx.auth_header()),
        json!({ "platform": "facebook", "code": "abc" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Missing code or state"));
}

#[tokio::test]
async fn test_schedule_suggest_rejects_invalid_hours() {
    let ctx = TestContext::new();

    let request = post_json(
        "/v1/schedule/suggest",
        Some(&ctx.auth_header()),
        json!({
            "date": "2024-06-03",
            "working_hours": { "start_hour": 18, "end_hour": 8 }
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = ctx.app.clone().call(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
}
