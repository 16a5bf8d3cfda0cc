//! Bearer-token enforcement on the protected routes.

mod common;

use axum::http::{header, StatusCode};
use chrono::{Duration, Utc};
use common::{body_json, empty_request, TestContext};

#[tokio::test]
async fn missing_authorization_header_is_unauthorized() {
    let ctx = TestContext::new();

    for uri in ["/users/me", "/helicopters", "/engines/1", "/attribute-values"] {
        let response = ctx.send(empty_request("GET", uri, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "GET {}", uri);
    }
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() {
    let ctx = TestContext::new();
    let token = ctx.register("a@x.com", "password123").await;

    let request = axum::http::Request::builder()
        .uri("/users/me")
        .header(header::AUTHORIZATION, format!("Basic {}", token))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = ctx.send(request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let ctx = TestContext::new();

    let response = ctx
        .send(empty_request("GET", "/users/me", Some("not-a-jwt")))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let ctx = TestContext::new();
    ctx.register("a@x.com", "password123").await;
    let user_id = ctx.user_id("a@x.com");

    let issued_at = Utc::now() - Duration::hours(2);
    let expired = ctx
        .jwt
        .generate_access_token_at(user_id, "a@x.com", issued_at)
        .unwrap();

    let response = ctx
        .send(empty_request("GET", "/users/me", Some(&expired)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_for_unknown_identity_is_unauthorized() {
    let ctx = TestContext::new();
    let token = ctx.jwt.generate_access_token(4242, "ghost@x.com").unwrap();

    let response = ctx.send(empty_request("GET", "/users/me", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn identity_store_failure_fails_closed() {
    let ctx = TestContext::new();
    let token = ctx.register("a@x.com", "password123").await;

    ctx.identities.set_failing(true);
    let response = ctx.send(empty_request("GET", "/users/me", Some(&token))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_reaches_current_user() {
    let ctx = TestContext::new();
    let token = ctx.register("A@X.com", "password123").await;

    let response = ctx.send(empty_request("GET", "/users/me", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["email"], "a@x.com");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn public_routes_do_not_require_a_token() {
    let ctx = TestContext::new();

    let response = ctx.send(empty_request("GET", "/metrics", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx.send(empty_request("GET", "/no-such-route", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let ctx = TestContext::new();

    let request = axum::http::Request::builder()
        .uri("/users/me")
        .header("x-request-id", "req-123")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = ctx.send(request).await;

    assert_eq!(response.headers()["x-request-id"], "req-123");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}
