//! Registration, login and creator-only mutation through the HTTP router.

mod common;

use axum::http::StatusCode;
use common::{body_json, empty_request, json_request, TestContext};
use helicopter_service::services::ResourceKind;
use serde_json::json;

#[tokio::test]
async fn register_returns_bearer_token() {
    let ctx = TestContext::new();

    let response = ctx
        .send(json_request(
            "POST",
            "/auth/register",
            None,
            &json!({ "email": "a@x.com", "password": "password123", "name": "Alice" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);
    assert!(body["access_token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let ctx = TestContext::new();
    ctx.register("a@x.com", "password123").await;

    let response = ctx
        .send(json_request(
            "POST",
            "/auth/register",
            None,
            &json!({ "email": "A@x.com", "password": "different-pass" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(ctx.identities.users.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn login_succeeds_with_correct_password() {
    let ctx = TestContext::new();
    ctx.register("a@x.com", "password123").await;

    let response = ctx
        .send(json_request(
            "POST",
            "/auth/login",
            None,
            &json!({ "email": "a@x.com", "password": "password123" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let token = body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();
    let me = ctx.send(empty_request("GET", "/users/me", Some(&token))).await;
    assert_eq!(me.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let ctx = TestContext::new();
    ctx.register("a@x.com", "password123").await;

    let wrong = ctx
        .send(json_request(
            "POST",
            "/auth/login",
            None,
            &json!({ "email": "a@x.com", "password": "wrong-password" }),
        ))
        .await;
    let unknown = ctx
        .send(json_request(
            "POST",
            "/auth/login",
            None,
            &json!({ "email": "nobody@x.com", "password": "password123" }),
        ))
        .await;

    assert_eq!(wrong.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(wrong).await, body_json(unknown).await);
}

#[tokio::test]
async fn invalid_registration_payloads_are_rejected() {
    let ctx = TestContext::new();

    let bad_email = ctx
        .send(json_request(
            "POST",
            "/auth/register",
            None,
            &json!({ "email": "not-an-email", "password": "password123" }),
        ))
        .await;
    assert_eq!(bad_email.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let short_password = ctx
        .send(json_request(
            "POST",
            "/auth/register",
            None,
            &json!({ "email": "a@x.com", "password": "short" }),
        ))
        .await;
    assert_eq!(short_password.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let malformed = axum::http::Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"email\":"))
        .unwrap();
    let response = ctx.send(malformed).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(ctx.identities.users.lock().unwrap().is_empty());
}

#[tokio::test]
async fn only_the_creator_passes_the_gate() {
    let ctx = TestContext::new();
    let token_a = ctx.register("a@x.com", "password123").await;
    let token_b = ctx.register("b@x.com", "password123").await;
    let a = ctx.user_id("a@x.com");
    // Stands in for POST /helicopters as A. Stamping creator_id on a real
    // create is covered against PostgreSQL in helicopter_test.rs.
    ctx.helicopters.insert(1, a);

    let users = ctx.identities.users.lock().unwrap().clone();
    let user_a = users.iter().find(|u| u.email == "a@x.com").unwrap();
    let user_b = users.iter().find(|u| u.email == "b@x.com").unwrap();
    let gate = &ctx.state.ownership;
    assert!(gate.is_creator(ResourceKind::Helicopter, 1, Some(user_a)).await);
    assert!(!gate.is_creator(ResourceKind::Helicopter, 1, Some(user_b)).await);
    assert!(!gate.is_creator(ResourceKind::Helicopter, 1, None).await);

    let patch = ctx
        .send(json_request(
            "PATCH",
            "/helicopters/1",
            Some(&token_b),
            &json!({ "model": "Hijacked" }),
        ))
        .await;
    assert_eq!(patch.status(), StatusCode::FORBIDDEN);

    let delete = ctx
        .send(empty_request("DELETE", "/helicopters/1", Some(&token_b)))
        .await;
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);

    // The creator gets past the gate; the handler then needs the database,
    // which these tests never provide.
    let allowed = ctx
        .send(empty_request("DELETE", "/helicopters/1", Some(&token_a)))
        .await;
    assert_ne!(allowed.status(), StatusCode::FORBIDDEN);
    assert_ne!(allowed.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn gate_is_scoped_per_resource_kind() {
    let ctx = TestContext::new();
    let token_a = ctx.register("a@x.com", "password123").await;
    let a = ctx.user_id("a@x.com");
    ctx.helicopters.insert(5, a);

    for uri in ["/engines/5", "/attributes/5", "/attribute-values/5"] {
        let response = ctx.send(empty_request("DELETE", uri, Some(&token_a))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "DELETE {}", uri);
    }
}

#[tokio::test]
async fn missing_or_malformed_ids_are_forbidden_on_mutation() {
    let ctx = TestContext::new();
    let token = ctx.register("a@x.com", "password123").await;

    let missing = ctx
        .send(empty_request("DELETE", "/engines/999", Some(&token)))
        .await;
    assert_eq!(missing.status(), StatusCode::FORBIDDEN);

    let malformed = ctx
        .send(json_request(
            "PATCH",
            "/attributes/abc",
            Some(&token),
            &json!({ "name": "x" }),
        ))
        .await;
    assert_eq!(malformed.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn mutation_without_token_is_unauthorized_not_forbidden() {
    let ctx = TestContext::new();
    ctx.helicopters.insert(1, 1);

    let response = ctx
        .send(empty_request("DELETE", "/helicopters/1", None))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
