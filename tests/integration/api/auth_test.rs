//! Authentication API integration tests
//!
//! Registration, login, token refresh and logout.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::*;

#[tokio::test]
async fn test_register_and_login() {
    let app = spawn_app().await;
    let id = register(&app.server, "jane").await;

    let response = app
        .server
        .post("/users/login")
        .json(&json!({ "email": "jane@example.com", "password": PASSWORD }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["ok"], true);
    let token = body["tokens"]["token"].as_str().unwrap();
    assert!(body["tokens"]["refreshToken"].is_string());

    let me: Value = app.server.get("/users/me").authorization_bearer(token).await.json();
    assert_eq!(me["_id"], id.to_string());
    assert_eq!(me["email"], "jane@example.com");
    assert!(me.get("passwordHash").is_none());
    assert!(me.get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_and_invalid() {
    let app = spawn_app().await;
    register(&app.server, "jane").await;

    let duplicate = app
        .server
        .post("/users/register")
        .json(&json!({ "username": "jane", "email": "other@example.com", "password": PASSWORD }))
        .await;
    assert_eq!(duplicate.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = duplicate.json();
    assert_eq!(body["status"], 400);

    let short_password = app
        .server
        .post("/users/register")
        .json(&json!({ "username": "john", "email": "john@example.com", "password": "short" }))
        .await;
    assert_eq!(short_password.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failure_message() {
    let app = spawn_app().await;
    register(&app.server, "jane").await;

    let response = app
        .server
        .post("/users/login")
        .json(&json!({ "username": "jane", "password": "wrong-password" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "User with email and password not found");
}

#[tokio::test]
async fn test_refresh_token_rotation() {
    let app = spawn_app().await;
    register(&app.server, "jane").await;
    let tokens = login(&app.server, "jane").await;

    let missing = app.server.post("/users/refreshToken").json(&json!({})).await;
    assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = missing.json();
    assert_eq!(body["error"], "Refresh token missing");

    let refreshed = app
        .server
        .post("/users/refreshToken")
        .json(&json!({ "refreshToken": tokens["refreshToken"] }))
        .await;
    assert_eq!(refreshed.status_code(), StatusCode::CREATED);
    let body: Value = refreshed.json();
    assert_ne!(body["tokens"]["refreshToken"], tokens["refreshToken"]);

    let reused = app
        .server
        .post("/users/refreshToken")
        .json(&json!({ "refreshToken": tokens["refreshToken"] }))
        .await;
    assert_eq!(reused.status_code(), StatusCode::FORBIDDEN);

    let garbage = app
        .server
        .post("/users/refreshToken")
        .json(&json!({ "refreshToken": "not.a.jwt" }))
        .await;
    assert_eq!(garbage.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_access_token_is_not_a_refresh_token() {
    let app = spawn_app().await;
    register(&app.server, "jane").await;
    let tokens = login(&app.server, "jane").await;

    let response = app
        .server
        .post("/users/refreshToken")
        .json(&json!({ "refreshToken": tokens["token"] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_log_out() {
    let app = spawn_app().await;
    register(&app.server, "jane").await;
    let tokens = login(&app.server, "jane").await;
    let token = tokens["token"].as_str().unwrap();

    let unauthenticated = app
        .server
        .post("/users/logOut")
        .json(&json!({ "refreshToken": tokens["refreshToken"] }))
        .await;
    assert_eq!(unauthenticated.status_code(), StatusCode::UNAUTHORIZED);

    let without_token = app.server.post("/users/logOut").authorization_bearer(token).await;
    assert_eq!(without_token.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = without_token.json();
    assert_eq!(body["error"], "Token not provided");

    let response = app
        .server
        .post("/users/logOut")
        .authorization_bearer(token)
        .json(&json!({ "refreshToken": tokens["refreshToken"] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "http://front.test/logIn");

    let revoked = app
        .server
        .post("/users/refreshToken")
        .json(&json!({ "refreshToken": tokens["refreshToken"] }))
        .await;
    assert_eq!(revoked.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_log_out_all() {
    let app = spawn_app().await;
    register(&app.server, "jane").await;
    let first = login(&app.server, "jane").await;
    let second = login(&app.server, "jane").await;

    let response = app
        .server
        .post("/users/logOutAll")
        .authorization_bearer(first["token"].as_str().unwrap())
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

    for tokens in [first, second] {
        let response = app
            .server
            .post("/users/refreshToken")
            .json(&json!({ "refreshToken": tokens["refreshToken"] }))
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_protected_routes_reject_bad_tokens() {
    let app = spawn_app().await;

    let missing = app.server.get("/users/me").await;
    assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);

    let garbage = app.server.get("/posts").authorization_bearer("garbage").await;
    assert_eq!(garbage.status_code(), StatusCode::UNAUTHORIZED);

    let token = sign_up(&app.server, "jane").await;
    let deleted = app.server.delete("/users/me").authorization_bearer(&token).await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    assert_eq!(deleted.text(), "Deleted");

    let after_delete = app.server.get("/users/me").authorization_bearer(&token).await;
    assert_eq!(after_delete.status_code(), StatusCode::UNAUTHORIZED);
}
