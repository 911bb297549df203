//! Authentication test helpers

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

pub const PASSWORD: &str = "password123";

/// Register `username` with `{username}@example.com` and return the new id
pub async fn register(server: &TestServer, username: &str) -> Uuid {
    let response = server
        .post("/users/register")
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": PASSWORD,
            "name": username,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED, "{}", response.text());
    let body: Value = response.json();
    body["_id"].as_str().unwrap().parse().unwrap()
}

/// Log in and return `{token, refreshToken}`
pub async fn login(server: &TestServer, username: &str) -> Value {
    let response = server
        .post("/users/login")
        .json(&json!({ "username": username, "password": PASSWORD }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED, "{}", response.text());
    let body: Value = response.json();
    body["tokens"].clone()
}

/// Register and log in; returns the access token
pub async fn sign_up(server: &TestServer, username: &str) -> String {
    register(server, username).await;
    login(server, username).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Switch the account of `token` to private
pub async fn make_private(server: &TestServer, token: &str) {
    let response = server
        .put("/users/me")
        .authorization_bearer(token)
        .json(&json!({ "private": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

/// Follow (or request to follow) `username`
pub async fn follow(server: &TestServer, token: &str, username: &str) -> Value {
    let response = server
        .post(&format!("/users/me/follow/{}", username))
        .authorization_bearer(token)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json()
}

/// Create a text post and return its id
pub async fn create_post(server: &TestServer, token: &str, text: &str) -> Uuid {
    let response = server
        .post("/posts")
        .authorization_bearer(token)
        .json(&json!({ "text": text }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED, "{}", response.text());
    let body: Value = response.json();
    body["_id"].as_str().unwrap().parse().unwrap()
}
