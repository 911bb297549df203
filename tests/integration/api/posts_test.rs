//! Posts API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::*;

#[tokio::test]
async fn test_create_and_get_post() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;
    register(&app.server, "john").await;

    let response = app
        .server
        .post("/posts")
        .authorization_bearer(&jane)
        .json(&json!({
            "text": "  Sunset at the beach  ",
            "location": "Lisbon",
            "tags": ["john"]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["text"], "Sunset at the beach");
    assert_eq!(created["location"], "Lisbon");
    assert_eq!(created["user"]["username"], "jane");
    assert_eq!(created["tags"][0]["username"], "john");
    assert_eq!(created["likes"], json!([]));

    let id = created["_id"].as_str().unwrap();
    let fetched: Value = app
        .server
        .get(&format!("/posts/{}", id))
        .authorization_bearer(&jane)
        .await
        .json();
    assert_eq!(fetched["_id"], id);
}

#[tokio::test]
async fn test_create_post_validation() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;

    let empty = app
        .server
        .post("/posts")
        .authorization_bearer(&jane)
        .json(&json!({ "text": "   " }))
        .await;
    assert_eq!(empty.status_code(), StatusCode::BAD_REQUEST);

    let unknown_tag = app
        .server
        .post("/posts")
        .authorization_bearer(&jane)
        .json(&json!({ "text": "hi", "tags": ["ghost"] }))
        .await;
    assert_eq!(unknown_tag.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = unknown_tag.json();
    assert_eq!(body["error"], "Unknown user: ghost");

    let feed: Value = app.server.get("/posts").authorization_bearer(&jane).await.json();
    assert_eq!(feed["total"], 0);
}

#[tokio::test]
async fn test_feed_contains_own_and_followed_posts() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;
    let john = sign_up(&app.server, "john").await;
    let mary = sign_up(&app.server, "mary").await;

    create_post(&app.server, &jane, "from jane").await;
    create_post(&app.server, &john, "from john").await;
    create_post(&app.server, &mary, "from mary").await;
    follow(&app.server, &jane, "john").await;

    let feed: Value = app.server.get("/posts").authorization_bearer(&jane).await.json();
    assert_eq!(feed["total"], 2);
    let mut texts: Vec<&str> = feed["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["text"].as_str().unwrap())
        .collect();
    texts.sort_unstable();
    assert_eq!(texts, vec!["from jane", "from john"]);
    assert_eq!(feed["links"]["first"], "/posts?limit=20&offset=0");
}

#[tokio::test]
async fn test_only_owner_updates_and_deletes() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;
    let john = sign_up(&app.server, "john").await;
    let id = create_post(&app.server, &jane, "draft").await;

    let foreign = app
        .server
        .put(&format!("/posts/{}", id))
        .authorization_bearer(&john)
        .json(&json!({ "text": "hacked" }))
        .await;
    assert_eq!(foreign.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = foreign.json();
    assert_eq!(body["error"], "User not Authorized");

    let updated: Value = app
        .server
        .put(&format!("/posts/{}", id))
        .authorization_bearer(&jane)
        .json(&json!({ "text": "final" }))
        .await
        .json();
    assert_eq!(updated["text"], "final");

    let foreign_delete = app
        .server
        .delete(&format!("/posts/{}", id))
        .authorization_bearer(&john)
        .await;
    assert_eq!(foreign_delete.status_code(), StatusCode::UNAUTHORIZED);

    let deleted = app
        .server
        .delete(&format!("/posts/{}", id))
        .authorization_bearer(&jane)
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    assert_eq!(deleted.text(), "DELETED");

    let gone = app
        .server
        .get(&format!("/posts/{}", id))
        .authorization_bearer(&jane)
        .await;
    assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_image_upload() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;
    let id = create_post(&app.server, &jane, "with a picture").await;

    let response = app
        .server
        .put(&format!("/posts/{}/image", id))
        .authorization_bearer(&jane)
        .multipart(png_form())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK, "{}", response.text());
    let body: Value = response.json();
    assert_eq!(
        body["image"],
        format!("/static/uploads/Instagram/{}.png", id)
    );
}

#[tokio::test]
async fn test_like_toggle() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;
    let john = sign_up(&app.server, "john").await;
    let me: Value = app.server.get("/users/me").authorization_bearer(&john).await.json();
    let john_id = me["_id"].clone();
    let id = create_post(&app.server, &jane, "like me").await;

    let liked = app
        .server
        .post(&format!("/posts/{}/like", id))
        .authorization_bearer(&john)
        .await;
    assert_eq!(liked.status_code(), StatusCode::CREATED);
    let body: Value = liked.json();
    assert_eq!(body["likes"], json!([john_id]));

    let notifications: Value = app
        .server
        .get("/notifications")
        .authorization_bearer(&jane)
        .await
        .json();
    assert_eq!(notifications.as_array().unwrap().len(), 1);
    assert_eq!(notifications[0]["action"], "liked your post");

    let unliked: Value = app
        .server
        .post(&format!("/posts/{}/like", id))
        .authorization_bearer(&john)
        .await
        .json();
    assert_eq!(unliked["likes"], json!([]));
}

#[tokio::test]
async fn test_private_posts_need_follow() {
    let app = spawn_app().await;
    let hidden = sign_up(&app.server, "hidden").await;
    make_private(&app.server, &hidden).await;
    let id = create_post(&app.server, &hidden, "secret").await;
    let stranger = sign_up(&app.server, "stranger").await;

    let response = app
        .server
        .get(&format!("/posts/{}", id))
        .authorization_bearer(&stranger)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let like = app
        .server
        .post(&format!("/posts/{}/like", id))
        .authorization_bearer(&stranger)
        .await;
    assert_eq!(like.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_posts_require_token() {
    let app = spawn_app().await;
    let response = app.server.get("/posts").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_id_gets_json_error() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;

    let response = app
        .server
        .get("/posts/not-a-uuid")
        .authorization_bearer(&jane)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], 400);
    assert!(body["error"].is_string());
}
