//! Users API integration tests
//!
//! Directory, profiles, settings, the follow graph and saved posts.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::*;

#[tokio::test]
async fn test_directory_search_and_links() {
    let app = spawn_app().await;
    for username in ["jane_doe", "john", "janet"] {
        register(&app.server, username).await;
    }

    let all: Value = app.server.get("/users").await.json();
    assert_eq!(all["total"], 3);
    assert!(all["users"]
        .as_array()
        .unwrap()
        .iter()
        .all(|u| u.get("email").is_none()));

    let page: Value = app
        .server
        .get("/users")
        .add_query_param("search", "JAN")
        .add_query_param("limit", 1)
        .await
        .json();
    assert_eq!(page["total"], 2);
    assert_eq!(page["users"].as_array().unwrap().len(), 1);
    assert_eq!(page["links"]["first"], "/users?search=JAN&limit=1&offset=0");
    assert_eq!(page["links"]["next"], "/users?search=JAN&limit=1&offset=1");
    assert_eq!(page["links"]["last"], "/users?search=JAN&limit=1&offset=1");
    assert!(page["links"].get("prev").is_none());
}

#[tokio::test]
async fn test_suggested_excludes_self_and_followed() {
    let app = spawn_app().await;
    let token = sign_up(&app.server, "jane").await;
    register(&app.server, "john").await;
    register(&app.server, "mary").await;
    follow(&app.server, &token, "john").await;

    let body: Value = app
        .server
        .get("/users/suggested")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["users"][0]["username"], "mary");
}

#[tokio::test]
async fn test_update_me_ignores_password() {
    let app = spawn_app().await;
    let token = sign_up(&app.server, "jane").await;

    let response = app
        .server
        .put("/users/me")
        .authorization_bearer(&token)
        .json(&json!({
            "bio": "Photographer",
            "website": "https://jane.example.com",
            "password": "hijacked-password"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["bio"], "Photographer");
    assert_eq!(body["website"], "https://jane.example.com");

    let still_old = app
        .server
        .post("/users/login")
        .json(&json!({ "username": "jane", "password": PASSWORD }))
        .await;
    assert_eq!(still_old.status_code(), StatusCode::CREATED);

    register(&app.server, "john").await;
    let taken = app
        .server
        .put("/users/me")
        .authorization_bearer(&token)
        .json(&json!({ "username": "john" }))
        .await;
    assert_eq!(taken.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_change_password() {
    let app = spawn_app().await;
    let token = sign_up(&app.server, "jane").await;

    let wrong = app
        .server
        .put("/users/me/changePassword")
        .authorization_bearer(&token)
        .json(&json!({ "oldPassword": "nope-nope", "newPassword": "brand-new-pass" }))
        .await;
    assert_eq!(wrong.status_code(), StatusCode::UNAUTHORIZED);

    let changed = app
        .server
        .put("/users/me/changePassword")
        .authorization_bearer(&token)
        .json(&json!({ "oldPassword": PASSWORD, "newPassword": "brand-new-pass" }))
        .await;
    assert_eq!(changed.status_code(), StatusCode::CREATED);
    assert_eq!(changed.text(), "Password changed");

    let login = app
        .server
        .post("/users/login")
        .json(&json!({ "username": "jane", "password": "brand-new-pass" }))
        .await;
    assert_eq!(login.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_profile_image_is_stored_and_served() {
    let app = spawn_app().await;
    let token = sign_up(&app.server, "jane").await;

    let response = app
        .server
        .put("/users/me/profileImage")
        .authorization_bearer(&token)
        .multipart(png_form())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK, "{}", response.text());
    let body: Value = response.json();
    let img = body["img"].as_str().unwrap().to_string();
    assert_eq!(img, "/static/uploads/Instagram/jane_profile.png");
    assert!(app.uploads.path().join("Instagram/jane_profile.png").exists());

    let served = app.server.get(&img).await;
    assert_eq!(served.status_code(), StatusCode::OK);
    assert_eq!(served.as_bytes().to_vec(), png_bytes());
}

#[tokio::test]
async fn test_profile_image_rejects_other_files() {
    let app = spawn_app().await;
    let token = sign_up(&app.server, "jane").await;

    let wrong_type = app
        .server
        .put("/users/me/profileImage")
        .authorization_bearer(&token)
        .multipart(image_form("image", "application/pdf"))
        .await;
    assert_eq!(wrong_type.status_code(), StatusCode::BAD_REQUEST);

    let wrong_field = app
        .server
        .put("/users/me/profileImage")
        .authorization_bearer(&token)
        .multipart(image_form("avatar", "image/png"))
        .await;
    assert_eq!(wrong_field.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_follow_toggle() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;
    let john = sign_up(&app.server, "john").await;

    let followed = follow(&app.server, &john, "jane").await;
    assert_eq!(followed["following"], true);
    assert_eq!(followed["requested"], false);
    assert_eq!(followed["followers"], 1);
    assert_eq!(followed["user"]["username"], "jane");

    let followers: Value = app
        .server
        .get("/users/jane/followers")
        .authorization_bearer(&jane)
        .await
        .json();
    assert_eq!(followers[0]["username"], "john");

    let unfollowed = follow(&app.server, &john, "jane").await;
    assert_eq!(unfollowed["following"], false);
    assert_eq!(unfollowed["followers"], 0);

    let me_self = app
        .server
        .post("/users/me/follow/john")
        .authorization_bearer(&john)
        .await;
    assert_eq!(me_self.status_code(), StatusCode::NOT_FOUND);
    let body: Value = me_self.json();
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_private_profile_redaction() {
    let app = spawn_app().await;
    let hidden = sign_up(&app.server, "hidden").await;
    make_private(&app.server, &hidden).await;
    create_post(&app.server, &hidden, "only for followers").await;
    let viewer = sign_up(&app.server, "viewer").await;

    let profile: Value = app
        .server
        .get("/users/hidden")
        .authorization_bearer(&viewer)
        .await
        .json();
    assert_eq!(profile["username"], "hidden");
    assert_eq!(profile["private"], true);
    assert_eq!(profile["numPosts"], 1);
    assert!(profile.get("posts").is_none());
    assert!(profile.get("email").is_none());
    assert!(profile.get("saved").is_none());

    let followers = app
        .server
        .get("/users/hidden/following")
        .authorization_bearer(&viewer)
        .await;
    assert_eq!(followers.status_code(), StatusCode::UNAUTHORIZED);

    let own: Value = app
        .server
        .get("/users/hidden")
        .authorization_bearer(&hidden)
        .await
        .json();
    assert_eq!(own["posts"].as_array().unwrap().len(), 1);

    let missing = app
        .server
        .get("/users/nobody")
        .authorization_bearer(&viewer)
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_saved_toggle() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;
    let post_id = create_post(&app.server, &jane, "keep this").await;

    let saved = app
        .server
        .post(&format!("/users/saved/{}", post_id))
        .authorization_bearer(&jane)
        .await;
    assert_eq!(saved.status_code(), StatusCode::CREATED);
    let body: Value = saved.json();
    assert_eq!(body, json!({ "saved": true, "posts": [post_id] }));

    let me: Value = app.server.get("/users/me").authorization_bearer(&jane).await.json();
    assert_eq!(me["saved"][0]["_id"], post_id.to_string());

    let unsaved: Value = app
        .server
        .post(&format!("/users/saved/{}", post_id))
        .authorization_bearer(&jane)
        .await
        .json();
    assert_eq!(unsaved, json!({ "saved": false, "posts": [] }));

    let missing = app
        .server
        .post(&format!("/users/saved/{}", uuid::Uuid::new_v4()))
        .authorization_bearer(&jane)
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_me_cascades() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;
    let john = sign_up(&app.server, "john").await;
    follow(&app.server, &john, "jane").await;
    let post_id = create_post(&app.server, &jane, "soon gone").await;

    let deleted = app.server.delete("/users/me").authorization_bearer(&jane).await;
    assert_eq!(deleted.status_code(), StatusCode::OK);

    let post = app
        .server
        .get(&format!("/posts/{}", post_id))
        .authorization_bearer(&john)
        .await;
    assert_eq!(post.status_code(), StatusCode::NOT_FOUND);

    let me: Value = app.server.get("/users/me").authorization_bearer(&john).await.json();
    assert_eq!(me["following"], 0);

    let directory: Value = app.server.get("/users").await.json();
    assert_eq!(directory["total"], 1);
}

#[tokio::test]
async fn test_saving_private_post_needs_access() {
    let app = spawn_app().await;
    let hidden = sign_up(&app.server, "hidden").await;
    make_private(&app.server, &hidden).await;
    let post_id = create_post(&app.server, &hidden, "secret text").await;
    let john = sign_up(&app.server, "john").await;

    let refused = app
        .server
        .post(&format!("/users/saved/{}", post_id))
        .authorization_bearer(&john)
        .await;
    assert_eq!(refused.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = refused.json();
    assert_eq!(body["error"], "This account is private");

    let me: Value = app.server.get("/users/me").authorization_bearer(&john).await.json();
    assert_eq!(me["saved"], json!([]));
}

#[tokio::test]
async fn test_saved_post_hidden_after_owner_goes_private() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;
    let post_id = create_post(&app.server, &jane, "public for now").await;
    let john = sign_up(&app.server, "john").await;

    let saved = app
        .server
        .post(&format!("/users/saved/{}", post_id))
        .authorization_bearer(&john)
        .await;
    assert_eq!(saved.status_code(), StatusCode::CREATED);

    make_private(&app.server, &jane).await;

    let me: Value = app.server.get("/users/me").authorization_bearer(&john).await.json();
    assert_eq!(me["saved"], json!([]));
}

#[tokio::test]
async fn test_tagged_posts_respect_author_privacy() {
    let app = spawn_app().await;
    let hidden = sign_up(&app.server, "hidden").await;
    make_private(&app.server, &hidden).await;
    register(&app.server, "bob").await;
    let carol = sign_up(&app.server, "carol").await;

    let created = app
        .server
        .post("/posts")
        .authorization_bearer(&hidden)
        .json(&json!({ "text": "private tagged", "tags": ["bob"] }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);

    let bob: Value = app
        .server
        .get("/users/bob")
        .authorization_bearer(&carol)
        .await
        .json();
    assert_eq!(bob["tagged"], json!([]));

    let seen_by_author: Value = app
        .server
        .get("/users/bob")
        .authorization_bearer(&hidden)
        .await
        .json();
    assert_eq!(seen_by_author["tagged"][0]["text"], "private tagged");
}
