//! Stories API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::*;

async fn post_story(app: &TestApp, token: &str) -> Value {
    let response = app
        .server
        .post("/stories")
        .authorization_bearer(token)
        .multipart(png_form())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED, "{}", response.text());
    response.json()
}

#[tokio::test]
async fn test_story_upload_and_expiry_window() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;

    let story = post_story(&app, &jane).await;
    let id = story["_id"].as_str().unwrap();
    assert_eq!(
        story["image"],
        format!("/static/uploads/Instagram/stories/{}.png", id)
    );
    assert!(app
        .uploads
        .path()
        .join(format!("Instagram/stories/{}.png", id))
        .exists());

    let created = chrono::DateTime::parse_from_rfc3339(story["createdAt"].as_str().unwrap()).unwrap();
    let expires = chrono::DateTime::parse_from_rfc3339(story["expiresAt"].as_str().unwrap()).unwrap();
    assert_eq!(expires - created, chrono::Duration::hours(24));
}

#[tokio::test]
async fn test_followers_see_stories() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;
    let john = sign_up(&app.server, "john").await;
    let mary = sign_up(&app.server, "mary").await;
    post_story(&app, &jane).await;
    follow(&app.server, &john, "jane").await;

    let johns: Value = app.server.get("/stories").authorization_bearer(&john).await.json();
    assert_eq!(johns.as_array().unwrap().len(), 1);
    assert_eq!(johns[0]["user"]["username"], "jane");

    let marys: Value = app.server.get("/stories").authorization_bearer(&mary).await.json();
    assert!(marys.as_array().unwrap().is_empty());

    let profile: Value = app
        .server
        .get("/users/jane")
        .authorization_bearer(&mary)
        .await
        .json();
    assert_eq!(profile["stories"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_only_owner_deletes_story() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;
    let john = sign_up(&app.server, "john").await;
    let story = post_story(&app, &jane).await;
    let id = story["_id"].as_str().unwrap();

    let foreign = app
        .server
        .delete(&format!("/stories/{}", id))
        .authorization_bearer(&john)
        .await;
    assert_eq!(foreign.status_code(), StatusCode::UNAUTHORIZED);

    let deleted = app
        .server
        .delete(&format!("/stories/{}", id))
        .authorization_bearer(&jane)
        .await;
    assert_eq!(deleted.text(), "DELETED");

    let again = app
        .server
        .delete(&format!("/stories/{}", id))
        .authorization_bearer(&jane)
        .await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_story_upload_rejections() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;

    let wrong_type = app
        .server
        .post("/stories")
        .authorization_bearer(&jane)
        .multipart(image_form("image", "text/plain"))
        .await;
    assert_eq!(wrong_type.status_code(), StatusCode::BAD_REQUEST);

    let wrong_field = app
        .server
        .post("/stories")
        .authorization_bearer(&jane)
        .multipart(image_form("file", "image/png"))
        .await;
    assert_eq!(wrong_field.status_code(), StatusCode::BAD_REQUEST);

    let stories: Value = app.server.get("/stories").authorization_bearer(&jane).await.json();
    assert!(stories.as_array().unwrap().is_empty());
}
