//! Notifications API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::*;

async fn notifications(app: &TestApp, token: &str, unread: bool) -> Vec<Value> {
    let mut request = app.server.get("/notifications").authorization_bearer(token);
    if unread {
        request = request.add_query_param("unread", true);
    }
    let list: Value = request.await.json();
    list.as_array().cloned().unwrap_or_default()
}

#[tokio::test]
async fn test_follow_request_flow() {
    let app = spawn_app().await;
    let hidden = sign_up(&app.server, "hidden").await;
    make_private(&app.server, &hidden).await;
    let john = sign_up(&app.server, "john").await;

    let requested = follow(&app.server, &john, "hidden").await;
    assert_eq!(requested["requested"], true);
    assert_eq!(requested["following"], false);

    // A second attempt does not duplicate the request
    follow(&app.server, &john, "hidden").await;
    let inbox = notifications(&app, &hidden, false).await;
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0]["action"], "asked to follow you");
    assert_eq!(inbox[0]["from"]["username"], "john");

    let request_id = inbox[0]["_id"].as_str().unwrap().to_string();

    let stolen = app
        .server
        .post(&format!("/notifications/{}/accept", request_id))
        .authorization_bearer(&john)
        .await;
    assert_eq!(stolen.status_code(), StatusCode::NOT_FOUND);

    let accepted = app
        .server
        .post(&format!("/notifications/{}/accept", request_id))
        .authorization_bearer(&hidden)
        .await;
    assert_eq!(accepted.status_code(), StatusCode::CREATED);
    let body: Value = accepted.json();
    assert_eq!(body["read"], true);

    let profile: Value = app
        .server
        .get("/users/hidden")
        .authorization_bearer(&john)
        .await
        .json();
    assert_eq!(profile["isFollowing"], true);
    assert!(profile.get("posts").is_some());

    let johns_inbox = notifications(&app, &john, false).await;
    assert_eq!(johns_inbox[0]["action"], "accepted your follow request");

    let again = app
        .server
        .post(&format!("/notifications/{}/accept", request_id))
        .authorization_bearer(&hidden)
        .await;
    assert_eq!(again.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(notifications(&app, &john, false).await.len(), 1);
}

#[tokio::test]
async fn test_accept_rejects_other_actions() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;
    let john = sign_up(&app.server, "john").await;
    follow(&app.server, &john, "jane").await;

    let inbox = notifications(&app, &jane, false).await;
    assert_eq!(inbox[0]["action"], "started following you");
    let id = inbox[0]["_id"].as_str().unwrap().to_string();

    let response = app
        .server
        .post(&format!("/notifications/{}/accept", id))
        .authorization_bearer(&jane)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Not a follow request");
}

#[tokio::test]
async fn test_read_filter_and_delete() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;
    let john = sign_up(&app.server, "john").await;
    let mary = sign_up(&app.server, "mary").await;
    follow(&app.server, &john, "jane").await;
    follow(&app.server, &mary, "jane").await;

    let inbox = notifications(&app, &jane, false).await;
    assert_eq!(inbox.len(), 2);
    let first = inbox[0]["_id"].as_str().unwrap().to_string();

    let read = app
        .server
        .post(&format!("/notifications/{}/read", first))
        .authorization_bearer(&jane)
        .await;
    assert_eq!(read.status_code(), StatusCode::OK);
    let body: Value = read.json();
    assert_eq!(body["read"], true);

    let unread = notifications(&app, &jane, true).await;
    assert_eq!(unread.len(), 1);
    assert_ne!(unread[0]["_id"], first.as_str());

    let foreign = app
        .server
        .delete(&format!("/notifications/{}", first))
        .authorization_bearer(&john)
        .await;
    assert_eq!(foreign.status_code(), StatusCode::NOT_FOUND);

    let deleted = app
        .server
        .delete(&format!("/notifications/{}", first))
        .authorization_bearer(&jane)
        .await;
    assert_eq!(deleted.text(), "DELETED");
    assert_eq!(notifications(&app, &jane, false).await.len(), 1);
}

#[tokio::test]
async fn test_no_notification_for_own_actions() {
    let app = spawn_app().await;
    let jane = sign_up(&app.server, "jane").await;
    let post_id = create_post(&app.server, &jane, "mine").await;

    app.server
        .post(&format!("/posts/{}/like", post_id))
        .authorization_bearer(&jane)
        .await;

    assert!(notifications(&app, &jane, false).await.is_empty());
}
