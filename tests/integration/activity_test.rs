//! Integration tests for the activity feed and health endpoint.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_mutations_are_recorded() {
    let app = TestApp::new().await;
    app.create_folder("Finance", None).await;
    app.upload("Finance", "a.txt", b"x").await;

    let feed = app.request("GET", "/api/activity-logs", None).await;
    assert_eq!(feed.status, StatusCode::OK);
    let entries = feed.body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["action"], "upload");
    assert_eq!(entries[1]["action"], "create");
    assert_eq!(entries[1]["user_id"], "integration");
    assert_eq!(entries[1]["read"], false);

    let unread = app
        .request("GET", "/api/activity-logs/unread-count", None)
        .await;
    assert_eq!(unread.status, StatusCode::OK);
    assert_eq!(unread.body["data"]["unread"], 2);

    let id = entries[1]["id"].as_u64().unwrap();
    let read = app
        .request("PUT", &format!("/api/activity-logs/{id}/read"), None)
        .await;
    assert_eq!(read.status, StatusCode::OK);

    let unread = app
        .request("GET", "/api/activity-logs/unread-count", None)
        .await;
    assert_eq!(unread.body["data"]["unread"], 1);

    let all = app
        .request("PUT", "/api/activity-logs/mark-all-read", None)
        .await;
    assert_eq!(all.status, StatusCode::OK);
    let unread = app
        .request("GET", "/api/activity-logs/unread-count", None)
        .await;
    assert_eq!(unread.body["data"]["unread"], 0);

    let deleted = app
        .request("DELETE", &format!("/api/activity-logs/{id}"), None)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let again = app
        .request("DELETE", &format!("/api/activity-logs/{id}"), None)
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    let feed = app.request("GET", "/api/activity-logs", None).await;
    let entries = feed.body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["read"], true);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let health = app.request("GET", "/api/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["data"]["status"], "ok");
    assert_eq!(health.body["data"]["storage"], "available");
}
