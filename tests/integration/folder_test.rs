//! Integration tests for folder operations.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{TestApp, find};

#[tokio::test]
async fn test_finance_scenario_end_to_end() {
    let app = TestApp::new().await;

    let finance = app.create_folder("Finance", None).await;
    assert_eq!(finance["path"], "Finance");
    assert_eq!(finance["children"], json!([]));

    let year = app.create_folder("2024", Some("Finance")).await;
    assert_eq!(year["path"], "Finance/2024");

    let upload = app
        .upload("Finance/2024", "report.pdf", b"%PDF-1.7 report")
        .await;
    assert_eq!(upload.status, StatusCode::CREATED, "{}", upload.body);
    assert_eq!(upload.body["data"]["path"], "Finance/2024/report.pdf");

    let tree = app.tree().await;
    assert!(find(&tree, "Finance/2024/report.pdf").is_some());

    let renamed = app
        .request(
            "PUT",
            "/api/folders/rename-item",
            Some(json!({"itemPath": "Finance", "newName": "Accounting"})),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK, "{}", renamed.body);
    assert_eq!(renamed.body["data"]["path"], "Accounting");

    let tree = app.tree().await;
    assert!(find(&tree, "Finance").is_none());
    assert!(find(&tree, "Accounting/2024/report.pdf").is_some());

    let old = app
        .get_raw("/api/files/view-file?folderPath=Finance%2F2024&fileName=report.pdf")
        .await;
    assert_eq!(old.status, StatusCode::NOT_FOUND);

    let new = app
        .get_raw("/api/files/view-file?folderPath=Accounting%2F2024&fileName=report.pdf")
        .await;
    assert_eq!(new.status, StatusCode::OK);
    assert_eq!(&new.body[..], b"%PDF-1.7 report");

    let deleted = app
        .request(
            "DELETE",
            "/api/folders/delete-item",
            Some(json!({"itemPath": "Accounting"})),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(app.tree().await, json!([]));
}

#[tokio::test]
async fn test_nested_rename_keeps_parent() {
    let app = TestApp::new().await;
    app.create_folder("Finance", None).await;
    let year = app.create_folder("2024", Some("Finance")).await;
    let year_id = year["id"].as_str().unwrap().to_string();
    let upload = app.upload("Finance/2024", "report.pdf", b"%PDF q4").await;
    assert_eq!(upload.status, StatusCode::CREATED);

    let renamed = app
        .request(
            "PUT",
            "/api/folders/rename-item",
            Some(json!({"itemPath": "Finance/2024", "newName": "2024-Archive"})),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK, "{}", renamed.body);
    assert_eq!(renamed.body["data"]["path"], "Finance/2024-Archive");
    assert_eq!(renamed.body["data"]["parent_path"], "Finance");
    assert_eq!(
        renamed.body["data"]["children"][0]["path"],
        "Finance/2024-Archive/report.pdf"
    );

    let tree = app.tree().await;
    assert!(find(&tree, "Finance").is_some());
    assert!(find(&tree, "Finance/2024").is_none());
    assert!(find(&tree, "Finance/2024-Archive/report.pdf").is_some());

    let old = app
        .get_raw("/api/files/view-file?folderPath=Finance%2F2024&fileName=report.pdf")
        .await;
    assert_eq!(old.status, StatusCode::NOT_FOUND);

    let new = app
        .get_raw("/api/files/view-file?folderPath=Finance%2F2024-Archive&fileName=report.pdf")
        .await;
    assert_eq!(new.status, StatusCode::OK);
    assert_eq!(&new.body[..], b"%PDF q4");

    let item = app.request("GET", &format!("/api/items/{year_id}"), None).await;
    assert_eq!(item.body["data"]["path"], "Finance/2024-Archive");
}

#[tokio::test]
async fn test_item_id_survives_rename() {
    let app = TestApp::new().await;
    app.create_folder("Finance", None).await;
    let year = app.create_folder("2024", Some("Finance")).await;
    let id = year["id"].as_str().unwrap().to_string();

    let renamed = app
        .request(
            "PUT",
            "/api/folders/rename-item",
            Some(json!({"itemPath": "Finance", "newName": "Accounting"})),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);

    let item = app.request("GET", &format!("/api/items/{id}"), None).await;
    assert_eq!(item.status, StatusCode::OK);
    assert_eq!(item.body["data"]["path"], "Accounting/2024");
    assert_eq!(item.body["data"]["id"], id.as_str());
}

#[tokio::test]
async fn test_create_conflicts_and_missing_parent() {
    let app = TestApp::new().await;
    app.create_folder("Finance", None).await;

    let dup = app
        .request(
            "POST",
            "/api/folders/create-folder",
            Some(json!({"folderName": "Finance", "isRoot": true})),
        )
        .await;
    assert_eq!(dup.status, StatusCode::CONFLICT);
    assert_eq!(dup.body["error"], "ALREADY_EXISTS");

    let orphan = app
        .request(
            "POST",
            "/api/folders/create-folder",
            Some(json!({"folderName": "2024", "parentFolderPath": "Missing"})),
        )
        .await;
    assert_eq!(orphan.status, StatusCode::NOT_FOUND);

    let empty = app
        .request(
            "POST",
            "/api/folders/create-folder",
            Some(json!({"folderName": ""})),
        )
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_traversal_is_rejected_everywhere() {
    let app = TestApp::new().await;
    app.create_folder("Finance", None).await;

    let cases = [
        (
            "POST",
            "/api/folders/create-folder",
            json!({"folderName": "..", "isRoot": true}),
        ),
        (
            "POST",
            "/api/folders/create-folder",
            json!({"folderName": "x", "parentFolderPath": "../../etc"}),
        ),
        (
            "PUT",
            "/api/folders/rename-item",
            json!({"itemPath": "../Finance", "newName": "x"}),
        ),
        (
            "PUT",
            "/api/folders/rename-item",
            json!({"itemPath": "Finance", "newName": "../x"}),
        ),
        (
            "DELETE",
            "/api/folders/delete-item",
            json!({"itemPath": "/etc"}),
        ),
        (
            "DELETE",
            "/api/folders/delete-item",
            json!({"itemPath": "Finance/../.."}),
        ),
    ];
    for (method, path, body) in cases {
        let response = app.request(method, path, Some(body.clone())).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{method} {path} {body}");
        assert_eq!(response.body["error"], "VALIDATION_ERROR");
    }

    let upload = app.upload("../outside", "evil.txt", b"x").await;
    assert_eq!(upload.status, StatusCode::BAD_REQUEST);

    let view = app
        .get_raw("/api/files/view-file?folderPath=..&fileName=passwd")
        .await;
    assert_eq!(view.status, StatusCode::BAD_REQUEST);

    // Nothing escaped the root.
    assert!(find(&app.tree().await, "Finance").is_some());
    assert!(!app.root.parent().unwrap().join("outside").exists());
}

#[tokio::test]
async fn test_rename_and_delete_missing_items() {
    let app = TestApp::new().await;
    app.create_folder("A", None).await;
    app.create_folder("B", None).await;

    let clash = app
        .request(
            "PUT",
            "/api/folders/rename-item",
            Some(json!({"itemPath": "A", "newName": "B"})),
        )
        .await;
    assert_eq!(clash.status, StatusCode::CONFLICT);

    let missing = app
        .request(
            "PUT",
            "/api/folders/rename-item",
            Some(json!({"itemPath": "C", "newName": "D"})),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let missing = app
        .request(
            "DELETE",
            "/api/folders/delete-item",
            Some(json!({"itemPath": "C"})),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}
