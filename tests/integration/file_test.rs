//! Integration tests for file operations.

use axum::http::{StatusCode, header};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_upload_and_stream_headers() {
    let app = TestApp::new().await;

    let upload = app.upload("Docs", "manual.pdf", b"%PDF manual").await;
    assert_eq!(upload.status, StatusCode::CREATED);
    assert!(upload.body["data"]["id"].is_string());

    let raw = app
        .get_raw("/api/files/view-file?folderPath=Docs&fileName=manual.pdf")
        .await;
    assert_eq!(raw.status, StatusCode::OK);
    assert_eq!(raw.headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(raw.headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(
        raw.headers[header::CONTENT_DISPOSITION],
        "inline; filename=\"manual.pdf\""
    );
    assert_eq!(&raw.body[..], b"%PDF manual");
}

#[tokio::test]
async fn test_duplicate_upload_is_rejected_by_default() {
    let app = TestApp::new().await;
    assert_eq!(
        app.upload("Docs", "a.txt", b"one").await.status,
        StatusCode::CREATED
    );

    let again = app.upload("Docs", "a.txt", b"two").await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let raw = app
        .get_raw("/api/files/view-file?folderPath=Docs&fileName=a.txt")
        .await;
    assert_eq!(&raw.body[..], b"one");
}

#[tokio::test]
async fn test_list_all_files_and_search() {
    let app = TestApp::new().await;
    for (folder, name) in [
        ("Finance/2024", "Annual Report.pdf"),
        ("Finance", "budget.xlsx"),
        ("Legal", "contract-report.docx"),
    ] {
        assert_eq!(
            app.upload(folder, name, b"x").await.status,
            StatusCode::CREATED
        );
    }

    let all = app.request("GET", "/api/files/list-all-files", None).await;
    assert_eq!(all.status, StatusCode::OK);
    let files = all.body["data"].as_array().unwrap();
    assert_eq!(files.len(), 3);

    let hits = app
        .request("GET", "/api/files/list-all-files?search=REPORT", None)
        .await;
    let hits = hits.body["data"].as_array().unwrap();
    assert_eq!(hits.len(), 2);
    assert!(
        hits.iter()
            .all(|f| f["name"].as_str().unwrap().to_lowercase().contains("report"))
    );

    let annual = hits
        .iter()
        .find(|f| f["name"] == "Annual Report.pdf")
        .unwrap();
    assert_eq!(annual["folder_path"], "Finance/2024");
    let view_url = annual["view_url"].as_str().unwrap();
    let raw = app.get_raw(view_url).await;
    assert_eq!(raw.status, StatusCode::OK);
}

#[tokio::test]
async fn test_item_content_by_id() {
    let app = TestApp::new().await;
    let upload = app.upload("Docs", "notes.txt", b"hello").await;
    let id = upload.body["data"]["id"].as_str().unwrap().to_string();

    let raw = app.get_raw(&format!("/api/items/{id}/content")).await;
    assert_eq!(raw.status, StatusCode::OK);
    assert_eq!(&raw.body[..], b"hello");

    let tree = app.tree().await;
    let folder_id = tree[0]["id"].as_str().unwrap();
    let raw = app.get_raw(&format!("/api/items/{folder_id}/content")).await;
    assert_eq!(raw.status, StatusCode::BAD_REQUEST);

    let raw = app
        .get_raw("/api/items/00000000-0000-4000-8000-000000000000")
        .await;
    assert_eq!(raw.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_view_missing_file() {
    let app = TestApp::new().await;
    app.create_folder("Docs", None).await;

    let raw = app
        .get_raw("/api/files/view-file?folderPath=Docs&fileName=nope.txt")
        .await;
    assert_eq!(raw.status, StatusCode::NOT_FOUND);
}
