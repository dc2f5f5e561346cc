//! Shared test helpers for integration tests.

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use bytes::Bytes;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use docvault_api::{AppState, build_app};
use docvault_core::config::AppConfig;
use docvault_service::Services;

const BOUNDARY: &str = "docvault-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Canonical storage root
    pub root: PathBuf,
    /// Keeps the storage root alive
    _dir: TempDir,
}

/// Test response wrapper
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Raw (non-JSON) response
pub struct RawResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
}

impl TestApp {
    /// Create a new test application over an empty temporary storage root
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut config = AppConfig::default();
        config.storage.root_path = dir.path().join("uploads").display().to_string();
        config.storage.index_file = dir.path().join("index.json").display().to_string();

        let services = Services::open(&config)
            .await
            .expect("Failed to open storage");
        let root = services.store.root().to_path_buf();
        let router = build_app(AppState::new(config, services));

        Self {
            router,
            root,
            _dir: dir,
        }
    }

    /// Make a JSON request
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .header("X-User-Id", "integration")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let raw = self.send(req).await;
        let body: Value = serde_json::from_slice(&raw.body).unwrap_or(Value::Null);
        TestResponse {
            status: raw.status,
            body,
        }
    }

    /// GET a path and return the raw body
    pub async fn get_raw(&self, path: &str) -> RawResponse {
        let req = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Upload `data` as `file_name` into `folder_path` via multipart
    pub async fn upload(&self, folder_path: &str, file_name: &str, data: &[u8]) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"folderPath\"\r\n\r\n{folder_path}\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/api/files/upload-file")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("Failed to build request");

        let raw = self.send(req).await;
        TestResponse {
            status: raw.status,
            body: serde_json::from_slice(&raw.body).unwrap_or(Value::Null),
        }
    }

    /// Create a folder, asserting success
    pub async fn create_folder(&self, name: &str, parent: Option<&str>) -> Value {
        let response = self
            .request(
                "POST",
                "/api/folders/create-folder",
                Some(serde_json::json!({
                    "folderName": name,
                    "parentFolderPath": parent,
                    "isRoot": parent.is_none(),
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"].clone()
    }

    /// The current folder tree
    pub async fn tree(&self) -> Value {
        let response = self.request("GET", "/api/folders/folder-structure", None).await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["data"].clone()
    }

    async fn send(&self, req: Request<Body>) -> RawResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body");
        RawResponse {
            status,
            headers,
            body,
        }
    }
}

/// Find the node at `path` in a JSON forest
pub fn find<'a>(forest: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current: &[Value] = forest.as_array()?;
    let mut found = None;
    for segment in path.split('/') {
        let node = current.iter().find(|n| n["name"] == segment)?;
        current = node["children"].as_array().map(Vec::as_slice).unwrap_or(&[]);
        found = Some(node);
    }
    found
}
