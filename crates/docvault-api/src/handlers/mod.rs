//! HTTP request handlers organized by domain.

pub mod activity;
pub mod file;
pub mod folder;
pub mod health;
pub mod item;

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;

use docvault_core::error::AppError;
use docvault_service::FileDownload;

/// Stream a download back with its content headers.
pub(crate) fn stream_response(download: FileDownload) -> Result<Response, AppError> {
    let disposition = format!(
        "inline; filename=\"{}\"",
        download.file_name.replace(['"', '\\'], "_")
    );
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, download.content_type)
        .header(header::CONTENT_LENGTH, download.size)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(Body::from_stream(download.stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))
}
