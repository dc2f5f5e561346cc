//! File upload, listing and streaming handlers.

use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use bytes::Bytes;

use docvault_core::error::AppError;
use docvault_core::types::{FileRef, Node};

use crate::dto::request::{ListFilesQuery, ViewFileQuery};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::Caller;
use crate::handlers::stream_response;
use crate::state::AppState;

/// POST /api/files/upload-file (multipart: `file`, `folderPath`)
pub async fn upload_file(
    State(state): State<AppState>,
    caller: Caller,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Node>>), ApiError> {
    let mut folder_path: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "folderPath" => {
                folder_path = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            "file" => {
                file_name = field.file_name().map(String::from);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let folder_path = folder_path.ok_or_else(|| AppError::validation("folderPath is required"))?;
    let data = data.ok_or_else(|| AppError::validation("file is required"))?;
    let file_name = file_name.ok_or_else(|| AppError::validation("file name is required"))?;

    let node = state
        .file_service
        .upload_file(&caller, &file_name, data, &folder_path)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(node))))
}

/// GET /api/files/list-all-files?search=
pub async fn list_all_files(
    State(state): State<AppState>,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<ApiResponse<Vec<FileRef>>>, ApiError> {
    let files = state
        .file_service
        .list_all_files(query.search.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(files)))
}

/// GET /api/files/view-file?folderPath=&fileName=
pub async fn view_file(
    State(state): State<AppState>,
    Query(query): Query<ViewFileQuery>,
) -> Result<Response, ApiError> {
    let download = state
        .file_service
        .retrieve_file(&query.folder_path, &query.file_name)
        .await?;
    Ok(stream_response(download)?)
}
