//! Folder tree and folder/item lifecycle handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use docvault_core::types::Node;

use crate::dto::request::{
    CreateFolderRequest, DeleteItemRequest, RenameItemRequest, validate_body,
};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::Caller;
use crate::state::AppState;

/// GET /api/folders/folder-structure
pub async fn folder_structure(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Node>>>, ApiError> {
    let tree = state.folder_service.tree().await?;
    Ok(Json(ApiResponse::ok(tree)))
}

/// POST /api/folders/create-folder
pub async fn create_folder(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Node>>), ApiError> {
    validate_body(&req)?;
    let node = state
        .folder_service
        .create_folder(
            &caller,
            &req.folder_name,
            req.parent_folder_path.as_deref(),
            req.is_root,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(node))))
}

/// PUT /api/folders/rename-item
pub async fn rename_item(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<RenameItemRequest>,
) -> Result<Json<ApiResponse<Node>>, ApiError> {
    validate_body(&req)?;
    let node = state
        .folder_service
        .rename_item(&caller, &req.item_path, &req.new_name)
        .await?;
    Ok(Json(ApiResponse::ok(node)))
}

/// DELETE /api/folders/delete-item
pub async fn delete_item(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<DeleteItemRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    validate_body(&req)?;
    state
        .folder_service
        .delete_item(&caller, &req.item_path)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(format!(
        "'{}' deleted",
        req.item_path
    )))))
}
