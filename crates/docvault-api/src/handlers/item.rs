//! Lookups by stable item id.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;

use docvault_core::types::{ItemId, Node};

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::handlers::stream_response;
use crate::state::AppState;

/// GET /api/items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<ApiResponse<Node>>, ApiError> {
    let node = state.folder_service.get_item(id).await?;
    Ok(Json(ApiResponse::ok(node)))
}

/// GET /api/items/{id}/content
pub async fn item_content(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Response, ApiError> {
    let download = state.file_service.retrieve_by_id(id).await?;
    Ok(stream_response(download)?)
}
