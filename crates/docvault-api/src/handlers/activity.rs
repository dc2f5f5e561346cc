//! Activity feed handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use docvault_service::Activity;

use crate::dto::request::ActivityQuery;
use crate::dto::response::{ApiResponse, MessageResponse, UnreadCountResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/activity-logs
pub async fn list_activities(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> Json<ApiResponse<Vec<Activity>>> {
    Json(ApiResponse::ok(state.activity.list(query.limit).await))
}

/// GET /api/activity-logs/unread-count
pub async fn unread_count(State(state): State<AppState>) -> Json<ApiResponse<UnreadCountResponse>> {
    let unread = state.activity.unread_count().await;
    Json(ApiResponse::ok(UnreadCountResponse { unread }))
}

/// PUT /api/activity-logs/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.activity.mark_read(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Activity marked as read",
    ))))
}

/// PUT /api/activity-logs/mark-all-read
pub async fn mark_all_read(State(state): State<AppState>) -> Json<ApiResponse<MessageResponse>> {
    let changed = state.activity.mark_all_read().await;
    Json(ApiResponse::ok(MessageResponse::new(format!(
        "{changed} activities marked as read"
    ))))
}

/// DELETE /api/activity-logs/{id}
pub async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.activity.delete(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Activity deleted"))))
}
