//! Route definitions for the DocVault HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Multipart framing on top of the largest accepted file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let api_routes = Router::new()
        .merge(folder_routes())
        .merge(file_routes())
        .merge(item_routes())
        .merge(activity_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(middleware::compression::build_compression_layer())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::build_cors_layer(&state.config.server.cors))
        .layer(TimeoutLayer::new(timeout))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Folder tree and folder/item lifecycle.
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders/folder-structure",
            get(handlers::folder::folder_structure),
        )
        .route("/folders/create-folder", post(handlers::folder::create_folder))
        .route("/folders/rename-item", put(handlers::folder::rename_item))
        .route("/folders/delete-item", delete(handlers::folder::delete_item))
}

/// File upload, listing and streaming.
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files/upload-file", post(handlers::file::upload_file))
        .route("/files/list-all-files", get(handlers::file::list_all_files))
        .route("/files/view-file", get(handlers::file::view_file))
}

/// Lookups by stable id.
fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/items/{id}", get(handlers::item::get_item))
        .route("/items/{id}/content", get(handlers::item::item_content))
}

/// Activity feed.
fn activity_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/activity-logs",
            get(handlers::activity::list_activities),
        )
        .route(
            "/activity-logs/unread-count",
            get(handlers::activity::unread_count),
        )
        .route(
            "/activity-logs/mark-all-read",
            put(handlers::activity::mark_all_read),
        )
        .route(
            "/activity-logs/{id}/read",
            put(handlers::activity::mark_read),
        )
        .route(
            "/activity-logs/{id}",
            delete(handlers::activity::delete_activity),
        )
}

/// Health check.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
