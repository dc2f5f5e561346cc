//! # docvault-api
//!
//! HTTP API layer for DocVault built on Axum.
//!
//! Exposes the folder, file, item and activity operations as REST
//! endpoints, together with middleware (CORS, compression, logging), the
//! caller extractor, DTOs and the error-to-status mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server, shutdown_signal};
pub use error::ApiError;
pub use state::AppState;
