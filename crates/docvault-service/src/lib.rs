//! # docvault-service
//!
//! Business logic for DocVault. Each service validates caller input through
//! the storage sanitizer, performs a single filesystem mutation or read,
//! keeps the item index in step and records the outcome in the activity
//! feed.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references.

pub mod activity;
pub mod context;
pub mod file;
pub mod folder;
pub mod services;

pub use activity::{Activity, ActivityAction, ActivityLog};
pub use context::RequestContext;
pub use file::{FileDownload, FileService};
pub use folder::FolderService;
pub use services::Services;
