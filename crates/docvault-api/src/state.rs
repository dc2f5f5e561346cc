//! Shared application state passed to all handlers.

use std::sync::Arc;

use docvault_core::config::AppConfig;
use docvault_service::{ActivityLog, FileService, FolderService, Services};
use docvault_storage::LocalStore;

/// State shared by every request. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Physical storage, for health checks.
    pub store: Arc<LocalStore>,
    /// Folder operations.
    pub folder_service: Arc<FolderService>,
    /// File operations.
    pub file_service: Arc<FileService>,
    /// Activity feed.
    pub activity: Arc<ActivityLog>,
}

impl AppState {
    /// Build the state from opened services.
    pub fn new(config: AppConfig, services: Services) -> Self {
        Self {
            config: Arc::new(config),
            store: services.store,
            folder_service: Arc::new(services.folders),
            file_service: Arc::new(services.files),
            activity: services.activity,
        }
    }
}
