//! Wiring of the storage layer and services from configuration.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use docvault_core::config::AppConfig;
use docvault_core::result::AppResult;
use docvault_storage::{ItemIndex, LocalStore, PathLocks};

use crate::activity::ActivityLog;
use crate::file::FileService;
use crate::folder::FolderService;

/// Every service sharing one storage root, index, lock set and feed.
#[derive(Debug, Clone)]
pub struct Services {
    /// Physical storage.
    pub store: Arc<LocalStore>,
    /// Stable ids.
    pub index: Arc<ItemIndex>,
    /// Activity feed.
    pub activity: Arc<ActivityLog>,
    /// Folder operations.
    pub folders: FolderService,
    /// File operations.
    pub files: FileService,
}

impl Services {
    /// Open the storage root and item index named in `config`.
    pub async fn open(config: &AppConfig) -> AppResult<Self> {
        let store = Arc::new(LocalStore::open(&config.storage.root_path).await?);

        let index = match config.storage.index_file() {
            Some(file) => {
                ItemIndex::check_location(Path::new(file), store.root())?;
                ItemIndex::load(file).await?
            }
            None => ItemIndex::in_memory(),
        };
        let index = Arc::new(index);
        let locks = Arc::new(PathLocks::new());
        let activity = Arc::new(ActivityLog::new(config.activity.capacity));

        let folders = FolderService::new(
            Arc::clone(&store),
            Arc::clone(&index),
            Arc::clone(&locks),
            Arc::clone(&activity),
        );
        let files = FileService::new(
            Arc::clone(&store),
            Arc::clone(&index),
            locks,
            Arc::clone(&activity),
            config.storage.upload_conflict,
        );

        info!(root = %store.root().display(), "Storage opened");
        Ok(Self {
            store,
            index,
            activity,
            folders,
            files,
        })
    }
}
