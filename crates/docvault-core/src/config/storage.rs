//! Storage root configuration.

use serde::{Deserialize, Serialize};

/// What an upload does when a file with the same name already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadConflictPolicy {
    /// Fail with an already-exists error.
    #[default]
    Reject,
    /// Replace the existing file in place. No previous version is kept.
    Overwrite,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory that holds the whole folder tree. Nothing outside of it is
    /// ever read or written on behalf of a caller.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// JSON file persisting stable item identifiers. Must live outside
    /// `root_path`. An empty string keeps the index in memory only.
    #[serde(default = "default_index_file")]
    pub index_file: String,
    /// Maximum upload size in bytes (default 100 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Name collision policy for uploads.
    #[serde(default)]
    pub upload_conflict: UploadConflictPolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            index_file: default_index_file(),
            max_upload_size_bytes: default_max_upload(),
            upload_conflict: UploadConflictPolicy::default(),
        }
    }
}

impl StorageConfig {
    /// Returns the index file path, or `None` when persistence is disabled.
    pub fn index_file(&self) -> Option<&str> {
        let trimmed = self.index_file.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

fn default_root_path() -> String {
    "./data/uploads".to_string()
}

fn default_index_file() -> String {
    "./data/index.json".to_string()
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MB
}
