//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use docvault_core::error::AppError;

/// Create folder request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Name of the new folder.
    #[validate(length(min = 1, message = "Folder name is required"))]
    pub folder_name: String,
    /// Logical path of the parent folder.
    #[serde(default)]
    pub parent_folder_path: Option<String>,
    /// Create at the top level regardless of `parent_folder_path`.
    #[serde(default)]
    pub is_root: bool,
}

/// Rename request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenameItemRequest {
    /// Logical path of the folder or file to rename.
    #[validate(length(min = 1, message = "Item path is required"))]
    pub item_path: String,
    /// New single-segment name.
    #[validate(length(min = 1, message = "New name is required"))]
    pub new_name: String,
}

/// Delete request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeleteItemRequest {
    /// Logical path of the folder or file to delete.
    #[validate(length(min = 1, message = "Item path is required"))]
    pub item_path: String,
}

/// Query for `GET /api/files/list-all-files`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListFilesQuery {
    /// Case-insensitive substring of the file name.
    pub search: Option<String>,
}

/// Query for `GET /api/files/view-file`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewFileQuery {
    /// Containing folder; empty for the storage root.
    #[serde(default)]
    pub folder_path: String,
    /// File name.
    pub file_name: String,
}

/// Query for `GET /api/activity-logs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityQuery {
    /// Maximum number of entries.
    pub limit: Option<usize>,
}

/// Run the derived validation rules, mapping failures to a validation error.
pub fn validate_body<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))
}
