//! Flattened file entries produced by listings.

use serde::{Deserialize, Serialize};

use super::id::ItemId;

/// A file found while listing the storage root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// File name.
    pub name: String,
    /// Root-relative logical path of the file.
    pub path: String,
    /// Logical path of the containing folder (empty at the storage root).
    pub folder_path: String,
    /// Relative URL that streams the file.
    pub view_url: String,
    /// Stable identifier, when one is assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
}
