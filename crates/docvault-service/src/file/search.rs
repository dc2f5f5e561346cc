//! Flattening the tree into file listings.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use docvault_core::types::node::walk_forest;
use docvault_core::types::{FileRef, Node};

/// Route that streams a file addressed by folder and name.
pub const VIEW_FILE_ROUTE: &str = "/api/files/view-file";

/// Every file in `forest`, in traversal order, optionally filtered by a
/// case-insensitive substring of the file name. A blank search matches all.
pub fn flatten_files(forest: &[Node], search: Option<&str>) -> Vec<FileRef> {
    let needle = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    walk_forest(forest)
        .filter(|node| !node.is_folder())
        .filter(|node| match &needle {
            Some(needle) => node.name.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .map(|node| {
            let folder_path = node.parent_path.clone().unwrap_or_default();
            FileRef {
                view_url: view_url(&folder_path, &node.name),
                name: node.name.clone(),
                path: node.path.clone(),
                folder_path,
                id: node.id,
            }
        })
        .collect()
}

/// Relative URL retrieving `file_name` from `folder_path`.
pub fn view_url(folder_path: &str, file_name: &str) -> String {
    format!(
        "{VIEW_FILE_ROUTE}?folderPath={}&fileName={}",
        utf8_percent_encode(folder_path, NON_ALPHANUMERIC),
        utf8_percent_encode(file_name, NON_ALPHANUMERIC),
    )
}
