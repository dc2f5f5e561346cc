//! Materializes the storage root as a forest of [`Node`]s.
//!
//! The walk is regenerated on every call and nothing is cached. It uses an
//! explicit stack rather than recursion, so arbitrarily deep nesting cannot
//! exhaust the call stack. Each directory handle is fully drained and closed
//! before its subdirectories are opened.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::Node;

use crate::sanitizer::SafePath;

/// Builds node trees from the physical layout under a root directory.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    /// Storage root.
    root: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Folder,
    File,
}

#[derive(Debug)]
struct Entry {
    name: String,
    kind: EntryKind,
}

struct Frame {
    node: Node,
    dir: PathBuf,
    entries: std::vec::IntoIter<Entry>,
}

impl TreeBuilder {
    /// Create a tree builder for the given storage root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Build one node per top-level entry of the storage root, each fully
    /// populated with its descendants.
    pub async fn build(&self) -> AppResult<Vec<Node>> {
        let root = self.root.clone();
        let forest = tokio::task::spawn_blocking(move || build_forest(&root))
            .await
            .map_err(|e| AppError::internal(format!("Tree walk task failed: {e}")))??;
        Ok(forest)
    }

    /// Build the node at `path` together with its descendants.
    pub async fn build_subtree(&self, path: &SafePath) -> AppResult<Node> {
        let path = path.clone();
        tokio::task::spawn_blocking(move || build_subtree(&path))
            .await
            .map_err(|e| AppError::internal(format!("Tree walk task failed: {e}")))?
    }
}

fn build_forest(root: &Path) -> AppResult<Vec<Node>> {
    // The container's empty path makes its children root-level nodes.
    let container = Node::folder("", None);
    let entries = read_entries(root).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            AppError::not_found("Storage root not found")
        } else {
            AppError::from_io(e, "read storage root", &root.display().to_string())
        }
    })?;
    let container = populate(container, root.to_path_buf(), entries)?;
    Ok(container.children.unwrap_or_default())
}

fn build_subtree(path: &SafePath) -> AppResult<Node> {
    let meta = fs::symlink_metadata(path.physical())
        .map_err(|e| AppError::from_io(e, "inspect", path.logical()))?;

    if meta.is_file() {
        return Ok(Node::file(path.name(), path.parent_logical()));
    }
    if !meta.is_dir() {
        return Err(AppError::not_found(format!("Not found: {}", path.logical())));
    }

    let node = Node::folder(path.name(), path.parent_logical());
    let entries = read_entries(path.physical())
        .map_err(|e| AppError::from_io(e, "read directory", path.logical()))?;
    populate(node, path.physical().to_path_buf(), entries)
}

/// Depth-first fill of `node`, whose directory is `dir`.
fn populate(node: Node, dir: PathBuf, entries: Vec<Entry>) -> AppResult<Node> {
    let mut stack = vec![Frame {
        node,
        dir,
        entries: entries.into_iter(),
    }];

    while let Some(frame) = stack.last_mut() {
        let Some(entry) = frame.entries.next() else {
            let Some(done) = stack.pop() else { break };
            match stack.last_mut() {
                Some(parent) => parent.node.push_child(done.node),
                None => return Ok(done.node),
            }
            continue;
        };

        match entry.kind {
            EntryKind::File => {
                let child = Node::file(entry.name, Some(&frame.node.path));
                frame.node.push_child(child);
            }
            EntryKind::Folder => {
                let child_dir = frame.dir.join(&entry.name);
                let child = Node::folder(entry.name, Some(&frame.node.path));
                match read_entries(&child_dir) {
                    Ok(entries) => stack.push(Frame {
                        node: child,
                        dir: child_dir,
                        entries: entries.into_iter(),
                    }),
                    // Removed or renamed by a concurrent request.
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        debug!(path = %child.path, "Folder vanished during tree walk");
                    }
                    Err(e) => return Err(AppError::from_io(e, "read directory", &child.path)),
                }
            }
        }
    }

    Err(AppError::internal("Tree walk ended without a result"))
}

/// Read and classify the entries of one directory, folders first then by
/// name. The directory handle is closed when this returns.
fn read_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };

        let kind = if file_type.is_dir() {
            EntryKind::Folder
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            // Symlinks and special files are never part of the tree.
            continue;
        };

        match entry.file_name().into_string() {
            Ok(name) => entries.push(Entry { name, kind }),
            Err(raw) => {
                warn!(dir = %dir.display(), name = ?raw, "Skipping entry with non UTF-8 name");
            }
        }
    }

    entries.sort_by(|a, b| {
        let a_rank = a.kind != EntryKind::Folder;
        let b_rank = b.kind != EntryKind::Folder;
        a_rank.cmp(&b_rank).then_with(|| a.name.cmp(&b.name))
    });
    Ok(entries)
}
