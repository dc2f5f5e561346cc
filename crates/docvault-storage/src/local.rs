//! Local filesystem storage.

use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::NodeKind;

use crate::ByteStream;
use crate::sanitizer::{PathSanitizer, SafePath};
use crate::tree::TreeBuilder;

/// Physical operations on the storage root.
///
/// Every method takes a [`SafePath`], so no caller-supplied string ever
/// reaches the filesystem without passing through the sanitizer first.
#[derive(Debug, Clone)]
pub struct LocalStore {
    /// Canonical storage root.
    root: PathBuf,
    sanitizer: PathSanitizer,
    tree: TreeBuilder,
}

impl LocalStore {
    /// Open the storage root at `root_path`, creating it if needed.
    pub async fn open(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root)
            .await
            .map_err(|e| AppError::from_io(e, "create storage root", root_path))?;

        let sanitizer = PathSanitizer::new(&root).await?;
        let root = sanitizer.root().to_path_buf();
        let tree = TreeBuilder::new(&root);
        Ok(Self {
            root,
            sanitizer,
            tree,
        })
    }

    /// Canonical storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The sanitizer bound to this root.
    pub fn sanitizer(&self) -> &PathSanitizer {
        &self.sanitizer
    }

    /// The tree builder bound to this root.
    pub fn tree(&self) -> &TreeBuilder {
        &self.tree
    }

    /// Returns `true` if the storage root exists and is a directory.
    pub async fn health_check(&self) -> AppResult<bool> {
        match fs::metadata(&self.root).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::from_io(
                e,
                "inspect storage root",
                &self.root.display().to_string(),
            )),
        }
    }

    /// What lives at `path`, if anything. Symlinks and special files count
    /// as absent.
    pub async fn kind(&self, path: &SafePath) -> AppResult<Option<NodeKind>> {
        match fs::symlink_metadata(path.physical()).await {
            Ok(meta) if meta.is_dir() => Ok(Some(NodeKind::Folder)),
            Ok(meta) if meta.is_file() => Ok(Some(NodeKind::File)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::from_io(e, "inspect", path.logical())),
        }
    }

    /// Returns `true` if anything at all, including a symlink, occupies `path`.
    pub async fn is_occupied(&self, path: &SafePath) -> AppResult<bool> {
        match fs::symlink_metadata(path.physical()).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::from_io(e, "inspect", path.logical())),
        }
    }

    /// Make sure the storage root itself exists.
    pub async fn ensure_root(&self) -> AppResult<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::from_io(e, "create storage root", "/"))
    }

    /// Create exactly one directory. Fails with `AlreadyExists` if anything
    /// occupies the path and `NotFound` if the parent is missing.
    pub async fn create_dir(&self, path: &SafePath) -> AppResult<()> {
        fs::create_dir(path.physical())
            .await
            .map_err(|e| AppError::from_io(e, "create folder", path.logical()))?;
        debug!(path = %path.logical(), "Created directory");
        Ok(())
    }

    /// Create a directory and any missing ancestors.
    pub async fn create_dir_all(&self, path: &SafePath) -> AppResult<()> {
        fs::create_dir_all(path.physical())
            .await
            .map_err(|e| AppError::from_io(e, "create folder", path.logical()))
    }

    /// Move `from` to `to` in a single filesystem rename.
    pub async fn rename(&self, from: &SafePath, to: &SafePath) -> AppResult<()> {
        fs::rename(from.physical(), to.physical())
            .await
            .map_err(|e| {
                AppError::from_io(
                    e,
                    "rename",
                    &format!("{} -> {}", from.logical(), to.logical()),
                )
            })?;
        debug!(from = %from.logical(), to = %to.logical(), "Renamed");
        Ok(())
    }

    /// Remove a file, or a directory together with its contents.
    pub async fn remove(&self, path: &SafePath, kind: NodeKind) -> AppResult<()> {
        let result = match kind {
            NodeKind::Folder => fs::remove_dir_all(path.physical()).await,
            NodeKind::File => fs::remove_file(path.physical()).await,
        };
        result.map_err(|e| AppError::from_io(e, "delete", path.logical()))?;
        debug!(path = %path.logical(), "Removed");
        Ok(())
    }

    /// Write `data` to the file at `path` and return the bytes written.
    ///
    /// With `overwrite` unset an existing entry fails with `AlreadyExists`
    /// without being touched. A write that fails part way removes the
    /// partial file.
    pub async fn write_file(&self, path: &SafePath, data: Bytes, overwrite: bool) -> AppResult<u64> {
        let mut options = fs::OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let mut file = options
            .open(path.physical())
            .await
            .map_err(|e| AppError::from_io(e, "create file", path.logical()))?;

        let written = async {
            file.write_all(&data).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            if let Err(cleanup) = fs::remove_file(path.physical()).await {
                warn!(path = %path.logical(), error = %cleanup, "Failed to remove partial file");
            }
            return Err(AppError::from_io(e, "write file", path.logical()));
        }

        debug!(path = %path.logical(), bytes = data.len(), "Wrote file");
        Ok(data.len() as u64)
    }

    /// Open the regular file at `path` for streaming. Returns the stream and
    /// the file size.
    pub async fn open_read(&self, path: &SafePath) -> AppResult<(ByteStream, u64)> {
        let file = fs::File::open(path.physical())
            .await
            .map_err(|e| AppError::from_io(e, "open file", path.logical()))?;
        let meta = file
            .metadata()
            .await
            .map_err(|e| AppError::from_io(e, "inspect", path.logical()))?;
        if !meta.is_file() {
            return Err(AppError::not_found(format!(
                "File not found: {}",
                path.logical()
            )));
        }

        let stream = ReaderStream::new(file);
        Ok((Box::pin(stream.map(|r| r.map(Bytes::from))), meta.len()))
    }
}
