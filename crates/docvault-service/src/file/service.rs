//! Upload, listing and retrieval of files.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use docvault_core::config::UploadConflictPolicy;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{FileRef, ItemId, Node, NodeKind};
use docvault_storage::content_type::content_type_for;
use docvault_storage::sanitizer::sanitize_name;
use docvault_storage::{ItemIndex, LocalStore, PathLocks, SafePath};

use super::download::FileDownload;
use super::search::flatten_files;
use crate::activity::{ActivityAction, ActivityLog};
use crate::context::RequestContext;

/// Handles file uploads, listings and downloads.
#[derive(Debug, Clone)]
pub struct FileService {
    /// Physical storage.
    store: Arc<LocalStore>,
    /// Stable ids.
    index: Arc<ItemIndex>,
    /// Mutation locks.
    locks: Arc<PathLocks>,
    /// Activity feed.
    activity: Arc<ActivityLog>,
    /// Name collision policy for uploads.
    conflict: UploadConflictPolicy,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        store: Arc<LocalStore>,
        index: Arc<ItemIndex>,
        locks: Arc<PathLocks>,
        activity: Arc<ActivityLog>,
        conflict: UploadConflictPolicy,
    ) -> Self {
        Self {
            store,
            index,
            locks,
            activity,
            conflict,
        }
    }

    /// Store `data` as `file_name` inside `folder_path`, creating the folder
    /// chain when it does not exist yet.
    ///
    /// Folders created here are left in place if the write itself fails.
    pub async fn upload_file(
        &self,
        ctx: &RequestContext,
        file_name: &str,
        data: Bytes,
        folder_path: &str,
    ) -> AppResult<Node> {
        let sanitizer = self.store.sanitizer();
        let folder = sanitizer.resolve(folder_path).await?;
        let name = sanitize_name(file_name)?;
        let target = sanitizer.join(Some(&folder), &name).await?;

        let _guard = self.locks.lock(&[folder.logical()]).await;

        match self.store.kind(&folder).await? {
            Some(NodeKind::Folder) => {}
            Some(NodeKind::File) => {
                return Err(AppError::validation(format!(
                    "'{}' is a file, not a folder",
                    folder.logical()
                )));
            }
            None => {
                self.store.create_dir_all(&folder).await?;
                debug!(path = %folder.logical(), "Created upload folder chain");
            }
        }

        let existed = match self.store.kind(&target).await? {
            Some(NodeKind::Folder) => {
                return Err(AppError::already_exists(format!(
                    "A folder named '{}' already exists",
                    target.logical()
                )));
            }
            Some(NodeKind::File) => true,
            None => false,
        };
        let overwrite = self.conflict == UploadConflictPolicy::Overwrite;
        if existed && !overwrite {
            return Err(AppError::already_exists(format!(
                "File '{}' already exists",
                target.logical()
            )));
        }

        let bytes = match self.store.write_file(&target, data, overwrite).await {
            Ok(bytes) => bytes,
            Err(e) => {
                if existed {
                    self.forget_if_gone(&target).await?;
                }
                return Err(e);
            }
        };

        if !existed {
            self.index.remove_prefix(target.logical()).await?;
        }
        let mut node = Node::file(name.as_str(), Some(folder.logical()));
        node.id = Some(self.index.id_for(target.logical()).await?);

        info!(
            path = %target.logical(),
            bytes,
            replaced = existed,
            user_id = ?ctx.user_id,
            "File uploaded"
        );
        self.activity
            .record(
                ctx,
                ActivityAction::Upload,
                NodeKind::File,
                target.logical(),
                format!("Uploaded file '{}' to '{}'", name, folder.logical()),
            )
            .await;
        Ok(node)
    }

    /// Every file under the storage root, optionally filtered by name.
    pub async fn list_all_files(&self, search: Option<&str>) -> AppResult<Vec<FileRef>> {
        let generation = self.index.generation().await;
        let mut forest = self.store.tree().build().await?;
        self.index.reconcile(&mut forest, generation).await?;
        let files = flatten_files(&forest, search);
        debug!(count = files.len(), search = ?search, "Listed files");
        Ok(files)
    }

    /// Open `file_name` inside `folder_path` for streaming. An empty
    /// `folder_path` addresses the storage root itself.
    pub async fn retrieve_file(&self, folder_path: &str, file_name: &str) -> AppResult<FileDownload> {
        let sanitizer = self.store.sanitizer();
        let name = sanitize_name(file_name)?;
        let folder = match folder_path.trim() {
            "" => None,
            path => Some(sanitizer.resolve(path).await?),
        };
        let target = sanitizer.join(folder.as_ref(), &name).await?;
        self.open(&target).await
    }

    /// Open the file identified by `id` for streaming.
    pub async fn retrieve_by_id(&self, id: ItemId) -> AppResult<FileDownload> {
        let path = self
            .index
            .resolve(id)
            .await
            .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))?;
        let target = self.store.sanitizer().resolve(&path).await?;

        match self.store.kind(&target).await? {
            Some(NodeKind::File) => self.open(&target).await,
            Some(NodeKind::Folder) => Err(AppError::validation(format!(
                "Item {id} is a folder, not a file"
            ))),
            None => Err(AppError::not_found(format!("Item {id} not found"))),
        }
    }

    /// Drop the id of `target` once nothing is left on disk. A failed
    /// overwrite truncates the old content and removes the partial file.
    async fn forget_if_gone(&self, target: &SafePath) -> AppResult<()> {
        if self.store.kind(target).await?.is_none() {
            warn!(path = %target.logical(), "Overwrite failed, previous content lost");
            self.index.remove_prefix(target.logical()).await?;
        }
        Ok(())
    }

    async fn open(&self, target: &SafePath) -> AppResult<FileDownload> {
        if self.store.kind(target).await? != Some(NodeKind::File) {
            return Err(AppError::not_found(format!(
                "File not found: {}",
                target.logical()
            )));
        }
        let (stream, size) = self.store.open_read(target).await?;
        debug!(path = %target.logical(), size, "Streaming file");
        Ok(FileDownload {
            stream,
            content_type: content_type_for(target.name()),
            size,
            file_name: target.name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use docvault_core::error::ErrorKind;
    use futures::TryStreamExt;

    use super::*;

    struct Fixture {
        _dir: tempfile::TempDir,
        service: FileService,
        store: Arc<LocalStore>,
    }

    async fn fixture(conflict: UploadConflictPolicy) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("uploads");
        let store = Arc::new(LocalStore::open(root.to_str().unwrap()).await.unwrap());
        let service = FileService::new(
            Arc::clone(&store),
            Arc::new(ItemIndex::in_memory()),
            Arc::new(PathLocks::new()),
            Arc::new(ActivityLog::new(100)),
            conflict,
        );
        Fixture {
            _dir: dir,
            service,
            store,
        }
    }

    async fn body(download: FileDownload) -> Vec<u8> {
        let chunks: Vec<Bytes> = download.stream.try_collect().await.unwrap();
        chunks.concat()
    }

    #[tokio::test]
    async fn test_upload_creates_folders_and_round_trips() {
        let f = fixture(UploadConflictPolicy::Reject).await;
        let ctx = RequestContext::anonymous();

        let node = f
            .service
            .upload_file(&ctx, "report.pdf", Bytes::from_static(b"%PDF-1.7"), "Finance/2024")
            .await
            .unwrap();
        assert_eq!(node.path, "Finance/2024/report.pdf");
        assert!(node.id.is_some());
        assert!(f.store.root().join("Finance/2024/report.pdf").is_file());

        let download = f
            .service
            .retrieve_file("Finance/2024", "report.pdf")
            .await
            .unwrap();
        assert_eq!(download.content_type, "application/pdf");
        assert_eq!(download.size, 8);
        assert_eq!(body(download).await, b"%PDF-1.7");

        let by_id = f.service.retrieve_by_id(node.id.unwrap()).await.unwrap();
        assert_eq!(body(by_id).await, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_upload_conflict_policies() {
        let ctx = RequestContext::anonymous();

        let f = fixture(UploadConflictPolicy::Reject).await;
        f.service
            .upload_file(&ctx, "a.txt", Bytes::from_static(b"one"), "Docs")
            .await
            .unwrap();
        let err = f
            .service
            .upload_file(&ctx, "a.txt", Bytes::from_static(b"two"), "Docs")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyExists);

        let f = fixture(UploadConflictPolicy::Overwrite).await;
        let first = f
            .service
            .upload_file(&ctx, "a.txt", Bytes::from_static(b"one"), "Docs")
            .await
            .unwrap();
        let second = f
            .service
            .upload_file(&ctx, "a.txt", Bytes::from_static(b"two"), "Docs")
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        let download = f.service.retrieve_file("Docs", "a.txt").await.unwrap();
        assert_eq!(body(download).await, b"two");
    }

    #[tokio::test]
    async fn test_failed_overwrite_forgets_vanished_file() {
        let f = fixture(UploadConflictPolicy::Overwrite).await;
        let ctx = RequestContext::anonymous();
        let node = f
            .service
            .upload_file(&ctx, "a.txt", Bytes::from_static(b"one"), "Docs")
            .await
            .unwrap();
        let id = node.id.unwrap();
        let target = f.store.sanitizer().resolve("Docs/a.txt").await.unwrap();

        // Still on disk: the id stays.
        f.service.forget_if_gone(&target).await.unwrap();
        assert_eq!(f.service.index.resolve(id).await.as_deref(), Some("Docs/a.txt"));

        std::fs::remove_file(target.physical()).unwrap();
        f.service.forget_if_gone(&target).await.unwrap();
        assert!(f.service.index.resolve(id).await.is_none());
        let err = f.service.retrieve_by_id(id).await.err().unwrap();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_upload_rejects_unsafe_input() {
        let f = fixture(UploadConflictPolicy::Reject).await;
        let ctx = RequestContext::anonymous();

        for (name, folder) in [
            ("a.txt", "../outside"),
            ("a.txt", "/etc"),
            ("../a.txt", "Docs"),
            ("a.txt", ""),
        ] {
            let err = f
                .service
                .upload_file(&ctx, name, Bytes::from_static(b"x"), folder)
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation, "{name} in {folder}");
        }
    }

    #[tokio::test]
    async fn test_retrieve_errors() {
        let f = fixture(UploadConflictPolicy::Reject).await;
        let ctx = RequestContext::anonymous();
        f.service
            .upload_file(&ctx, "a.txt", Bytes::from_static(b"x"), "Docs/Sub")
            .await
            .unwrap();

        let err = f.service.retrieve_file("Docs", "b.txt").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = f.service.retrieve_file("Docs", "Sub").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = f
            .service
            .retrieve_file("../..", "passwd")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_retrieve_by_id_rejects_folders() {
        let f = fixture(UploadConflictPolicy::Reject).await;
        let ctx = RequestContext::anonymous();
        f.service
            .upload_file(&ctx, "a.txt", Bytes::from_static(b"x"), "Docs")
            .await
            .unwrap();

        let listing = f.service.list_all_files(None).await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].folder_path, "Docs");

        // The listing reconciled ids for folders too.
        let folder_id = f.service.index.id_for("Docs").await.unwrap();
        let err = f.service.retrieve_by_id(folder_id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_list_search_and_root_files() {
        let f = fixture(UploadConflictPolicy::Reject).await;
        let ctx = RequestContext::anonymous();
        for (name, folder) in [("Budget.xlsx", "Finance"), ("notes.txt", "Finance/2024")] {
            f.service
                .upload_file(&ctx, name, Bytes::from_static(b"x"), folder)
                .await
                .unwrap();
        }
        std::fs::write(f.store.root().join("loose.txt"), b"loose").unwrap();

        let all = f.service.list_all_files(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|r| r.id.is_some()));

        let hits = f.service.list_all_files(Some("budget")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, "Finance/Budget.xlsx");

        let loose = all.iter().find(|r| r.name == "loose.txt").unwrap();
        assert_eq!(loose.folder_path, "");
        let download = f.service.retrieve_file("", "loose.txt").await.unwrap();
        assert_eq!(body(download).await, b"loose");
    }
}
