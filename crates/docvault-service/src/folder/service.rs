//! Folder lifecycle operations on the physical tree.

use std::sync::Arc;

use tracing::{debug, info};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{ItemId, Node, NodeKind};
use docvault_storage::sanitizer::sanitize_name;
use docvault_storage::{ItemIndex, LocalStore, PathLocks};

use crate::activity::{ActivityAction, ActivityLog};
use crate::context::RequestContext;

/// Creates, renames and deletes folders (and renames/deletes files), and
/// serves the folder tree.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Physical storage.
    store: Arc<LocalStore>,
    /// Stable ids.
    index: Arc<ItemIndex>,
    /// Mutation locks.
    locks: Arc<PathLocks>,
    /// Activity feed.
    activity: Arc<ActivityLog>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        store: Arc<LocalStore>,
        index: Arc<ItemIndex>,
        locks: Arc<PathLocks>,
        activity: Arc<ActivityLog>,
    ) -> Self {
        Self {
            store,
            index,
            locks,
            activity,
        }
    }

    /// Create the folder `name` under `parent_path`, or at the top level
    /// when `is_root` is set or no parent is given.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_path: Option<&str>,
        is_root: bool,
    ) -> AppResult<Node> {
        let sanitizer = self.store.sanitizer();
        let name = sanitize_name(name)?;
        let parent = match parent_path.map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) if !is_root => Some(sanitizer.resolve(path).await?),
            _ => None,
        };
        let target = sanitizer.join(parent.as_ref(), &name).await?;

        let _guard = self.locks.lock(&[target.logical()]).await;

        match &parent {
            None => self.store.ensure_root().await?,
            Some(parent) => {
                if self.store.kind(parent).await? != Some(NodeKind::Folder) {
                    return Err(AppError::not_found(format!(
                        "Parent folder not found: {}",
                        parent.logical()
                    )));
                }
            }
        }

        if self.store.is_occupied(&target).await? {
            return Err(AppError::already_exists(format!(
                "'{}' already exists",
                target.logical()
            )));
        }
        self.store.create_dir(&target).await?;

        // A path that reappears is a new item.
        self.index.remove_prefix(target.logical()).await?;
        let mut node = Node::folder(name.as_str(), target.parent_logical());
        node.id = Some(self.index.id_for(target.logical()).await?);

        info!(path = %target.logical(), user_id = ?ctx.user_id, "Folder created");
        self.activity
            .record(
                ctx,
                ActivityAction::Create,
                NodeKind::Folder,
                target.logical(),
                format!("Created folder '{}'", target.logical()),
            )
            .await;
        Ok(node)
    }

    /// Rename the folder or file at `item_path` to `new_name` within the
    /// same parent. Returns the renamed node with its subtree.
    pub async fn rename_item(
        &self,
        ctx: &RequestContext,
        item_path: &str,
        new_name: &str,
    ) -> AppResult<Node> {
        let sanitizer = self.store.sanitizer();
        let item = sanitizer.resolve(item_path).await?;
        let new_name = sanitize_name(new_name)?;
        let target = item.sibling(&new_name);

        let _guard = self.locks.lock(&[item.logical(), target.logical()]).await;

        let kind = self
            .store
            .kind(&item)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item not found: {}", item.logical())))?;

        if target.logical() != item.logical() {
            if self.store.is_occupied(&target).await? {
                return Err(AppError::already_exists(format!(
                    "'{}' already exists",
                    target.logical()
                )));
            }
            self.store.rename(&item, &target).await?;
            self.index
                .rename_prefix(item.logical(), target.logical())
                .await?;

            info!(
                from = %item.logical(),
                to = %target.logical(),
                user_id = ?ctx.user_id,
                "Item renamed"
            );
            self.activity
                .record(
                    ctx,
                    ActivityAction::Rename,
                    kind,
                    target.logical(),
                    format!("Renamed '{}' to '{}'", item.logical(), new_name),
                )
                .await;
        }

        let mut node = self.store.tree().build_subtree(&target).await?;
        self.index.annotate(&mut node).await?;
        Ok(node)
    }

    /// Delete the folder (recursively) or file at `item_path`.
    pub async fn delete_item(&self, ctx: &RequestContext, item_path: &str) -> AppResult<()> {
        let item = self.store.sanitizer().resolve(item_path).await?;

        let _guard = self.locks.lock(&[item.logical()]).await;

        let kind = self
            .store
            .kind(&item)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item not found: {}", item.logical())))?;
        self.store.remove(&item, kind).await?;
        self.index.remove_prefix(item.logical()).await?;

        info!(path = %item.logical(), kind = ?kind, user_id = ?ctx.user_id, "Item deleted");
        let noun = match kind {
            NodeKind::Folder => "folder",
            NodeKind::File => "file",
        };
        self.activity
            .record(
                ctx,
                ActivityAction::Delete,
                kind,
                item.logical(),
                format!("Deleted {noun} '{}'", item.logical()),
            )
            .await;
        Ok(())
    }

    /// The whole tree, one node per top-level entry, with ids attached.
    pub async fn tree(&self) -> AppResult<Vec<Node>> {
        let generation = self.index.generation().await;
        let mut forest = self.store.tree().build().await?;
        self.index.reconcile(&mut forest, generation).await?;
        debug!(roots = forest.len(), "Built folder tree");
        Ok(forest)
    }

    /// The current node for `id`, with its subtree.
    pub async fn get_item(&self, id: ItemId) -> AppResult<Node> {
        let path = self
            .index
            .resolve(id)
            .await
            .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))?;
        let safe = self.store.sanitizer().resolve(&path).await?;

        let mut node = match self.store.tree().build_subtree(&safe).await {
            Ok(node) => node,
            Err(e) if e.is_not_found() => {
                self.index.remove_prefix(&path).await?;
                return Err(AppError::not_found(format!("Item {id} not found")));
            }
            Err(e) => return Err(e),
        };
        self.index.annotate(&mut node).await?;
        Ok(node)
    }
}
