//! Stable item identifiers.
//!
//! Paths are the only identity the filesystem offers, and they change on
//! every rename of an ancestor. [`ItemIndex`] keeps an opaque [`ItemId`] per
//! logical path and moves it along with renames, so references handed out
//! earlier keep resolving. The index is optionally persisted as JSON to a
//! file outside the storage root.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{ItemId, Node};

/// On-disk representation.
#[derive(Debug, Default, Serialize, Deserialize)]
struct IndexFile {
    items: BTreeMap<String, ItemId>,
}

#[derive(Debug, Default)]
struct IndexState {
    by_path: BTreeMap<String, ItemId>,
    by_id: HashMap<ItemId, String>,
    /// Bumped by every mutation; never persisted.
    generation: u64,
}

impl IndexState {
    fn from_file(file: IndexFile) -> Self {
        let by_id = file
            .items
            .iter()
            .map(|(path, id)| (*id, path.clone()))
            .collect();
        Self {
            by_path: file.items,
            by_id,
            generation: 0,
        }
    }

    fn insert(&mut self, path: String, id: ItemId) {
        self.by_id.insert(id, path.clone());
        self.by_path.insert(path, id);
    }

    /// Remove `path` and everything below it, returning the removed entries.
    fn take_prefix(&mut self, prefix: &str) -> Vec<(String, ItemId)> {
        let nested = format!("{prefix}/");
        let keys: Vec<String> = self
            .by_path
            .range(prefix.to_string()..)
            .map(|(path, _)| path)
            .take_while(|path| path.starts_with(prefix))
            .filter(|path| path.as_str() == prefix || path.starts_with(&nested))
            .cloned()
            .collect();

        keys.into_iter()
            .filter_map(|path| {
                let id = self.by_path.remove(&path)?;
                self.by_id.remove(&id);
                Some((path, id))
            })
            .collect()
    }
}

/// Bidirectional map between stable ids and current logical paths.
#[derive(Debug)]
pub struct ItemIndex {
    state: RwLock<IndexState>,
    /// Persistence target, if any.
    file: Option<PathBuf>,
}

impl ItemIndex {
    /// An index that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(IndexState::default()),
            file: None,
        }
    }

    /// Load the index from `file`. A missing file yields an empty index; an
    /// unreadable or corrupt one is a configuration error.
    pub async fn load(file: impl Into<PathBuf>) -> AppResult<Self> {
        let file = file.into();
        let state = match fs::read(&file).await {
            Ok(raw) => {
                let parsed: IndexFile = serde_json::from_slice(&raw).map_err(|e| {
                    AppError::configuration(format!(
                        "Corrupt item index {}: {e}",
                        file.display()
                    ))
                })?;
                info!(path = %file.display(), items = parsed.items.len(), "Loaded item index");
                IndexState::from_file(parsed)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => IndexState::default(),
            Err(e) => {
                return Err(AppError::configuration(format!(
                    "Cannot read item index {}: {e}",
                    file.display()
                )));
            }
        };

        Ok(Self {
            state: RwLock::new(state),
            file: Some(file),
        })
    }

    /// Reject an index file placed inside the storage root, where it would
    /// show up in listings.
    pub fn check_location(file: &Path, root: &Path) -> AppResult<()> {
        let absolute = if file.is_absolute() {
            file.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| AppError::configuration(format!("Cannot resolve index path: {e}")))?
                .join(file)
        };
        // The file may not exist yet; its parent directory usually does.
        let canonical_parent = absolute.parent().and_then(|p| p.canonicalize().ok());
        let anchored = match (canonical_parent, absolute.file_name()) {
            (Some(parent), Some(name)) => parent.join(name),
            _ => absolute.clone(),
        };

        if anchored.starts_with(root) {
            return Err(AppError::configuration(format!(
                "storage.index_file must lie outside the storage root: {}",
                file.display()
            )));
        }
        Ok(())
    }

    /// Number of tracked items.
    pub async fn len(&self) -> usize {
        self.state.read().await.by_path.len()
    }

    /// Current mutation generation. Read it before walking the tree and
    /// hand it to [`ItemIndex::reconcile`].
    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    /// Returns `true` if nothing is tracked.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// The id for `path`, assigning a fresh one if the path is new.
    pub async fn id_for(&self, path: &str) -> AppResult<ItemId> {
        if let Some(id) = self.state.read().await.by_path.get(path) {
            return Ok(*id);
        }

        let mut state = self.state.write().await;
        if let Some(id) = state.by_path.get(path) {
            return Ok(*id);
        }
        let id = ItemId::new();
        state.insert(path.to_string(), id);
        state.generation += 1;
        self.persist(&state).await?;
        Ok(id)
    }

    /// Current logical path of `id`.
    pub async fn resolve(&self, id: ItemId) -> Option<String> {
        self.state.read().await.by_id.get(&id).cloned()
    }

    /// Move every id under `old` (inclusive) to the same place under `new`.
    pub async fn rename_prefix(&self, old: &str, new: &str) -> AppResult<()> {
        let mut state = self.state.write().await;
        let moved = state.take_prefix(old);
        if moved.is_empty() {
            return Ok(());
        }
        for (path, id) in moved {
            let rest = &path[old.len()..];
            state.insert(format!("{new}{rest}"), id);
        }
        state.generation += 1;
        debug!(from = %old, to = %new, "Moved item ids");
        self.persist(&state).await
    }

    /// Drop every id under `path` (inclusive).
    pub async fn remove_prefix(&self, path: &str) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.take_prefix(path).is_empty() {
            return Ok(());
        }
        state.generation += 1;
        self.persist(&state).await
    }

    /// Sync the index with a freshly built forest: every node gets an id
    /// (new paths get fresh ones) and ids of paths not in the forest are
    /// dropped.
    ///
    /// `observed` is the [`ItemIndex::generation`] read before the walk. If
    /// a mutation landed since, the forest may predate it: known ids are
    /// attached, unknown paths stay without one and nothing is pruned.
    pub async fn reconcile(&self, forest: &mut [Node], observed: u64) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.generation != observed {
            for root in forest.iter_mut() {
                root.visit_mut(|node| node.id = state.by_path.get(&node.path).copied());
            }
            debug!(
                observed,
                current = state.generation,
                "Tree changed during walk, skipped reconcile"
            );
            return Ok(());
        }

        let mut seen = BTreeMap::new();
        let mut changed = false;

        for root in forest.iter_mut() {
            root.visit_mut(|node| {
                let id = match state.by_path.get(&node.path) {
                    Some(id) => *id,
                    None => {
                        changed = true;
                        ItemId::new()
                    }
                };
                node.id = Some(id);
                seen.insert(node.path.clone(), id);
            });
        }

        if seen.len() != state.by_path.len() {
            changed = true;
        }
        if !changed {
            return Ok(());
        }

        let generation = state.generation;
        *state = IndexState::from_file(IndexFile { items: seen });
        state.generation = generation;
        self.persist(&state).await
    }

    /// Attach ids to `node` and its descendants without pruning anything.
    pub async fn annotate(&self, node: &mut Node) -> AppResult<()> {
        let mut state = self.state.write().await;
        let mut changed = false;
        node.visit_mut(|n| {
            let id = match state.by_path.get(&n.path) {
                Some(id) => *id,
                None => {
                    let id = ItemId::new();
                    state.insert(n.path.clone(), id);
                    changed = true;
                    id
                }
            };
            n.id = Some(id);
        });
        if changed {
            state.generation += 1;
            self.persist(&state).await?;
        }
        Ok(())
    }

    /// Write the index to disk, via a temporary file and a rename. Called
    /// with the write lock held so writers never interleave.
    async fn persist(&self, state: &IndexState) -> AppResult<()> {
        let Some(file) = &self.file else {
            return Ok(());
        };

        let snapshot = IndexFile {
            items: state.by_path.clone(),
        };
        let raw = serde_json::to_vec_pretty(&snapshot)?;

        if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::from_io(e, "create index directory", &parent.display().to_string()))?;
        }
        let tmp = file.with_extension("json.tmp");
        let path = file.display().to_string();
        fs::write(&tmp, raw)
            .await
            .map_err(|e| AppError::from_io(e, "write item index", &path))?;
        fs::rename(&tmp, file)
            .await
            .map_err(|e| AppError::from_io(e, "replace item index", &path))?;
        Ok(())
    }
}
