//! Bounded activity log.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::NodeKind;

use crate::context::RequestContext;

/// Number of entries returned by [`ActivityLog::list`] when no limit is given.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Kind of mutation an activity records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    /// A folder was created.
    Create,
    /// A folder or file was renamed.
    Rename,
    /// A folder or file was deleted.
    Delete,
    /// A file was uploaded.
    Upload,
}

/// One entry in the activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Monotonic identifier.
    pub id: u64,
    /// What happened.
    pub action: ActivityAction,
    /// Human-readable summary.
    pub message: String,
    /// Whether the affected entity is a folder or a file.
    pub entity_type: NodeKind,
    /// Logical path of the entity after the mutation.
    pub entity_path: String,
    /// Caller identity, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// When the mutation completed.
    pub timestamp: DateTime<Utc>,
    /// Whether the entry has been acknowledged.
    pub read: bool,
}

#[derive(Debug, Default)]
struct LogState {
    next_id: u64,
    /// Oldest first.
    entries: VecDeque<Activity>,
}

/// Bounded feed; the oldest entry is evicted once `capacity` is reached.
#[derive(Debug)]
pub struct ActivityLog {
    capacity: usize,
    state: RwLock<LogState>,
}

impl ActivityLog {
    /// Creates an empty log holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: RwLock::new(LogState {
                next_id: 1,
                entries: VecDeque::new(),
            }),
        }
    }

    /// Append an entry and return it.
    pub async fn record(
        &self,
        ctx: &RequestContext,
        action: ActivityAction,
        entity_type: NodeKind,
        entity_path: &str,
        message: impl Into<String>,
    ) -> Activity {
        let mut state = self.state.write().await;
        let activity = Activity {
            id: state.next_id,
            action,
            message: message.into(),
            entity_type,
            entity_path: entity_path.to_string(),
            user_id: ctx.user_id.clone(),
            timestamp: Utc::now(),
            read: false,
        };
        state.next_id += 1;

        if state.entries.len() == self.capacity {
            state.entries.pop_front();
        }
        state.entries.push_back(activity.clone());
        debug!(id = activity.id, action = ?activity.action, "Recorded activity");
        activity
    }

    /// Newest entries first, at most `limit` of them.
    pub async fn list(&self, limit: Option<usize>) -> Vec<Activity> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        let state = self.state.read().await;
        state.entries.iter().rev().take(limit).cloned().collect()
    }

    /// Number of entries not yet marked read.
    pub async fn unread_count(&self) -> usize {
        let state = self.state.read().await;
        state.entries.iter().filter(|a| !a.read).count()
    }

    /// Mark one entry as read.
    pub async fn mark_read(&self, id: u64) -> AppResult<()> {
        let mut state = self.state.write().await;
        let entry = state
            .entries
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::not_found(format!("Activity {id} not found")))?;
        entry.read = true;
        Ok(())
    }

    /// Mark every entry as read. Returns how many changed.
    pub async fn mark_all_read(&self) -> usize {
        let mut state = self.state.write().await;
        let mut changed = 0;
        for entry in state.entries.iter_mut().filter(|a| !a.read) {
            entry.read = true;
            changed += 1;
        }
        changed
    }

    /// Remove one entry.
    pub async fn delete(&self, id: u64) -> AppResult<()> {
        let mut state = self.state.write().await;
        let position = state
            .entries
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| AppError::not_found(format!("Activity {id} not found")))?;
        state.entries.remove(position);
        Ok(())
    }
}
