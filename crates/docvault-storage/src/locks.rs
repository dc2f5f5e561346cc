//! Striped mutation locks keyed by root folder.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tokio::sync::{Mutex, MutexGuard};

/// Number of lock stripes.
pub const STRIPES: usize = 64;

/// Serializes mutations per root tree.
///
/// A logical path maps to the stripe of its first segment, so every mutation
/// inside one top-level folder is serialized while different trees usually
/// proceed in parallel. Reads never lock.
#[derive(Debug)]
pub struct PathLocks {
    stripes: Vec<Mutex<()>>,
}

/// Held stripes; released on drop.
#[derive(Debug)]
pub struct PathGuard<'a> {
    _guards: Vec<MutexGuard<'a, ()>>,
}

impl PathLocks {
    /// Create a lock set with [`STRIPES`] stripes.
    pub fn new() -> Self {
        Self {
            stripes: (0..STRIPES).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Acquire the stripes covering every path in `paths`.
    ///
    /// Stripes are taken in ascending index order, so two callers locking
    /// overlapping sets can never deadlock.
    pub async fn lock(&self, paths: &[&str]) -> PathGuard<'_> {
        let mut indices: Vec<usize> = paths.iter().map(|p| self.stripe_of(p)).collect();
        indices.sort_unstable();
        indices.dedup();

        let mut guards = Vec::with_capacity(indices.len());
        for index in indices {
            guards.push(self.stripes[index].lock().await);
        }
        PathGuard { _guards: guards }
    }

    /// Stripe index for a logical path.
    pub fn stripe_of(&self, path: &str) -> usize {
        let root = path
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default();
        let mut hasher = DefaultHasher::new();
        root.hash(&mut hasher);
        (hasher.finish() % self.stripes.len() as u64) as usize
    }
}

impl Default for PathLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_same_tree_shares_a_stripe() {
        let locks = PathLocks::new();
        assert_eq!(
            locks.stripe_of("Finance"),
            locks.stripe_of("Finance/2024/report.pdf")
        );
    }

    #[tokio::test]
    async fn test_overlapping_lock_sets_do_not_deadlock() {
        let locks = Arc::new(PathLocks::new());

        let mut handles = Vec::new();
        for i in 0..16 {
            let locks = Arc::clone(&locks);
            handles.push(tokio::spawn(async move {
                let paths = if i % 2 == 0 {
                    ["Finance", "Legal"]
                } else {
                    ["Legal", "Finance"]
                };
                let _guard = locks.lock(&paths).await;
                tokio::task::yield_now().await;
            }));
        }

        let all = futures::future::join_all(handles);
        let results = tokio::time::timeout(Duration::from_secs(5), all)
            .await
            .unwrap();
        assert!(results.into_iter().all(|r| r.is_ok()));
    }

    #[tokio::test]
    async fn test_lock_excludes_same_tree() {
        let locks = PathLocks::new();
        let guard = locks.lock(&["Finance/2024"]).await;

        let contended = tokio::time::timeout(
            Duration::from_millis(50),
            locks.lock(&["Finance/2025"]),
        )
        .await;
        assert!(contended.is_err());

        drop(guard);
        let _guard = locks.lock(&["Finance/2025"]).await;
    }
}
