//! Per-line serialization of topology mutations
//!
//! A link mutation and the aggregate recompute that follows it are two
//! separate store calls. Holding the line's lock across both keeps concurrent
//! mutations of the same line from interleaving, so the last recompute always
//! sees the last mutation. Different lines never contend.

use std::{collections::HashMap, fmt, sync::Arc};

use domain::LineId;
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of one async lock per line
#[derive(Default)]
pub struct LineLocks {
    locks: Mutex<HashMap<LineId, Arc<AsyncMutex<()>>>>,
}

impl fmt::Debug for LineLocks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineLocks")
            .field("tracked_lines", &self.locks.lock().len())
            .finish()
    }
}

impl LineLocks {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a line
    ///
    /// The guard releases the line when dropped.
    pub async fn acquire(&self, line_id: LineId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            // Drop entries nobody holds or waits on.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(line_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of lines currently held or awaited
    #[must_use]
    pub fn tracked_lines(&self) -> usize {
        self.locks.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_line_is_exclusive() {
        let locks = Arc::new(LineLocks::new());
        let line_id = LineId::new();

        let guard = locks.acquire(line_id).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(line_id).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn different_lines_do_not_contend() {
        let locks = LineLocks::new();
        let _first = locks.acquire(LineId::new()).await;
        let second = tokio::time::timeout(Duration::from_millis(100), locks.acquire(LineId::new()));
        assert!(second.await.is_ok());
    }

    #[tokio::test]
    async fn released_locks_are_pruned() {
        let locks = LineLocks::new();
        drop(locks.acquire(LineId::new()).await);
        drop(locks.acquire(LineId::new()).await);
        let _held = locks.acquire(LineId::new()).await;
        assert_eq!(locks.tracked_lines(), 1);
    }
}
