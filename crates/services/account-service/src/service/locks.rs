//! Per-aggregate write locks.
//!
//! Serializes load → operate → save for one user id inside this process, so
//! two requests can never both spend the same verification token.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Lock table keyed by aggregate id. Entries are dropped once unused.
#[derive(Default)]
pub(crate) struct AggregateLocks {
    inner: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl AggregateLocks {
    /// Wait until no other writer holds `id`.
    pub(crate) async fn acquire(&self, id: Uuid) -> AggregateGuard<'_> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            map.entry(id).or_default().clone()
        };
        let guard = lock.lock_owned().await;
        AggregateGuard {
            locks: self,
            id,
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Held for the duration of one unit of work.
pub(crate) struct AggregateGuard<'a> {
    locks: &'a AggregateLocks,
    id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for AggregateGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());

        // Clones are only taken under the table lock, so a count of one
        // means nobody is waiting on this entry.
        let mut map = self
            .locks
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if map
            .get(&self.id)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            map.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_same_id_is_exclusive() {
        let locks = AggregateLocks::default();
        let id = Uuid::new_v4();

        let first = locks.acquire(id).await;
        let second = tokio::time::timeout(Duration::from_millis(20), locks.acquire(id)).await;
        assert!(second.is_err());

        drop(first);
        let third = tokio::time::timeout(Duration::from_millis(20), locks.acquire(id)).await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn test_different_ids_do_not_block() {
        let locks = AggregateLocks::default();

        let _a = locks.acquire(Uuid::new_v4()).await;
        let b = tokio::time::timeout(Duration::from_millis(20), locks.acquire(Uuid::new_v4())).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_unused_entries_are_dropped() {
        let locks = AggregateLocks::default();
        let guard = locks.acquire(Uuid::new_v4()).await;
        assert_eq!(locks.len(), 1);

        drop(guard);
        assert_eq!(locks.len(), 0);
    }
}
