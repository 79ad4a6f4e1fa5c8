//! Optimistic mutations with rollback.
//!
//! The patch is applied to the cached entity before the request leaves, so
//! readers see the new state immediately. If the request fails, exactly the
//! fields the patch snapshotted are put back and the failure is returned.
//!
//! Mutations on the same `(kind, id)` are serialized: a second toggle waits
//! for the first to settle instead of racing its snapshot.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use fitsync_core::store::Record;
use fitsync_core::sync::{Patch, Result, SyncError};

use crate::store::StoreHandle;

type LockMap = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Holds the per-entity lock; frees the map slot when nobody else waits.
struct InFlight {
    key: String,
    locks: LockMap,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.key);
        }
    }
}

/// Applies [`Patch`]es optimistically against the local store.
#[derive(Clone)]
pub struct OptimisticMutator {
    store: StoreHandle,
    locks: LockMap,
}

impl OptimisticMutator {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            store,
            locks: Arc::default(),
        }
    }

    /// Number of entities with a mutation in flight or queued.
    pub fn in_flight(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    async fn acquire(&self, kind: &str, id: &str) -> InFlight {
        let key = format!("{kind}:{id}");
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(key.clone()).or_default().clone()
        };
        let guard = lock.lock_owned().await;
        InFlight {
            key,
            locks: self.locks.clone(),
            guard: Some(guard),
        }
    }

    /// Patches the cached `T` with id `id`, then runs `network` with the
    /// patched value.
    ///
    /// Fails with [`SyncError::NotCached`] before any request if the entity is
    /// not cached. On network failure the snapshot is restored; a restore
    /// that itself fails is logged and the network error is still returned.
    pub async fn run<T, P, F, Fut, R>(&self, id: &str, patch: P, network: F) -> Result<R>
    where
        T: Record,
        P: Patch<T>,
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let _in_flight = self.acquire(T::KIND, id).await;

        let mut snapshot = None;
        let patched = self
            .store
            .update::<T, _>(id, |entity| {
                snapshot = Some(patch.snapshot(entity));
                patch.apply(entity);
            })
            .await?;
        let (Some(patched), Some(snapshot)) = (patched, snapshot) else {
            return Err(SyncError::not_cached(T::KIND, id));
        };
        tracing::trace!(kind = T::KIND, id, "Optimistic patch applied");

        match network(patched).await {
            Ok(result) => Ok(result),
            Err(err) => {
                match self
                    .store
                    .update::<T, _>(id, |entity| patch.restore(snapshot, entity))
                    .await
                {
                    Ok(_) => {
                        tracing::warn!(kind = T::KIND, id, error = %err, "Mutation failed, rolled back")
                    }
                    Err(restore_err) => tracing::warn!(
                        kind = T::KIND,
                        id,
                        error = %err,
                        restore_error = %restore_err,
                        "Mutation failed and rollback could not be written"
                    ),
                }
                Err(err)
            }
        }
    }
}
