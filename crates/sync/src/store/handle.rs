use std::sync::Arc;

use tokio::sync::Mutex;

use fitsync_core::store::{
    decode_record, encode_record, LocalStore, Query, Record, Result, StoredRecord,
};

/// The single logical writer in front of a [`LocalStore`].
///
/// Every operation takes the same async lock, so backends never see two
/// callers at once. Multi-step operations (`upsert`, `update`, `purge`) run
/// under one acquisition; `replace_scope` deliberately uses two. A write that
/// fails part way is rolled back before the lock is released.
///
/// Cached bodies that no longer decode as `T` are skipped by reads and
/// treated as stale by scoped deletes, so an entity schema change never
/// wedges its kind.
#[derive(Clone)]
pub struct StoreHandle {
    store: Arc<Mutex<Box<dyn LocalStore>>>,
}

/// Decodes `record`, logging and discarding it if the body is unreadable.
fn decode_or_skip<T: Record>(record: &StoredRecord) -> Option<T> {
    match decode_record::<T>(record) {
        Ok(item) => Some(item),
        Err(err) => {
            tracing::warn!(
                kind = T::KIND,
                id = %record.id,
                error = %err,
                "Skipping unreadable cached record"
            );
            None
        }
    }
}

/// Rolls back pending writes when `result` is an error, then returns it.
async fn finish<R>(store: &dyn LocalStore, result: Result<R>) -> Result<R> {
    if let Err(err) = &result {
        match store.rollback().await {
            Ok(()) => tracing::debug!(error = %err, "Rolled back failed cache write"),
            Err(rollback_err) => tracing::warn!(
                error = %err,
                rollback_error = %rollback_err,
                "Failed to roll back cache write"
            ),
        }
    }
    result
}

impl StoreHandle {
    pub fn new(store: impl LocalStore + 'static) -> Self {
        Self {
            store: Arc::new(Mutex::new(Box::new(store))),
        }
    }

    /// Returns every readable cached `T` that passes `query`, in query order.
    pub async fn fetch_all<T: Record>(&self, query: &Query<T>) -> Result<Vec<T>> {
        let records = {
            let store = self.store.lock().await;
            store.fetch_all(T::KIND).await?
        };
        let items = records.iter().filter_map(decode_or_skip::<T>).collect();
        Ok(query.apply(items))
    }

    /// An unreadable cached body is reported as absent.
    pub async fn fetch_by_id<T: Record>(&self, id: &str) -> Result<Option<T>> {
        let record = {
            let store = self.store.lock().await;
            store.fetch_by_id(T::KIND, id).await?
        };
        Ok(record.as_ref().and_then(decode_or_skip::<T>))
    }

    /// Insert-or-replace keyed by id.
    pub async fn upsert<T: Record>(&self, item: &T) -> Result<()> {
        self.upsert_all(std::slice::from_ref(item)).await
    }

    /// Upserts a batch under one lock and one commit.
    pub async fn upsert_all<T: Record>(&self, items: &[T]) -> Result<()> {
        let records = items.iter().map(encode_record).collect::<Result<Vec<_>>>()?;
        let store = self.store.lock().await;
        let result: Result<()> = async {
            for record in records {
                store.delete(&record.kind, &record.id).await?;
                store.insert(record).await?;
            }
            store.commit().await
        }
        .await;
        finish(&**store, result).await
    }

    /// Mutates a cached record in place and returns the new value.
    ///
    /// Returns `None` without writing if nothing is cached under `id`.
    pub async fn update<T, F>(&self, id: &str, mutate: F) -> Result<Option<T>>
    where
        T: Record,
        F: FnOnce(&mut T) + Send,
    {
        let store = self.store.lock().await;
        let Some(record) = store.fetch_by_id(T::KIND, id).await? else {
            return Ok(None);
        };
        let mut item = decode_record::<T>(&record)?;
        mutate(&mut item);
        let updated = encode_record(&item)?;
        let result: Result<()> = async {
            store.delete(T::KIND, id).await?;
            store.insert(updated).await?;
            store.commit().await
        }
        .await;
        finish(&**store, result).await?;
        Ok(Some(item))
    }

    /// Deletes one record. Returns `false` if it was not cached.
    pub async fn delete<T: Record>(&self, id: &str) -> Result<bool> {
        let store = self.store.lock().await;
        let result: Result<bool> = async {
            let removed = store.delete(T::KIND, id).await?;
            store.commit().await?;
            Ok(removed)
        }
        .await;
        finish(&**store, result).await
    }

    /// Deletes every `T` matching `predicate` and returns how many went.
    ///
    /// Records that no longer decode are deleted too.
    pub async fn delete_where<T, P>(&self, predicate: P) -> Result<usize>
    where
        T: Record,
        P: Fn(&T) -> bool + Send + Sync,
    {
        let store = self.store.lock().await;
        let result: Result<usize> = async {
            let records = store.fetch_all(T::KIND).await?;
            let mut removed = 0;
            for record in &records {
                let doomed = match decode_record::<T>(record) {
                    Ok(item) => predicate(&item),
                    Err(err) => {
                        tracing::warn!(
                            kind = T::KIND,
                            id = %record.id,
                            error = %err,
                            "Evicting unreadable cached record"
                        );
                        true
                    }
                };
                if doomed && store.delete(T::KIND, &record.id).await? {
                    removed += 1;
                }
            }
            store.commit().await?;
            Ok(removed)
        }
        .await;
        finish(&**store, result).await
    }

    /// Clear-then-insert for a list scope.
    ///
    /// The clear and the insert are separate lock acquisitions: a reader that
    /// lands between them sees the scope empty. Items are upserted, so a
    /// record that moved into the scope from elsewhere is not duplicated.
    pub async fn replace_scope<T, P>(&self, scope: P, items: &[T]) -> Result<()>
    where
        T: Record,
        P: Fn(&T) -> bool + Send + Sync,
    {
        let cleared = self.delete_where(scope).await?;
        tracing::trace!(kind = T::KIND, cleared, inserting = items.len(), "replacing cache scope");
        self.upsert_all(items).await
    }

    /// Deletes every record of kind `T`.
    pub async fn purge<T: Record>(&self) -> Result<usize> {
        self.delete_where::<T, _>(|_| true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::testing::FailingStore;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: String,
        group: String,
        value: u32,
    }

    impl Record for Item {
        const KIND: &'static str = "item";

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn item(id: &str, group: &str, value: u32) -> Item {
        Item {
            id: id.to_string(),
            group: group.to_string(),
            value,
        }
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_record_per_id() {
        let handle = StoreHandle::new(InMemoryStore::new());
        handle.upsert(&item("i1", "a", 1)).await.unwrap();
        handle.upsert(&item("i1", "a", 2)).await.unwrap();
        handle.upsert(&item("i1", "b", 3)).await.unwrap();

        let all = handle.fetch_all(&Query::<Item>::all()).await.unwrap();
        assert_eq!(all, vec![item("i1", "b", 3)]);
    }

    #[tokio::test]
    async fn test_upsert_all_with_duplicate_ids_keeps_last() {
        let handle = StoreHandle::new(InMemoryStore::new());
        handle
            .upsert_all(&[item("i1", "a", 1), item("i1", "a", 9)])
            .await
            .unwrap();

        let fetched: Option<Item> = handle.fetch_by_id("i1").await.unwrap();
        assert_eq!(fetched, Some(item("i1", "a", 9)));
    }

    #[tokio::test]
    async fn test_replace_scope_only_touches_scope() {
        let handle = StoreHandle::new(InMemoryStore::new());
        handle
            .upsert_all(&[item("i1", "a", 1), item("i2", "a", 2), item("i3", "b", 3)])
            .await
            .unwrap();

        handle
            .replace_scope(|i: &Item| i.group == "a", &[item("i4", "a", 4)])
            .await
            .unwrap();

        let ids: Vec<_> = handle
            .fetch_all(&Query::<Item>::all())
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["i3", "i4"]);
    }

    #[tokio::test]
    async fn test_replace_scope_moves_record_between_scopes() {
        let handle = StoreHandle::new(InMemoryStore::new());
        handle.upsert(&item("i1", "b", 1)).await.unwrap();

        handle
            .replace_scope(|i: &Item| i.group == "a", &[item("i1", "a", 2)])
            .await
            .unwrap();

        let all = handle.fetch_all(&Query::<Item>::all()).await.unwrap();
        assert_eq!(all, vec![item("i1", "a", 2)]);
    }

    #[tokio::test]
    async fn test_update_mutates_in_place() {
        let handle = StoreHandle::new(InMemoryStore::new());
        handle.upsert(&item("i1", "a", 1)).await.unwrap();

        let updated = handle
            .update::<Item, _>("i1", |i| i.value += 10)
            .await
            .unwrap();
        assert_eq!(updated, Some(item("i1", "a", 11)));

        let missing = handle.update::<Item, _>("nope", |i| i.value = 0).await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_purge_removes_kind() {
        let handle = StoreHandle::new(InMemoryStore::new());
        handle
            .upsert_all(&[item("i1", "a", 1), item("i2", "b", 2)])
            .await
            .unwrap();

        assert_eq!(handle.purge::<Item>().await.unwrap(), 2);
        assert!(handle.fetch_all(&Query::<Item>::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_applies_query() {
        let handle = StoreHandle::new(InMemoryStore::new());
        handle
            .upsert_all(&[item("i1", "a", 5), item("i2", "a", 1), item("i3", "b", 3)])
            .await
            .unwrap();

        let query = Query::<Item>::all()
            .filter(|i| i.group == "a")
            .sort_by(|a, b| a.value.cmp(&b.value));
        let values: Vec<_> = handle
            .fetch_all(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.value)
            .collect();
        assert_eq!(values, vec![1, 5]);
    }

    fn unreadable(id: &str) -> StoredRecord {
        StoredRecord {
            kind: Item::KIND.to_string(),
            id: id.to_string(),
            body: format!(r#"{{"id":"{id}"}}"#).into_bytes(),
        }
    }

    #[tokio::test]
    async fn test_reads_skip_unreadable_record() {
        let store = InMemoryStore::new();
        let handle = StoreHandle::new(store.clone());
        handle.upsert(&item("i1", "a", 1)).await.unwrap();
        store.insert(unreadable("i2")).await.unwrap();

        let all = handle.fetch_all(&Query::<Item>::all()).await.unwrap();
        assert_eq!(all, vec![item("i1", "a", 1)]);
        let missing: Option<Item> = handle.fetch_by_id("i2").await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_replace_scope_evicts_unreadable_record() {
        let store = InMemoryStore::new();
        let handle = StoreHandle::new(store.clone());
        handle.upsert(&item("i1", "b", 1)).await.unwrap();
        store.insert(unreadable("i2")).await.unwrap();

        handle
            .replace_scope(|i: &Item| i.group == "a", &[item("i3", "a", 3)])
            .await
            .unwrap();

        assert_eq!(store.len(Item::KIND).await, 2);
        let ids: Vec<_> = handle
            .fetch_all(&Query::<Item>::all())
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["i1", "i3"]);
    }

    #[tokio::test]
    async fn test_failed_clear_keeps_prior_scope() {
        let store = FailingStore::new();
        let handle = StoreHandle::new(store.clone());
        handle
            .upsert_all(&[item("i1", "a", 1), item("i2", "a", 2)])
            .await
            .unwrap();

        // The first delete succeeds, the second fails.
        store.fail_after(1);
        let result = handle
            .replace_scope(|i: &Item| i.group == "a", &[item("i3", "a", 3)])
            .await;
        assert!(result.is_err());

        store.fail_after(usize::MAX);
        let ids: Vec<_> = handle
            .fetch_all(&Query::<Item>::all())
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["i1", "i2"]);
    }

    #[tokio::test]
    async fn test_failed_upsert_all_leaves_nothing_behind() {
        let store = FailingStore::new();
        let handle = StoreHandle::new(store.clone());
        handle.upsert(&item("i1", "a", 1)).await.unwrap();

        // delete + insert of i1 go through, then i2 fails.
        store.fail_after(2);
        let result = handle
            .upsert_all(&[item("i1", "a", 10), item("i2", "a", 2)])
            .await;
        assert!(result.is_err());

        store.fail_after(usize::MAX);
        let all = handle.fetch_all(&Query::<Item>::all()).await.unwrap();
        assert_eq!(all, vec![item("i1", "a", 1)]);
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_sqlite_refresh_past_unreadable_record() {
        let store = crate::store::SqliteStore::new_in_memory().await.unwrap();
        store.insert(unreadable("i2")).await.unwrap();
        store.commit().await.unwrap();
        let handle = StoreHandle::new(store);
        handle.upsert(&item("i1", "a", 1)).await.unwrap();

        handle
            .replace_scope(|i: &Item| i.group == "a", &[item("i3", "a", 3)])
            .await
            .unwrap();

        let all = handle.fetch_all(&Query::<Item>::all()).await.unwrap();
        assert_eq!(all, vec![item("i3", "a", 3)]);
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_handle_over_sqlite() {
        let store = crate::store::SqliteStore::new_in_memory().await.unwrap();
        let handle = StoreHandle::new(store);
        handle.upsert(&item("i1", "a", 1)).await.unwrap();
        handle.upsert(&item("i1", "a", 2)).await.unwrap();

        let all = handle.fetch_all(&Query::<Item>::all()).await.unwrap();
        assert_eq!(all, vec![item("i1", "a", 2)]);
    }
}
