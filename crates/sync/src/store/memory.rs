//! In-memory local store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use fitsync_core::store::{LocalStore, Result, StoreError, StoredRecord};

type RecordKey = (String, String);

#[derive(Debug, Default)]
struct Tables {
    records: HashMap<RecordKey, StoredRecord>,
    /// Prior value of every key written since the last commit, oldest first.
    undo: Vec<(RecordKey, Option<StoredRecord>)>,
}

impl Tables {
    fn journal(&mut self, key: &RecordKey) {
        let previous = self.records.get(key).cloned();
        self.undo.push((key.clone(), previous));
    }
}

/// In-memory store for tests and ephemeral sessions.
///
/// Uses a HashMap wrapped in `Arc<RwLock<_>>`. Data is lost when the last
/// clone is dropped. Writes are visible immediately and journaled until
/// `commit`, so `rollback` can undo them.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    commits: Arc<AtomicUsize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `commit` calls so far.
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Number of records of `kind` currently stored.
    pub async fn len(&self, kind: &str) -> usize {
        let tables = self.tables.read().await;
        tables.records.keys().filter(|(k, _)| k == kind).count()
    }
}

#[async_trait]
impl LocalStore for InMemoryStore {
    async fn fetch_all(&self, kind: &str) -> Result<Vec<StoredRecord>> {
        let tables = self.tables.read().await;
        let mut matching: Vec<StoredRecord> = tables
            .records
            .values()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matching)
    }

    async fn fetch_by_id(&self, kind: &str, id: &str) -> Result<Option<StoredRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .records
            .get(&(kind.to_string(), id.to_string()))
            .cloned())
    }

    async fn insert(&self, record: StoredRecord) -> Result<()> {
        let mut tables = self.tables.write().await;
        let key = (record.kind.clone(), record.id.clone());
        if tables.records.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                kind: record.kind,
                id: record.id,
            });
        }
        tables.journal(&key);
        tables.records.insert(key, record);
        Ok(())
    }

    async fn delete(&self, kind: &str, id: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let key = (kind.to_string(), id.to_string());
        if !tables.records.contains_key(&key) {
            return Ok(false);
        }
        tables.journal(&key);
        Ok(tables.records.remove(&key).is_some())
    }

    async fn commit(&self) -> Result<()> {
        self.tables.write().await.undo.clear();
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        let mut tables = self.tables.write().await;
        while let Some((key, previous)) = tables.undo.pop() {
            match previous {
                Some(record) => tables.records.insert(key, record),
                None => tables.records.remove(&key),
            };
        }
        Ok(())
    }
}
