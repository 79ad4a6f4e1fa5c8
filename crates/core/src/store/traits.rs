use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use super::{Result, StoredRecord};

/// An entity that can be mirrored into the local store.
///
/// `KIND` names the record type; together with `id()` it forms the unique
/// address of a record. Two live records with the same kind and id must never
/// coexist.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Record type name, e.g. `"booking"`.
    const KIND: &'static str;

    /// Globally unique id of this record.
    fn id(&self) -> &str;
}

/// Persistent store of typed records, addressed by kind and id.
///
/// Implementations are not required to tolerate concurrent writers; the sync
/// layer funnels every call through a single owner.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Returns every record of the given kind.
    async fn fetch_all(&self, kind: &str) -> Result<Vec<StoredRecord>>;

    /// Returns the record with the given kind and id, if present.
    async fn fetch_by_id(&self, kind: &str, id: &str) -> Result<Option<StoredRecord>>;

    /// Inserts a new record. Fails with `AlreadyExists` if the id is taken.
    async fn insert(&self, record: StoredRecord) -> Result<()>;

    /// Deletes a record. Returns `false` if nothing was stored under the id.
    async fn delete(&self, kind: &str, id: &str) -> Result<bool>;

    /// Makes all pending writes durable.
    async fn commit(&self) -> Result<()>;

    /// Discards every write made since the last `commit`.
    async fn rollback(&self) -> Result<()>;
}
