use async_trait::async_trait;
use chrono::Utc;
use tokio_rusqlite::Connection;

use fitsync_core::store::{LocalStore, Result, StoreError, StoredRecord};

use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Opens a write transaction unless one is already pending.
fn begin_if_needed(conn: &rusqlite::Connection) -> std::result::Result<(), tokio_rusqlite::Error> {
    if conn.is_autocommit() {
        conn.execute_batch(schema::BEGIN).map_err(wrap_err)?;
    }
    Ok(())
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredRecord> {
    Ok(StoredRecord {
        kind: row.get(0)?,
        id: row.get(1)?,
        body: row.get(2)?,
    })
}

/// SQLite-backed local store.
///
/// Writes accumulate in a transaction that is opened lazily by the first
/// write and closed by `commit`.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a database file and ensures the schema exists.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a store backed by an in-memory database.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl LocalStore for SqliteStore {
    async fn fetch_all(&self, kind: &str) -> Result<Vec<StoredRecord>> {
        let kind_param = kind.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_RECORDS_BY_KIND).map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&kind_param], row_to_record)
                    .map_err(wrap_err)?;

                let mut records = Vec::new();
                for row_result in rows {
                    records.push(row_result.map_err(wrap_err)?);
                }
                Ok(records)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, kind, ""))
    }

    async fn fetch_by_id(&self, kind: &str, id: &str) -> Result<Option<StoredRecord>> {
        let kind_param = kind.to_string();
        let id_param = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_RECORD_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&kind_param, &id_param], row_to_record) {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, kind, id))
    }

    async fn insert(&self, record: StoredRecord) -> Result<()> {
        let kind = record.kind.clone();
        let id = record.id.clone();
        let updated_at = Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| {
                begin_if_needed(conn)?;
                conn.execute(
                    schema::INSERT_RECORD,
                    rusqlite::params![record.kind, record.id, record.body, updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, &kind, &id))
    }

    async fn delete(&self, kind: &str, id: &str) -> Result<bool> {
        let kind_param = kind.to_string();
        let id_param = id.to_string();

        self.conn
            .call(move |conn| {
                begin_if_needed(conn)?;
                let removed = conn
                    .execute(schema::DELETE_RECORD, [&kind_param, &id_param])
                    .map_err(wrap_err)?;
                Ok(removed > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, kind, id))
    }

    async fn commit(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                if !conn.is_autocommit() {
                    conn.execute_batch(schema::COMMIT).map_err(wrap_err)?;
                }
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "", ""))
    }

    async fn rollback(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                if !conn.is_autocommit() {
                    conn.execute_batch(schema::ROLLBACK).map_err(wrap_err)?;
                }
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "", ""))
    }
}
