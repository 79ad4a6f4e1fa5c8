//! SQLite schema definitions and SQL query constants.

/// One table holds every record kind; `(kind, id)` is the record address.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    kind TEXT NOT NULL,
    id TEXT NOT NULL,
    body BLOB NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (kind, id)
);

CREATE INDEX IF NOT EXISTS idx_records_kind ON records(kind);
"#;

pub const SELECT_RECORDS_BY_KIND: &str = r#"
SELECT kind, id, body FROM records WHERE kind = ?1 ORDER BY id
"#;

pub const SELECT_RECORD_BY_ID: &str = r#"
SELECT kind, id, body FROM records WHERE kind = ?1 AND id = ?2
"#;

pub const INSERT_RECORD: &str = r#"
INSERT INTO records (kind, id, body, updated_at) VALUES (?1, ?2, ?3, ?4)
"#;

pub const DELETE_RECORD: &str = r#"
DELETE FROM records WHERE kind = ?1 AND id = ?2
"#;

pub const BEGIN: &str = "BEGIN IMMEDIATE";

pub const COMMIT: &str = "COMMIT";

pub const ROLLBACK: &str = "ROLLBACK";
