//! SQLite local store.
//!
//! Uses `rusqlite` for synchronous operations and `tokio-rusqlite` to run
//! them on a dedicated thread.

mod error;
mod schema;
mod store;

pub use store::SqliteStore;
