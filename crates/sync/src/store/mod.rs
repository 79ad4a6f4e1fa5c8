//! Local store backends and the exclusive-access handle in front of them.

mod handle;
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use handle::StoreHandle;
pub use memory::InMemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
