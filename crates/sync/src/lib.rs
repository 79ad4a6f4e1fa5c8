//! Offline-first sync layer for the fitness client.
//!
//! Repositories read through a local cache and write through to it after
//! every successful request. Toggle-style actions are applied optimistically
//! and rolled back on failure; realtime messaging events are folded into the
//! cached conversations.

pub mod config;
pub mod engine;
pub mod optimistic;
pub mod realtime;
pub mod repository;
pub mod session;
pub mod state;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use engine::{CacheAside, WriteThrough};
pub use optimistic::OptimisticMutator;
pub use realtime::{spawn_listener, ApplyOutcome, MemoryChannel, MessagingReconciler};
pub use repository::{
    BookingRepository, ClassRepository, FeedPager, GroupRepository, MessagingRepository,
    ReviewRepository, SocialRepository, UserRepository,
};
pub use session::{CurrentUser, SessionManager};
pub use state::SyncServices;
pub use store::{InMemoryStore, StoreHandle};
#[cfg(feature = "sqlite")]
pub use store::SqliteStore;
