//! Functional core for fitsync.
//!
//! Holds the entity model, the wire DTOs, the seams to the outside world
//! (`LocalStore`, `RemoteClient`, `RealtimeChannel`, `TokenStore`) and the pure
//! rules that the synchronization shell applies: optimistic patches and the
//! realtime conversation fold. Nothing in this crate performs I/O.

pub mod auth;
pub mod entities;
pub mod realtime;
pub mod remote;
pub mod serde;
pub mod store;
pub mod sync;
