//! Realtime event handling: replay detection, reconciliation into the
//! store, an in-process channel and the background listener.

mod dedup;
mod listener;
mod memory;
mod reconciler;

pub use dedup::RecentDeliveries;
pub use listener::spawn_listener;
pub use memory::MemoryChannel;
pub use reconciler::{ApplyOutcome, MessagingReconciler};
