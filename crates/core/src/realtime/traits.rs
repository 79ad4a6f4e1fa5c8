use tokio::sync::broadcast;

use super::{RealtimeEvent, Result};

/// A source of server-pushed events.
///
/// Each subscriber gets its own receiver; events published before the
/// subscription are not replayed.
pub trait RealtimeChannel: Send + Sync {
    fn subscribe(&self) -> Result<broadcast::Receiver<RealtimeEvent>>;
}
