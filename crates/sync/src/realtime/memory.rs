//! In-process realtime channel.

use tokio::sync::broadcast;

use fitsync_core::realtime::{RealtimeChannel, RealtimeEvent, Result};

/// Channel capacity used by [`MemoryChannel::default`].
const CHANNEL_CAPACITY: usize = 100;

/// Realtime channel backed by a tokio broadcast channel.
///
/// Used to feed events from another part of the process (or a test) into
/// the reconciler. Events published with no subscriber are dropped.
#[derive(Debug, Clone)]
pub struct MemoryChannel {
    sender: broadcast::Sender<RealtimeEvent>,
}

impl MemoryChannel {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event and returns how many subscribers received it.
    pub fn publish(&self, event: RealtimeEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for MemoryChannel {
    fn default() -> Self {
        Self::new(CHANNEL_CAPACITY)
    }
}

impl RealtimeChannel for MemoryChannel {
    fn subscribe(&self) -> Result<broadcast::Receiver<RealtimeEvent>> {
        Ok(self.sender.subscribe())
    }
}
