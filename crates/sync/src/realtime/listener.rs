use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use fitsync_core::realtime::{RealtimeChannel, Result};

use super::MessagingReconciler;

/// Subscribes to `channel` and applies every event through `reconciler` on a
/// background task.
///
/// The task ends when the channel closes or `shutdown` fires. Lagging
/// behind the channel and failing events are logged and skipped; they never
/// stop the listener.
pub fn spawn_listener(
    channel: Arc<dyn RealtimeChannel>,
    reconciler: MessagingReconciler,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<JoinHandle<()>> {
    let mut receiver = channel.subscribe()?;

    Ok(tokio::spawn(async move {
        tracing::debug!("Realtime listener started");

        loop {
            tokio::select! {
                result = receiver.recv() => {
                    match result {
                        Ok(event) => {
                            let conversation_id = event.conversation_id.clone();
                            let event_type = event.event_type;
                            if let Err(err) = reconciler.apply(event).await {
                                tracing::warn!(
                                    %conversation_id,
                                    event_type = %event_type,
                                    error = %err,
                                    "Dropped realtime event"
                                );
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!(lagged = n, "Realtime listener lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::info!("Realtime channel closed");
                            break;
                        }
                    }
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Realtime listener shutting down");
                    break;
                }
            }
        }
    }))
}
