//! Server-sent messaging events.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use fitsync_core::realtime::{RealtimeChannel, RealtimeError, RealtimeEvent};
use fitsync_core::remote::endpoints;

use super::HttpRemoteClient;
use crate::error::{ClientError, Result};

impl HttpRemoteClient {
    /// Watch the signed-in user's messaging events.
    /// Returns a stream of events.
    pub async fn watch_events(
        &self,
    ) -> Result<impl futures_core::Stream<Item = Result<RealtimeEvent>>> {
        let response = self.open_stream(&endpoints::realtime_events()).await?;

        let stream = async_stream::stream! {
            use tokio_stream::StreamExt;

            let mut byte_stream = response.bytes_stream();
            let mut buffer = Vec::new();

            while let Some(chunk_result) = byte_stream.next().await {
                match chunk_result {
                    Ok(chunk) => {
                        push_chunk(&mut buffer, &chunk);
                        for frame in drain_frames(&mut buffer) {
                            match frame {
                                Ok(frame) => {
                                    if let Some(event) = parse_sse_message(&frame) {
                                        yield event;
                                    }
                                }
                                Err(err) => yield Err(err),
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(ClientError::StreamInterrupted(e.to_string()));
                        break;
                    }
                }
            }
        };

        Ok(stream)
    }
}

/// Appends a network chunk to the raw frame buffer, dropping carriage returns.
///
/// Chunks may end inside a multi-byte character, so text is only decoded
/// once a whole frame has arrived.
fn push_chunk(buffer: &mut Vec<u8>, chunk: &[u8]) {
    buffer.extend(chunk.iter().copied().filter(|&b| b != b'\r'));
}

/// Removes every complete frame from `buffer` and returns them in order.
///
/// Frames end with a blank line; a trailing partial frame stays buffered. A
/// frame that is not valid UTF-8 is reported as malformed.
fn drain_frames(buffer: &mut Vec<u8>) -> Vec<Result<String>> {
    let mut frames = Vec::new();
    while let Some(pos) = buffer.windows(2).position(|w| w == b"\n\n") {
        let frame: Vec<u8> = buffer.drain(..pos + 2).take(pos).collect();
        let frame = String::from_utf8(frame).map_err(|e| ClientError::MalformedFrame(e.to_string()));
        frames.push(frame);
    }
    frames
}

/// Parses one SSE frame into a realtime event.
///
/// Returns `None` for frames without data, such as keep-alive comments. The
/// frame's `id:` is used as the delivery id when the payload has none.
pub fn parse_sse_message(frame: &str) -> Option<Result<RealtimeEvent>> {
    let mut data: Vec<&str> = Vec::new();
    let mut id = None;

    for line in frame.lines() {
        if line.starts_with(':') {
            continue;
        }
        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);
        match field {
            "data" => data.push(value),
            "id" => id = value.parse::<u64>().ok(),
            _ => {}
        }
    }

    if data.is_empty() {
        return None;
    }

    let parsed = serde_json::from_str::<RealtimeEvent>(&data.join("\n"))
        .map_err(|e| ClientError::MalformedFrame(e.to_string()))
        .map(|mut event| {
            if event.delivery_id.is_none() {
                event.delivery_id = id;
            }
            event
        });
    Some(parsed)
}

/// [`RealtimeChannel`] fed by the server's event stream.
///
/// A background task reads the stream and republishes every event to the
/// subscribers. The task owns the only strong sender, so when the stream
/// ends every subscriber sees the channel close and new subscriptions are
/// refused.
pub struct SseRealtimeChannel {
    sender: broadcast::WeakSender<RealtimeEvent>,
    pump: JoinHandle<()>,
}

impl SseRealtimeChannel {
    /// Connects to the event stream and starts republishing it.
    pub async fn connect(client: &HttpRemoteClient, capacity: usize) -> Result<Self> {
        let stream = client.watch_events().await?;
        let (publisher, _) = broadcast::channel(capacity.max(1));
        let sender = publisher.downgrade();

        let pump = tokio::spawn(async move {
            use tokio_stream::StreamExt;

            tokio::pin!(stream);
            while let Some(item) = stream.next().await {
                match item {
                    Ok(event) => {
                        // No subscribers yet is not an error.
                        let _ = publisher.send(event);
                    }
                    Err(ClientError::MalformedFrame(reason)) => {
                        tracing::warn!(%reason, "Skipping unreadable realtime frame");
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Realtime stream failed");
                        break;
                    }
                }
            }
            tracing::info!("Realtime stream ended");
        });

        Ok(Self { sender, pump })
    }

    pub fn is_connected(&self) -> bool {
        !self.pump.is_finished()
    }
}

impl Drop for SseRealtimeChannel {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

impl RealtimeChannel for SseRealtimeChannel {
    fn subscribe(&self) -> fitsync_core::realtime::Result<broadcast::Receiver<RealtimeEvent>> {
        match self.sender.upgrade() {
            Some(sender) if self.is_connected() => Ok(sender.subscribe()),
            _ => Err(RealtimeError::Closed),
        }
    }
}
