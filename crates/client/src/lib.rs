//! fitsync_client - HTTP transport, realtime stream and CLI for fitsync.

pub mod cli;
pub mod client;
pub mod error;
pub mod output;
pub mod tokens;

pub use client::events::{parse_sse_message, SseRealtimeChannel};
pub use client::HttpRemoteClient;
pub use error::{ClientError, Result};
pub use tokens::FileTokenStore;
