//! Client error types.

use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors raised by the transport pieces of the client.
///
/// Repository calls report [`fitsync_core::sync::SyncError`]; these cover the
/// event stream and token file, which live outside the sync layer.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server rejected the event stream with {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed event frame: {0}")]
    MalformedFrame(String),

    #[error("Event stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Token file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
