use thiserror::Error;

/// Failures surfaced by a [`RemoteClient`](super::RemoteClient).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The request never produced a response (DNS, connection reset, timeout).
    #[error("Network unavailable: {0}")]
    Transport(String),
    /// The server rejected the credentials; no refresh is attempted here.
    #[error("Unauthorized: please sign in again")]
    Unauthorized,
    /// The response body did not match the expected shape.
    #[error("Invalid response from server: {0}")]
    Decode(String),
    /// The server reported a structured failure.
    #[error("{message}")]
    Server { status: u16, message: String },
}

impl RemoteError {
    /// Returns true if the failure came from the server rather than the transport.
    pub fn is_server_reported(&self) -> bool {
        matches!(self, RemoteError::Server { .. } | RemoteError::Unauthorized)
    }
}

/// Result type for remote calls.
pub type Result<T> = std::result::Result<T, RemoteError>;
