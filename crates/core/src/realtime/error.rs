use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RealtimeError {
    /// The event is well-formed JSON but lacks data its type requires.
    #[error("malformed {event_type} event: {reason}")]
    Malformed { event_type: String, reason: String },

    #[error("failed to decode realtime event: {0}")]
    Decode(String),

    #[error("realtime connection failed: {0}")]
    Connection(String),

    #[error("realtime channel closed")]
    Closed,
}

/// Result type for realtime operations.
pub type Result<T> = std::result::Result<T, RealtimeError>;
