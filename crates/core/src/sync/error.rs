use thiserror::Error;

use crate::auth::AuthError;
use crate::entities::ValidationError;
use crate::realtime::RealtimeError;
use crate::remote::RemoteError;
use crate::store::StoreError;

/// Failure of a repository operation.
///
/// Network and local-store faults are surfaced the same way: a call whose
/// write-through fails is a failed call even if the fetch succeeded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Realtime(#[from] RealtimeError),

    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    /// An optimistic update targeted an entity that is not in the local store.
    #[error("{kind} {id} is not cached; refresh and try again")]
    NotCached { kind: String, id: String },
}

impl SyncError {
    pub fn not_cached(kind: &str, id: &str) -> Self {
        SyncError::NotCached {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }

    /// True if re-invoking the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Remote(RemoteError::Transport(_)) => true,
            SyncError::Remote(RemoteError::Server { status, .. }) => *status >= 500,
            SyncError::Store(_) => true,
            _ => false,
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, SyncError>;
