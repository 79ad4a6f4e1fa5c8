use async_trait::async_trait;

use super::{Endpoint, Result};

/// Performs requests against the remote fitness service.
///
/// Implementations own transport concerns (base URL, auth headers, timeouts)
/// and keep no cache of their own. Bodies travel as JSON values; decoding into
/// DTOs happens in the caller so that a malformed body maps to
/// [`RemoteError::Decode`](super::RemoteError::Decode).
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Sends a request and returns the decoded JSON body.
    ///
    /// Empty success bodies are returned as `Value::Null`.
    async fn request(
        &self,
        endpoint: &Endpoint,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value>;
}
