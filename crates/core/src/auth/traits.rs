use async_trait::async_trait;

use super::{AuthError, TokenPair};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Secure storage for the signed-in user's tokens.
///
/// A successful `save` must be durable before it returns: authenticated
/// requests issued right after login read the tokens back through `load`.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist a token pair, replacing any previous one.
    async fn save(&self, tokens: &TokenPair) -> Result<()>;

    /// Load the current token pair, if signed in.
    async fn load(&self) -> Result<Option<TokenPair>>;

    /// Delete both tokens.
    async fn clear(&self) -> Result<()>;
}
