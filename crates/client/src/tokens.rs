//! Token persistence on the local filesystem.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use fitsync_core::auth::{AuthError, Result, TokenPair, TokenStore};

use crate::error::ClientError;

/// Stores the token pair as a JSON file.
///
/// A missing file means signed out.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn storage_error(err: impl Into<ClientError>) -> AuthError {
    AuthError::Storage(err.into().to_string())
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn save(&self, tokens: &TokenPair) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(storage_error)?;
        }
        let json = serde_json::to_vec_pretty(tokens).map_err(storage_error)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(storage_error)?;
        tracing::debug!(path = %self.path.display(), "Saved tokens");
        Ok(())
    }

    async fn load(&self) -> Result<Option<TokenPair>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(storage_error(err)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(storage_error)
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_error(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store() -> FileTokenStore {
        FileTokenStore::new(
            std::env::temp_dir()
                .join(format!("fitsync-test-{}", Uuid::new_v4()))
                .join("tokens.json"),
        )
    }

    fn tokens() -> TokenPair {
        TokenPair {
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_signed_out() {
        let store = temp_store();
        assert_eq!(store.load().await.unwrap(), None);
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let store = temp_store();

        store.save(&tokens()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(tokens()));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);

        if let Some(dir) = store.path().parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() {
        let store = temp_store();
        let dir = store.path().parent().unwrap().to_path_buf();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(store.path(), b"not json").unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, AuthError::Storage(_)));

        let _ = std::fs::remove_dir_all(dir);
    }
}
