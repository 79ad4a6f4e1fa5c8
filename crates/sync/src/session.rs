//! Sign-in boundary.
//!
//! Tokens are persisted through a [`TokenStore`] before `login`/`register`
//! return, so any repository call issued afterwards is authenticated. Token
//! storage mechanics live behind the trait.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;

use fitsync_core::auth::{
    email_to_name, AuthResponse, AuthResponseDto, LoginRequest, RegisterRequest, TokenStore,
};
use fitsync_core::entities::User;
use fitsync_core::remote::endpoints;
use fitsync_core::sync::Result;

use crate::engine::CacheAside;

/// Id of the signed-in user, shared by everything that needs to know it.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(Arc<RwLock<Option<String>>>);

impl CurrentUser {
    pub fn new(user_id: Option<String>) -> Self {
        Self(Arc::new(RwLock::new(user_id)))
    }

    pub fn get(&self) -> Option<String> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set(&self, user_id: Option<String>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = user_id;
    }
}

/// Login, registration and logout.
#[derive(Clone)]
pub struct SessionManager {
    engine: CacheAside,
    tokens: Arc<dyn TokenStore>,
    current_user: CurrentUser,
}

impl SessionManager {
    pub fn new(engine: CacheAside, tokens: Arc<dyn TokenStore>, current_user: CurrentUser) -> Self {
        Self {
            engine,
            tokens,
            current_user,
        }
    }

    /// Signs in and returns the account.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let dto: AuthResponseDto = self.engine.fetch(endpoints::login(), Some(&request)).await?;
        self.establish(AuthResponse::from_dto(dto, Utc::now())).await
    }

    /// Creates an account and signs in. An empty display name falls back to
    /// the local part of the email.
    pub async fn register(&self, email: &str, password: &str, display_name: &str) -> Result<User> {
        let display_name = match display_name.trim() {
            "" => email_to_name(email),
            name => name.to_string(),
        };
        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            display_name,
        };
        let dto: AuthResponseDto = self
            .engine
            .fetch(endpoints::register(), Some(&request))
            .await?;
        self.establish(AuthResponse::from_dto(dto, Utc::now())).await
    }

    async fn establish(&self, response: AuthResponse) -> Result<User> {
        self.tokens.save(&response.tokens).await?;
        self.engine.store().upsert(&response.user).await?;
        self.current_user.set(Some(response.user.id.clone()));
        tracing::info!(user_id = %response.user.id, "Signed in");
        Ok(response.user)
    }

    /// Deletes both tokens and purges cached users.
    ///
    /// Clearing tokens must succeed. Purging the user cache is best effort:
    /// a failure is logged and logout still succeeds.
    pub async fn logout(&self) -> Result<()> {
        self.tokens.clear().await?;
        self.current_user.set(None);

        match self.engine.store().purge::<User>().await {
            Ok(purged) => tracing::info!(purged, "Signed out"),
            Err(err) => tracing::warn!(error = %err, "Signed out, but failed to purge cached users"),
        }
        Ok(())
    }

    pub async fn is_authenticated(&self) -> Result<bool> {
        Ok(self.tokens.load().await?.is_some())
    }

    pub fn current_user_id(&self) -> Option<String> {
        self.current_user.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitsync_core::auth::AuthError;
    use fitsync_core::remote::{Method, RemoteError};
    use fitsync_core::store::Query;
    use fitsync_core::sync::SyncError;
    use serde_json::json;

    use crate::store::StoreHandle;
    use crate::testing::{FailingStore, MemoryTokens, MockRemote};

    fn auth_body() -> serde_json::Value {
        json!({
            "accessToken": "access",
            "refreshToken": "refresh",
            "user": { "id": "u1", "displayName": "Sam", "email": "sam@example.com" }
        })
    }

    fn session(
        remote: Arc<MockRemote>,
        store: FailingStore,
        tokens: Arc<MemoryTokens>,
    ) -> SessionManager {
        let engine = CacheAside::new(remote, StoreHandle::new(store));
        SessionManager::new(engine, tokens, CurrentUser::default())
    }

    #[tokio::test]
    async fn test_login_persists_tokens_and_caches_user() {
        let remote = Arc::new(MockRemote::new());
        remote.respond(Method::Post, "/auth/login", auth_body());
        let store = FailingStore::new();
        let tokens = Arc::new(MemoryTokens::default());
        let session = session(remote.clone(), store.clone(), tokens.clone());

        let user = session.login("sam@example.com", "secret").await.unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(
            tokens.load().await.unwrap().map(|t| t.access_token),
            Some("access".to_string())
        );
        assert!(session.is_authenticated().await.unwrap());
        assert_eq!(session.current_user_id().as_deref(), Some("u1"));
        assert_eq!(
            remote.last_body(),
            Some(json!({ "email": "sam@example.com", "password": "secret" }))
        );
    }

    #[tokio::test]
    async fn test_failed_login_saves_nothing() {
        let remote = Arc::new(MockRemote::new());
        remote.fail(Method::Post, "/auth/login", RemoteError::Unauthorized);
        let tokens = Arc::new(MemoryTokens::default());
        let session = session(remote, FailingStore::new(), tokens.clone());

        let err = session.login("sam@example.com", "wrong").await.unwrap_err();
        assert_eq!(err, SyncError::Remote(RemoteError::Unauthorized));
        assert!(!session.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn test_register_defaults_display_name() {
        let remote = Arc::new(MockRemote::new());
        remote.respond(Method::Post, "/auth/register", auth_body());
        let session = session(remote.clone(), FailingStore::new(), Arc::default());

        session.register("sam@example.com", "secret", " ").await.unwrap();

        let body = remote.last_body().unwrap();
        assert_eq!(body["displayName"], "sam");
    }

    #[tokio::test]
    async fn test_logout_clears_tokens_and_users() {
        let remote = Arc::new(MockRemote::new());
        remote.respond(Method::Post, "/auth/login", auth_body());
        let store = FailingStore::new();
        let tokens = Arc::new(MemoryTokens::default());
        let session = session(remote, store.clone(), tokens.clone());
        session.login("sam@example.com", "secret").await.unwrap();

        session.logout().await.unwrap();

        assert!(tokens.load().await.unwrap().is_none());
        assert_eq!(session.current_user_id(), None);
        let users = StoreHandle::new(store)
            .fetch_all(&Query::<User>::all())
            .await
            .unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_logout_survives_purge_failure() {
        let remote = Arc::new(MockRemote::new());
        remote.respond(Method::Post, "/auth/login", auth_body());
        let store = FailingStore::new();
        let tokens = Arc::new(MemoryTokens::default());
        let session = session(remote, store.clone(), tokens.clone());
        session.login("sam@example.com", "secret").await.unwrap();

        store.fail_writes(true);
        session.logout().await.unwrap();
        assert!(tokens.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_fails_when_tokens_cannot_be_cleared() {
        let tokens = Arc::new(MemoryTokens::failing_clear());
        let session = session(Arc::new(MockRemote::new()), FailingStore::new(), tokens);

        let err = session.logout().await.unwrap_err();
        assert!(matches!(err, SyncError::Auth(AuthError::Storage(_))));
    }
}
