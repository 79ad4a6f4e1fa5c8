//! Service wiring.
//!
//! Everything is built from explicitly injected collaborators: one remote
//! client, one local store, one token store. Repositories share a single
//! [`StoreHandle`], so every cache access goes through the same lock.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use fitsync_core::auth::TokenStore;
use fitsync_core::realtime::RealtimeChannel;
use fitsync_core::remote::RemoteClient;
use fitsync_core::store::LocalStore;
use fitsync_core::sync::Result;

use crate::config::Config;
use crate::engine::CacheAside;
use crate::optimistic::OptimisticMutator;
use crate::realtime::{spawn_listener, MessagingReconciler};
use crate::repository::{
    BookingRepository, ClassRepository, FeedPager, GroupRepository, MessagingRepository,
    ReviewRepository, SocialRepository, UserRepository,
};
use crate::session::{CurrentUser, SessionManager};
use crate::store::{InMemoryStore, StoreHandle};

/// The sync layer, wired.
#[derive(Clone)]
pub struct SyncServices {
    pub config: Config,
    pub store: StoreHandle,
    pub current_user: CurrentUser,
    pub session: SessionManager,
    pub users: UserRepository,
    pub classes: ClassRepository,
    pub bookings: BookingRepository,
    pub groups: GroupRepository,
    pub messaging: MessagingRepository,
    pub reviews: ReviewRepository,
    pub social: SocialRepository,
    pub mutator: OptimisticMutator,
    reconciler: MessagingReconciler,
    /// Stops realtime listeners started by [`SyncServices::start_realtime`].
    shutdown_tx: broadcast::Sender<()>,
}

impl SyncServices {
    pub fn new(
        config: Config,
        remote: Arc<dyn RemoteClient>,
        store: impl LocalStore + 'static,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let store = StoreHandle::new(store);
        let engine = CacheAside::new(remote, store.clone());
        let mutator = OptimisticMutator::new(store.clone());
        let current_user = CurrentUser::new(config.user_id.clone());
        let reconciler = MessagingReconciler::new(
            store.clone(),
            current_user.clone(),
            config.realtime_dedup_capacity,
        );
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            session: SessionManager::new(engine.clone(), tokens, current_user.clone()),
            users: UserRepository::new(engine.clone(), current_user.clone()),
            classes: ClassRepository::new(engine.clone()),
            bookings: BookingRepository::new(engine.clone()),
            groups: GroupRepository::new(engine.clone(), mutator.clone()),
            messaging: MessagingRepository::new(
                engine.clone(),
                reconciler.clone(),
                current_user.clone(),
            ),
            reviews: ReviewRepository::new(engine.clone()),
            social: SocialRepository::new(engine, mutator.clone()),
            config,
            store,
            current_user,
            mutator,
            reconciler,
            shutdown_tx,
        }
    }

    /// Services over a throwaway in-memory cache.
    pub fn in_memory(config: Config, remote: Arc<dyn RemoteClient>, tokens: Arc<dyn TokenStore>) -> Self {
        Self::new(config, remote, InMemoryStore::new(), tokens)
    }

    /// Services over the SQLite cache at `config.store_path`.
    #[cfg(feature = "sqlite")]
    pub async fn open(
        config: Config,
        remote: Arc<dyn RemoteClient>,
        tokens: Arc<dyn TokenStore>,
    ) -> fitsync_core::store::Result<Self> {
        let store = crate::store::SqliteStore::new(&config.store_path).await?;
        tracing::debug!(path = %config.store_path, "Opened SQLite cache");
        Ok(Self::new(config, remote, store, tokens))
    }

    /// A feed pager using the configured page size.
    pub fn feed(&self) -> FeedPager {
        self.social.feed(self.config.feed_page_size)
    }

    /// Applies events from `channel` in the background until
    /// [`shutdown`](Self::shutdown) or the channel closes.
    pub fn start_realtime(
        &self,
        channel: Arc<dyn RealtimeChannel>,
    ) -> fitsync_core::realtime::Result<JoinHandle<()>> {
        spawn_listener(channel, self.reconciler.clone(), self.shutdown_tx.subscribe())
    }

    /// Stops every realtime listener.
    pub fn shutdown(&self) {
        let stopped = self.shutdown_tx.send(()).unwrap_or(0);
        tracing::debug!(stopped, "Realtime listeners signalled");
    }

    /// Signs out and forgets realtime deliveries seen in the session.
    pub async fn logout(&self) -> Result<()> {
        self.session.logout().await?;
        self.reconciler.reset().await;
        Ok(())
    }
}
