use std::sync::Arc;

use tokio::sync::Mutex;

use fitsync_core::entities::{Conversation, Message};
use fitsync_core::realtime::{apply_to_conversation, dedup_key, ConversationEvent, RealtimeEvent};
use fitsync_core::sync::Result;

use super::RecentDeliveries;
use crate::session::CurrentUser;
use crate::store::StoreHandle;

/// What happened to one realtime event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The event changed the store.
    Applied,
    /// The delivery was already applied; nothing was written.
    Duplicate,
    /// The event referenced a conversation that is not cached.
    Skipped,
}

/// Folds realtime events into cached messages and conversations.
///
/// Events are applied one at a time. A delivery is remembered only after it
/// was applied, so a failed write can be retried by a redelivery.
#[derive(Clone)]
pub struct MessagingReconciler {
    store: StoreHandle,
    seen: Arc<Mutex<RecentDeliveries>>,
    current_user: CurrentUser,
}

impl MessagingReconciler {
    /// `current_user` decides which new messages count as unread: the signed-in
    /// user's own messages never do.
    pub fn new(store: StoreHandle, current_user: CurrentUser, dedup_capacity: usize) -> Self {
        Self {
            store,
            seen: Arc::new(Mutex::new(RecentDeliveries::new(dedup_capacity))),
            current_user,
        }
    }

    /// Forgets every remembered delivery, e.g. after signing out.
    pub async fn reset(&self) {
        self.seen.lock().await.clear();
    }

    /// Applies one event.
    ///
    /// Malformed events are rejected with [`SyncError::Realtime`](fitsync_core::sync::SyncError::Realtime).
    pub async fn apply(&self, event: RealtimeEvent) -> Result<ApplyOutcome> {
        let mut seen = self.seen.lock().await;

        let key = dedup_key(&event);
        if let Some(key) = &key {
            if seen.contains(key) {
                tracing::debug!(
                    conversation_id = %event.conversation_id,
                    key = %key,
                    "Duplicate realtime delivery ignored"
                );
                return Ok(ApplyOutcome::Duplicate);
            }
        }

        let event_type = event.event_type;
        let event = ConversationEvent::try_from(event)?;
        let conversation_id = event.conversation_id().to_string();

        let mut message_written = false;
        if let ConversationEvent::NewMessage { message, .. } = &event {
            self.store_message(message).await?;
            message_written = true;
        }

        let local_user = self.current_user.get();
        let updated = self
            .store
            .update::<Conversation, _>(&conversation_id, |conversation| {
                *conversation =
                    apply_to_conversation(conversation.clone(), &event, local_user.as_deref());
            })
            .await?;

        if updated.is_none() {
            tracing::debug!(
                %conversation_id,
                event_type = %event_type,
                "Conversation not cached, summary not updated"
            );
            if !message_written {
                return Ok(ApplyOutcome::Skipped);
            }
        }

        if let Some(key) = key {
            seen.remember(key);
        }
        tracing::trace!(%conversation_id, event_type = %event_type, "Realtime event applied");
        Ok(ApplyOutcome::Applied)
    }

    /// Upserts a pushed message and drops the placeholder it confirms.
    async fn store_message(&self, message: &Message) -> Result<()> {
        if let Some(nonce) = message.client_nonce.clone() {
            let conversation_id = message.conversation_id.clone();
            let removed = self
                .store
                .delete_where::<Message, _>(move |m| {
                    m.is_pending
                        && m.conversation_id == conversation_id
                        && m.client_nonce.as_deref() == Some(nonce.as_str())
                })
                .await?;
            if removed > 0 {
                tracing::trace!(message_id = %message.id, "Pending placeholder confirmed by push");
            }
        }
        self.store.upsert(message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fitsync_core::entities::MessageDto;
    use fitsync_core::store::Query;
    use fitsync_core::sync::SyncError;

    use crate::store::InMemoryStore;

    fn conversation(unread: u32) -> Conversation {
        Conversation {
            id: "c1".to_string(),
            participant_ids: vec!["me".to_string(), "pat".to_string()],
            title: None,
            last_message: None,
            last_message_time: None,
            last_message_sender_id: None,
            unread_count: unread,
            updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            is_typing: false,
            typing_user_name: None,
        }
    }

    fn message_dto(id: &str, sender: &str) -> MessageDto {
        MessageDto {
            id: id.to_string(),
            conversation_id: "c1".to_string(),
            sender_id: sender.to_string(),
            sender_name: Some("Pat".to_string()),
            content: "running late".to_string(),
            sent_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            is_read: false,
            client_nonce: None,
        }
    }

    async fn setup(unread: u32) -> (StoreHandle, MessagingReconciler) {
        let store = StoreHandle::new(InMemoryStore::new());
        store.upsert(&conversation(unread)).await.unwrap();
        let reconciler =
            MessagingReconciler::new(store.clone(), CurrentUser::new(Some("me".to_string())), 16);
        (store, reconciler)
    }

    async fn cached(store: &StoreHandle) -> Conversation {
        store.fetch_by_id("c1").await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_new_message_then_read_receipt() {
        let (store, reconciler) = setup(2).await;

        let outcome = reconciler
            .apply(RealtimeEvent::new_message(message_dto("m1", "pat")))
            .await
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Applied);

        let conversation = cached(&store).await;
        assert_eq!(conversation.unread_count, 3);
        assert_eq!(conversation.last_message.as_deref(), Some("running late"));
        let message: Option<Message> = store.fetch_by_id("m1").await.unwrap();
        assert!(message.is_some());

        reconciler
            .apply(RealtimeEvent::read_receipt("c1"))
            .await
            .unwrap();
        assert_eq!(cached(&store).await.unread_count, 0);
    }

    #[tokio::test]
    async fn test_redelivered_message_does_not_double_count() {
        let (store, reconciler) = setup(0).await;
        let event = RealtimeEvent::new_message(message_dto("m1", "pat"));

        reconciler.apply(event.clone()).await.unwrap();
        let outcome = reconciler.apply(event).await.unwrap();

        assert_eq!(outcome, ApplyOutcome::Duplicate);
        assert_eq!(cached(&store).await.unread_count, 1);
    }

    #[tokio::test]
    async fn test_redelivery_with_delivery_id_is_ignored() {
        let (store, reconciler) = setup(0).await;
        let event = RealtimeEvent::new_message(message_dto("m1", "pat")).with_delivery_id(9);

        reconciler.apply(event.clone()).await.unwrap();
        assert_eq!(
            reconciler.apply(event).await.unwrap(),
            ApplyOutcome::Duplicate
        );
        assert_eq!(cached(&store).await.unread_count, 1);
    }

    #[tokio::test]
    async fn test_own_message_is_not_unread() {
        let (store, reconciler) = setup(0).await;
        reconciler
            .apply(RealtimeEvent::new_message(message_dto("m1", "me")))
            .await
            .unwrap();
        assert_eq!(cached(&store).await.unread_count, 0);
    }

    #[tokio::test]
    async fn test_typing_round_trip() {
        let (store, reconciler) = setup(0).await;

        reconciler
            .apply(RealtimeEvent::typing_start("c1", "Pat"))
            .await
            .unwrap();
        assert!(cached(&store).await.is_typing);

        reconciler
            .apply(RealtimeEvent::typing_stop("c1"))
            .await
            .unwrap();
        let conversation = cached(&store).await;
        assert!(!conversation.is_typing);
        assert_eq!(conversation.typing_user_name, None);
    }

    #[tokio::test]
    async fn test_repeated_read_receipts_stay_at_zero() {
        let (store, reconciler) = setup(1).await;
        for _ in 0..3 {
            reconciler
                .apply(RealtimeEvent::read_receipt("c1"))
                .await
                .unwrap();
        }
        assert_eq!(cached(&store).await.unread_count, 0);
    }

    #[tokio::test]
    async fn test_unknown_conversation() {
        let store = StoreHandle::new(InMemoryStore::new());
        let reconciler =
            MessagingReconciler::new(store.clone(), CurrentUser::new(Some("me".to_string())), 16);

        let typing = reconciler
            .apply(RealtimeEvent::typing_start("c1", "Pat"))
            .await
            .unwrap();
        assert_eq!(typing, ApplyOutcome::Skipped);

        let message = reconciler
            .apply(RealtimeEvent::new_message(message_dto("m1", "pat")))
            .await
            .unwrap();
        assert_eq!(message, ApplyOutcome::Applied);
        let messages = store.fetch_all(&Query::<Message>::all()).await.unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_event_is_rejected() {
        let (store, reconciler) = setup(2).await;
        let mut event = RealtimeEvent::new_message(message_dto("m1", "pat"));
        event.message = None;

        let err = reconciler.apply(event).await.unwrap_err();
        assert!(matches!(err, SyncError::Realtime(_)));
        assert_eq!(cached(&store).await.unread_count, 2);
    }

    #[tokio::test]
    async fn test_push_echo_replaces_pending_placeholder() {
        let (store, reconciler) = setup(0).await;
        let placeholder = Message {
            id: "pending:n1".to_string(),
            conversation_id: "c1".to_string(),
            sender_id: "me".to_string(),
            sender_name: None,
            content: "running late".to_string(),
            sent_at: Utc::now(),
            is_read: true,
            client_nonce: Some("n1".to_string()),
            is_pending: true,
        };
        store.upsert(&placeholder).await.unwrap();

        let mut echo = message_dto("m1", "me");
        echo.client_nonce = Some("n1".to_string());
        reconciler
            .apply(RealtimeEvent::new_message(echo))
            .await
            .unwrap();

        let ids: Vec<_> = store
            .fetch_all(&Query::<Message>::all())
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["m1"]);
    }
}
