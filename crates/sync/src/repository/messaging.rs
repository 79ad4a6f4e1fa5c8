use chrono::Utc;
use uuid::Uuid;

use fitsync_core::entities::{
    compare_conversations_by_recency, compare_messages_by_time, validate_message_content,
    Conversation, ConversationDto, CreateConversationRequest, Message, MessageDto, MessageWindow,
    SendMessageRequest,
};
use fitsync_core::realtime::{apply_to_conversation, ConversationEvent, RealtimeEvent};
use fitsync_core::remote::endpoints;
use fitsync_core::store::Query;
use fitsync_core::sync::Result;

use super::NO_BODY;
use crate::engine::{CacheAside, WriteThrough};
use crate::realtime::{ApplyOutcome, MessagingReconciler};
use crate::session::CurrentUser;

/// Conversations, their message history and outgoing messages.
#[derive(Clone)]
pub struct MessagingRepository {
    engine: CacheAside,
    reconciler: MessagingReconciler,
    current_user: CurrentUser,
}

impl MessagingRepository {
    pub fn new(engine: CacheAside, reconciler: MessagingReconciler, current_user: CurrentUser) -> Self {
        Self {
            engine,
            reconciler,
            current_user,
        }
    }

    /// Lists conversations, most recently active first.
    pub async fn list_conversations(&self, from_cache: bool) -> Result<Vec<Conversation>> {
        self.engine
            .list::<Conversation, ConversationDto>(
                endpoints::conversations(),
                Query::all().sort_by(compare_conversations_by_recency),
                WriteThrough::whole_collection(),
                from_cache,
            )
            .await
    }

    pub async fn get_conversation(&self, id: &str, from_cache: bool) -> Result<Option<Conversation>> {
        self.engine
            .get::<Conversation, ConversationDto>(endpoints::conversation(id), id, from_cache)
            .await
    }

    pub async fn create_conversation(&self, request: &CreateConversationRequest) -> Result<Conversation> {
        self.engine
            .mutate::<Conversation, ConversationDto, _>(endpoints::create_conversation(), Some(request))
            .await
    }

    /// Lists up to `window.limit` messages of a conversation, oldest first.
    ///
    /// Fetching the latest window replaces every confirmed message cached for
    /// the conversation; pending placeholders survive. Fetching an older
    /// window (`before` set) only adds to the cache.
    pub async fn list_messages(
        &self,
        conversation_id: &str,
        window: MessageWindow,
        from_cache: bool,
    ) -> Result<Vec<Message>> {
        let filter_id = conversation_id.to_string();
        let before = window.before;
        let query = Query::all()
            .filter(move |m: &Message| {
                m.conversation_id == filter_id && before.is_none_or(|b| m.sent_at < b)
            })
            .sort_by(compare_messages_by_time);

        let write = match window.before {
            None => {
                let scope_id = conversation_id.to_string();
                WriteThrough::scope(move |m: &Message| m.conversation_id == scope_id && !m.is_pending)
            }
            Some(_) => WriteThrough::Upsert,
        };

        let mut messages = self
            .engine
            .list::<Message, MessageDto>(
                window.apply(endpoints::messages(conversation_id)),
                query,
                write,
                from_cache,
            )
            .await?;

        let limit = window.limit as usize;
        if messages.len() > limit {
            messages.drain(..messages.len() - limit);
        }
        Ok(messages)
    }

    /// Sends a message and waits for the server's copy.
    ///
    /// The cached conversation summary is updated from the confirmed message.
    pub async fn send_message(&self, conversation_id: &str, content: &str) -> Result<Message> {
        let request = SendMessageRequest {
            content: validate_message_content(content)?,
            client_nonce: None,
        };
        let message = self
            .engine
            .mutate::<Message, MessageDto, _>(endpoints::send_message(conversation_id), Some(&request))
            .await?;
        self.record_sent(&message).await?;
        Ok(message)
    }

    /// Sends a message, showing a pending placeholder until the server answers.
    ///
    /// The placeholder carries a client nonce. It is removed once the server
    /// confirms the message, whether the confirmation comes from this request
    /// or from the realtime echo, and also when the request fails.
    pub async fn send_message_with_placeholder(
        &self,
        conversation_id: &str,
        content: &str,
    ) -> Result<Message> {
        let content = validate_message_content(content)?;
        let nonce = Uuid::new_v4().to_string();
        let placeholder = Message {
            id: format!("pending:{nonce}"),
            conversation_id: conversation_id.to_string(),
            sender_id: self.current_user.get().unwrap_or_default(),
            sender_name: None,
            content: content.clone(),
            sent_at: Utc::now(),
            is_read: true,
            client_nonce: Some(nonce.clone()),
            is_pending: true,
        };
        let store = self.engine.store();
        store.upsert(&placeholder).await?;

        let request = SendMessageRequest {
            content,
            client_nonce: Some(nonce),
        };
        let sent = self
            .engine
            .mutate::<Message, MessageDto, _>(endpoints::send_message(conversation_id), Some(&request))
            .await;

        if let Err(err) = store.delete::<Message>(&placeholder.id).await {
            tracing::warn!(id = %placeholder.id, error = %err, "Failed to remove pending placeholder");
        }

        let message = match sent {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(conversation_id, error = %err, "Message not sent, placeholder dropped");
                return Err(err);
            }
        };
        self.record_sent(&message).await?;
        Ok(message)
    }

    /// Marks a conversation read on the server, then locally.
    pub async fn mark_read(&self, conversation_id: &str) -> Result<()> {
        self.engine
            .call(endpoints::mark_conversation_read(conversation_id), NO_BODY)
            .await?;
        self.engine
            .store()
            .update::<Conversation, _>(conversation_id, |c| c.unread_count = 0)
            .await?;
        Ok(())
    }

    /// Applies one realtime event to the cache.
    pub async fn apply_event(&self, event: RealtimeEvent) -> Result<ApplyOutcome> {
        self.reconciler.apply(event).await
    }

    async fn record_sent(&self, message: &Message) -> Result<()> {
        let event = ConversationEvent::NewMessage {
            conversation_id: message.conversation_id.clone(),
            message: message.clone(),
        };
        let sender = message.sender_id.clone();
        self.engine
            .store()
            .update::<Conversation, _>(&message.conversation_id, move |c| {
                *c = apply_to_conversation(c.clone(), &event, Some(&sender));
            })
            .await?;
        Ok(())
    }
}
