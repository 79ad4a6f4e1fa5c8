use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::serde::{deserialize_optional_string, deserialize_optional_timestamp, deserialize_timestamp};
use crate::store::Record;

/// A direct or group conversation with denormalized summary fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub participant_ids: Vec<String>,
    pub title: Option<String>,
    pub last_message: Option<String>,
    pub last_message_time: Option<DateTime<Utc>>,
    pub last_message_sender_id: Option<String>,
    pub unread_count: u32,
    pub updated_at: DateTime<Utc>,
    /// Transient typing indicator, driven by realtime events only.
    #[serde(default)]
    pub is_typing: bool,
    #[serde(default)]
    pub typing_user_name: Option<String>,
}

impl Record for Conversation {
    const KIND: &'static str = "conversation";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDto {
    pub id: String,
    #[serde(default)]
    pub participant_ids: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub title: Option<String>,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub last_message_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_message_sender_id: Option<String>,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl From<ConversationDto> for Conversation {
    fn from(dto: ConversationDto) -> Self {
        Self {
            id: dto.id,
            participant_ids: dto.participant_ids,
            title: dto.title,
            last_message: dto.last_message,
            last_message_time: dto.last_message_time,
            last_message_sender_id: dto.last_message_sender_id,
            unread_count: dto.unread_count,
            updated_at: dto.updated_at,
            is_typing: false,
            typing_user_name: None,
        }
    }
}

/// A single message inside a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub sender_name: Option<String>,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
    /// Client-generated nonce echoed back by the server for outgoing messages.
    #[serde(default)]
    pub client_nonce: Option<String>,
    /// True for a local placeholder that the server has not confirmed yet.
    #[serde(default)]
    pub is_pending: bool,
}

impl Record for Message {
    const KIND: &'static str = "message";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    pub content: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub client_nonce: Option<String>,
}

impl From<MessageDto> for Message {
    fn from(dto: MessageDto) -> Self {
        Self {
            id: dto.id,
            conversation_id: dto.conversation_id,
            sender_id: dto.sender_id,
            sender_name: dto.sender_name,
            content: dto.content,
            sent_at: dto.sent_at,
            is_read: dto.is_read,
            client_nonce: dto.client_nonce,
            is_pending: false,
        }
    }
}
