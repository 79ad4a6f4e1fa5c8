use std::fmt;

use serde::{Deserialize, Serialize};

use super::RealtimeError;
use crate::entities::{Message, MessageDto};

/// Kind of a realtime event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealtimeEventType {
    NewMessage,
    TypingStart,
    TypingStop,
    ReadReceipt,
}

impl RealtimeEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RealtimeEventType::NewMessage => "new_message",
            RealtimeEventType::TypingStart => "typing_start",
            RealtimeEventType::TypingStop => "typing_stop",
            RealtimeEventType::ReadReceipt => "read_receipt",
        }
    }
}

impl fmt::Display for RealtimeEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event as delivered on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeEvent {
    #[serde(rename = "type")]
    pub event_type: RealtimeEventType,
    pub conversation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Monotonic per-connection delivery id, when the server provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_id: Option<u64>,
}

impl RealtimeEvent {
    pub fn new_message(message: MessageDto) -> Self {
        Self {
            event_type: RealtimeEventType::NewMessage,
            conversation_id: message.conversation_id.clone(),
            user_id: Some(message.sender_id.clone()),
            user_name: message.sender_name.clone(),
            message: Some(message),
            delivery_id: None,
        }
    }

    pub fn typing_start(conversation_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self::bare(RealtimeEventType::TypingStart, conversation_id).with_user_name(user_name)
    }

    pub fn typing_stop(conversation_id: impl Into<String>) -> Self {
        Self::bare(RealtimeEventType::TypingStop, conversation_id)
    }

    pub fn read_receipt(conversation_id: impl Into<String>) -> Self {
        Self::bare(RealtimeEventType::ReadReceipt, conversation_id)
    }

    pub fn with_delivery_id(mut self, delivery_id: u64) -> Self {
        self.delivery_id = Some(delivery_id);
        self
    }

    fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    fn bare(event_type: RealtimeEventType, conversation_id: impl Into<String>) -> Self {
        Self {
            event_type,
            conversation_id: conversation_id.into(),
            message: None,
            user_id: None,
            user_name: None,
            delivery_id: None,
        }
    }
}

/// A validated realtime event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationEvent {
    NewMessage {
        conversation_id: String,
        message: Message,
    },
    TypingStart {
        conversation_id: String,
        user_name: Option<String>,
    },
    TypingStop {
        conversation_id: String,
    },
    ReadReceipt {
        conversation_id: String,
    },
}

impl ConversationEvent {
    pub fn conversation_id(&self) -> &str {
        match self {
            ConversationEvent::NewMessage {
                conversation_id, ..
            }
            | ConversationEvent::TypingStart {
                conversation_id, ..
            }
            | ConversationEvent::TypingStop { conversation_id }
            | ConversationEvent::ReadReceipt { conversation_id } => conversation_id,
        }
    }
}

impl TryFrom<RealtimeEvent> for ConversationEvent {
    type Error = RealtimeError;

    fn try_from(event: RealtimeEvent) -> Result<Self, Self::Error> {
        let malformed = |reason: &str| RealtimeError::Malformed {
            event_type: event.event_type.to_string(),
            reason: reason.to_string(),
        };

        if event.conversation_id.trim().is_empty() {
            return Err(malformed("missing conversation id"));
        }

        match event.event_type {
            RealtimeEventType::NewMessage => {
                let Some(dto) = event.message.clone() else {
                    return Err(malformed("missing message"));
                };
                if dto.conversation_id != event.conversation_id {
                    return Err(malformed("message belongs to another conversation"));
                }
                Ok(ConversationEvent::NewMessage {
                    conversation_id: event.conversation_id,
                    message: dto.into(),
                })
            }
            RealtimeEventType::TypingStart => Ok(ConversationEvent::TypingStart {
                conversation_id: event.conversation_id,
                user_name: event.user_name,
            }),
            RealtimeEventType::TypingStop => Ok(ConversationEvent::TypingStop {
                conversation_id: event.conversation_id,
            }),
            RealtimeEventType::ReadReceipt => Ok(ConversationEvent::ReadReceipt {
                conversation_id: event.conversation_id,
            }),
        }
    }
}
