//! Pure reconciliation of a conversation summary with one realtime event.

use super::{ConversationEvent, RealtimeEvent, RealtimeEventType};
use crate::entities::Conversation;

/// Applies `event` to `conversation` and returns the updated summary.
///
/// `local_user_id` decides whether a new message counts as unread: messages
/// sent by the local user never bump the counter. Unread counts are only
/// incremented here; `read_receipt` is the single way back to zero.
pub fn apply_to_conversation(
    mut conversation: Conversation,
    event: &ConversationEvent,
    local_user_id: Option<&str>,
) -> Conversation {
    match event {
        ConversationEvent::NewMessage { message, .. } => {
            conversation.last_message = Some(message.content.clone());
            conversation.last_message_time = Some(message.sent_at);
            conversation.last_message_sender_id = Some(message.sender_id.clone());
            conversation.updated_at = conversation.updated_at.max(message.sent_at);
            if local_user_id != Some(message.sender_id.as_str()) {
                conversation.unread_count = conversation.unread_count.saturating_add(1);
            }
            conversation.is_typing = false;
            conversation.typing_user_name = None;
        }
        ConversationEvent::TypingStart { user_name, .. } => {
            conversation.is_typing = true;
            conversation.typing_user_name = user_name.clone();
        }
        ConversationEvent::TypingStop { .. } => {
            conversation.is_typing = false;
            conversation.typing_user_name = None;
        }
        ConversationEvent::ReadReceipt { .. } => {
            conversation.unread_count = 0;
        }
    }
    conversation
}

/// Key identifying a delivery for replay detection.
///
/// Server delivery ids win; otherwise a `new_message` is keyed by its message
/// id. Other events without a delivery id are idempotent and return `None`.
pub fn dedup_key(event: &RealtimeEvent) -> Option<String> {
    if let Some(id) = event.delivery_id {
        return Some(format!("delivery:{id}"));
    }
    match (event.event_type, &event.message) {
        (RealtimeEventType::NewMessage, Some(message)) => Some(format!("msg:{}", message.id)),
        _ => None,
    }
}
