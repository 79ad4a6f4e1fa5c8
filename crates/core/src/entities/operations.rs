//! Pure ordering and validation helpers shared by remote and cache-only reads.

use std::cmp::Ordering;

use thiserror::Error;

use super::{Activity, Booking, Comment, Conversation, FitnessClass, Message};

/// Input rejected before any request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
    #[error("Message cannot be empty")]
    EmptyMessage,
    #[error("Comment cannot be empty")]
    EmptyComment,
    #[error("Group name cannot be empty")]
    EmptyGroupName,
}

/// Ratings are whole stars from 1 to 5.
pub fn validate_rating(rating: u8) -> Result<u8, ValidationError> {
    if (1..=5).contains(&rating) {
        Ok(rating)
    } else {
        Err(ValidationError::RatingOutOfRange(rating))
    }
}

/// Rejects blank message bodies and returns the trimmed content.
pub fn validate_message_content(content: &str) -> Result<String, ValidationError> {
    non_blank(content).ok_or(ValidationError::EmptyMessage)
}

pub fn validate_comment_content(content: &str) -> Result<String, ValidationError> {
    non_blank(content).ok_or(ValidationError::EmptyComment)
}

pub fn validate_group_name(name: &str) -> Result<String, ValidationError> {
    non_blank(name).ok_or(ValidationError::EmptyGroupName)
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Earliest class first; ties broken by id for a stable listing.
pub fn compare_classes_by_start(a: &FitnessClass, b: &FitnessClass) -> Ordering {
    a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id))
}

/// Most recently active conversation first.
pub fn compare_conversations_by_recency(a: &Conversation, b: &Conversation) -> Ordering {
    let a_time = a.last_message_time.unwrap_or(a.updated_at);
    let b_time = b.last_message_time.unwrap_or(b.updated_at);
    b_time.cmp(&a_time).then_with(|| a.id.cmp(&b.id))
}

/// Oldest message first, the order a thread is read in.
pub fn compare_messages_by_time(a: &Message, b: &Message) -> Ordering {
    a.sent_at.cmp(&b.sent_at).then_with(|| a.id.cmp(&b.id))
}

pub fn compare_bookings_by_class_start(a: &Booking, b: &Booking) -> Ordering {
    a.class_start_time
        .cmp(&b.class_start_time)
        .then_with(|| a.booked_at.cmp(&b.booked_at))
}

/// Newest activity first.
pub fn compare_activities_by_recency(a: &Activity, b: &Activity) -> Ordering {
    b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id))
}

pub fn compare_comments_by_time(a: &Comment, b: &Comment) -> Ordering {
    a.created_at.cmp(&b.created_at)
}

pub fn sort_classes_by_start(classes: &mut [FitnessClass]) {
    classes.sort_by(compare_classes_by_start);
}

pub fn sort_conversations_by_recency(conversations: &mut [Conversation]) {
    conversations.sort_by(compare_conversations_by_recency);
}

pub fn sort_messages_by_time(messages: &mut [Message]) {
    messages.sort_by(compare_messages_by_time);
}
