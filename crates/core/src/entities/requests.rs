//! Request payloads sent to the remote service and list filters.
//!
//! Filters double as cache predicates: the same `matches` logic decides what
//! a cache-only read returns.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::{Booking, BookingStatus, FitnessClass, RsvpStatus};
use crate::remote::Endpoint;

/// Filters for the class catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassFilter {
    pub category: Option<String>,
    /// Case-insensitive text matched against name, description and instructor.
    pub search: Option<String>,
    /// Only classes starting on this (UTC) day.
    pub date: Option<NaiveDate>,
}

impl ClassFilter {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Attaches the filter as query parameters.
    pub fn apply(&self, endpoint: Endpoint) -> Endpoint {
        endpoint
            .with_optional_query("category", self.category.as_deref())
            .with_optional_query("search", self.search.as_deref())
            .with_optional_query("date", self.date)
    }

    pub fn matches(&self, class: &FitnessClass) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|c| class.category.eq_ignore_ascii_case(c));
        let date_ok = self
            .date
            .is_none_or(|d| class.start_time.date_naive() == d);
        let search_ok = self.search.as_deref().is_none_or(|s| {
            let needle = s.to_lowercase();
            class.name.to_lowercase().contains(&needle)
                || class.instructor_name.to_lowercase().contains(&needle)
                || class
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        });
        category_ok && date_ok && search_ok
    }
}

/// Filters for the signed-in user's bookings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
}

impl BookingFilter {
    pub fn with_status(status: BookingStatus) -> Self {
        Self {
            status: Some(status),
        }
    }

    pub fn apply(&self, endpoint: Endpoint) -> Endpoint {
        endpoint.with_optional_query("status", self.status.map(|s| s.as_str()))
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        self.status.is_none_or(|s| booking.status == s)
    }
}

/// Reminder configuration attached to a booking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSettings {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes_before: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub class_id: String,
    pub reminder_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_minutes_before: Option<u32>,
}

impl CreateBookingRequest {
    pub fn new(class_id: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            reminder_enabled: false,
            reminder_minutes_before: None,
        }
    }

    pub fn with_reminder(mut self, minutes_before: u32) -> Self {
        self.reminder_enabled = true;
        self.reminder_minutes_before = Some(minutes_before);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_private: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupActivityRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub scheduled_at: DateTime<Utc>,
}

/// An RSVP answer; `None` withdraws a previous answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RsvpRequest {
    pub status: Option<RsvpStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[serde(skip)]
    pub class_id: String,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    pub participant_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_nonce: Option<String>,
}

/// The slice of a conversation's history to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageWindow {
    pub limit: u32,
    /// Only messages sent strictly before this instant.
    pub before: Option<DateTime<Utc>>,
}

impl MessageWindow {
    pub fn latest(limit: u32) -> Self {
        Self {
            limit,
            before: None,
        }
    }

    pub fn apply(&self, endpoint: Endpoint) -> Endpoint {
        endpoint
            .with_query("limit", self.limit)
            .with_optional_query("before", self.before.map(|b| b.to_rfc3339()))
    }
}

impl Default for MessageWindow {
    fn default() -> Self {
        Self::latest(50)
    }
}

/// A page of the social feed, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedPage {
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}
