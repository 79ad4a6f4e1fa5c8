use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::serde::{deserialize_optional_timestamp, deserialize_timestamp};
use crate::store::Record;

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Attended,
    Cancelled,
    Missed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Attended => "attended",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Missed => "missed",
        }
    }

    /// Returns true while the booking still holds a spot in the class.
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Confirmed)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "attended" => Ok(BookingStatus::Attended),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            "missed" => Ok(BookingStatus::Missed),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

/// A user's booking of a fitness class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub class_id: String,
    pub user_id: String,
    pub status: BookingStatus,
    pub booked_at: DateTime<Utc>,
    pub attended: bool,
    pub attended_at: Option<DateTime<Utc>>,
    pub reminder_enabled: bool,
    pub reminder_minutes_before: Option<u32>,
    /// Denormalized class name for list display.
    pub class_name: Option<String>,
    pub class_start_time: Option<DateTime<Utc>>,
}

impl Record for Booking {
    const KIND: &'static str = "booking";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Wire representation of a booking.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    pub id: String,
    pub class_id: String,
    pub user_id: String,
    pub status: BookingStatus,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub booked_at: DateTime<Utc>,
    #[serde(default)]
    pub attended: bool,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub attended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reminder_enabled: bool,
    #[serde(default)]
    pub reminder_minutes_before: Option<u32>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub class_start_time: Option<DateTime<Utc>>,
}

impl From<BookingDto> for Booking {
    fn from(dto: BookingDto) -> Self {
        Self {
            id: dto.id,
            class_id: dto.class_id,
            user_id: dto.user_id,
            // Older servers only flip the flag on attendance.
            status: if dto.attended {
                BookingStatus::Attended
            } else {
                dto.status
            },
            booked_at: dto.booked_at,
            attended: dto.attended || dto.status == BookingStatus::Attended,
            attended_at: dto.attended_at,
            reminder_enabled: dto.reminder_enabled,
            reminder_minutes_before: dto.reminder_minutes_before,
            class_name: dto.class_name,
            class_start_time: dto.class_start_time,
        }
    }
}
