use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::serde::{deserialize_optional_string, deserialize_optional_timestamp, deserialize_timestamp};
use crate::store::Record;

/// A user's review of a class. A user has at most one review per class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub class_id: String,
    pub user_id: String,
    pub user_name: Option<String>,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Returns true if this is `user_id`'s review of `class_id`.
    pub fn is_by(&self, class_id: &str, user_id: &str) -> bool {
        self.class_id == class_id && self.user_id == user_id
    }
}

impl Record for Review {
    const KIND: &'static str = "review";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub id: String,
    pub class_id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    pub rating: u8,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub comment: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<ReviewDto> for Review {
    fn from(dto: ReviewDto) -> Self {
        Self {
            id: dto.id,
            class_id: dto.class_id,
            user_id: dto.user_id,
            user_name: dto.user_name,
            rating: dto.rating,
            comment: dto.comment,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}
