use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::serde::{deserialize_optional_string, deserialize_timestamp};
use crate::store::Record;

/// Public profile of a user as seen by the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProfile {
    /// The profile owner's user id.
    pub id: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_following: bool,
    pub is_followed_by: bool,
    pub followers_count: u32,
    pub following_count: u32,
    pub activities_count: u32,
}

impl Record for SocialProfile {
    const KIND: &'static str = "social_profile";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialProfileDto {
    #[serde(alias = "userId")]
    pub id: String,
    pub display_name: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_following: bool,
    #[serde(default)]
    pub is_followed_by: bool,
    #[serde(default)]
    pub followers_count: u32,
    #[serde(default)]
    pub following_count: u32,
    #[serde(default)]
    pub activities_count: u32,
}

impl From<SocialProfileDto> for SocialProfile {
    fn from(dto: SocialProfileDto) -> Self {
        Self {
            id: dto.id,
            display_name: dto.display_name,
            bio: dto.bio,
            avatar_url: dto.avatar_url,
            is_following: dto.is_following,
            is_followed_by: dto.is_followed_by,
            followers_count: dto.followers_count,
            following_count: dto.following_count,
            activities_count: dto.activities_count,
        }
    }
}

/// An entry in the social feed (workout logged, class completed, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub activity_type: String,
    pub content: Option<String>,
    pub class_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub likes_count: u32,
    pub comments_count: u32,
    pub is_liked: bool,
}

impl Record for Activity {
    const KIND: &'static str = "activity";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDto {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(alias = "type")]
    pub activity_type: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub content: Option<String>,
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub comments_count: u32,
    #[serde(default)]
    pub is_liked: bool,
}

impl From<ActivityDto> for Activity {
    fn from(dto: ActivityDto) -> Self {
        Self {
            id: dto.id,
            user_id: dto.user_id,
            user_name: dto.user_name,
            activity_type: dto.activity_type,
            content: dto.content,
            class_id: dto.class_id,
            created_at: dto.created_at,
            likes_count: dto.likes_count,
            comments_count: dto.comments_count,
            is_liked: dto.is_liked,
        }
    }
}

/// A comment on a feed activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub activity_id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Record for Comment {
    const KIND: &'static str = "comment";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: String,
    pub activity_id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<CommentDto> for Comment {
    fn from(dto: CommentDto) -> Self {
        Self {
            id: dto.id,
            activity_id: dto.activity_id,
            user_id: dto.user_id,
            user_name: dto.user_name,
            content: dto.content,
            created_at: dto.created_at,
        }
    }
}
