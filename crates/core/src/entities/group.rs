use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::serde::{deserialize_optional_string, deserialize_timestamp};
use crate::store::Record;

/// A community group users can join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub is_private: bool,
    pub member_count: u32,
    /// Whether the signed-in user is a member.
    pub is_member: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for Group {
    const KIND: &'static str = "group";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDto {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    pub owner_id: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub is_member: bool,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<GroupDto> for Group {
    fn from(dto: GroupDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            owner_id: dto.owner_id,
            is_private: dto.is_private,
            member_count: dto.member_count,
            is_member: dto.is_member,
            image_url: dto.image_url,
            created_at: dto.created_at,
        }
    }
}

/// Role of a member inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
}

/// Membership of a user in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: String,
    pub group_id: String,
    pub user_id: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

impl Record for GroupMember {
    const KIND: &'static str = "group_member";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMemberDto {
    pub id: String,
    pub group_id: String,
    pub user_id: String,
    pub display_name: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub avatar_url: Option<String>,
    #[serde(default = "default_role")]
    pub role: MemberRole,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub joined_at: DateTime<Utc>,
}

fn default_role() -> MemberRole {
    MemberRole::Member
}

impl From<GroupMemberDto> for GroupMember {
    fn from(dto: GroupMemberDto) -> Self {
        Self {
            id: dto.id,
            group_id: dto.group_id,
            user_id: dto.user_id,
            display_name: dto.display_name,
            avatar_url: dto.avatar_url,
            role: dto.role,
            joined_at: dto.joined_at,
        }
    }
}

/// A user's answer to a group activity invitation.
///
/// The absence of an answer is modelled as `Option::<RsvpStatus>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Yes,
    No,
    Maybe,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Yes => "yes",
            RsvpStatus::No => "no",
            RsvpStatus::Maybe => "maybe",
        }
    }
}

impl std::fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RsvpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yes" => Ok(RsvpStatus::Yes),
            "no" => Ok(RsvpStatus::No),
            "maybe" => Ok(RsvpStatus::Maybe),
            other => Err(format!("unknown RSVP status: {other}")),
        }
    }
}

/// A scheduled activity organised inside a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupActivity {
    pub id: String,
    pub group_id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub created_by: String,
    /// Number of `yes` answers.
    pub rsvp_count: u32,
    /// The signed-in user's answer, if any.
    pub user_rsvp: Option<RsvpStatus>,
}

impl Record for GroupActivity {
    const KIND: &'static str = "group_activity";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupActivityDto {
    pub id: String,
    pub group_id: String,
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub scheduled_at: DateTime<Utc>,
    pub created_by: String,
    #[serde(default)]
    pub rsvp_count: u32,
    #[serde(default, rename = "userRSVP", alias = "userRsvp")]
    pub user_rsvp: Option<RsvpStatus>,
}

impl From<GroupActivityDto> for GroupActivity {
    fn from(dto: GroupActivityDto) -> Self {
        Self {
            id: dto.id,
            group_id: dto.group_id,
            title: dto.title,
            description: dto.description,
            location: dto.location,
            scheduled_at: dto.scheduled_at,
            created_by: dto.created_by,
            rsvp_count: dto.rsvp_count,
            user_rsvp: dto.user_rsvp,
        }
    }
}
