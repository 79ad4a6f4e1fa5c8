use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::serde::{deserialize_optional_string, deserialize_optional_timestamp};
use crate::store::Record;

/// An account on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for User {
    const KIND: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(alias = "name")]
    pub display_name: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            email: dto.email,
            display_name: dto.display_name,
            avatar_url: dto.avatar_url,
            bio: dto.bio,
            created_at: dto.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_alias() {
        let json = r#"{"id": "u1", "name": "Robin", "avatarUrl": ""}"#;
        let user = User::from(serde_json::from_str::<UserDto>(json).unwrap());
        assert_eq!(user.display_name, "Robin");
        assert_eq!(user.avatar_url, None);
        assert_eq!(user.email, None);
    }
}
