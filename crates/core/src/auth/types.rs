use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{User, UserDto};

/// Access and refresh token issued by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// Wire shape of a login or register response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseDto {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: UserDto,
}

/// Tokens plus the account they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub tokens: TokenPair,
    pub user: User,
}

impl AuthResponse {
    /// Builds the domain response, anchoring relative expiry at `now`.
    pub fn from_dto(dto: AuthResponseDto, now: DateTime<Utc>) -> Self {
        Self {
            tokens: TokenPair {
                access_token: dto.access_token,
                refresh_token: dto.refresh_token,
                expires_at: dto
                    .expires_in
                    .map(|secs| super::calculate_expiry(now, chrono::Duration::seconds(secs))),
            },
            user: dto.user.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_auth_response_from_dto() {
        let json = r#"{
            "token": "abc",
            "refreshToken": "def",
            "expiresIn": 3600,
            "user": { "id": "u1", "displayName": "Sam" }
        }"#;
        let dto: AuthResponseDto = serde_json::from_str(json).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let response = AuthResponse::from_dto(dto, now);

        assert_eq!(response.tokens.access_token, "abc");
        assert_eq!(response.tokens.refresh_token.as_deref(), Some("def"));
        assert_eq!(
            response.tokens.expires_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap())
        );
        assert_eq!(response.user.display_name, "Sam");
    }

    #[test]
    fn test_register_request_serializes_camel_case() {
        let body = serde_json::to_value(RegisterRequest {
            email: "sam@example.com".to_string(),
            password: "secret".to_string(),
            display_name: "Sam".to_string(),
        })
        .unwrap();
        assert_eq!(body["displayName"], "Sam");
    }
}
