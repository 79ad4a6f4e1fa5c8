use chrono::{DateTime, Duration, Utc};

use super::TokenPair;

/// Check if an access token has expired. Tokens without expiry never do.
pub fn is_token_expired(tokens: &TokenPair, now: DateTime<Utc>) -> bool {
    tokens.expires_at.is_some_and(|at| at <= now)
}

/// Calculate token expiry from issue time and lifetime.
pub fn calculate_expiry(issued_at: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    issued_at + ttl
}

/// Value of the `Authorization` header for a token.
pub fn bearer_header(access_token: &str) -> String {
    format!("Bearer {access_token}")
}

/// Extract a display name from an email if none was given.
pub fn email_to_name(email: &str) -> String {
    match email.split('@').next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "User".to_string(),
    }
}
