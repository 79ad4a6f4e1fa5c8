//! Pure mapping from HTTP status codes to [`RemoteError`] variants.
//!
//! Transport implementations call this once they have a non-success status and
//! the raw response body in hand.

use super::RemoteError;

/// Maps a non-success HTTP status and its body to a [`RemoteError`].
///
/// - `401` -> `Unauthorized`
/// - anything else -> `Server` carrying the body's `message` (or `error`)
///   field when the body is a JSON object, or the trimmed raw body otherwise
///
/// # Examples
///
/// ```
/// use fitsync_core::remote::{status_to_remote_error, RemoteError};
///
/// let error = status_to_remote_error(409, r#"{"message":"Class is full"}"#);
/// assert_eq!(
///     error,
///     RemoteError::Server { status: 409, message: "Class is full".to_string() }
/// );
/// assert_eq!(status_to_remote_error(401, ""), RemoteError::Unauthorized);
/// ```
pub fn status_to_remote_error(status: u16, body: &str) -> RemoteError {
    if status == 401 {
        return RemoteError::Unauthorized;
    }

    RemoteError::Server {
        status,
        message: server_message(status, body),
    }
}

fn server_message(status: u16, body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "reason"] {
            if let Some(serde_json::Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("Server returned status {status}")
    } else {
        trimmed.to_string()
    }
}
