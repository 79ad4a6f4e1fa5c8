//! Serde helper functions for wire payloads.
//!
//! The fitness API is not consistent about timestamps: most endpoints send
//! RFC 3339 strings, some older ones send unix seconds. Optional text fields
//! sometimes arrive as empty strings instead of `null`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Seconds(i64),
    Fractional(f64),
    Text(String),
}

fn parse_timestamp<E: serde::de::Error>(raw: RawTimestamp) -> Result<DateTime<Utc>, E> {
    match raw {
        RawTimestamp::Seconds(secs) => DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| E::custom(format!("timestamp out of range: {secs}"))),
        RawTimestamp::Fractional(secs) => {
            let millis = (secs * 1000.0).round() as i64;
            DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| E::custom(format!("timestamp out of range: {secs}")))
        }
        RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
            })
            .or_else(|_| {
                NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
            })
            .map_err(|_| E::custom(format!("invalid timestamp: {text}"))),
    }
}

/// Deserialize a timestamp given as RFC 3339 text, naive ISO text (assumed UTC)
/// or unix seconds.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawTimestamp::deserialize(deserializer)?;
    parse_timestamp(raw)
}

/// Optional variant of [`deserialize_timestamp`]; `null` and `""` become `None`.
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawTimestamp> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(RawTimestamp::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(raw) => parse_timestamp(raw).map(Some),
    }
}

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestStruct {
        #[serde(deserialize_with = "deserialize_timestamp")]
        at: DateTime<Utc>,
        #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
        maybe_at: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        note: Option<String>,
    }

    fn expected() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap()
    }

    #[test]
    fn test_rfc3339_with_offset() {
        let json = r#"{"at": "2024-03-01T19:30:00+01:00"}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.at, expected());
    }

    #[test]
    fn test_rfc3339_fractional() {
        let json = r#"{"at": "2024-03-01T18:30:00.000Z"}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.at, expected());
    }

    #[test]
    fn test_naive_text_is_utc() {
        let json = r#"{"at": "2024-03-01T18:30:00"}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.at, expected());
    }

    #[test]
    fn test_unix_seconds() {
        let secs = expected().timestamp();
        let json = format!(r#"{{"at": {secs}}}"#);
        let result: TestStruct = serde_json::from_str(&json).unwrap();
        assert_eq!(result.at, expected());
    }

    #[test]
    fn test_fractional_unix_seconds() {
        let secs = expected().timestamp();
        let json = format!(r#"{{"at": {secs}.0}}"#);
        let result: TestStruct = serde_json::from_str(&json).unwrap();
        assert_eq!(result.at, expected());
    }

    #[test]
    fn test_invalid_timestamp() {
        let json = r#"{"at": "yesterday"}"#;
        assert!(serde_json::from_str::<TestStruct>(json).is_err());
    }

    #[test]
    fn test_optional_timestamp_empty_and_missing() {
        let json = r#"{"at": 0, "maybe_at": ""}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.maybe_at, None);

        let json = r#"{"at": 0}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.maybe_at, None);
    }

    #[test]
    fn test_optional_string_whitespace() {
        let json = r#"{"at": 0, "note": "   "}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.note, None);
    }

    #[test]
    fn test_optional_string_value() {
        let json = r#"{"at": 0, "note": "bring a mat"}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.note, Some("bring a mat".to_string()));
    }
}
