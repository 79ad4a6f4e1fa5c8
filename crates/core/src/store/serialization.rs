//! Pure functions for encoding entities to store records and back.
//!
//! Record bodies are JSON so that a cached database stays readable with any
//! SQLite browser.

use super::{Record, Result, StoreError, StoredRecord};

/// Encodes an entity into a store record.
pub fn encode_record<T: Record>(entity: &T) -> Result<StoredRecord> {
    let body = serde_json::to_vec(entity).map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(StoredRecord {
        kind: T::KIND.to_string(),
        id: entity.id().to_string(),
        body,
    })
}

/// Decodes a store record into an entity.
///
/// Fails if the record belongs to another kind or its body is not a valid `T`.
pub fn decode_record<T: Record>(record: &StoredRecord) -> Result<T> {
    if record.kind != T::KIND {
        return Err(StoreError::Serialization(format!(
            "expected {} record, found {}",
            T::KIND,
            record.kind
        )));
    }
    serde_json::from_slice(&record.body).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        text: String,
    }

    impl Record for Note {
        const KIND: &'static str = "note";

        fn id(&self) -> &str {
            &self.id
        }
    }

    #[test]
    fn test_encode_sets_kind_and_id() {
        let note = Note {
            id: "n1".to_string(),
            text: "hello".to_string(),
        };
        let record = encode_record(&note).unwrap();

        assert_eq!(record.kind, "note");
        assert_eq!(record.id, "n1");
        assert_eq!(decode_record::<Note>(&record).unwrap(), note);
    }

    #[test]
    fn test_decode_rejects_other_kind() {
        let record = StoredRecord {
            kind: "booking".to_string(),
            id: "n1".to_string(),
            body: br#"{"id":"n1","text":"x"}"#.to_vec(),
        };
        let err = decode_record::<Note>(&record).unwrap_err();
        assert_eq!(
            err,
            StoreError::Serialization("expected note record, found booking".to_string())
        );
    }

    #[test]
    fn test_decode_invalid_body() {
        let record = StoredRecord {
            kind: "note".to_string(),
            id: "n1".to_string(),
            body: b"not json".to_vec(),
        };
        assert!(matches!(
            decode_record::<Note>(&record),
            Err(StoreError::Serialization(_))
        ));
    }
}
