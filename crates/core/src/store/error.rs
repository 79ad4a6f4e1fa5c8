use thiserror::Error;

/// Errors that can occur while reading or writing the local store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: String, id: String },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for local store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_already_exists_display() {
        let error = StoreError::AlreadyExists {
            kind: "booking".to_string(),
            id: "b1".to_string(),
        };
        assert_eq!(error.to_string(), "booking already exists: b1");
    }

    #[test]
    fn test_store_error_connection_failed_display() {
        let error = StoreError::ConnectionFailed("unable to open database file".to_string());
        assert_eq!(
            error.to_string(),
            "Connection failed: unable to open database file"
        );
    }

    #[test]
    fn test_store_error_query_failed_display() {
        let error = StoreError::QueryFailed("disk I/O error".to_string());
        assert_eq!(error.to_string(), "Query failed: disk I/O error");
    }

    #[test]
    fn test_store_error_serialization_display() {
        let error = StoreError::Serialization("missing field `id`".to_string());
        assert_eq!(error.to_string(), "Serialization error: missing field `id`");
    }
}
