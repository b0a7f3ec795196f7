use thiserror::Error;

use crate::record::{SerializationError, ValidationError};
use crate::store::StoreError;

/// Errors that can occur during repository operations.
///
/// A missing record is not an error: lookups return `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConnectionFailed(msg) => RepositoryError::ConnectionFailed(msg),
            StoreError::OperationFailed(msg) => RepositoryError::QueryFailed(msg),
        }
    }
}

impl From<SerializationError> for RepositoryError {
    fn from(err: SerializationError) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_is_transparent() {
        let error = RepositoryError::from(ValidationError::GiftNotSet);
        assert_eq!(error.to_string(), "gift attribute is not set");
    }

    #[test]
    fn test_repository_error_connection_failed_display() {
        let error = RepositoryError::ConnectionFailed("connection refused".to_string());
        assert_eq!(error.to_string(), "Connection failed: connection refused");
    }

    #[test]
    fn test_store_connection_error_stays_distinct() {
        let error = RepositoryError::from(StoreError::ConnectionFailed("timeout".to_string()));
        assert_eq!(error, RepositoryError::ConnectionFailed("timeout".to_string()));
    }

    #[test]
    fn test_store_operation_error_becomes_query_failed() {
        let error = RepositoryError::from(StoreError::OperationFailed("WRONGTYPE".to_string()));
        assert_eq!(error, RepositoryError::QueryFailed("WRONGTYPE".to_string()));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let error = RepositoryError::from(SerializationError::DeserializeFailed(
            "record 1: eof".to_string(),
        ));
        assert_eq!(
            error.to_string(),
            "Serialization error: Failed to deserialize: record 1: eof"
        );
    }
}
