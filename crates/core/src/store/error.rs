use thiserror::Error;

/// Errors reported by a key-value store client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Store operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_display() {
        let error = StoreError::ConnectionFailed("refused".to_string());
        assert_eq!(error.to_string(), "Store connection failed: refused");
    }

    #[test]
    fn test_operation_failed_display() {
        let error = StoreError::OperationFailed("WRONGTYPE".to_string());
        assert_eq!(error.to_string(), "Store operation failed: WRONGTYPE");
    }
}
