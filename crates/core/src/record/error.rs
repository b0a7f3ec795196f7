use thiserror::Error;

/// Errors raised when record data is malformed or incomplete.
///
/// Every message is meant to be shown to the client as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("gift attribute is not set")]
    GiftNotSet,
    #[error("Invalid data: missing {0}")]
    MissingField(String),
    #[error("Invalid data: {field} must be {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },
    #[error("Invalid data: body of request contained bad or no data")]
    Malformed,
}
