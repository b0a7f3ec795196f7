//! Pure functions for encoding records to and from store bytes.
//!
//! Records are stored as their JSON object so values stay readable with
//! `redis-cli GET <id>`. The storage key is the authority for the id.

use thiserror::Error;

use super::GiftRecord;

/// Errors that can occur while encoding or decoding stored records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Encodes a record as JSON bytes.
pub fn serialize_record(record: &GiftRecord) -> Result<Vec<u8>> {
    serde_json::to_vec(&record.to_json())
        .map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Decodes JSON bytes stored under key `id`.
pub fn deserialize_record(id: u64, bytes: &[u8]) -> Result<GiftRecord> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| SerializationError::DeserializeFailed(format!("record {id}: {e}")))?;

    let record = GiftRecord::from_json(&value)
        .map_err(|e| SerializationError::DeserializeFailed(format!("record {id}: {e}")))?;

    Ok(record.with_id(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;

    #[test]
    fn test_roundtrip_preserves_all_fields() {
        let record = GiftRecord::new("Book")
            .with_id(3)
            .with_gifter("Amy")
            .with_thanked(false);

        let bytes = serialize_record(&record).expect("serialize should succeed");
        let decoded = deserialize_record(3, &bytes).expect("deserialize should succeed");

        assert_eq!(decoded, record);
    }

    #[test]
    fn test_id_comes_from_key() {
        let bytes = br#"{"id": 99, "gift": "Pen", "gifter": "Bob", "thanked": "yes"}"#;

        let decoded = deserialize_record(2, bytes).unwrap();

        assert_eq!(decoded.id, 2);
        assert_eq!(decoded.thanked, Some(FieldValue::from("yes")));
    }

    #[test]
    fn test_invalid_bytes() {
        let result = deserialize_record(1, b"not json");
        assert!(matches!(
            result,
            Err(SerializationError::DeserializeFailed(_))
        ));
    }

    #[test]
    fn test_stored_value_missing_field() {
        let result = deserialize_record(1, br#"{"gift": "Pen"}"#);
        assert_eq!(
            result,
            Err(SerializationError::DeserializeFailed(
                "record 1: Invalid data: missing gifter".to_string()
            ))
        );
    }
}
