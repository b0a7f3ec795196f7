mod error;
mod json;
mod serialization;
mod types;

pub use error::ValidationError;
pub use json::thanked_from_json;
pub use serialization::{deserialize_record, serialize_record, SerializationError};
pub use types::{FieldValue, GiftRecord, RecordField};
