//! The JSON mapping contract for [`GiftRecord`].
//!
//! A record maps to a flat object with exactly `id`, `gift`, `gifter` and
//! `thanked`. Reading one back requires an object carrying all three data
//! fields; their values may be null. Any `id` in the input is ignored, since
//! the id always comes from the storage key.

use serde_json::{json, Map, Value};

use super::{FieldValue, GiftRecord, ValidationError};

impl GiftRecord {
    /// Serializes the record into its flat JSON object.
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "gift": self.gift,
            "gifter": self.gifter,
            "thanked": self.thanked,
        })
    }

    /// Builds an unsaved record (`id == 0`) from a JSON object.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::Malformed`] if `value` is not an object.
    /// - [`ValidationError::MissingField`] naming the first absent field.
    /// - [`ValidationError::InvalidType`] if a field holds an unsupported type.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let object = as_object(value)?;

        Ok(Self {
            id: 0,
            gift: optional_text(required(object, "gift")?, "gift")?,
            gifter: optional_text(required(object, "gifter")?, "gifter")?,
            thanked: optional_field_value(required(object, "thanked")?, "thanked")?,
        })
    }
}

/// Reads the `thanked` field of an update payload.
///
/// The field must be present; null clears it.
pub fn thanked_from_json(value: &Value) -> Result<Option<FieldValue>, ValidationError> {
    let object = as_object(value)?;
    optional_field_value(required(object, "thanked")?, "thanked")
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, ValidationError> {
    value.as_object().ok_or(ValidationError::Malformed)
}

fn required<'a>(object: &'a Map<String, Value>, name: &str) -> Result<&'a Value, ValidationError> {
    object
        .get(name)
        .ok_or_else(|| ValidationError::MissingField(name.to_string()))
}

fn optional_text(value: &Value, name: &str) -> Result<Option<String>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        _ => Err(ValidationError::InvalidType {
            field: name.to_string(),
            expected: "a string",
        }),
    }
}

fn optional_field_value(value: &Value, name: &str) -> Result<Option<FieldValue>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(FieldValue::Text(text.clone()))),
        Value::Bool(flag) => Ok(Some(FieldValue::Flag(*flag))),
        _ => Err(ValidationError::InvalidType {
            field: name.to_string(),
            expected: "a string or boolean",
        }),
    }
}
