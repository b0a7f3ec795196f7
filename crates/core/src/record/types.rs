use std::fmt;

use serde::Serialize;

/// The value of a queryable record attribute.
///
/// `thanked` may arrive either as text ("yes", "no") or as a JSON boolean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    /// Compares a stored value against a query value.
    ///
    /// Text compares case-insensitively; anything else must match exactly.
    pub fn matches(&self, query: &FieldValue) -> bool {
        match self {
            FieldValue::Text(stored) => text_matches(stored, query),
            FieldValue::Flag(_) => self == query,
        }
    }
}

/// Case-insensitive comparison of stored text against a query value.
fn text_matches(stored: &str, query: &FieldValue) -> bool {
    match query {
        FieldValue::Text(wanted) => stored.to_lowercase() == wanted.to_lowercase(),
        FieldValue::Flag(_) => false,
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Flag(flag) => write!(f, "{flag}"),
            FieldValue::Text(text) => f.write_str(text),
        }
    }
}

/// Attributes a record can be searched by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Gift,
    Gifter,
    Thanked,
}

impl RecordField {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordField::Gift => "gift",
            RecordField::Gifter => "gifter",
            RecordField::Thanked => "thanked",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A gift and whether its giver has been thanked.
///
/// `id == 0` means the record has not been persisted yet. The repository
/// assigns a positive id on the first save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GiftRecord {
    pub id: u64,
    pub gift: Option<String>,
    pub gifter: Option<String>,
    pub thanked: Option<FieldValue>,
}

impl GiftRecord {
    /// Creates an unsaved record for the given gift.
    pub fn new(gift: impl Into<String>) -> Self {
        Self {
            gift: Some(gift.into()),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn with_gifter(mut self, gifter: impl Into<String>) -> Self {
        self.gifter = Some(gifter.into());
        self
    }

    pub fn with_thanked(mut self, thanked: impl Into<FieldValue>) -> Self {
        self.thanked = Some(thanked.into());
        self
    }

    /// Returns true if the given attribute is set and matches `query`.
    ///
    /// An unset attribute never matches.
    pub fn matches(&self, field: RecordField, query: &FieldValue) -> bool {
        match field {
            RecordField::Gift => self
                .gift
                .as_deref()
                .is_some_and(|gift| text_matches(gift, query)),
            RecordField::Gifter => self
                .gifter
                .as_deref()
                .is_some_and(|gifter| text_matches(gifter, query)),
            RecordField::Thanked => self
                .thanked
                .as_ref()
                .is_some_and(|thanked| thanked.matches(query)),
        }
    }
}
