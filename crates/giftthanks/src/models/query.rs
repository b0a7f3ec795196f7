use serde::Deserialize;

use giftthanks_core::record::RecordField;
use giftthanks_core::serde::deserialize_optional_string;

/// Query parameters for `GET /data`.
///
/// At most one is honored, in field order. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct DataQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub data_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub gift: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub gifter: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub thanked: Option<String>,
}

impl DataQuery {
    /// The search filter to apply: the first of `gift`, `gifter`, `thanked`
    /// that is present. `data_id` is handled separately.
    pub fn filter(self) -> Option<(RecordField, String)> {
        [
            (RecordField::Gift, self.gift),
            (RecordField::Gifter, self.gifter),
            (RecordField::Thanked, self.thanked),
        ]
        .into_iter()
        .find_map(|(field, value)| value.map(|value| (field, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(gift: Option<&str>, gifter: Option<&str>, thanked: Option<&str>) -> DataQuery {
        DataQuery {
            data_id: None,
            gift: gift.map(str::to_string),
            gifter: gifter.map(str::to_string),
            thanked: thanked.map(str::to_string),
        }
    }

    #[test]
    fn test_filter_precedence() {
        assert_eq!(
            query(Some("Pen"), Some("Amy"), Some("no")).filter(),
            Some((RecordField::Gift, "Pen".to_string()))
        );
        assert_eq!(
            query(None, Some("Amy"), Some("no")).filter(),
            Some((RecordField::Gifter, "Amy".to_string()))
        );
        assert_eq!(
            query(None, None, Some("no")).filter(),
            Some((RecordField::Thanked, "no".to_string()))
        );
        assert_eq!(query(None, None, None).filter(), None);
    }

    #[test]
    fn test_empty_values_are_absent() {
        let query: DataQuery = serde_json::from_str(r#"{"data_id": "", "gift": "Pen"}"#).unwrap();

        assert_eq!(query.data_id, None);
        assert_eq!(query.gift.as_deref(), Some("Pen"));
        assert_eq!(query.gifter, None);
        assert_eq!(query.thanked, None);
    }
}
