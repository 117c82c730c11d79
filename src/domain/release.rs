use serde::Deserialize;
use serde_json::Value;

/// An entry from the remote release listing.
///
/// Only the tag name is read. Entries without a string `tag_name` are kept
/// with `tag_name: None` so that a single odd entry does not fail the listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ReleaseRecord {
    pub tag_name: Option<String>,
}

impl ReleaseRecord {
    pub fn new(tag_name: impl Into<String>) -> Self {
        ReleaseRecord {
            tag_name: Some(tag_name.into()),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        ReleaseRecord {
            tag_name: value
                .get("tag_name")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_reads_tag_name() {
        let record =
            ReleaseRecord::from_value(&json!({"tag_name": "standalone-v1.0-build1", "id": 7}));
        assert_eq!(record.tag_name.as_deref(), Some("standalone-v1.0-build1"));
    }

    #[test]
    fn test_from_value_tolerates_odd_entries() {
        assert_eq!(ReleaseRecord::from_value(&json!({"tag_name": 3})).tag_name, None);
        assert_eq!(ReleaseRecord::from_value(&json!({})).tag_name, None);
        assert_eq!(ReleaseRecord::from_value(&json!("just a string")).tag_name, None);
    }
}
