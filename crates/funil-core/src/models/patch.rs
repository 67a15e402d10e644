//! Helpers for partial-update (PATCH) request bodies.

use serde::{Deserialize, Deserializer};

/// Deserialize a field into `Some(value)` whenever it is present, so that an
/// explicit `null` becomes `Some(None)` while an absent field (via
/// `#[serde(default)]`) stays `None`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trim a free-text value and collapse blank strings to `None`.
pub fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "double_option")]
        description: Option<Option<String>>,
    }

    #[test]
    fn test_double_option_distinguishes_absent_and_null() {
        let absent: Body = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.description, None);

        let null: Body = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(null.description, Some(None));

        let set: Body = serde_json::from_str(r#"{"description":"hot lead"}"#).unwrap();
        assert_eq!(set.description, Some(Some("hot lead".to_string())));
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text(Some("  Sales ".to_string())), Some("Sales".to_string()));
        assert_eq!(clean_text(Some("   ".to_string())), None);
        assert_eq!(clean_text(None), None);
    }
}
