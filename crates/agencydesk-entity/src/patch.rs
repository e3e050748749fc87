//! Helpers for partial-update ("patch") structures.
//!
//! Nullable fields in a patch are `Option<Option<T>>`:
//!
//! - `None`: the field was omitted and is left untouched
//! - `Some(None)`: the field was sent as `null` and is cleared
//! - `Some(Some(v))`: the field is set to `v`

use serde::{Deserialize, Deserializer};

use agencydesk_core::AppError;

/// Deserializes a present field (including `null`) into `Some(..)`.
///
/// Pair with `#[serde(default)]` so an absent field stays `None`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trims a required text value and enforces length bounds.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > max {
        return Err(AppError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text value; blank strings become `None`.
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<Option<String>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) if text.chars().count() > max => Err(AppError::validation(format!(
            "{field} must be at most {max} characters"
        ))),
        Some(text) => Ok(Some(text.to_string())),
    }
}

/// Applies [`optional_text`] to a tri-state patch field.
pub fn nullable_text(
    field: &str,
    value: Option<Option<String>>,
    max: usize,
) -> Result<Option<Option<String>>, AppError> {
    match value {
        None => Ok(None),
        Some(inner) => optional_text(field, inner.as_deref(), max).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "nullable")]
        notes: Option<Option<String>>,
    }

    #[test]
    fn test_tri_state_deserialization() {
        let omitted: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(omitted.notes, None);

        let cleared: Probe = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        assert_eq!(cleared.notes, Some(None));

        let set: Probe = serde_json::from_str(r#"{"notes": "hi"}"#).unwrap();
        assert_eq!(set.notes, Some(Some("hi".to_string())));
    }

    #[test]
    fn test_text_normalization() {
        assert_eq!(required_text("name", "  Acme ", 10).unwrap(), "Acme");
        assert!(required_text("name", "   ", 10).is_err());
        assert!(required_text("name", "abcdefghijk", 10).is_err());
        assert_eq!(optional_text("notes", Some("  "), 10).unwrap(), None);
        assert_eq!(
            nullable_text("notes", Some(Some(" x ".into())), 10).unwrap(),
            Some(Some("x".to_string()))
        );
        assert_eq!(nullable_text("notes", None, 10).unwrap(), None);
    }
}
