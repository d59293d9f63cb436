//! Text validators shared by commands, options, and choices.
//!
//! Names follow Discord's `CHAT_INPUT` naming rule: 1 to
//! [`MAX_NAME_LENGTH`] characters drawn from letters, digits, `-`, `_`, and the
//! Devanagari and Thai scripts, with no character that has a distinct
//! lowercase form. Descriptions only carry a length limit.
//!
//! # Examples
//!
//! ```
//! use slash_schema_core::{validate_description, validate_name};
//!
//! assert!(validate_name("ping", "name").is_ok());
//! assert!(validate_name("Ping", "name").is_err());
//! assert!(validate_description("Replies with pong", "description").is_ok());
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::Locale;
use crate::error::{Result, SchemaError};

/// Max allowed length of a command or option name.
pub const MAX_NAME_LENGTH: usize = 32;
/// Max allowed length of a description or choice name.
pub const MAX_DESCRIPTION_LENGTH: usize = 100;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-_\p{L}\p{N}\p{Devanagari}\p{Thai}]+$").expect("static regex must compile")
});

/// Checks a string is non-blank and at most `max` characters long.
///
/// `field` names the value in error messages.
pub fn check_length<'a>(value: &'a str, max: usize, field: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(SchemaError::InvalidFormat(format!("{field} must not be blank")));
    }
    if value.chars().count() > max {
        return Err(SchemaError::LengthExceeded(format!(
            "{field} must not exceed {max} characters"
        )));
    }
    Ok(value)
}

/// Validates a command or option name.
///
/// # Errors
///
/// Returns [`SchemaError::LengthExceeded`] when longer than
/// [`MAX_NAME_LENGTH`], and [`SchemaError::InvalidFormat`] when blank, when
/// a character falls outside the allowed classes, or when the name differs
/// from its own lowercase form.
pub fn validate_name<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    check_length(value, MAX_NAME_LENGTH, field)?;

    if !NAME_PATTERN.is_match(value) {
        return Err(SchemaError::InvalidFormat(format!(
            "{field} must contain only letters, digits, '-' and '_'"
        )));
    }

    if value.to_lowercase() != value {
        return Err(SchemaError::InvalidFormat(format!(
            "{field} must not contain uppercase letters, or letters that have a lowercase variant"
        )));
    }

    Ok(value)
}

/// Validates a description, or a choice name.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidFormat`] when blank and
/// [`SchemaError::LengthExceeded`] when longer than
/// [`MAX_DESCRIPTION_LENGTH`].
pub fn validate_description<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    check_length(value, MAX_DESCRIPTION_LENGTH, field)
}

/// Validates every value of a name localization map.
pub(crate) fn validate_name_localizations(map: &BTreeMap<Locale, String>) -> Result<()> {
    for (locale, value) in map {
        validate_name(value, &format!("name for locale {locale}"))?;
    }
    Ok(())
}

/// Validates every value of a description-like localization map.
pub(crate) fn validate_description_localizations(
    map: &BTreeMap<Locale, String>,
    what: &str,
) -> Result<()> {
    for (locale, value) in map {
        validate_description(value, &format!("{what} for locale {locale}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_accepts_lowercase_and_separators() {
        for name in ["ping", "set-age", "max_users", "v2", "a"] {
            assert!(validate_name(name, "name").is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_name_accepts_caseless_scripts() {
        for name in ["नमस्ते", "สวัสดี", "日本語", "한국어"] {
            assert!(validate_name(name, "name").is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_name_rejects_uppercase() {
        let err = validate_name("Hello", "name").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidFormat(_)));

        let err = validate_name("straße-Ä", "name").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidFormat(_)));
    }

    #[test]
    fn test_name_rejects_spaces_and_punctuation() {
        for name in ["two words", "dot.name", "slash/name", "emoji🚀"] {
            let err = validate_name(name, "name").unwrap_err();
            assert!(matches!(err, SchemaError::InvalidFormat(_)), "{name}");
        }
    }

    #[test]
    fn test_name_length_limits() {
        assert!(validate_name(&"a".repeat(32), "name").is_ok());
        let err = validate_name(&"a".repeat(33), "name").unwrap_err();
        assert_eq!(
            err,
            SchemaError::LengthExceeded("name must not exceed 32 characters".to_string())
        );
        assert!(matches!(
            validate_name("", "name").unwrap_err(),
            SchemaError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_description_limits() {
        assert!(validate_description(&"x".repeat(100), "description").is_ok());
        assert!(matches!(
            validate_description(&"x".repeat(101), "description").unwrap_err(),
            SchemaError::LengthExceeded(_)
        ));
        assert!(matches!(
            validate_description("   ", "description").unwrap_err(),
            SchemaError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_localized_field_names_in_messages() {
        let mut map = BTreeMap::new();
        map.insert(Locale::French, "d".repeat(101));
        let err = validate_description_localizations(&map, "description").unwrap_err();
        assert_eq!(
            err.to_string(),
            "length exceeded: description for locale fr must not exceed 100 characters"
        );
    }
}
