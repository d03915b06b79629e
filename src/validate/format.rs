//! Built-in `format` resolution for string-like fields
//!
//! The core recognizes a small fixed set of format names; anything else is
//! compiled as a regular expression by the caller. The wider named-pattern
//! catalogue lives in `crate::patterns` and is not consulted here.

use std::sync::LazyLock;

use regex::Regex;

// RFC 5322-style address shape
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid regex")
});

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(?:https?|ftp)://)?(?:www\.)?(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}(?:/\S*)?$")
        .expect("valid regex")
});

// UUID versions 1-5
static UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("valid regex")
});

static ALPHA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z]+$").expect("valid regex"));

static ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid regex"));

const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Checks `value` against a built-in format name. Returns `None` when the
/// name is not a built-in (the caller then treats the name as a pattern).
pub(crate) fn matches_builtin(name: &str, value: &str) -> Option<bool> {
    match name {
        "email" => Some(EMAIL.is_match(value)),
        "url" => Some(URL.is_match(value)),
        "uuid" => Some(UUID.is_match(value)),
        "alpha" => Some(ALPHA.is_match(value)),
        "alphanumeric" => Some(ALPHANUMERIC.is_match(value)),
        "password" => Some(is_strong_password(value)),
        _ => None,
    }
}

/// Password format: at least 8 characters drawn from letters, digits and
/// `@$!%*?&`, with at least one lowercase, one uppercase, one digit and one
/// special character.
pub(crate) fn is_strong_password(value: &str) -> bool {
    let mut length = 0usize;
    let mut lower = false;
    let mut upper = false;
    let mut digit = false;
    let mut special = false;
    for c in value.chars() {
        length += 1;
        if c.is_ascii_lowercase() {
            lower = true;
        } else if c.is_ascii_uppercase() {
            upper = true;
        } else if c.is_ascii_digit() {
            digit = true;
        } else if PASSWORD_SPECIALS.contains(c) {
            special = true;
        } else {
            return false;
        }
    }
    length >= 8 && lower && upper && digit && special
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_format() {
        assert_eq!(matches_builtin("email", "alice@example.com"), Some(true));
        assert_eq!(matches_builtin("email", "first.last@sub.example.org"), Some(true));
        assert_eq!(matches_builtin("email", "not-an-email"), Some(false));
        assert_eq!(matches_builtin("email", "a@b@c.com"), Some(false));
    }

    #[test]
    fn url_format() {
        assert_eq!(matches_builtin("url", "https://example.com/path"), Some(true));
        assert_eq!(matches_builtin("url", "www.example.org"), Some(true));
        assert_eq!(matches_builtin("url", "ftp://files.example.com"), Some(true));
        assert_eq!(matches_builtin("url", "no spaces allowed"), Some(false));
    }

    #[test]
    fn uuid_format_rejects_invalid_version_and_variant() {
        assert_eq!(
            matches_builtin("uuid", "123e4567-e89b-42d3-a456-426614174000"),
            Some(true)
        );
        // version nibble 6 is out of range
        assert_eq!(
            matches_builtin("uuid", "123e4567-e89b-62d3-a456-426614174000"),
            Some(false)
        );
        // variant nibble must be 8, 9, a or b
        assert_eq!(
            matches_builtin("uuid", "123e4567-e89b-42d3-c456-426614174000"),
            Some(false)
        );
    }

    #[test]
    fn alpha_and_alphanumeric_formats() {
        assert_eq!(matches_builtin("alpha", "OnlyLetters"), Some(true));
        assert_eq!(matches_builtin("alpha", "letters123"), Some(false));
        assert_eq!(matches_builtin("alphanumeric", "letters123"), Some(true));
        assert_eq!(matches_builtin("alphanumeric", "with space"), Some(false));
    }

    #[test]
    fn unknown_name_is_not_builtin() {
        assert_eq!(matches_builtin("zipCode", "12345"), None);
    }

    #[test]
    fn password_requires_all_character_classes() {
        assert!(is_strong_password("Abcdef1!"));
        assert!(!is_strong_password("abcdef1!")); // no uppercase
        assert!(!is_strong_password("ABCDEF1!")); // no lowercase
        assert!(!is_strong_password("Abcdefg!")); // no digit
        assert!(!is_strong_password("Abcdefg1")); // no special
        assert!(!is_strong_password("Ab1!")); // too short
    }

    #[test]
    fn password_rejects_characters_outside_the_allowed_set() {
        assert!(!is_strong_password("Abcdef1! ")); // space not allowed
        assert!(!is_strong_password("Abcdef1#")); // '#' not in the special set
    }
}
