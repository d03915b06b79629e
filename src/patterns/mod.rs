//! Named regular-expression catalogue
//!
//! A static library of pre-built patterns for common formats, exposed to
//! schema authors for populating `pattern`/`format_regex` attributes. The
//! core's built-in `format` resolution does not consult this catalogue; it
//! has its own small fixed set in `validate`.
//!
//! Password-strength tiers above `weakPassword` need lookahead and are not
//! expressible here; that check lives in the validation engine as a
//! predicate.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Pattern lookup errors.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("unknown pattern name '{0}' and no override pattern supplied")]
    UnknownPattern(String),

    #[error("invalid override pattern: {0}")]
    InvalidOverride(#[from] regex::Error),
}

const ENTRIES: &[(&str, &str)] = &[
    // --- Common data formats ---
    (
        "email",
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    ),
    ("phone", r"^[+]?[\d\s\-()]+$"),
    (
        "url",
        r"(?i)^(?:(?:https?|ftp)://)?(?:www\.)?(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}(?:/\S*)?$",
    ),
    (
        "uuid",
        r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
    ),
    (
        "guid",
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    ),
    ("zip", r"^\d{5}(?:[-\s]\d{4})?$"),
    ("ip", r"^(25[0-5]|2[0-4]\d|[01]?\d\d?)(\.(25[0-5]|2[0-4]\d|[01]?\d\d?)){3}$"),
    ("macAddress", r"^([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})$"),
    ("date", r"^\d{4}-\d{2}-\d{2}$"),
    ("time", r"^\d{2}:\d{2}(:\d{2})?$"),
    (
        "creditCard",
        r"^(?:4[0-9]{12}(?:[0-9]{3})?|5[1-5][0-9]{14}|3[47][0-9]{13}|6(?:011|5[0-9]{2})[0-9]{12})$",
    ),
    ("hexColor", r"^#?([a-fA-F0-9]{6}|[a-fA-F0-9]{3})$"),
    (
        "rgb",
        r"^rgb\(\s*(0|[1-9]\d{0,2})\s*,\s*(0|[1-9]\d{0,2})\s*,\s*(0|[1-9]\d{0,2})\s*\)$",
    ),
    (
        "jwt",
        r"^[A-Za-z0-9_=-]+\.[A-Za-z0-9_=-]+\.?[A-Za-z0-9_.+/=-]*$",
    ),
    (
        "semver",
        r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
    ),
    // --- String patterns ---
    ("alphanumeric", r"^[A-Za-z0-9]+$"),
    ("alpha", r"^[A-Za-z]+$"),
    ("decimal", r"^[+-]?(\d*\.)?\d+$"),
    (
        "base64",
        r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$",
    ),
    ("lowercase", r"^[a-z]+$"),
    ("uppercase", r"^[A-Z]+$"),
    ("weakPassword", r"^.{4,}$"),
    ("username", r"^[a-zA-Z0-9_-]{3,20}$"),
    ("hashtag", r"^#[a-zA-Z0-9_]+$"),
    ("creditCardExpiry", r"^(0[1-9]|1[0-2])/([0-9]{2}|[0-9]{4})$"),
    ("cvv", r"^\d{3,4}$"),
    ("ssn", r"^\d{3}-\d{2}-\d{4}$"),
    ("socialSecurityNumber", r"^\d{3}[- ]?\d{2}[- ]?\d{4}$"),
    ("canadianPostalCode", r"^[A-Za-z]\d[A-Za-z]\s?\d[A-Za-z]\d$"),
    (
        "ukPostcode",
        r"^([Gg][Ii][Rr]0[Aa]{2})|((([A-Za-z][0-9]{1,2})|(([A-Za-z][A-Ha-hJ-Yj-y][0-9]{1,2})|(([A-Za-z][0-9][A-Za-z])|([A-Za-z][A-Ha-hJ-Yj-y][0-9]?[A-Za-z]))))\s?[0-9][A-Za-z]{2})$",
    ),
    // --- Numeric patterns ---
    ("integer", r"^-?\d+$"),
    ("positiveInteger", r"^[1-9]\d*$"),
    ("negativeInteger", r"^-[1-9]\d*$"),
    ("nonNegativeInteger", r"^(0|[1-9]\d*)$"),
    ("nonPositiveInteger", r"^(0|-[1-9]\d*)$"),
    ("float", r"^-?\d*\.\d+$"),
    ("positiveFloat", r"^[1-9]?\d*\.\d+$"),
    ("negativeFloat", r"^-\d*\.\d+$"),
    (
        "percentage",
        r"^(100(\.0{0,2})?|[0-9]{1,2}(\.[0-9]{0,2})?)%?$",
    ),
    (
        "port",
        r"^([0-9]{1,4}|[1-5][0-9]{4}|6[0-4][0-9]{3}|65[0-4][0-9]{2}|655[0-2][0-9]|6553[0-5])$",
    ),
    ("year", r"^\d{4}$"),
    ("month", r"^(0[1-9]|1[0-2])$"),
    ("day", r"^(0[1-9]|[12]\d|3[01])$"),
    ("hour", r"^(0\d|1\d|2[0-3])$"),
    ("minute", r"^[0-5]\d$"),
    ("second", r"^[0-5]\d$"),
    // --- Text content patterns ---
    ("words", r"^[a-zA-Z\s'-]+$"),
    ("sentence", r"^[A-Z][\s\S]*[.?!]$"),
    ("paragraph", r"([A-Z][\s\S]*[.?!]\s*)+"),
    ("creditCardNumber", r"^[\d\s-]+$"),
    ("alphaSpace", r"^[a-zA-Z\s]+$"),
    ("alphanumericSpace", r"^[a-zA-Z0-9\s]+$"),
    ("filename", r"^[a-zA-Z0-9_.-]+$"),
    ("fileExtension", r"^[a-zA-Z0-9]{2,4}$"),
    // --- Location / geographic patterns ---
    ("latitude", r"^[-+]?([1-8]?\d(\.\d+)?|90(\.0+)?)$"),
    (
        "longitude",
        r"^[-+]?(180(\.0+)?|((1[0-7]\d)|([1-9]?\d))(\.\d+)?)$",
    ),
    ("postalCode", r"^[a-zA-Z0-9\s-]+$"),
    ("countryCode", r"^[A-Z]{2}$"),
    ("currencySymbol", r"^[$€£¥]$"),
    // --- Social / online patterns ---
    ("twitterHandle", r"^@[a-zA-Z0-9_]+$"),
    ("instagramUsername", r"^[a-zA-Z0-9_.]{3,30}$"),
    ("githubUsername", r"^[a-zA-Z0-9-]{1,39}$"),
    (
        "domainName",
        r"^(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}$",
    ),
    // --- Identifiers ---
    ("ean13", r"^\d{13}$"),
    ("isbn10", r"^(?:ISBN(?:-10)?:? ?)?([0-9]{9}[0-9X])$"),
    ("isbn13", r"^(?:ISBN(?:-13)?:? ?)?([0-9]{13})$"),
    ("timezoneOffset", r"^([+-](?:2[0-3]|[01]?[0-9]):[0-5][0-9]|Z)$"),
    ("mimeType", r"^[-\w.]+/[-\w.+]+$"),
    ("languageCode", r"^[a-z]{2}$"),
    ("countryLanguageCode", r"^[a-z]{2}-[A-Z]{2}$"),
    // --- Whitespace / misc ---
    ("notEmpty", r"\S+"),
    ("whitespace", r"^\s*$"),
    ("yearMonth", r"^\d{4}-\d{2}$"),
    ("monthDay", r"^\d{2}-\d{2}$"),
    ("timeMilliseconds", r"^\d{2}:\d{2}:\d{2}\.\d{3}$"),
];

static CATALOGUE: LazyLock<HashMap<&'static str, Regex>> = LazyLock::new(|| {
    ENTRIES
        .iter()
        .map(|(name, pattern)| (*name, Regex::new(pattern).expect("valid catalogue pattern")))
        .collect()
});

/// Looks up a catalogue pattern by name.
pub fn lookup(name: &str) -> Option<&'static Regex> {
    CATALOGUE.get(name)
}

/// All catalogue pattern names.
pub fn names() -> impl Iterator<Item = &'static str> {
    CATALOGUE.keys().copied()
}

/// Resolves a pattern: an explicit override wins, then the catalogue.
/// Unknown names with no override are an error.
pub fn build_regex(name: &str, override_pattern: Option<&str>) -> Result<Regex, PatternError> {
    if let Some(pattern) = override_pattern {
        return Regex::new(pattern).map_err(PatternError::from);
    }
    lookup(name)
        .cloned()
        .ok_or_else(|| PatternError::UnknownPattern(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_compiles() {
        assert_eq!(CATALOGUE.len(), ENTRIES.len());
    }

    #[test]
    fn spot_checks() {
        assert!(lookup("email").unwrap().is_match("a@b.co"));
        assert!(lookup("phone").unwrap().is_match("+47 22 33 44 55"));
        assert!(lookup("ip").unwrap().is_match("192.168.0.1"));
        assert!(!lookup("ip").unwrap().is_match("256.0.0.1"));
        assert!(lookup("semver").unwrap().is_match("1.2.3-alpha.1+build.5"));
        assert!(lookup("port").unwrap().is_match("65535"));
        assert!(!lookup("port").unwrap().is_match("65536"));
        assert!(lookup("creditCardExpiry").unwrap().is_match("08/26"));
        assert!(lookup("ukPostcode").unwrap().is_match("SW1A 1AA"));
        assert!(lookup("isbn10").unwrap().is_match("ISBN-10: 030640615X"));
        assert!(lookup("timezoneOffset").unwrap().is_match("+02:00"));
        assert!(lookup("timezoneOffset").unwrap().is_match("Z"));
        assert!(lookup("latitude").unwrap().is_match("-89.5"));
        assert!(!lookup("latitude").unwrap().is_match("91"));
    }

    #[test]
    fn override_beats_catalogue_name() {
        let regex = build_regex("email", Some(r"^\d+$")).unwrap();
        assert!(regex.is_match("12345"));
        assert!(!regex.is_match("a@b.co"));
    }

    #[test]
    fn unknown_name_without_override_errors() {
        let error = build_regex("noSuchPattern", None).unwrap_err();
        assert!(matches!(error, PatternError::UnknownPattern(_)));
    }

    #[test]
    fn invalid_override_errors() {
        let error = build_regex("email", Some("(unclosed")).unwrap_err();
        assert!(matches!(error, PatternError::InvalidOverride(_)));
    }

    #[test]
    fn known_name_with_no_override_resolves() {
        let regex = build_regex("uuid", None).unwrap();
        assert!(regex.is_match("123e4567-e89b-42d3-a456-426614174000"));
    }
}
