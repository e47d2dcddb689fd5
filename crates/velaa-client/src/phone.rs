//! Tanzanian phone number normalization and validation.

use regex::Regex;
use std::sync::LazyLock;

/// Tanzania country calling code, without the leading `+`.
pub const COUNTRY_CODE: &str = "255";

static MOBILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+255[678]\d{8}$").expect("valid mobile pattern"));

static LANDLINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+2552[2-8]\d{7}$").expect("valid landline pattern"));

/// Normalize a phone number to `+255XXXXXXXXX` form.
///
/// Never fails. Inputs that match no known local format are prefixed with
/// the country code as-is, which may yield an invalid number; check with
/// [`is_valid`].
pub fn normalize(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if digits.starts_with(COUNTRY_CODE) {
        format!("+{digits}")
    } else if let Some(local) = digits.strip_prefix('0') {
        format!("+{COUNTRY_CODE}{local}")
    } else if digits.len() == 9 {
        format!("+{COUNTRY_CODE}{digits}")
    } else if digits.len() == 10 && digits.starts_with('2') {
        format!("+{COUNTRY_CODE}{}", &digits[1..])
    } else {
        format!("+{COUNTRY_CODE}{digits}")
    }
}

/// Check whether the number normalizes to a Tanzanian mobile or landline number.
pub fn is_valid(raw: &str) -> bool {
    let normalized = normalize(raw);
    MOBILE_PATTERN.is_match(&normalized) || LANDLINE_PATTERN.is_match(&normalized)
}

/// Group a normalized number for display, e.g. `+255 712 345 678`.
pub fn display_format(raw: &str) -> String {
    let normalized = normalize(raw);
    let Some(subscriber) = normalized.strip_prefix(&format!("+{COUNTRY_CODE}")) else {
        return normalized;
    };

    let groups: Vec<&str> = subscriber
        .as_bytes()
        .chunks(3)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .collect();

    if groups.is_empty() {
        normalized
    } else {
        format!("+{COUNTRY_CODE} {}", groups.join(" "))
    }
}
