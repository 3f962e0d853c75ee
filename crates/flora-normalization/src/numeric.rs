//! Numeric normalization utilities.

use std::sync::LazyLock;

use regex::Regex;

static FLOAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?|\.\d+").expect("FLOAT_RE regex is invalid"));

/// Parses a positive float after stripping every character that is not a
/// digit or a dot. Empty or malformed input yields `None`.
pub fn to_positive_float(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Parses a positive integer after stripping every non-digit character.
/// Values with a fractional part are not integers and yield `None`.
pub fn to_positive_int(value: &str) -> Option<i64> {
    if value.contains('.') {
        return None;
    }
    let cleaned: String = value.chars().filter(char::is_ascii_digit).collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<i64>().ok()
}

/// Numeric substrings of a range token, in textual order.
pub fn number_strings(text: &str) -> Vec<&str> {
    FLOAT_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Rounds to 3 decimal places.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Formats a floating-point number without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_to_positive_float_strips_noise() {
        assert_eq!(to_positive_float("(12–"), Some(12.0));
        assert_eq!(to_positive_float("–3.5)"), Some(3.5));
        assert_eq!(to_positive_float("cm"), None);
        assert_eq!(to_positive_float(""), None);
        assert_eq!(to_positive_float("1.2.3"), None);
    }

    #[test]
    fn test_to_positive_int_rejects_fractions() {
        assert_eq!(to_positive_int("5"), Some(5));
        assert_eq!(to_positive_int("(–12)"), Some(12));
        assert_eq!(to_positive_int("2.5"), None);
        assert_eq!(to_positive_int("-"), None);
    }

    #[test]
    fn test_number_strings_in_ranges() {
        assert_eq!(number_strings("(12-)23-34"), vec!["12", "23", "34"]);
        assert_eq!(number_strings("[5–]7–25[–32]"), vec!["5", "7", "25", "32"]);
        assert_eq!(number_strings("1.5–5(–7)"), vec!["1.5", "5", "7"]);
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(10.0), "10");
        assert_eq!(format_numeric(10.5), "10.5");
        assert_eq!(format_numeric(0.001), "0.001");
    }

    proptest! {
        #[test]
        fn round3_is_idempotent(value in 0.0f64..100_000.0) {
            let once = round3(value);
            prop_assert_eq!(round3(once), once);
        }
    }
}
