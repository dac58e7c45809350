//! Numeric field cleaning for the county extract.
//!
//! The raw CSV writes numbers the way the assessor's site displays them:
//! thousands separators in numeric columns, a leading `$` in price columns.
//! Both are stripped before parsing.

use std::sync::LazyLock;

use regex::Regex;

/// Currency symbols and thousands separators stripped from numeric text.
static NUMERIC_JUNK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[$,]").expect("valid regex"));

/// Parses a numeric field, stripping `$` and thousands separators first.
///
/// Returns `None` for empty, unparseable, or non-finite values.
#[must_use]
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let cleaned = NUMERIC_JUNK_RE.replace_all(raw.trim(), "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok().filter(|v: &f64| v.is_finite())
}

/// Parses an integer field, stripping thousands separators first.
#[must_use]
pub fn parse_int(raw: &str) -> Option<i32> {
    let cleaned = NUMERIC_JUNK_RE.replace_all(raw.trim(), "");
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_currency_formatting() {
        assert_eq!(parse_numeric("$410,000"), Some(410_000.0));
        assert_eq!(parse_numeric("$187.5"), Some(187.5));
    }

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(parse_numeric("2,500"), Some(2500.0));
        assert_eq!(parse_int("2,500"), Some(2500));
    }

    #[test]
    fn passes_plain_numbers_through() {
        assert_eq!(parse_numeric("1995"), Some(1995.0));
        assert_eq!(parse_int("1995"), Some(1995));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_numeric("n/a"), None);
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("$"), None);
        assert_eq!(parse_int("12.5"), None);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(parse_numeric("  $1,200 "), Some(1200.0));
    }
}
