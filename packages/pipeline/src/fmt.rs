//! Display formatting for KPI and tooltip strings.
//!
//! These mirror the dashboard's display formats exactly: whole-dollar
//! price/SF, thousands-separated sale prices and counts, one-decimal
//! percentages. Rounding is round-half-to-even throughout, matching the
//! `{value:.0}` formatter.

/// Whole-dollar amount without grouping, e.g. `"$187"`. Used for price/SF,
/// which never reaches four digits.
#[must_use]
pub fn usd(value: f64) -> String {
    format!("${value:.0}")
}

/// Whole-dollar amount with thousands separators, e.g. `"$410,000"`.
#[must_use]
pub fn usd_grouped(value: f64) -> String {
    format!("${}", grouped(value))
}

/// Whole number with thousands separators, e.g. `"1,234"`.
#[must_use]
pub fn grouped(value: f64) -> String {
    group_digits(&format!("{value:.0}"))
}

/// Count with thousands separators.
#[must_use]
pub fn count(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Whole number without grouping, e.g. a median construction year `"2005"`.
#[must_use]
pub fn year(value: f64) -> String {
    format!("{value:.0}")
}

/// Fraction as a one-decimal percentage, e.g. `0.123` → `"12.3%"`.
#[must_use]
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Inserts thousands separators into an already-formatted integer string.
fn group_digits(digits: &str) -> String {
    let (sign, digits) = digits
        .strip_prefix('-')
        .map_or(("", digits), |rest| ("-", rest));

    let mut grouped = String::with_capacity(sign.len() + digits.len() + digits.len() / 3);
    grouped.push_str(sign);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
