//! Small numeric helpers shared by every aggregation step.

/// Median of a sequence: the middle element for odd counts, the mean of
/// the two middle elements for even counts. `None` for empty input.
#[must_use]
pub fn median(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut sorted: Vec<f64> = values.into_iter().collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Fractional change from `base` to `current`.
///
/// `None` when the base is zero — the caller reports the delta as
/// undefined instead of propagating an infinity to the display layer.
#[must_use]
pub fn percent_change(base: f64, current: f64) -> Option<f64> {
    if base.abs() < f64::EPSILON {
        return None;
    }
    Some((current - base) / base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_of_odd_count() {
        assert_eq!(median([3.0, 1.0, 2.0]), Some(2.0));
    }

    #[test]
    fn median_of_even_count_averages_middles() {
        assert_eq!(median([4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn median_of_single_value() {
        assert_eq!(median([150.0]), Some(150.0));
    }

    #[test]
    fn median_of_empty_input() {
        assert_eq!(median([]), None);
    }

    #[test]
    fn percent_change_basic() {
        let change = percent_change(200.0, 225.0).unwrap();
        assert!((change - 0.125).abs() < 1e-12);
    }

    #[test]
    fn percent_change_negative() {
        let change = percent_change(200.0, 150.0).unwrap();
        assert!((change + 0.25).abs() < 1e-12);
    }

    #[test]
    fn percent_change_zero_base_is_undefined() {
        assert_eq!(percent_change(0.0, 150.0), None);
    }
}
