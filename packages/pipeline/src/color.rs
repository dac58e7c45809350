//! Equal-width color binning for the choropleth.
//!
//! The observed price/SF range is partitioned into four equal-width bins
//! mapped onto a light-to-dark four-color palette. Ties at interior bin
//! edges go to the lower bin, the range minimum lands in the first bin,
//! and the range maximum lands in the last — no value is ever dropped at
//! an edge. A zero-width range (all values equal) collapses to the first
//! bin rather than erroring.

/// Choropleth fill palette, lightest to darkest.
pub const PALETTE: [[u8; 3]; 4] = [
    [151, 163, 171], // #97a3ab
    [102, 120, 131], // #667883
    [55, 80, 93],    // #37505d
    [2, 43, 58],     // #022b3a
];

/// Assigns `value` to one of four equal-width bins over `[min, max]`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn bin_index(value: f64, min: f64, max: f64) -> u8 {
    let span = max - min;
    if span <= 0.0 {
        return 0;
    }
    let position = (value - min) / span * 4.0;
    // ceil - 1 puts edge ties in the lower bin; the clamp catches the
    // range minimum (position 0) and anything outside [min, max].
    position.ceil().clamp(1.0, 4.0) as u8 - 1
}

/// RGB fill color for a bin index.
#[must_use]
pub const fn fill_color(bin: u8) -> [u8; 3] {
    let idx = if (bin as usize) < PALETTE.len() {
        bin as usize
    } else {
        PALETTE.len() - 1
    };
    PALETTE[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_bins_over_a_simple_range() {
        // Edges at [100, 137.5, 175, 212.5, 250]
        assert_eq!(bin_index(100.0, 100.0, 250.0), 0);
        assert_eq!(bin_index(150.0, 100.0, 250.0), 1);
        assert_eq!(bin_index(200.0, 100.0, 250.0), 2);
        assert_eq!(bin_index(250.0, 100.0, 250.0), 3);
    }

    #[test]
    fn upper_edge_is_included_in_the_last_bin() {
        // The maximum is never dropped as an out-of-range duplicate edge
        assert_eq!(bin_index(250.0, 100.0, 250.0), 3);
    }

    #[test]
    fn interior_edge_ties_go_to_the_lower_bin() {
        assert_eq!(bin_index(137.5, 100.0, 250.0), 0);
        assert_eq!(bin_index(175.0, 100.0, 250.0), 1);
        assert_eq!(bin_index(212.5, 100.0, 250.0), 2);
    }

    #[test]
    fn degenerate_range_collapses_to_one_bin() {
        assert_eq!(bin_index(180.0, 180.0, 180.0), 0);
    }

    #[test]
    fn values_outside_the_range_are_clamped() {
        assert_eq!(bin_index(50.0, 100.0, 250.0), 0);
        assert_eq!(bin_index(300.0, 100.0, 250.0), 3);
    }

    #[test]
    fn palette_runs_light_to_dark() {
        assert_eq!(fill_color(0), [151, 163, 171]);
        assert_eq!(fill_color(3), [2, 43, 58]);
        // Out-of-range bins clamp to the darkest color
        assert_eq!(fill_color(9), [2, 43, 58]);
    }
}
