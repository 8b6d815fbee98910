//! Interquartile-range trimming of coverage spikes
//!
//! Only the top end is tested: each round compares the largest value against
//! the mean, using `1.5 * IQR` as the allowed distance. Low outliers are
//! never removed.

use super::CoveragePoint;

/// Multiple of the IQR a maximum may sit above the mean
pub const OUTLIER_FACTOR: f64 = 1.5;

/// Quartile `q` (1..=3) of points sorted ascending by value
///
/// The quartile index is `len * q / 4`. A whole index is read directly,
/// otherwise the values at its floor and ceiling are averaged. A ceiling past
/// the end reads the last point.
pub fn quartile(values: &[CoveragePoint], q: u8) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let last = values.len() - 1;
    let index = values.len() as f64 * f64::from(q) / 4.0;

    if index.fract() == 0.0 {
        return values[(index as usize).min(last)].value;
    }

    let lower = (index.floor() as usize).min(last);
    let upper = (index.ceil() as usize).min(last);

    (values[lower].value + values[upper].value) / 2.0
}

/// Drop the largest values until the maximum is no longer an outlier
///
/// `values` must be sorted ascending by value. The result is a prefix of the
/// input; at least one point is kept when the input is non-empty.
pub fn trim_outliers_by_iqr(values: &[CoveragePoint]) -> &[CoveragePoint] {
    let mut end = values.len();

    while end > 1 {
        let window = &values[..end];
        let threshold = OUTLIER_FACTOR * (quartile(window, 3) - quartile(window, 1));
        let max = window[end - 1].value;

        if max - mean(window) <= threshold {
            break;
        }

        end -= 1;
    }

    if end < values.len() {
        log::debug!("Trimmed {} outlying coverage points", values.len() - end);
    }

    &values[..end]
}

// Summed afresh for every window so removals never accumulate rounding error
fn mean(window: &[CoveragePoint]) -> f64 {
    window.iter().map(|p| p.value).sum::<f64>() / window.len() as f64
}
