//! Sanitizer: raw series in, finite numeric sequence out.

use crate::domain::TimePoint;

/// Keep only finite values, in order. Timestamps are dropped.
///
/// Empty or fully invalid input yields an empty sequence.
pub fn sanitize(series: &[TimePoint]) -> Vec<f64> {
    series
        .iter()
        .filter_map(|p| p.value)
        .filter(|v| v.is_finite())
        .collect()
}
