//! Period-over-period fractional returns.

/// Fractional returns `(v[i] - v[i-1]) / v[i-1]` for each adjacent pair.
///
/// Pairs with a zero or non-finite base, a non-finite value, or a non-finite
/// ratio are skipped rather than replaced, so the output may be shorter
/// than `values.len() - 1`.
pub fn period_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter_map(|w| {
            let (prev, next) = (w[0], w[1]);
            if prev == 0.0 || !prev.is_finite() || !next.is_finite() {
                return None;
            }
            let r = (next - prev) / prev;
            r.is_finite().then_some(r)
        })
        .collect()
}
