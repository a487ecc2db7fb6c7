//! Maximum drawdown over a clean series.

/// Largest peak-to-trough decline, as a non-negative percentage.
///
/// Single forward pass with a running peak starting at `values[0]`. A step
/// whose running peak is exactly zero contributes no drawdown.
///
/// Returns 0.0 for empty input and for non-decreasing series.
pub fn max_drawdown_pct(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &v in values {
        peak = peak.max(v);
        if peak == 0.0 {
            continue;
        }
        let dd = (peak - v) / peak;
        if dd > max_dd {
            max_dd = dd;
        }
    }
    max_dd * 100.0
}
