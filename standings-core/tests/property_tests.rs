//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Idempotence — identical input gives bit-identical output
//! 2. Finiteness — every field is finite for arbitrary input, including NaN/±Inf
//! 3. Monotone series — non-decreasing values never draw down
//! 4. Sign alignment — Sharpe follows the sign of uniformly signed returns
//! 5. Sortino — changing only non-negative returns (same mean) leaves it unchanged

use proptest::prelude::*;
use standings_core::metrics::{max_drawdown_pct, sharpe, sortino};
use standings_core::{compute_metrics, TimePoint};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_value() -> impl Strategy<Value = f64> {
    (1.0..1_000_000.0_f64).prop_map(|v| (v * 100.0).round() / 100.0)
}

/// Any f64 including the special values, or a missing value.
fn arb_raw_value() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        6 => arb_value().prop_map(Some),
        1 => Just(Some(f64::NAN)),
        1 => Just(Some(f64::INFINITY)),
        1 => Just(Some(f64::NEG_INFINITY)),
        1 => Just(Some(0.0)),
        1 => any::<f64>().prop_map(Some),
        1 => Just(None),
    ]
}

fn arb_series() -> impl Strategy<Value = Vec<TimePoint>> {
    prop::collection::vec(arb_raw_value(), 0..60).prop_map(|values| {
        values
            .into_iter()
            .enumerate()
            .map(|(i, value)| TimePoint {
                timestamp: format!("2024-05-01T00:{:02}:{:02}Z", i / 60, i % 60),
                value,
            })
            .collect()
    })
}

// ── 1 & 2. Idempotence and finiteness ────────────────────────────────

proptest! {
    #[test]
    fn compute_is_idempotent(series in arb_series()) {
        let a = compute_metrics("team", &series);
        let b = compute_metrics("team", &series);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn every_field_is_finite(series in arb_series()) {
        let m = compute_metrics("team", &series);
        prop_assert!(m.is_finite(), "non-finite record: {:?}", m);
        prop_assert!(m.max_drawdown >= 0.0);
    }
}

// ── 3. Monotone series ───────────────────────────────────────────────

proptest! {
    #[test]
    fn non_decreasing_has_zero_drawdown(
        start in arb_value(),
        steps in prop::collection::vec(0.0..50.0_f64, 0..100),
    ) {
        let mut values = vec![start];
        for step in steps {
            let next = values[values.len() - 1] + step;
            values.push(next);
        }
        prop_assert_eq!(max_drawdown_pct(&values), 0.0);
    }
}

// ── 4. Sign alignment ────────────────────────────────────────────────

proptest! {
    #[test]
    fn positive_returns_give_positive_sharpe(
        returns in prop::collection::vec(0.0001..0.05_f64, 2..50),
    ) {
        prop_assume!(returns.windows(2).any(|w| w[0] != w[1]));
        prop_assert!(sharpe(&returns) > 0.0);
    }

    #[test]
    fn negative_returns_give_negative_sharpe(
        returns in prop::collection::vec(-0.05..-0.0001_f64, 2..50),
    ) {
        prop_assume!(returns.windows(2).any(|w| w[0] != w[1]));
        prop_assert!(sharpe(&returns) < 0.0);
    }

    #[test]
    fn constant_returns_give_zero_sharpe(r in -0.5..0.5_f64, n in 2usize..100) {
        prop_assert_eq!(sharpe(&vec![r; n]), 0.0);
    }
}

// ── 5. Sortino ignores upside shape ──────────────────────────────────

proptest! {
    #[test]
    fn sortino_unchanged_by_upside_redistribution(
        negatives in prop::collection::vec(-0.05..-0.0001_f64, 1..10),
        positives in prop::collection::vec(0.0..0.05_f64, 2..10),
    ) {
        // Move mass between two upside returns: same sum, same count
        let mut shifted = positives.clone();
        let delta = shifted[0] / 2.0;
        shifted[0] -= delta;
        shifted[1] += delta;

        let a: Vec<f64> = negatives.iter().chain(positives.iter()).copied().collect();
        let b: Vec<f64> = negatives.iter().chain(shifted.iter()).copied().collect();

        let (sa, sb) = (sortino(&a), sortino(&b));
        prop_assert!((sa - sb).abs() <= 1e-9 * sa.abs().max(1.0), "{} vs {}", sa, sb);
    }

    #[test]
    fn sortino_zero_without_downside(
        returns in prop::collection::vec(0.0..0.05_f64, 0..50),
    ) {
        prop_assert_eq!(sortino(&returns), 0.0);
    }
}
