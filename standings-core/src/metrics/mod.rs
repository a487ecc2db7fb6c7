//! Performance metrics — pure functions from a value series to risk/return statistics.
//!
//! Pipeline per entity:
//! raw series → `sanitize` → {`period_returns`, `max_drawdown_pct`}
//! → {`sharpe`, `sortino`} and `calmar` → `MetricsRecord`.
//!
//! `compute_metrics` is the entry point. It never fails: degenerate inputs
//! produce zeroed fields, and a panic inside the pipeline is contained and
//! reported as a zeroed record for that entity only. Containment does not
//! silence the panic hook: with the default hook a contained panic shows up
//! both as the hook's stderr line and as the structured warning.

pub mod drawdown;
pub mod ratios;
pub mod returns;
pub mod sanitize;

use std::panic::{self, AssertUnwindSafe};

use crate::domain::{finite_or_zero, MetricsRecord, TimePoint};

pub use drawdown::max_drawdown_pct;
pub use ratios::{calmar, sharpe, sortino, TRADING_DAYS_PER_YEAR};
pub use returns::period_returns;
pub use sanitize::sanitize;

/// Compute all metrics for one entity from its current series snapshot.
///
/// Idempotent: identical input yields bit-identical output.
pub fn compute_metrics(entity_id: &str, series: &[TimePoint]) -> MetricsRecord {
    guarded(entity_id, series, compute_unguarded)
}

/// Run `compute` for one entity, containing any panic.
///
/// A panic yields the short-series record for `series` and a `warn!` event.
/// The process-wide panic hook still runs first, so the default hook also
/// prints its `thread panicked at` line to stderr; installing a custom hook
/// is left to the binary.
fn guarded<F>(entity_id: &str, series: &[TimePoint], compute: F) -> MetricsRecord
where
    F: FnOnce(&str, &[TimePoint]) -> MetricsRecord,
{
    match panic::catch_unwind(AssertUnwindSafe(|| compute(entity_id, series))) {
        Ok(record) => record,
        Err(payload) => {
            tracing::warn!(
                entity_id = %entity_id,
                points = series.len(),
                reason = %panic_message(payload.as_ref()),
                "metrics computation failed, reporting zeroed record"
            );
            short_series_record(entity_id, series)
        }
    }
}

fn compute_unguarded(entity_id: &str, series: &[TimePoint]) -> MetricsRecord {
    if series.len() < 2 {
        return short_series_record(entity_id, series);
    }

    let clean = sanitize(series);
    if clean.len() < series.len() {
        tracing::debug!(
            entity_id = %entity_id,
            dropped = series.len() - clean.len(),
            "dropped invalid points"
        );
    }

    if clean.len() < 2 {
        let only = clean.first().copied().unwrap_or(0.0);
        return MetricsRecord::zeroed(entity_id, only, only);
    }
    let starting = clean[0];
    let current = clean[clean.len() - 1];

    let total_return = if starting != 0.0 {
        ((current - starting) / starting) * 100.0
    } else {
        0.0
    };

    let returns = period_returns(&clean);
    let max_drawdown = max_drawdown_pct(&clean);

    MetricsRecord {
        entity_id: entity_id.to_string(),
        total_return: finite_or_zero(total_return),
        max_drawdown: finite_or_zero(max_drawdown),
        sharpe_ratio: finite_or_zero(sharpe(&returns)),
        sortino_ratio: finite_or_zero(sortino(&returns)),
        calmar_ratio: finite_or_zero(calmar(total_return, max_drawdown)),
        current_value: finite_or_zero(current),
        starting_value: finite_or_zero(starting),
    }
}

/// Zeroed record taking its endpoints from the raw points.
fn short_series_record(entity_id: &str, series: &[TimePoint]) -> MetricsRecord {
    let first = series.first().and_then(|p| p.value).unwrap_or(0.0);
    let last = series.last().and_then(|p| p.value).unwrap_or(0.0);
    MetricsRecord::zeroed(entity_id, first, last)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
