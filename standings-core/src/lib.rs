//! Standings Core — domain types and the performance metrics engine.
//!
//! This crate contains the pure computation behind the competition dashboard:
//! - Domain types (time points, time series, metrics records)
//! - Lenient parsing of raw points from untrusted JSON
//! - Sanitizer, returns, drawdown, Sharpe/Sortino/Calmar calculators
//! - `compute_metrics`, the per-entity aggregator that never fails
//!
//! No I/O and no shared state: every call is independent of every other.

pub mod domain;
pub mod metrics;

pub use domain::{finite_or_zero, series_from_json, MetricsRecord, TimePoint, TimeSeries};
pub use metrics::compute_metrics;
