//! Standings Runner — competition refresh, ranking, and export.
//!
//! This crate builds on `standings-core` to provide:
//! - TOML dashboard configuration
//! - Series sources (HTTP endpoint, JSON file) behind one trait
//! - Parallel per-entity metrics with cross-refresh memoization
//! - Leaderboard ranking by any metric
//! - Display formatting and JSON/CSV export
//! - Deterministic synthetic competitions for demos and benchmarks

pub mod batch;
pub mod config;
pub mod export;
pub mod format;
pub mod memo;
pub mod ranking;
pub mod refresh;
pub mod report;
pub mod source;
pub mod synthetic;

pub use batch::{compute_all, CompetitionMetrics, EngineOptions};
pub use config::{ConfigError, DashboardConfig};
pub use export::{export_csv, export_json, import_json, load_report, save_report};
pub use format::{format_currency, format_drawdown, format_pct, format_ratio, render_table};
pub use memo::{series_fingerprint, CacheStats, MetricsCache};
pub use ranking::{rank, RankedEntry, RankingMetric, UnknownMetric};
pub use refresh::Refresher;
pub use report::{build_report, MetricsReport, SCHEMA_VERSION};
pub use source::{
    parse_payload, CompetitionSeries, HttpSource, JsonFileSource, QueryWindow, SeriesSource,
    SourceError,
};
pub use synthetic::synthetic_competition;
