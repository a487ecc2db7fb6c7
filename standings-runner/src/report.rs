//! Ranked metrics report — the unit a refresh produces and export persists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::batch::{compute_all, EngineOptions};
use crate::ranking::{rank, RankedEntry, RankingMetric};
use crate::source::CompetitionSeries;

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Metrics for every entity of a competition, ranked by one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub computed_at: DateTime<Utc>,
    pub metric: RankingMetric,
    pub entries: Vec<RankedEntry>,
}

/// Default schema version for reports written before the field existed.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl MetricsReport {
    pub fn new(metric: RankingMetric, entries: Vec<RankedEntry>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            computed_at: Utc::now(),
            metric,
            entries,
        }
    }

    /// The same entries re-ranked by another metric.
    pub fn reranked(&self, metric: RankingMetric) -> Self {
        let entries = rank(self.entries.iter().map(|e| &e.record), metric);
        Self {
            schema_version: self.schema_version,
            computed_at: self.computed_at,
            metric,
            entries,
        }
    }

    pub fn leader(&self) -> Option<&RankedEntry> {
        self.entries.first()
    }
}

/// Compute and rank a competition snapshot without memoization.
pub fn build_report(
    series: &CompetitionSeries,
    options: &EngineOptions,
    metric: RankingMetric,
) -> MetricsReport {
    let records = compute_all(series, options.parallel);
    MetricsReport::new(metric, rank(records.values(), metric))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::synthetic_competition;

    #[test]
    fn build_report_ranks_every_entity() {
        let series = synthetic_competition(6, 120, 21);
        let report = build_report(&series, &EngineOptions::default(), RankingMetric::SharpeRatio);
        assert_eq!(report.schema_version, SCHEMA_VERSION);
        assert_eq!(report.entries.len(), 6);
        assert_eq!(report.metric, RankingMetric::SharpeRatio);
        for pair in report.entries.windows(2) {
            assert!(pair[0].record.sharpe_ratio >= pair[1].record.sharpe_ratio);
        }
        assert_eq!(report.leader().map(|e| e.rank), Some(1));
    }

    #[test]
    fn reranked_keeps_records() {
        let series = synthetic_competition(5, 80, 4);
        let report = build_report(&series, &EngineOptions::default(), RankingMetric::TotalReturn);
        let by_dd = report.reranked(RankingMetric::MaxDrawdown);
        assert_eq!(by_dd.entries.len(), report.entries.len());
        assert_eq!(by_dd.computed_at, report.computed_at);
        for pair in by_dd.entries.windows(2) {
            assert!(pair[0].record.max_drawdown <= pair[1].record.max_drawdown);
        }
    }

    #[test]
    fn empty_competition_has_no_leader() {
        let report = build_report(
            &CompetitionSeries::new(),
            &EngineOptions::default(),
            RankingMetric::TotalReturn,
        );
        assert!(report.leader().is_none());
    }
}
