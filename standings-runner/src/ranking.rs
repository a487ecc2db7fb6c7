//! Leaderboard ranking — configurable metric selector and ordering.
//!
//! Every metric ranks descending (higher is better) except `MaxDrawdown`,
//! which ranks ascending: a smaller drawdown is better. Ties are broken by
//! entity id so the order is total and stable across refreshes.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use standings_core::MetricsRecord;

/// Which metric to rank the leaderboard by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    #[default]
    TotalReturn,
    MaxDrawdown,
    SharpeRatio,
    SortinoRatio,
    CalmarRatio,
    CurrentValue,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown ranking metric '{0}' (expected one of: total_return, max_drawdown, sharpe_ratio, sortino_ratio, calmar_ratio, current_value)")]
pub struct UnknownMetric(pub String);

impl RankingMetric {
    pub const ALL: [RankingMetric; 6] = [
        Self::TotalReturn,
        Self::MaxDrawdown,
        Self::SharpeRatio,
        Self::SortinoRatio,
        Self::CalmarRatio,
        Self::CurrentValue,
    ];

    /// Extract the relevant value from a record.
    pub fn extract(&self, record: &MetricsRecord) -> f64 {
        match self {
            Self::TotalReturn => record.total_return,
            Self::MaxDrawdown => record.max_drawdown,
            Self::SharpeRatio => record.sharpe_ratio,
            Self::SortinoRatio => record.sortino_ratio,
            Self::CalmarRatio => record.calmar_ratio,
            Self::CurrentValue => record.current_value,
        }
    }

    /// Whether higher values rank first.
    ///
    /// Drawdown is stored as a non-negative percentage, so lower is better.
    pub fn is_higher_better(&self) -> bool {
        !matches!(self, Self::MaxDrawdown)
    }

    /// Snake-case name, as used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TotalReturn => "total_return",
            Self::MaxDrawdown => "max_drawdown",
            Self::SharpeRatio => "sharpe_ratio",
            Self::SortinoRatio => "sortino_ratio",
            Self::CalmarRatio => "calmar_ratio",
            Self::CurrentValue => "current_value",
        }
    }

    fn order(&self, a: &MetricsRecord, b: &MetricsRecord) -> Ordering {
        let (va, vb) = (self.extract(a), self.extract(b));
        let by_value = if self.is_higher_better() {
            vb.total_cmp(&va)
        } else {
            va.total_cmp(&vb)
        };
        by_value.then_with(|| a.entity_id.cmp(&b.entity_id))
    }
}

impl fmt::Display for RankingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingMetric {
    type Err = UnknownMetric;

    /// Accepts the snake-case names plus short aliases (`sharpe`, `drawdown`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let metric = match normalized.as_str() {
            "total_return" | "return" => Self::TotalReturn,
            "max_drawdown" | "drawdown" => Self::MaxDrawdown,
            "sharpe_ratio" | "sharpe" => Self::SharpeRatio,
            "sortino_ratio" | "sortino" => Self::SortinoRatio,
            "calmar_ratio" | "calmar" => Self::CalmarRatio,
            "current_value" | "value" => Self::CurrentValue,
            _ => return Err(UnknownMetric(s.to_string())),
        };
        Ok(metric)
    }
}

/// One row of a ranked leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-based position.
    pub rank: usize,
    pub record: MetricsRecord,
}

/// Rank records by `metric`. Positions are 1-based and distinct.
pub fn rank<'a, I>(records: I, metric: RankingMetric) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = &'a MetricsRecord>,
{
    let mut sorted: Vec<&MetricsRecord> = records.into_iter().collect();
    sorted.sort_by(|a, b| metric.order(a, b));
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, record)| RankedEntry {
            rank: i + 1,
            record: record.clone(),
        })
        .collect()
}
