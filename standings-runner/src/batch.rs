//! Batch computation — metrics for every entity of a competition.
//!
//! Entities are independent, so the parallel path is a plain rayon map with
//! no synchronization beyond collecting results. Both paths produce the
//! same map.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use standings_core::{compute_metrics, MetricsRecord};

use crate::source::CompetitionSeries;

/// Entity id → metrics, in stable (sorted) entity order.
pub type CompetitionMetrics = BTreeMap<String, MetricsRecord>;

/// How the engine is driven across entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Compute entities on the rayon pool.
    pub parallel: bool,
    /// Reuse records for series that have not changed since the last refresh.
    pub memoize: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            memoize: true,
        }
    }
}

/// Compute metrics for every entity in `series`.
pub fn compute_all(series: &CompetitionSeries, parallel: bool) -> CompetitionMetrics {
    if parallel {
        series
            .par_iter()
            .map(|(id, points)| (id.clone(), compute_metrics(id, points)))
            .collect()
    } else {
        series
            .iter()
            .map(|(id, points)| (id.clone(), compute_metrics(id, points)))
            .collect()
    }
}
