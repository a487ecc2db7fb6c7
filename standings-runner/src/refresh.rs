//! Refresh cycle — fetch the latest series, recompute, re-rank.
//!
//! One `Refresher` lives for the duration of a watch loop. It owns the
//! source and the metrics cache; everything else is recomputed per cycle.
//! The cadence itself belongs to the caller.

use std::time::Instant;

use crate::batch::{compute_all, EngineOptions};
use crate::config::DashboardConfig;
use crate::memo::{CacheStats, MetricsCache};
use crate::ranking::{rank, RankingMetric};
use crate::report::MetricsReport;
use crate::source::{QueryWindow, SeriesSource, SourceError};

pub struct Refresher {
    source: Box<dyn SeriesSource>,
    window: QueryWindow,
    options: EngineOptions,
    metric: RankingMetric,
    cache: MetricsCache,
    cycles: u64,
}

impl Refresher {
    pub fn new(
        source: Box<dyn SeriesSource>,
        window: QueryWindow,
        options: EngineOptions,
        metric: RankingMetric,
    ) -> Self {
        Self {
            source,
            window,
            options,
            metric,
            cache: MetricsCache::new(),
            cycles: 0,
        }
    }

    pub fn from_config(config: &DashboardConfig, source: Box<dyn SeriesSource>) -> Self {
        Self::new(source, config.window(), config.engine, config.ranking.metric)
    }

    pub fn metric(&self) -> RankingMetric {
        self.metric
    }

    pub fn set_metric(&mut self, metric: RankingMetric) {
        self.metric = metric;
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Cache counters from the last memoized refresh.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.last_stats()
    }

    /// Run one cycle. A fetch failure leaves the cache untouched.
    pub fn refresh(&mut self) -> Result<MetricsReport, SourceError> {
        let started = Instant::now();
        let series = self.source.fetch(&self.window)?;

        let records = if self.options.memoize {
            self.cache.compute_all(&series, self.options.parallel)
        } else {
            compute_all(&series, self.options.parallel)
        };
        let report = MetricsReport::new(self.metric, rank(records.values(), self.metric));
        self.cycles += 1;

        tracing::info!(
            source = %self.source.name(),
            cycle = self.cycles,
            entities = report.entries.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "standings refreshed"
        );
        Ok(report)
    }
}
