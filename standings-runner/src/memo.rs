//! Memoization of per-entity metrics across refresh cycles.
//!
//! Records are keyed by entity id and validated by a BLAKE3 fingerprint of
//! the entity id and its raw points (timestamps and value bit patterns). A
//! series that has not changed since the previous refresh reuses its record,
//! which is bit-identical to recomputing it. Entities absent from a refresh
//! are evicted at the end of that refresh.

use std::collections::HashMap;

use rayon::prelude::*;

use standings_core::{compute_metrics, MetricsRecord, TimePoint};

use crate::batch::CompetitionMetrics;
use crate::source::CompetitionSeries;

/// Content fingerprint of one entity's series snapshot.
pub fn series_fingerprint(entity_id: &str, series: &[TimePoint]) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(entity_id.len() as u64).to_le_bytes());
    hasher.update(entity_id.as_bytes());
    hasher.update(&(series.len() as u64).to_le_bytes());
    for point in series {
        hasher.update(&(point.timestamp.len() as u64).to_le_bytes());
        hasher.update(point.timestamp.as_bytes());
        match point.value {
            Some(v) => {
                hasher.update(&[1]);
                hasher.update(&v.to_bits().to_le_bytes());
            }
            None => {
                hasher.update(&[0]);
            }
        }
    }
    hasher.finalize()
}

/// Hit/miss counters for the most recent refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub evicted: usize,
}

/// Per-entity metrics cache.
#[derive(Debug, Default)]
pub struct MetricsCache {
    entries: HashMap<String, (blake3::Hash, MetricsRecord)>,
    last_stats: CacheStats,
}

impl MetricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_stats(&self) -> CacheStats {
        self.last_stats
    }

    /// Compute every entity, reusing records for unchanged series.
    ///
    /// Only changed or new entities are computed (on the rayon pool when
    /// `parallel`). Entities not in `series` are evicted.
    pub fn compute_all(&mut self, series: &CompetitionSeries, parallel: bool) -> CompetitionMetrics {
        let mut out = CompetitionMetrics::new();
        let mut stale: Vec<(&String, &Vec<TimePoint>, blake3::Hash)> = Vec::new();

        for (id, points) in series {
            let hash = series_fingerprint(id, points);
            match self.entries.get(id.as_str()) {
                Some((cached, record)) if *cached == hash => {
                    out.insert(id.clone(), record.clone());
                }
                _ => stale.push((id, points, hash)),
            }
        }

        let hits = out.len();
        let misses = stale.len();

        let fresh: Vec<(String, blake3::Hash, MetricsRecord)> = if parallel {
            stale
                .par_iter()
                .map(|(id, points, hash)| ((*id).clone(), *hash, compute_metrics(id, points)))
                .collect()
        } else {
            stale
                .iter()
                .map(|(id, points, hash)| ((*id).clone(), *hash, compute_metrics(id, points)))
                .collect()
        };

        for (id, hash, record) in fresh {
            out.insert(id.clone(), record.clone());
            self.entries.insert(id, (hash, record));
        }

        let before = self.entries.len();
        self.entries.retain(|id, _| series.contains_key(id));
        let evicted = before - self.entries.len();

        self.last_stats = CacheStats {
            hits,
            misses,
            evicted,
        };
        tracing::debug!(hits, misses, evicted, "metrics cache refreshed");
        out
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_stats = CacheStats::default();
    }
}
