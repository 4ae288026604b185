//! One stats session: load, aggregate, and hold the latest result.
//!
//! Refreshes may overlap. Each refresh takes a generation number when it
//! starts; its result is committed only if no refresh that started later has
//! committed already (last-write-wins by start order). A stale refresh that
//! finishes late returns the newer committed stats instead of its own.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::aggregate::{aggregate, Aggregation};
use crate::error::BazaarError;
use crate::fetch::CatalogFetcher;
use crate::model::{BazaarData, SnapshotId};

/// Aggregated stats from one completed load.
#[derive(Debug, Clone)]
pub struct LoadedStats {
    pub generation: u64,
    pub snapshot: SnapshotId,
    pub aggregation: Aggregation,
}

#[derive(Debug, Default)]
struct Committed {
    generation: u64,
    stats: Option<Arc<LoadedStats>>,
}

#[derive(Debug)]
pub struct StatsSession {
    fetcher: CatalogFetcher,
    host_version: String,
    started: AtomicU64,
    committed: Mutex<Committed>,
}

impl StatsSession {
    pub fn new(fetcher: CatalogFetcher, host_version: impl Into<String>) -> Self {
        Self {
            fetcher,
            host_version: host_version.into(),
            started: AtomicU64::new(0),
            committed: Mutex::new(Committed::default()),
        }
    }

    /// Latest committed stats, if any load has completed.
    pub fn current(&self) -> Option<Arc<LoadedStats>> {
        self.lock().stats.clone()
    }

    /// Fetch everything and aggregate. On error the committed stats are unchanged.
    pub async fn refresh(&self) -> Result<Arc<LoadedStats>, BazaarError> {
        let generation = self.begin();
        tracing::debug!("refresh #{} started", generation);
        let data = self.fetcher.fetch_all(&self.host_version).await?;
        Ok(self.commit(generation, data))
    }

    fn begin(&self) -> u64 {
        self.started.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn commit(&self, generation: u64, data: BazaarData) -> Arc<LoadedStats> {
        let aggregation = aggregate(&data.catalogs, &data.download_index);
        let mut committed = self.lock();
        if let Some(current) = &committed.stats {
            if generation <= committed.generation {
                tracing::debug!(
                    "refresh #{} finished after #{}; discarding its result",
                    generation,
                    committed.generation
                );
                return Arc::clone(current);
            }
        }
        let stats = Arc::new(LoadedStats {
            generation,
            snapshot: data.snapshot,
            aggregation,
        });
        committed.generation = generation;
        committed.stats = Some(Arc::clone(&stats));
        stats
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Committed> {
        self.committed.lock().unwrap_or_else(|e| e.into_inner())
    }
}
