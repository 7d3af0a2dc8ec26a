use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

// align(64) keeps the hot hit/miss counters on their own cache line.
#[derive(Default)]
#[repr(align(64))]
pub struct ResolverMetrics {
    // Hot counters, touched on every lookup.
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
    pub stale_hits: AtomicU64,
    _hot_pad: [u64; 5],

    // Cold counters, touched once per fresh resolution.
    pub resolution_count: AtomicU64,
    pub total_resolution_time_ms: AtomicU64,
}

impl ResolverMetrics {
    pub fn record_resolution(&self, duration_ms: u64) {
        self.resolution_count.fetch_add(1, AtomicOrdering::Relaxed);
        self.total_resolution_time_ms
            .fetch_add(duration_ms, AtomicOrdering::Relaxed);
    }

    /// Hits over hits plus misses, in `[0.0, 1.0]`. Stale hits are excluded.
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.cache_hits.load(AtomicOrdering::Relaxed) as f64;
        let total = hits + self.cache_misses.load(AtomicOrdering::Relaxed) as f64;

        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }

    pub fn avg_resolution_time_ms(&self) -> f64 {
        let count = self.resolution_count.load(AtomicOrdering::Relaxed);
        if count == 0 {
            return 0.0;
        }
        self.total_resolution_time_ms.load(AtomicOrdering::Relaxed) as f64 / count as f64
    }
}
