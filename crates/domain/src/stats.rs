use serde::Serialize;

/// Point-in-time view of resolver statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolverStats {
    pub total_entries: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub hit_ratio: f64,
    pub stale_hits: u64,
    pub avg_resolution_time_ms: f64,
    pub healthy_endpoints: usize,
    pub unhealthy_endpoints: usize,
}
