use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

/// Mutable bookkeeping shared by every selection made through one resolver.
///
/// Round-robin cursors are keyed by endpoint-set identity (see
/// [`endpoint_set_key`](super::select::endpoint_set_key)), not by DSN, so two
/// DSNs resolving to the same endpoints rotate together. Connection counts are
/// keyed by `host:port`. Updates happen under the owning shard's lock.
#[derive(Default)]
pub struct LoadBalanceState {
    round_robin_index: DashMap<String, usize, FxBuildHasher>,
    active_connections: DashMap<String, u64, FxBuildHasher>,
}

impl LoadBalanceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot to use for this call and advances the cursor.
    pub fn next_round_robin(&self, set_key: &str, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let mut cursor = self
            .round_robin_index
            .entry(set_key.to_string())
            .or_insert(0);
        let current = *cursor % len;
        *cursor = (current + 1) % len;
        current
    }

    pub fn round_robin_cursor(&self, set_key: &str) -> Option<usize> {
        self.round_robin_index.get(set_key).map(|v| *v)
    }

    pub fn active_connections(&self, identity: &str) -> u64 {
        self.active_connections
            .get(identity)
            .map(|v| *v)
            .unwrap_or(0)
    }

    pub fn increment_connections(&self, identity: &str) -> u64 {
        let mut count = self
            .active_connections
            .entry(identity.to_string())
            .or_insert(0);
        *count += 1;
        *count
    }

    /// Saturates at zero.
    pub fn decrement_connections(&self, identity: &str) -> u64 {
        match self.active_connections.get_mut(identity) {
            Some(mut count) => {
                *count = count.saturating_sub(1);
                *count
            }
            None => 0,
        }
    }

    pub fn set_connections(&self, identity: &str, count: u64) {
        self.active_connections.insert(identity.to_string(), count);
    }
}

impl std::fmt::Debug for LoadBalanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadBalanceState")
            .field("round_robin_sets", &self.round_robin_index.len())
            .field("tracked_endpoints", &self.active_connections.len())
            .finish()
    }
}
