use dashmap::DashSet;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;

/// DSNs with a background revalidation in flight.
///
/// Membership is taken with an atomic insert and released when the returned
/// guard drops, so success, error and panic paths all clear it.
#[derive(Clone, Default)]
pub struct RevalidationSet {
    inflight: Arc<DashSet<String, FxBuildHasher>>,
}

pub struct RevalidationGuard {
    inflight: Arc<DashSet<String, FxBuildHasher>>,
    dsn: String,
}

impl RevalidationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a guard if no revalidation for `dsn` was in flight.
    pub fn try_acquire(&self, dsn: &str) -> Option<RevalidationGuard> {
        if self.inflight.insert(dsn.to_string()) {
            Some(RevalidationGuard {
                inflight: Arc::clone(&self.inflight),
                dsn: dsn.to_string(),
            })
        } else {
            None
        }
    }

    pub fn contains(&self, dsn: &str) -> bool {
        self.inflight.contains(dsn)
    }

    pub fn len(&self) -> usize {
        self.inflight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inflight.is_empty()
    }
}

impl RevalidationGuard {
    pub fn dsn(&self) -> &str {
        &self.dsn
    }
}

impl Drop for RevalidationGuard {
    fn drop(&mut self) {
        self.inflight.remove(&self.dsn);
    }
}
