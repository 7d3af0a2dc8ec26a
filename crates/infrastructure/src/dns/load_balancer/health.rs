use dashmap::DashMap;
use ferrous_sd_domain::HealthCheckConfig;
use rustc_hash::FxBuildHasher;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct EndpointHealth {
    pub status: HealthStatus,
    pub consecutive_failures: u32,
    pub consecutive_successes: u32,
}

impl Default for EndpointHealth {
    fn default() -> Self {
        Self {
            status: HealthStatus::Unknown,
            consecutive_failures: 0,
            consecutive_successes: 0,
        }
    }
}

/// Counts consecutive externally reported health results per `host:port`
/// and decides when a threshold has been crossed.
pub struct HealthTracker {
    health_map: DashMap<String, EndpointHealth, FxBuildHasher>,
    unhealthy_threshold: u32,
    healthy_threshold: u32,
}

impl HealthTracker {
    pub fn new(unhealthy_threshold: u32, healthy_threshold: u32) -> Self {
        Self {
            health_map: DashMap::with_hasher(FxBuildHasher),
            unhealthy_threshold: unhealthy_threshold.max(1),
            healthy_threshold: healthy_threshold.max(1),
        }
    }

    pub fn from_config(config: &HealthCheckConfig) -> Self {
        Self::new(config.unhealthy_threshold, config.healthy_threshold)
    }

    /// Records one report. Returns the verdict once the matching threshold is
    /// reached, `None` while the streak is still building up.
    pub fn record(&self, identity: &str, healthy: bool) -> Option<HealthStatus> {
        if healthy {
            self.mark_success(identity)
        } else {
            self.mark_failure(identity)
        }
    }

    fn mark_success(&self, identity: &str) -> Option<HealthStatus> {
        let mut entry = self.health_map.entry(identity.to_string()).or_default();
        entry.consecutive_failures = 0;
        entry.consecutive_successes = entry.consecutive_successes.saturating_add(1);
        debug!(endpoint = %identity, streak = entry.consecutive_successes, "Health report: OK");

        if entry.consecutive_successes < self.healthy_threshold {
            return None;
        }
        if entry.status != HealthStatus::Healthy {
            info!(endpoint = %identity, "Endpoint reached healthy threshold");
        }
        entry.status = HealthStatus::Healthy;
        Some(HealthStatus::Healthy)
    }

    fn mark_failure(&self, identity: &str) -> Option<HealthStatus> {
        let mut entry = self.health_map.entry(identity.to_string()).or_default();
        entry.consecutive_successes = 0;
        entry.consecutive_failures = entry.consecutive_failures.saturating_add(1);
        debug!(endpoint = %identity, streak = entry.consecutive_failures, "Health report: FAILED");

        if entry.consecutive_failures < self.unhealthy_threshold {
            return None;
        }
        if entry.status != HealthStatus::Unhealthy {
            warn!(endpoint = %identity, "Endpoint reached unhealthy threshold");
        }
        entry.status = HealthStatus::Unhealthy;
        Some(HealthStatus::Unhealthy)
    }

    pub fn get_status(&self, identity: &str) -> HealthStatus {
        self.health_map
            .get(identity)
            .map(|h| h.status)
            .unwrap_or(HealthStatus::Unknown)
    }

    pub fn get_health_info(&self, identity: &str) -> Option<EndpointHealth> {
        self.health_map.get(identity).map(|h| h.clone())
    }

    pub fn forget(&self, identity: &str) {
        self.health_map.remove(identity);
    }

    pub fn clear(&self) {
        self.health_map.clear();
    }
}
