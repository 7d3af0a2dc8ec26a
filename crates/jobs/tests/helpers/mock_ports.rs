#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_sd_application::ports::{CacheMaintenancePort, HealthProbe, HealthReportPort};
use ferrous_sd_domain::{DomainError, Endpoint};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub struct MockCacheMaintenancePort {
    prune_calls: AtomicU64,
    removed_per_call: usize,
    should_fail: AtomicBool,
}

impl MockCacheMaintenancePort {
    pub fn new() -> Self {
        Self::removing(0)
    }

    pub fn removing(removed_per_call: usize) -> Self {
        Self {
            prune_calls: AtomicU64::new(0),
            removed_per_call,
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }

    pub fn prune_call_count(&self) -> u64 {
        self.prune_calls.load(Ordering::Relaxed)
    }
}

impl CacheMaintenancePort for MockCacheMaintenancePort {
    fn prune_expired(&self) -> Result<usize, DomainError> {
        self.prune_calls.fetch_add(1, Ordering::Relaxed);
        if self.should_fail.load(Ordering::Relaxed) {
            return Err(DomainError::StoreClosed);
        }
        Ok(self.removed_per_call)
    }

    fn cache_size(&self) -> Result<usize, DomainError> {
        Ok(0)
    }
}

/// Records every report it receives.
pub struct MockHealthReportPort {
    targets: Vec<(String, Endpoint)>,
    reports: Mutex<Vec<(String, String, bool)>>,
}

impl MockHealthReportPort {
    pub fn with_targets(targets: Vec<(&str, Endpoint)>) -> Self {
        Self {
            targets: targets
                .into_iter()
                .map(|(dsn, endpoint)| (dsn.to_string(), endpoint))
                .collect(),
            reports: Mutex::new(Vec::new()),
        }
    }

    /// `(dsn, host:port, healthy)` in arrival order.
    pub fn reports(&self) -> Vec<(String, String, bool)> {
        self.reports.lock().unwrap().clone()
    }
}

impl HealthReportPort for MockHealthReportPort {
    fn health_targets(&self) -> Result<Vec<(String, Endpoint)>, DomainError> {
        Ok(self.targets.clone())
    }

    fn record_health_check(
        &self,
        dsn: &str,
        endpoint: &Endpoint,
        healthy: bool,
    ) -> Result<bool, DomainError> {
        self.reports
            .lock()
            .unwrap()
            .push((dsn.to_string(), endpoint.identity(), healthy));
        Ok(false)
    }
}

#[derive(Clone, Copy)]
pub enum ProbeBehavior {
    Healthy,
    Fail,
    Hang,
}

/// Probe answering per host; unknown hosts are healthy.
pub struct MockHealthProbe {
    behaviors: HashMap<String, ProbeBehavior>,
    calls: AtomicU64,
}

impl MockHealthProbe {
    pub fn new(behaviors: Vec<(&str, ProbeBehavior)>) -> Self {
        Self {
            behaviors: behaviors
                .into_iter()
                .map(|(host, behavior)| (host.to_string(), behavior))
                .collect(),
            calls: AtomicU64::new(0),
        }
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl HealthProbe for MockHealthProbe {
    async fn probe(&self, endpoint: &Endpoint) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match self
            .behaviors
            .get(&endpoint.host)
            .copied()
            .unwrap_or(ProbeBehavior::Healthy)
        {
            ProbeBehavior::Healthy => Ok(()),
            ProbeBehavior::Fail => Err(DomainError::resolution_failed(
                endpoint.identity(),
                "connection refused",
            )),
            ProbeBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }
        }
    }
}
