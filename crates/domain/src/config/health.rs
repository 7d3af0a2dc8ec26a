use serde::{Deserialize, Serialize};

/// Health-report thresholds and probe schedule.
///
/// The engine never probes on its own; `interval_ms` and `timeout_ms` drive
/// the optional probe job, and the thresholds gate how many consecutive
/// reports flip an endpoint's health.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthCheckConfig {
    pub enabled: bool,

    pub interval_ms: u64,

    pub timeout_ms: u64,

    pub unhealthy_threshold: u32,

    pub healthy_threshold: u32,
}

/// Field-by-field overlay for [`HealthCheckConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckOverrides {
    pub enabled: Option<bool>,
    pub interval_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub unhealthy_threshold: Option<u32>,
    pub healthy_threshold: Option<u32>,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: default_interval(),
            timeout_ms: default_timeout(),
            unhealthy_threshold: default_unhealthy_threshold(),
            healthy_threshold: default_healthy_threshold(),
        }
    }
}

impl HealthCheckConfig {
    pub fn merge(mut self, overrides: HealthCheckOverrides) -> Self {
        if let Some(enabled) = overrides.enabled {
            self.enabled = enabled;
        }
        if let Some(interval_ms) = overrides.interval_ms {
            self.interval_ms = interval_ms;
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if let Some(threshold) = overrides.unhealthy_threshold {
            self.unhealthy_threshold = threshold;
        }
        if let Some(threshold) = overrides.healthy_threshold {
            self.healthy_threshold = threshold;
        }
        self
    }
}

fn default_interval() -> u64 {
    30_000
}

fn default_timeout() -> u64 {
    5_000
}

fn default_unhealthy_threshold() -> u32 {
    3
}

fn default_healthy_threshold() -> u32 {
    2
}
