use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::health::{HealthCheckConfig, HealthCheckOverrides};
use super::strategy::LoadBalanceStrategy;

/// Resolver configuration with every default applied.
///
/// Built once from [`ResolverConfigOverrides`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResolverConfig {
    pub id: String,

    pub default_ttl_ms: u64,

    pub min_ttl_ms: u64,

    pub max_ttl_ms: u64,

    pub max_entries: usize,

    /// Prefer a TTL reported by the resolution function over `default_ttl_ms`.
    pub respect_dns_ttl: bool,

    /// TTL of negative entries; `0` disables negative caching. Not clamped.
    pub negative_ttl_ms: u64,

    pub stale_while_revalidate: bool,

    pub stale_grace_period_ms: u64,

    pub load_balance_strategy: LoadBalanceStrategy,

    pub health_check: HealthCheckConfig,
}

/// Caller-supplied configuration; omitted fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfigOverrides {
    pub id: Option<String>,
    pub default_ttl_ms: Option<u64>,
    pub min_ttl_ms: Option<u64>,
    pub max_ttl_ms: Option<u64>,
    pub max_entries: Option<usize>,
    pub respect_dns_ttl: Option<bool>,
    pub negative_ttl_ms: Option<u64>,
    pub stale_while_revalidate: Option<bool>,
    pub stale_grace_period_ms: Option<u64>,
    pub load_balance_strategy: Option<LoadBalanceStrategy>,
    pub health_check: Option<HealthCheckOverrides>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            id: default_id(),
            default_ttl_ms: 60_000,
            min_ttl_ms: 1_000,
            max_ttl_ms: 300_000,
            max_entries: 1_000,
            respect_dns_ttl: true,
            negative_ttl_ms: 30_000,
            stale_while_revalidate: true,
            stale_grace_period_ms: 5_000,
            load_balance_strategy: LoadBalanceStrategy::RoundRobin,
            health_check: HealthCheckConfig::default(),
        }
    }
}

impl ResolverConfig {
    pub fn from_overrides(overrides: ResolverConfigOverrides) -> Self {
        Self::default().merge(overrides)
    }

    /// Shallow per-field overlay; the health-check block is merged per field.
    pub fn merge(mut self, overrides: ResolverConfigOverrides) -> Self {
        if let Some(id) = overrides.id {
            self.id = id;
        }
        if let Some(ttl) = overrides.default_ttl_ms {
            self.default_ttl_ms = ttl;
        }
        if let Some(ttl) = overrides.min_ttl_ms {
            self.min_ttl_ms = ttl;
        }
        if let Some(ttl) = overrides.max_ttl_ms {
            self.max_ttl_ms = ttl;
        }
        if let Some(max_entries) = overrides.max_entries {
            self.max_entries = max_entries;
        }
        if let Some(respect) = overrides.respect_dns_ttl {
            self.respect_dns_ttl = respect;
        }
        if let Some(ttl) = overrides.negative_ttl_ms {
            self.negative_ttl_ms = ttl;
        }
        if let Some(swr) = overrides.stale_while_revalidate {
            self.stale_while_revalidate = swr;
        }
        if let Some(grace) = overrides.stale_grace_period_ms {
            self.stale_grace_period_ms = grace;
        }
        if let Some(strategy) = overrides.load_balance_strategy {
            self.load_balance_strategy = strategy;
        }
        if let Some(health) = overrides.health_check {
            self.health_check = self.health_check.merge(health);
        }
        self
    }

    /// Loads overrides from a TOML file and applies them onto the defaults.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        let config = Self::from_toml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let overrides: ResolverConfigOverrides =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(Self::from_overrides(overrides))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_ttl_ms > self.max_ttl_ms {
            return Err(ConfigError::Validation(format!(
                "min_ttl_ms ({}) exceeds max_ttl_ms ({})",
                self.min_ttl_ms, self.max_ttl_ms
            )));
        }

        if self.max_entries == 0 {
            return Err(ConfigError::Validation(
                "max_entries must be greater than 0".to_string(),
            ));
        }

        if self.health_check.unhealthy_threshold == 0 || self.health_check.healthy_threshold == 0
        {
            return Err(ConfigError::Validation(
                "health check thresholds must be greater than 0".to_string(),
            ));
        }

        if self.health_check.enabled && self.health_check.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "health check interval cannot be 0 when enabled".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_id() -> String {
    "default".to_string()
}
