use super::Endpoint;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
    Ttl,
    Capacity,
    Manual,
}

impl EvictionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ttl => "ttl",
            Self::Capacity => "capacity",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for EvictionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle events emitted by the resolver to its listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolverEvent {
    CacheHit { dsn: String, ttl_remaining_ms: u64 },

    CacheMiss { dsn: String },

    /// `revalidating` is true only for the call that started the refresh.
    CacheStale { dsn: String, revalidating: bool },

    CacheExpired { dsn: String },

    CacheEvicted { dsn: String, reason: EvictionReason },

    ResolveStart { dsn: String },

    ResolveSuccess {
        dsn: String,
        endpoint_count: usize,
        duration_ms: u64,
    },

    ResolveError { dsn: String, error: String },

    HealthCheck { endpoint: Endpoint, healthy: bool },

    HealthChanged {
        endpoint: Endpoint,
        previous_healthy: bool,
    },

    Error { error: String },
}

impl ResolverEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CacheHit { .. } => "cache:hit",
            Self::CacheMiss { .. } => "cache:miss",
            Self::CacheStale { .. } => "cache:stale",
            Self::CacheExpired { .. } => "cache:expired",
            Self::CacheEvicted { .. } => "cache:evicted",
            Self::ResolveStart { .. } => "resolve:start",
            Self::ResolveSuccess { .. } => "resolve:success",
            Self::ResolveError { .. } => "resolve:error",
            Self::HealthCheck { .. } => "health:check",
            Self::HealthChanged { .. } => "health:changed",
            Self::Error { .. } => "error",
        }
    }

    pub fn dsn(&self) -> Option<&str> {
        match self {
            Self::CacheHit { dsn, .. }
            | Self::CacheMiss { dsn }
            | Self::CacheStale { dsn, .. }
            | Self::CacheExpired { dsn }
            | Self::CacheEvicted { dsn, .. }
            | Self::ResolveStart { dsn }
            | Self::ResolveSuccess { dsn, .. }
            | Self::ResolveError { dsn, .. } => Some(dsn),
            Self::HealthCheck { .. } | Self::HealthChanged { .. } | Self::Error { .. } => None,
        }
    }
}
