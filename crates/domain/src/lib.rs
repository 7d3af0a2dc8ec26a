//! Ferrous SD Domain Layer
pub mod cache_entry;
pub mod config;
pub mod dsn;
pub mod endpoint;
pub mod errors;
pub mod events;
pub mod resolution;
pub mod stats;

pub use cache_entry::{clamp_ttl, is_expired, is_within_grace_period, CacheEntry, EntryState};
pub use config::{
    ConfigError, HealthCheckConfig, HealthCheckOverrides, LoadBalanceStrategy, ResolverConfig,
    ResolverConfigOverrides,
};
pub use dsn::{DsnTarget, DEFAULT_PORT};
pub use endpoint::Endpoint;
pub use errors::DomainError;
pub use events::{EvictionReason, ResolverEvent};
pub use resolution::{ResolveOptions, ResolveResult, ResolvedEndpoints};
pub use stats::ResolverStats;
