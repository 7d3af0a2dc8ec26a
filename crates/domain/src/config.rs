pub mod errors;
pub mod health;
pub mod resolver;
pub mod strategy;

pub use errors::ConfigError;
pub use health::{HealthCheckConfig, HealthCheckOverrides};
pub use resolver::{ResolverConfig, ResolverConfigOverrides};
pub use strategy::LoadBalanceStrategy;
