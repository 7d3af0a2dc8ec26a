use async_trait::async_trait;
use ferrous_sd_domain::DomainError;
use std::net::IpAddr;

/// System-level hostname resolution.
#[async_trait]
pub trait NameLookup: Send + Sync {
    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, DomainError>;
}
