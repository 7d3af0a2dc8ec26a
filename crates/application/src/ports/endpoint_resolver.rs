use async_trait::async_trait;
use ferrous_sd_domain::{DomainError, Endpoint, ResolvedEndpoints};

/// Resolution function mapping a DSN to its endpoints.
///
/// Implementations carry their own timeouts and retry policy; the cache layer
/// imposes neither.
#[async_trait]
pub trait EndpointResolver: Send + Sync {
    async fn resolve(&self, dsn: &str) -> Result<Vec<Endpoint>, DomainError>;

    /// Like [`EndpointResolver::resolve`], plus the source TTL when known.
    async fn resolve_with_ttl(&self, dsn: &str) -> Result<ResolvedEndpoints, DomainError> {
        Ok(ResolvedEndpoints::new(self.resolve(dsn).await?))
    }
}
