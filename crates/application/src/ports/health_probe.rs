use async_trait::async_trait;
use ferrous_sd_domain::{DomainError, Endpoint};

/// External health probe. `Ok(())` means the endpoint answered healthy.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(&self, endpoint: &Endpoint) -> Result<(), DomainError>;
}
