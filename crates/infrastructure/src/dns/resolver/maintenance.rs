use super::core::ServiceResolver;
use ferrous_sd_application::ports::{CacheMaintenancePort, HealthReportPort};
use ferrous_sd_domain::{DomainError, Endpoint};

impl CacheMaintenancePort for ServiceResolver {
    fn prune_expired(&self) -> Result<usize, DomainError> {
        ServiceResolver::prune_expired(self)
    }

    fn cache_size(&self) -> Result<usize, DomainError> {
        ServiceResolver::cache_size(self)
    }
}

impl HealthReportPort for ServiceResolver {
    fn health_targets(&self) -> Result<Vec<(String, Endpoint)>, DomainError> {
        Ok(self
            .cached_entries()?
            .into_iter()
            .filter(|entry| !entry.is_negative())
            .flat_map(|entry| {
                let dsn = entry.dsn;
                entry
                    .endpoints
                    .into_iter()
                    .map(move |endpoint| (dsn.clone(), endpoint))
            })
            .collect())
    }

    fn record_health_check(
        &self,
        dsn: &str,
        endpoint: &Endpoint,
        healthy: bool,
    ) -> Result<bool, DomainError> {
        ServiceResolver::record_health_check(self, dsn, endpoint, healthy)
    }
}
