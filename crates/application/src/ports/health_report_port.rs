use ferrous_sd_domain::{DomainError, Endpoint};

/// Where health probe results are delivered.
pub trait HealthReportPort: Send + Sync {
    /// Every cached endpoint, paired with the DSN it was resolved for.
    fn health_targets(&self) -> Result<Vec<(String, Endpoint)>, DomainError>;

    /// Returns true when the report flipped the endpoint's health.
    fn record_health_check(
        &self,
        dsn: &str,
        endpoint: &Endpoint,
        healthy: bool,
    ) -> Result<bool, DomainError>;
}
