use ferrous_sd_domain::DomainError;

/// Periodic cache upkeep driven by the maintenance job.
pub trait CacheMaintenancePort: Send + Sync {
    /// Drops entries that can no longer be served. Returns how many went.
    fn prune_expired(&self) -> Result<usize, DomainError>;

    fn cache_size(&self) -> Result<usize, DomainError>;
}
