mod cache_maintenance_port;
mod cache_store;
mod clock;
mod endpoint_resolver;
mod health_probe;
mod health_report_port;
mod name_lookup;

pub use cache_maintenance_port::CacheMaintenancePort;
pub use cache_store::CacheStore;
pub use clock::Clock;
pub use endpoint_resolver::EndpointResolver;
pub use health_probe::HealthProbe;
pub use health_report_port::HealthReportPort;
pub use name_lookup::NameLookup;
