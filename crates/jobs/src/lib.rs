pub mod cache_maintenance;
pub mod health_probe;
pub mod runner;

pub use cache_maintenance::CacheMaintenanceJob;
pub use health_probe::{HealthProbeJob, ProbeRoundOutcome};
pub use runner::JobRunner;
