pub mod health;
pub mod select;
pub mod state;

pub use health::{EndpointHealth, HealthStatus, HealthTracker};
pub use select::{endpoint_set_key, select_endpoint};
pub use state::LoadBalanceState;
