pub mod cache;
pub mod events;
pub mod load_balancer;
pub mod resolver;

pub use cache::{LruStore, ManualClock, ResolverMetrics, SystemClock};
pub use events::{EventBus, EventListener, ListenerId, Subscription};
pub use load_balancer::{
    endpoint_set_key, select_endpoint, EndpointHealth, HealthStatus, HealthTracker,
    LoadBalanceState,
};
pub use resolver::{
    resolver_fn, FnResolver, ResolverBuilder, ServiceResolver, SystemEndpointResolver,
};
