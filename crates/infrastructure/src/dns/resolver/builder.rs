use super::core::{ServiceResolver, Shared};
use super::revalidation::RevalidationSet;
use super::system::SystemEndpointResolver;
use crate::dns::cache::{LruStore, SystemClock};
use crate::dns::events::EventBus;
use crate::dns::load_balancer::{HealthTracker, LoadBalanceState};
use dashmap::DashMap;
use ferrous_sd_application::ports::{CacheStore, Clock, EndpointResolver, NameLookup};
use ferrous_sd_domain::{ResolverConfig, ResolverConfigOverrides};
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use tracing::info;

pub struct ResolverBuilder {
    config: ResolverConfig,
    store: Option<Arc<dyn CacheStore>>,
    clock: Option<Arc<dyn Clock>>,
    default_resolver: Option<Arc<dyn EndpointResolver>>,
    name_lookup: Option<Arc<dyn NameLookup>>,
    resolvers: Vec<(String, Arc<dyn EndpointResolver>)>,
}

impl ResolverBuilder {
    pub fn new(overrides: ResolverConfigOverrides) -> Self {
        Self::with_config(ResolverConfig::from_overrides(overrides))
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            config,
            store: None,
            clock: None,
            default_resolver: None,
            name_lookup: None,
            resolvers: Vec::new(),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replaces the system lookup used for DSNs without a registered resolver.
    pub fn with_default_resolver(mut self, resolver: Arc<dyn EndpointResolver>) -> Self {
        self.default_resolver = Some(resolver);
        self
    }

    /// Keeps the system resolver but swaps its hostname lookup.
    pub fn with_name_lookup(mut self, lookup: Arc<dyn NameLookup>) -> Self {
        self.name_lookup = Some(lookup);
        self
    }

    pub fn with_resolver(
        mut self,
        dsn: impl Into<String>,
        resolver: Arc<dyn EndpointResolver>,
    ) -> Self {
        self.resolvers.push((dsn.into(), resolver));
        self
    }

    pub fn build(self) -> ServiceResolver {
        let config = self.config;

        info!(
            id = %config.id,
            max_entries = config.max_entries,
            default_ttl_ms = config.default_ttl_ms,
            strategy = config.load_balance_strategy.as_str(),
            stale_while_revalidate = config.stale_while_revalidate,
            custom_store = self.store.is_some(),
            "Building service resolver"
        );

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(LruStore::new(config.max_entries)));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let default_resolver = match (self.default_resolver, self.name_lookup) {
            (Some(resolver), _) => resolver,
            (None, Some(lookup)) => Arc::new(SystemEndpointResolver::new(lookup)),
            (None, None) => Arc::new(SystemEndpointResolver::default()),
        };

        let resolvers = DashMap::with_hasher(FxBuildHasher);
        for (dsn, resolver) in self.resolvers {
            resolvers.insert(dsn, resolver);
        }

        let health = HealthTracker::from_config(&config.health_check);

        ServiceResolver::from_shared(Shared {
            config,
            store,
            clock,
            default_resolver,
            resolvers,
            lb_state: LoadBalanceState::new(),
            health,
            metrics: Default::default(),
            events: EventBus::new(),
            revalidating: RevalidationSet::new(),
        })
    }
}

impl ServiceResolver {
    /// Resolver with the default store, clock and system lookup.
    pub fn new(overrides: ResolverConfigOverrides) -> Self {
        ResolverBuilder::new(overrides).build()
    }

    pub fn builder(overrides: ResolverConfigOverrides) -> ResolverBuilder {
        ResolverBuilder::new(overrides)
    }
}
