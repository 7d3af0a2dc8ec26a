use super::revalidation::{RevalidationGuard, RevalidationSet};
use crate::dns::cache::ResolverMetrics;
use crate::dns::events::{EventBus, ListenerId, Subscription};
use crate::dns::load_balancer::{self, HealthStatus, HealthTracker, LoadBalanceState};
use dashmap::DashMap;
use ferrous_sd_application::ports::{CacheStore, Clock, EndpointResolver};
use ferrous_sd_domain::{
    clamp_ttl, CacheEntry, DomainError, Endpoint, EntryState, EvictionReason, ResolveOptions,
    ResolveResult, ResolverConfig, ResolverEvent, ResolverStats,
};
use rustc_hash::{FxBuildHasher, FxHashSet};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub(super) struct Shared {
    pub(super) config: ResolverConfig,
    pub(super) store: Arc<dyn CacheStore>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) default_resolver: Arc<dyn EndpointResolver>,
    pub(super) resolvers: DashMap<String, Arc<dyn EndpointResolver>, FxBuildHasher>,
    pub(super) lb_state: LoadBalanceState,
    pub(super) health: HealthTracker,
    pub(super) metrics: ResolverMetrics,
    pub(super) events: EventBus,
    pub(super) revalidating: RevalidationSet,
}

/// Caching endpoint resolver with stale-while-revalidate, negative caching and
/// client-side load balancing.
///
/// Cloning is cheap and every clone shares the same cache, counters and
/// listeners. Background revalidation needs a running tokio runtime.
#[derive(Clone)]
pub struct ServiceResolver {
    shared: Arc<Shared>,
}

impl ServiceResolver {
    pub(super) fn from_shared(shared: Shared) -> Self {
        Self {
            shared: Arc::new(shared),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.shared.config
    }

    pub async fn resolve(
        &self,
        dsn: &str,
        options: ResolveOptions,
    ) -> Result<ResolveResult, DomainError> {
        if options.force_refresh {
            debug!(dsn = %dsn, "Forced refresh, bypassing cache");
            return self.fresh_resolve(dsn, options.ttl_ms).await;
        }

        let shared = &self.shared;
        let now = shared.clock.now_ms();
        let stale_while_revalidate = shared.config.stale_while_revalidate;
        let grace_ms = shared.config.stale_grace_period_ms;

        // The hit count is bumped inside the store's atomic update, never
        // written back from a snapshot.
        let looked_up = shared.store.update(dsn, &mut |entry: &mut CacheEntry| {
            if entry.state_at(now, stale_while_revalidate, grace_ms) == EntryState::Fresh {
                entry.hit_count = entry.hit_count.saturating_add(1);
            }
        })?;
        let Some(entry) = looked_up else {
            shared.metrics.cache_misses.fetch_add(1, Ordering::Relaxed);
            debug!(dsn = %dsn, "Cache MISS");
            shared.events.emit(ResolverEvent::CacheMiss {
                dsn: dsn.to_string(),
            });
            return self.fresh_resolve(dsn, options.ttl_ms).await;
        };

        match entry.state_at(now, stale_while_revalidate, grace_ms) {
            EntryState::Fresh => {
                shared.metrics.cache_hits.fetch_add(1, Ordering::Relaxed);
                let ttl_remaining_ms = entry.ttl_remaining_ms(now);

                debug!(dsn = %dsn, ttl_remaining_ms, hits = entry.hit_count, "Cache HIT");
                shared.events.emit(ResolverEvent::CacheHit {
                    dsn: dsn.to_string(),
                    ttl_remaining_ms,
                });
                Ok(cached_result(dsn, entry, ttl_remaining_ms))
            }
            EntryState::Stale => {
                shared.metrics.stale_hits.fetch_add(1, Ordering::Relaxed);
                let guard = shared.revalidating.try_acquire(dsn);
                let revalidating = guard.is_some();

                debug!(dsn = %dsn, revalidating, "Cache STALE, serving cached endpoints");
                shared.events.emit(ResolverEvent::CacheStale {
                    dsn: dsn.to_string(),
                    revalidating,
                });

                if let Some(guard) = guard {
                    self.spawn_revalidation(guard, options.ttl_ms);
                }
                Ok(cached_result(dsn, entry, 0))
            }
            EntryState::Expired => {
                shared.metrics.cache_misses.fetch_add(1, Ordering::Relaxed);
                debug!(dsn = %dsn, "Cache EXPIRED");
                shared.events.emit(ResolverEvent::CacheExpired {
                    dsn: dsn.to_string(),
                });
                self.fresh_resolve(dsn, options.ttl_ms).await
            }
        }
    }

    /// Resolves through the registered (or default) resolution function and
    /// replaces the cache entry, regardless of what is cached.
    pub async fn fresh_resolve(
        &self,
        dsn: &str,
        custom_ttl_ms: Option<u64>,
    ) -> Result<ResolveResult, DomainError> {
        let shared = &self.shared;
        shared.events.emit(ResolverEvent::ResolveStart {
            dsn: dsn.to_string(),
        });

        let resolver = shared
            .resolvers
            .get(dsn)
            .map(|r| Arc::clone(r.value()))
            .unwrap_or_else(|| Arc::clone(&shared.default_resolver));

        let start = Instant::now();
        let outcome = resolver.resolve_with_ttl(dsn).await;
        let duration_ms = start.elapsed().as_millis() as u64;
        shared.metrics.record_resolution(duration_ms);

        match outcome {
            Ok(resolved) => {
                let reported = resolved.ttl_ms.filter(|_| shared.config.respect_dns_ttl);
                let ttl_ms = clamp_ttl(
                    custom_ttl_ms
                        .or(reported)
                        .unwrap_or(shared.config.default_ttl_ms),
                    shared.config.min_ttl_ms,
                    shared.config.max_ttl_ms,
                );

                let now = shared.clock.now_ms();
                let entry = CacheEntry::new(dsn, resolved.endpoints, now, ttl_ms);
                let endpoint_count = entry.endpoints.len();
                self.store_entry(dsn, entry.clone())?;

                debug!(dsn = %dsn, endpoints = endpoint_count, ttl_ms, duration_ms, "Resolved");
                shared.events.emit(ResolverEvent::ResolveSuccess {
                    dsn: dsn.to_string(),
                    endpoint_count,
                    duration_ms,
                });

                Ok(ResolveResult {
                    dsn: dsn.to_string(),
                    endpoints: entry.endpoints,
                    from_cache: false,
                    ttl_remaining_ms: ttl_ms,
                    error: None,
                })
            }
            Err(e) => {
                warn!(dsn = %dsn, error = %e, duration_ms, "Resolution failed");
                shared.events.emit(ResolverEvent::ResolveError {
                    dsn: dsn.to_string(),
                    error: e.to_string(),
                });

                if shared.config.negative_ttl_ms > 0 {
                    let now = shared.clock.now_ms();
                    let negative =
                        CacheEntry::negative(dsn, e.to_string(), now, shared.config.negative_ttl_ms);
                    self.store_entry(dsn, negative)?;
                    debug!(dsn = %dsn, ttl_ms = shared.config.negative_ttl_ms, "Stored negative entry");
                }

                Err(e)
            }
        }
    }

    fn spawn_revalidation(&self, guard: RevalidationGuard, custom_ttl_ms: Option<u64>) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(dsn = %guard.dsn(), "No tokio runtime, skipping background revalidation");
            return;
        };

        let resolver = self.clone();
        let dsn = guard.dsn().to_string();
        handle.spawn(async move {
            // Held for the whole task; dropping it (even on panic) releases the DSN.
            let _guard = guard;

            match resolver.fresh_resolve(&dsn, custom_ttl_ms).await {
                Ok(result) => {
                    debug!(dsn = %dsn, endpoints = result.endpoints.len(), "Background revalidation done");
                }
                Err(e @ (DomainError::Store(_) | DomainError::StoreClosed)) => {
                    resolver.shared.events.emit(ResolverEvent::Error {
                        error: e.to_string(),
                    });
                }
                Err(e) => {
                    debug!(dsn = %dsn, error = %e, "Background revalidation failed");
                }
            }
        });
    }

    /// Picks an endpoint from whatever is cached for `dsn`, fresh or not.
    pub fn select_endpoint(&self, dsn: &str) -> Result<Option<Endpoint>, DomainError> {
        let Some(entry) = self.shared.store.peek(dsn)? else {
            return Ok(None);
        };
        Ok(load_balancer::select_endpoint(
            &entry.endpoints,
            self.shared.config.load_balance_strategy,
            &self.shared.lb_state,
        )
        .cloned())
    }

    /// Resolves, then picks one endpoint from the result.
    pub async fn resolve_one(
        &self,
        dsn: &str,
        options: ResolveOptions,
    ) -> Result<Option<Endpoint>, DomainError> {
        let result = self.resolve(dsn, options).await?;
        Ok(load_balancer::select_endpoint(
            &result.endpoints,
            self.shared.config.load_balance_strategy,
            &self.shared.lb_state,
        )
        .cloned())
    }

    pub fn increment_connections(&self, endpoint: &Endpoint) -> u64 {
        self.shared
            .lb_state
            .increment_connections(&endpoint.identity())
    }

    pub fn decrement_connections(&self, endpoint: &Endpoint) -> u64 {
        self.shared
            .lb_state
            .decrement_connections(&endpoint.identity())
    }

    pub fn active_connections(&self, endpoint: &Endpoint) -> u64 {
        self.shared.lb_state.active_connections(&endpoint.identity())
    }

    pub fn mark_unhealthy(&self, dsn: &str, endpoint: &Endpoint) -> Result<bool, DomainError> {
        self.set_endpoint_health(dsn, endpoint, false)
    }

    pub fn mark_healthy(&self, dsn: &str, endpoint: &Endpoint) -> Result<bool, DomainError> {
        self.set_endpoint_health(dsn, endpoint, true)
    }

    /// Returns true when a cached endpoint actually changed state.
    fn set_endpoint_health(
        &self,
        dsn: &str,
        endpoint: &Endpoint,
        healthy: bool,
    ) -> Result<bool, DomainError> {
        let shared = &self.shared;
        let now = shared.clock.now_ms();

        let mut transition: Option<(Endpoint, bool)> = None;
        shared.store.update(dsn, &mut |entry: &mut CacheEntry| {
            let Some(cached) = entry
                .endpoints
                .iter_mut()
                .find(|e| e.same_identity(endpoint))
            else {
                return;
            };
            if cached.healthy == healthy {
                return;
            }
            let previous_healthy = cached.healthy;
            cached.healthy = healthy;
            cached.last_checked = Some(now);
            transition = Some((cached.clone(), previous_healthy));
        })?;

        let Some((changed, previous_healthy)) = transition else {
            return Ok(false);
        };

        if healthy {
            info!(dsn = %dsn, endpoint = %changed, "Endpoint marked healthy");
        } else {
            warn!(dsn = %dsn, endpoint = %changed, "Endpoint marked unhealthy");
        }
        shared.events.emit(ResolverEvent::HealthChanged {
            endpoint: changed,
            previous_healthy,
        });
        Ok(true)
    }

    /// Feeds one external health check result through the consecutive
    /// success/failure thresholds.
    pub fn record_health_check(
        &self,
        dsn: &str,
        endpoint: &Endpoint,
        healthy: bool,
    ) -> Result<bool, DomainError> {
        self.shared.events.emit(ResolverEvent::HealthCheck {
            endpoint: endpoint.clone(),
            healthy,
        });

        match self.shared.health.record(&endpoint.identity(), healthy) {
            Some(HealthStatus::Unhealthy) => self.mark_unhealthy(dsn, endpoint),
            Some(HealthStatus::Healthy) => self.mark_healthy(dsn, endpoint),
            Some(HealthStatus::Unknown) | None => Ok(false),
        }
    }

    pub fn health_status(&self, endpoint: &Endpoint) -> HealthStatus {
        self.shared.health.get_status(&endpoint.identity())
    }

    /// Drops the entry and the health streaks of endpoints no other entry
    /// still references.
    pub fn invalidate(&self, dsn: &str) -> Result<bool, DomainError> {
        let previous = self.shared.store.peek(dsn)?;
        let removed = self.shared.store.delete(dsn)?;
        if removed {
            debug!(dsn = %dsn, "Invalidated");
            if let Some(entry) = previous {
                self.forget_unreferenced_health(&entry.endpoints)?;
            }
            self.emit_evicted(dsn, EvictionReason::Manual);
        }
        Ok(removed)
    }

    /// Removes every entry, returning how many were dropped.
    pub fn clear(&self) -> Result<usize, DomainError> {
        let keys = self.shared.store.keys()?;
        self.shared.store.clear()?;
        self.shared.health.clear();
        for key in &keys {
            self.emit_evicted(key, EvictionReason::Manual);
        }
        info!(entries = keys.len(), "Cache cleared");
        Ok(keys.len())
    }

    /// Removes entries that can no longer be served, stale ones included once
    /// their grace period has passed.
    pub fn prune_expired(&self) -> Result<usize, DomainError> {
        let shared = &self.shared;
        let now = shared.clock.now_ms();
        let grace_ms = if shared.config.stale_while_revalidate {
            shared.config.stale_grace_period_ms
        } else {
            0
        };

        let removed = shared.store.prune_expired(now, grace_ms)?;
        for key in &removed {
            self.emit_evicted(key, EvictionReason::Ttl);
        }

        if !removed.is_empty() {
            debug!(removed = removed.len(), "Pruned expired entries");
        }
        Ok(removed.len())
    }

    pub fn cache_size(&self) -> Result<usize, DomainError> {
        self.shared.store.size()
    }

    pub fn stats(&self) -> Result<ResolverStats, DomainError> {
        let shared = &self.shared;
        let mut healthy_endpoints = 0;
        let mut unhealthy_endpoints = 0;

        let keys = shared.store.keys()?;
        for key in &keys {
            if let Some(entry) = shared.store.peek(key)? {
                healthy_endpoints += entry.healthy_count();
                unhealthy_endpoints += entry.unhealthy_count();
            }
        }

        Ok(ResolverStats {
            total_entries: shared.store.size()?,
            cache_hits: shared.metrics.cache_hits.load(Ordering::Relaxed),
            cache_misses: shared.metrics.cache_misses.load(Ordering::Relaxed),
            hit_ratio: shared.metrics.hit_ratio(),
            stale_hits: shared.metrics.stale_hits.load(Ordering::Relaxed),
            avg_resolution_time_ms: shared.metrics.avg_resolution_time_ms(),
            healthy_endpoints,
            unhealthy_endpoints,
        })
    }

    /// Snapshot of every cached entry, without touching recency.
    pub fn cached_entries(&self) -> Result<Vec<CacheEntry>, DomainError> {
        let mut entries = Vec::new();
        for key in self.shared.store.keys()? {
            if let Some(entry) = self.shared.store.peek(&key)? {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    pub fn is_revalidating(&self, dsn: &str) -> bool {
        self.shared.revalidating.contains(dsn)
    }

    pub fn register_resolver(&self, dsn: impl Into<String>, resolver: Arc<dyn EndpointResolver>) {
        let dsn = dsn.into();
        debug!(dsn = %dsn, "Registered DSN resolver");
        self.shared.resolvers.insert(dsn, resolver);
    }

    pub fn unregister_resolver(&self, dsn: &str) -> bool {
        self.shared.resolvers.remove(dsn).is_some()
    }

    pub fn events(&self) -> &EventBus {
        &self.shared.events
    }

    pub fn on<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ResolverEvent) + Send + Sync + 'static,
    {
        self.shared.events.on(listener)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.shared.events.off(id)
    }

    pub fn close(&self) -> Result<(), DomainError> {
        info!(id = %self.shared.config.id, "Closing resolver");
        self.shared.store.close()
    }

    fn store_entry(&self, dsn: &str, entry: CacheEntry) -> Result<(), DomainError> {
        if let Some(evicted) = self.shared.store.set(dsn, entry)? {
            self.emit_evicted(&evicted, EvictionReason::Capacity);
        }
        Ok(())
    }

    fn forget_unreferenced_health(&self, endpoints: &[Endpoint]) -> Result<(), DomainError> {
        if endpoints.is_empty() {
            return Ok(());
        }
        let still_cached: FxHashSet<String> = self
            .cached_entries()?
            .iter()
            .flat_map(|entry| entry.endpoints.iter().map(Endpoint::identity))
            .collect();

        for endpoint in endpoints {
            let identity = endpoint.identity();
            if !still_cached.contains(&identity) {
                self.shared.health.forget(&identity);
            }
        }
        Ok(())
    }

    fn emit_evicted(&self, dsn: &str, reason: EvictionReason) {
        self.shared.events.emit(ResolverEvent::CacheEvicted {
            dsn: dsn.to_string(),
            reason,
        });
    }
}

impl std::fmt::Debug for ServiceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceResolver")
            .field("id", &self.shared.config.id)
            .field("strategy", &self.shared.config.load_balance_strategy)
            .field("revalidating", &self.shared.revalidating.len())
            .field("events", &self.shared.events)
            .finish()
    }
}

fn cached_result(dsn: &str, entry: CacheEntry, ttl_remaining_ms: u64) -> ResolveResult {
    ResolveResult {
        dsn: dsn.to_string(),
        endpoints: entry.endpoints,
        from_cache: true,
        ttl_remaining_ms,
        error: entry.error,
    }
}
