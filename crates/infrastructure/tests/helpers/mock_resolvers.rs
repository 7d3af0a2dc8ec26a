#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_sd_application::ports::{EndpointResolver, NameLookup};
use ferrous_sd_domain::{
    DomainError, Endpoint, ResolveOptions, ResolvedEndpoints, ResolverConfigOverrides,
    ResolverEvent,
};
use ferrous_sd_infrastructure::dns::{ManualClock, ResolverBuilder, ServiceResolver};
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

pub fn ep(host: &str) -> Endpoint {
    Endpoint::new(host, 80)
}

/// Returns a fixed endpoint list and counts calls.
pub struct CountingResolver {
    endpoints: Mutex<Vec<Endpoint>>,
    ttl_ms: Option<u64>,
    delay: Option<Duration>,
    calls: AtomicU64,
}

impl CountingResolver {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self {
            endpoints: Mutex::new(endpoints),
            ttl_ms: None,
            delay: None,
            calls: AtomicU64::new(0),
        }
    }

    pub fn with_reported_ttl(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = Some(ttl_ms);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_endpoints(&self, endpoints: Vec<Endpoint>) {
        *self.endpoints.lock().unwrap() = endpoints;
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EndpointResolver for CountingResolver {
    async fn resolve(&self, dsn: &str) -> Result<Vec<Endpoint>, DomainError> {
        Ok(self.resolve_with_ttl(dsn).await?.endpoints)
    }

    async fn resolve_with_ttl(&self, _dsn: &str) -> Result<ResolvedEndpoints, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let endpoints = self.endpoints.lock().unwrap().clone();
        let resolved = ResolvedEndpoints::new(endpoints);
        Ok(match self.ttl_ms {
            Some(ttl) => resolved.with_ttl(ttl),
            None => resolved,
        })
    }
}

/// Always rejects and counts calls.
pub struct FailingResolver {
    calls: AtomicU64,
}

impl FailingResolver {
    pub fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EndpointResolver for FailingResolver {
    async fn resolve(&self, dsn: &str) -> Result<Vec<Endpoint>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DomainError::resolution_failed(dsn, "upstream unavailable"))
    }
}

/// Name lookup with canned answers; unknown hosts fail.
pub struct StaticNameLookup {
    answers: Vec<(String, Vec<IpAddr>)>,
}

impl StaticNameLookup {
    pub fn new(answers: Vec<(&str, Vec<&str>)>) -> Self {
        Self {
            answers: answers
                .into_iter()
                .map(|(host, ips)| {
                    (
                        host.to_string(),
                        ips.into_iter().map(|ip| ip.parse().unwrap()).collect(),
                    )
                })
                .collect(),
        }
    }
}

#[async_trait]
impl NameLookup for StaticNameLookup {
    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, DomainError> {
        self.answers
            .iter()
            .find(|(known, _)| known == host)
            .map(|(_, ips)| ips.clone())
            .ok_or_else(|| DomainError::NoAddresses(host.to_string()))
    }
}

pub fn resolver_with(
    overrides: ResolverConfigOverrides,
    clock: Arc<ManualClock>,
    default_resolver: Arc<dyn EndpointResolver>,
) -> ServiceResolver {
    ResolverBuilder::new(overrides)
        .with_clock(clock)
        .with_default_resolver(default_resolver)
        .build()
}

pub fn opts() -> ResolveOptions {
    ResolveOptions::default()
}

/// Waits until an event matching `pred` arrives, failing after one second.
pub async fn wait_for_event<F>(rx: &mut UnboundedReceiver<ResolverEvent>, pred: F) -> ResolverEvent
where
    F: Fn(&ResolverEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            let event = rx.recv().await.expect("event channel closed");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

pub fn drain(rx: &mut UnboundedReceiver<ResolverEvent>) -> Vec<ResolverEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
