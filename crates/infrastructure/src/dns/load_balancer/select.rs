use super::state::LoadBalanceState;
use ferrous_sd_domain::{Endpoint, LoadBalanceStrategy};
use tracing::trace;

/// Picks one endpoint for a call.
///
/// Only healthy endpoints are candidates. When none is healthy the first
/// endpoint of the full list is returned anyway; an empty list yields `None`.
pub fn select_endpoint<'a>(
    endpoints: &'a [Endpoint],
    strategy: LoadBalanceStrategy,
    state: &LoadBalanceState,
) -> Option<&'a Endpoint> {
    let healthy: Vec<&Endpoint> = endpoints.iter().filter(|e| e.healthy).collect();

    if healthy.is_empty() {
        let fallback = endpoints.first();
        if let Some(endpoint) = fallback {
            trace!(endpoint = %endpoint, "No healthy endpoint, falling back to first");
        }
        return fallback;
    }

    let selected = match strategy {
        LoadBalanceStrategy::RoundRobin => round_robin(&healthy, state),
        LoadBalanceStrategy::Random => random(&healthy),
        LoadBalanceStrategy::Weighted => weighted(&healthy),
        LoadBalanceStrategy::LeastConnections => least_connections(&healthy, state),
        LoadBalanceStrategy::PowerOfTwo => power_of_two(&healthy, state),
        LoadBalanceStrategy::Unrecognized => healthy[0],
    };

    trace!(strategy = strategy.as_str(), endpoint = %selected, "Selected endpoint");
    Some(selected)
}

/// Stable identity of an endpoint set: sorted `host:port` ids joined by `,`.
pub fn endpoint_set_key(endpoints: &[&Endpoint]) -> String {
    let mut ids: Vec<String> = endpoints.iter().map(|e| e.identity()).collect();
    ids.sort();
    ids.join(",")
}

fn round_robin<'a>(healthy: &[&'a Endpoint], state: &LoadBalanceState) -> &'a Endpoint {
    let key = endpoint_set_key(healthy);
    let index = state.next_round_robin(&key, healthy.len());
    healthy[index]
}

fn random<'a>(healthy: &[&'a Endpoint]) -> &'a Endpoint {
    healthy[fastrand::usize(..healthy.len())]
}

fn weighted<'a>(healthy: &[&'a Endpoint]) -> &'a Endpoint {
    let total: f64 = healthy.iter().map(|e| e.effective_weight()).sum();
    let mut remaining = fastrand::f64() * total;

    for &endpoint in healthy {
        remaining -= endpoint.effective_weight();
        if remaining <= 0.0 {
            return endpoint;
        }
    }

    // Floating-point overrun.
    healthy[healthy.len() - 1]
}

fn least_connections<'a>(healthy: &[&'a Endpoint], state: &LoadBalanceState) -> &'a Endpoint {
    let mut best = healthy[0];
    let mut best_count = state.active_connections(&best.identity());

    for &endpoint in &healthy[1..] {
        let count = state.active_connections(&endpoint.identity());
        if count < best_count {
            best = endpoint;
            best_count = count;
        }
    }

    best
}

fn power_of_two<'a>(healthy: &[&'a Endpoint], state: &LoadBalanceState) -> &'a Endpoint {
    if healthy.len() == 1 {
        return healthy[0];
    }

    let first = fastrand::usize(..healthy.len());
    let mut second = fastrand::usize(..healthy.len() - 1);
    if second >= first {
        second += 1;
    }

    let a = healthy[first];
    let b = healthy[second];
    if state.active_connections(&b.identity()) < state.active_connections(&a.identity()) {
        b
    } else {
        a
    }
}
