use ferrous_sd_domain::{Endpoint, LoadBalanceStrategy};
use ferrous_sd_infrastructure::dns::{select_endpoint, LoadBalanceState};

mod helpers;
use helpers::ep;

fn pick_hosts(
    endpoints: &[Endpoint],
    strategy: LoadBalanceStrategy,
    state: &LoadBalanceState,
    n: usize,
) -> Vec<String> {
    (0..n)
        .map(|_| {
            select_endpoint(endpoints, strategy, state)
                .unwrap()
                .host
                .clone()
        })
        .collect()
}

#[test]
fn test_round_robin_cycles_in_order() {
    let state = LoadBalanceState::new();
    let endpoints = vec![ep("A"), ep("B"), ep("C")];

    assert_eq!(
        pick_hosts(&endpoints, LoadBalanceStrategy::RoundRobin, &state, 6),
        vec!["A", "B", "C", "A", "B", "C"]
    );
}

#[test]
fn test_round_robin_skips_unhealthy() {
    let state = LoadBalanceState::new();
    let endpoints = vec![ep("A"), ep("B").with_healthy(false), ep("C")];

    assert_eq!(
        pick_hosts(&endpoints, LoadBalanceStrategy::RoundRobin, &state, 4),
        vec!["A", "C", "A", "C"]
    );
}

#[test]
fn test_round_robin_cursor_shared_by_same_endpoint_set() {
    let state = LoadBalanceState::new();
    let first = vec![ep("A"), ep("B")];
    let reordered = vec![ep("B"), ep("A")];

    let one = select_endpoint(&first, LoadBalanceStrategy::RoundRobin, &state).unwrap();
    assert_eq!(one.host, "A");
    // Same identity set, so the shared cursor now points at slot 1.
    let two = select_endpoint(&reordered, LoadBalanceStrategy::RoundRobin, &state).unwrap();
    assert_eq!(two.host, "A");
    assert_eq!(state.round_robin_cursor("A:80,B:80"), Some(0));
}

#[test]
fn test_weighted_respects_ratio() {
    let state = LoadBalanceState::new();
    let endpoints = vec![ep("A").with_weight(10.0), ep("B").with_weight(1.0)];

    let picks = pick_hosts(&endpoints, LoadBalanceStrategy::Weighted, &state, 1000);
    let a = picks.iter().filter(|h| h.as_str() == "A").count();
    let b = picks.iter().filter(|h| h.as_str() == "B").count();

    assert_eq!(a + b, 1000);
    assert!(a > 5 * b, "A={a} B={b}");
}

#[test]
fn test_least_connections_picks_minimum() {
    let state = LoadBalanceState::new();
    state.set_connections("A:80", 5);
    state.set_connections("B:80", 2);
    state.set_connections("C:80", 8);
    let endpoints = vec![ep("A"), ep("B"), ep("C")];

    let selected =
        select_endpoint(&endpoints, LoadBalanceStrategy::LeastConnections, &state).unwrap();
    assert_eq!(selected.host, "B");
}

#[test]
fn test_least_connections_ties_go_to_first() {
    let state = LoadBalanceState::new();
    let endpoints = vec![ep("A"), ep("B")];

    let selected =
        select_endpoint(&endpoints, LoadBalanceStrategy::LeastConnections, &state).unwrap();
    assert_eq!(selected.host, "A");
}

#[test]
fn test_power_of_two_avoids_loaded_endpoint() {
    let state = LoadBalanceState::new();
    state.set_connections("A:80", 100);
    let endpoints = vec![ep("A"), ep("B"), ep("C")];

    let picks = pick_hosts(&endpoints, LoadBalanceStrategy::PowerOfTwo, &state, 1000);
    let loaded = picks.iter().filter(|h| h.as_str() == "A").count();

    // A always loses against whichever idle endpoint it is paired with.
    assert_eq!(loaded, 0);
}

#[test]
fn test_power_of_two_single_candidate() {
    let state = LoadBalanceState::new();
    let endpoints = vec![ep("A").with_healthy(false), ep("B")];

    let selected = select_endpoint(&endpoints, LoadBalanceStrategy::PowerOfTwo, &state).unwrap();
    assert_eq!(selected.host, "B");
}

#[test]
fn test_random_only_returns_healthy() {
    let state = LoadBalanceState::new();
    let endpoints = vec![ep("A"), ep("B").with_healthy(false), ep("C")];

    for host in pick_hosts(&endpoints, LoadBalanceStrategy::Random, &state, 200) {
        assert_ne!(host, "B");
    }
}

#[test]
fn test_empty_list_selects_nothing() {
    let state = LoadBalanceState::new();
    for strategy in [
        LoadBalanceStrategy::RoundRobin,
        LoadBalanceStrategy::Random,
        LoadBalanceStrategy::Weighted,
        LoadBalanceStrategy::LeastConnections,
        LoadBalanceStrategy::PowerOfTwo,
    ] {
        assert!(select_endpoint(&[], strategy, &state).is_none());
    }
}

#[test]
fn test_all_unhealthy_falls_back_to_first() {
    let state = LoadBalanceState::new();
    let endpoints = vec![ep("A").with_healthy(false), ep("B").with_healthy(false)];

    let selected = select_endpoint(&endpoints, LoadBalanceStrategy::Random, &state).unwrap();
    assert_eq!(selected.host, "A");
}

#[test]
fn test_connection_counters_saturate_at_zero() {
    let state = LoadBalanceState::new();
    assert_eq!(state.decrement_connections("A:80"), 0);
    assert_eq!(state.increment_connections("A:80"), 1);
    assert_eq!(state.increment_connections("A:80"), 2);
    assert_eq!(state.decrement_connections("A:80"), 1);
    assert_eq!(state.decrement_connections("A:80"), 0);
    assert_eq!(state.decrement_connections("A:80"), 0);
}

#[test]
fn test_concurrent_round_robin_loses_no_updates() {
    use std::sync::Arc;

    let state = Arc::new(LoadBalanceState::new());
    let endpoints = Arc::new(vec![ep("A"), ep("B"), ep("C"), ep("D")]);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let state = Arc::clone(&state);
            let endpoints = Arc::clone(&endpoints);
            std::thread::spawn(move || {
                let mut counts = [0usize; 4];
                for _ in 0..100 {
                    let selected =
                        select_endpoint(&endpoints, LoadBalanceStrategy::RoundRobin, &state)
                            .unwrap();
                    let slot = endpoints.iter().position(|e| e == selected).unwrap();
                    counts[slot] += 1;
                }
                counts
            })
        })
        .collect();

    let mut totals = [0usize; 4];
    for handle in handles {
        for (total, count) in totals.iter_mut().zip(handle.join().unwrap()) {
            *total += count;
        }
    }

    assert_eq!(totals, [100, 100, 100, 100]);
}
