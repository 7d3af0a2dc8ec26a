use super::Endpoint;
use serde::{Deserialize, Serialize};

/// Cached resolution result for one DSN.
///
/// `expires_at` is always `resolved_at + ttl_ms`. A negative entry (failed
/// resolution) has no endpoints and carries the failure message in `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub dsn: String,
    pub endpoints: Vec<Endpoint>,
    pub resolved_at: u64,
    pub expires_at: u64,
    pub ttl_ms: u64,
    pub hit_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Where a cache entry sits relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Fresh,
    Stale,
    Expired,
}

impl CacheEntry {
    pub fn new(dsn: impl Into<String>, endpoints: Vec<Endpoint>, now_ms: u64, ttl_ms: u64) -> Self {
        Self {
            dsn: dsn.into(),
            endpoints,
            resolved_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
            ttl_ms,
            hit_count: 0,
            error: None,
        }
    }

    pub fn negative(dsn: impl Into<String>, error: impl Into<String>, now_ms: u64, ttl_ms: u64) -> Self {
        let mut entry = Self::new(dsn, Vec::new(), now_ms, ttl_ms);
        entry.error = Some(error.into());
        entry
    }

    pub fn is_negative(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        is_expired(self.expires_at, now_ms)
    }

    /// True once the entry can no longer be served, stale window included.
    /// With `grace_ms == 0` this is the same as [`Self::is_expired_at`].
    pub fn is_past_grace_at(&self, now_ms: u64, grace_ms: u64) -> bool {
        !is_within_grace_period(self.expires_at, grace_ms, now_ms)
    }

    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at.saturating_sub(now_ms)
    }

    /// Classifies the entry. The stale window only exists when
    /// stale-while-revalidate is enabled.
    pub fn state_at(&self, now_ms: u64, stale_while_revalidate: bool, grace_ms: u64) -> EntryState {
        if !self.is_expired_at(now_ms) {
            EntryState::Fresh
        } else if stale_while_revalidate && is_within_grace_period(self.expires_at, grace_ms, now_ms)
        {
            EntryState::Stale
        } else {
            EntryState::Expired
        }
    }

    pub fn healthy_count(&self) -> usize {
        self.endpoints.iter().filter(|e| e.healthy).count()
    }

    pub fn unhealthy_count(&self) -> usize {
        self.endpoints.len() - self.healthy_count()
    }
}

/// Clamps a TTL into `[min_ms, max_ms]`.
///
/// A misconfigured range (`min_ms > max_ms`) resolves to `max_ms` instead of
/// panicking like `Ord::clamp` would.
pub fn clamp_ttl(ttl_ms: u64, min_ms: u64, max_ms: u64) -> u64 {
    ttl_ms.max(min_ms).min(max_ms)
}

pub fn is_expired(expires_at: u64, now_ms: u64) -> bool {
    now_ms >= expires_at
}

pub fn is_within_grace_period(expires_at: u64, grace_ms: u64, now_ms: u64) -> bool {
    now_ms < expires_at.saturating_add(grace_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_ttl_stays_within_bounds() {
        for ttl in [0, 1, 999, 1_000, 5_000, 300_000, 300_001, u64::MAX] {
            let clamped = clamp_ttl(ttl, 1_000, 300_000);
            assert!((1_000..=300_000).contains(&clamped), "ttl {ttl} -> {clamped}");
        }
    }

    #[test]
    fn test_clamp_ttl_identity_in_range() {
        assert_eq!(clamp_ttl(60_000, 1_000, 300_000), 60_000);
        assert_eq!(clamp_ttl(1_000, 1_000, 300_000), 1_000);
        assert_eq!(clamp_ttl(300_000, 1_000, 300_000), 300_000);
    }

    #[test]
    fn test_clamp_ttl_is_monotonic() {
        let mut previous = 0;
        for ttl in (0..400_000).step_by(997) {
            let clamped = clamp_ttl(ttl, 1_000, 300_000);
            assert!(clamped >= previous);
            previous = clamped;
        }
    }

    #[test]
    fn test_is_expired_boundary() {
        assert!(!is_expired(1_000, 999));
        assert!(is_expired(1_000, 1_000));
        assert!(is_expired(1_000, 1_001));
    }

    #[test]
    fn test_grace_period_window() {
        assert!(is_within_grace_period(1_000, 5_000, 5_999));
        assert!(!is_within_grace_period(1_000, 5_000, 6_000));
        assert!(!is_within_grace_period(1_000, 0, 1_000));
        assert!(is_within_grace_period(1_000, 0, 999));
    }

    #[test]
    fn test_entry_state_transitions() {
        let entry = CacheEntry::new("svc", vec![Endpoint::new("10.0.0.1", 80)], 0, 1_000);

        assert_eq!(entry.state_at(500, true, 5_000), EntryState::Fresh);
        assert_eq!(entry.state_at(1_000, true, 5_000), EntryState::Stale);
        assert_eq!(entry.state_at(5_999, true, 5_000), EntryState::Stale);
        assert_eq!(entry.state_at(6_000, true, 5_000), EntryState::Expired);
        assert_eq!(entry.state_at(1_000, false, 5_000), EntryState::Expired);
    }

    #[test]
    fn test_past_grace_matches_expired_state() {
        let entry = CacheEntry::new("svc", vec![Endpoint::new("10.0.0.1", 80)], 0, 1_000);

        assert!(!entry.is_past_grace_at(5_999, 5_000));
        assert!(entry.is_past_grace_at(6_000, 5_000));
        assert_eq!(entry.is_past_grace_at(999, 0), entry.is_expired_at(999));
        assert_eq!(entry.is_past_grace_at(1_000, 0), entry.is_expired_at(1_000));
    }

    #[test]
    fn test_negative_entry_has_no_endpoints() {
        let entry = CacheEntry::negative("svc", "boom", 10, 30_000);
        assert!(entry.is_negative());
        assert!(entry.endpoints.is_empty());
        assert_eq!(entry.expires_at, 30_010);
    }
}
