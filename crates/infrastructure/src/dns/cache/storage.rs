use ferrous_sd_application::ports::CacheStore;
use ferrous_sd_domain::{CacheEntry, DomainError};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// In-process bounded store with least-recently-used eviction.
///
/// A single mutex guards the LRU list, so `get` (which reorders), the
/// eviction decision and the insert of `set` are atomic with respect to each
/// other: two concurrent inserts can never both evict for the same slot.
pub struct LruStore {
    entries: Mutex<LruCache<String, CacheEntry>>,
    capacity: usize,
    closed: AtomicBool,
    evictions: AtomicU64,
}

impl LruStore {
    pub fn new(max_entries: usize) -> Self {
        let capacity = match NonZeroUsize::new(max_entries) {
            Some(capacity) => capacity,
            None => {
                warn!(max_entries, "Store capacity must be positive; using 1");
                NonZeroUsize::MIN
            }
        };

        info!(max_entries = capacity.get(), "Initializing LRU store");

        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            capacity: capacity.get(),
            closed: AtomicBool::new(false),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(AtomicOrdering::Relaxed)
    }

    fn lock(&self) -> Result<MutexGuard<'_, LruCache<String, CacheEntry>>, DomainError> {
        if self.closed.load(AtomicOrdering::Acquire) {
            return Err(DomainError::StoreClosed);
        }
        self.entries
            .lock()
            .map_err(|_| DomainError::Store("store lock poisoned".to_string()))
    }
}

impl CacheStore for LruStore {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, DomainError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn peek(&self, key: &str) -> Result<Option<CacheEntry>, DomainError> {
        Ok(self.lock()?.peek(key).cloned())
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(&mut CacheEntry),
    ) -> Result<Option<CacheEntry>, DomainError> {
        let mut entries = self.lock()?;
        Ok(entries.get_mut(key).map(|entry| {
            apply(entry);
            entry.clone()
        }))
    }

    fn set(&self, key: &str, entry: CacheEntry) -> Result<Option<String>, DomainError> {
        let mut entries = self.lock()?;

        if let Some(existing) = entries.get_mut(key) {
            *existing = entry;
            return Ok(None);
        }

        let evicted = match entries.push(key.to_string(), entry) {
            Some((evicted_key, _)) if evicted_key != key => Some(evicted_key),
            _ => None,
        };

        if let Some(ref evicted_key) = evicted {
            self.evictions.fetch_add(1, AtomicOrdering::Relaxed);
            debug!(evicted = %evicted_key, inserted = %key, "Store at capacity, evicted LRU entry");
        }

        Ok(evicted)
    }

    fn delete(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.lock()?.pop(key).is_some())
    }

    fn has(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.lock()?.contains(key))
    }

    fn keys(&self) -> Result<Vec<String>, DomainError> {
        Ok(self.lock()?.iter().map(|(k, _)| k.clone()).collect())
    }

    fn size(&self) -> Result<usize, DomainError> {
        Ok(self.lock()?.len())
    }

    fn clear(&self) -> Result<(), DomainError> {
        self.lock()?.clear();
        Ok(())
    }

    fn close(&self) -> Result<(), DomainError> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
        self.closed.store(true, AtomicOrdering::Release);
        Ok(())
    }

    fn prune_expired(&self, now_ms: u64, grace_ms: u64) -> Result<Vec<String>, DomainError> {
        let mut entries = self.lock()?;

        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.is_past_grace_at(now_ms, grace_ms))
            .map(|(k, _)| k.clone())
            .collect();

        for key in &expired {
            entries.pop(key.as_str());
        }

        if !expired.is_empty() {
            debug!(removed = expired.len(), remaining = entries.len(), "Pruned expired entries");
        }

        Ok(expired)
    }
}
