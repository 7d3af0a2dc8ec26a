use ferrous_sd_domain::{CacheEntry, DomainError};

/// Storage contract for resolved entries, keyed by DSN.
///
/// Implementations choose their own eviction policy. A missing key is never an
/// error: lookups return `Ok(None)`. Any `Err` is a backend failure and is
/// propagated to the caller of the resolver operation that hit it.
pub trait CacheStore: Send + Sync {
    /// Returns the entry and marks it as recently used.
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, DomainError>;

    /// Returns the entry without touching recency. Backends without that
    /// distinction can rely on the default.
    fn peek(&self, key: &str) -> Result<Option<CacheEntry>, DomainError> {
        self.get(key)
    }

    /// Applies `apply` to the entry in place and returns the updated copy, or
    /// `None` when the key is absent. The read, the mutation and the write-back
    /// must be one atomic step with respect to every other operation. Marks the
    /// entry as recently used.
    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(&mut CacheEntry),
    ) -> Result<Option<CacheEntry>, DomainError>;

    /// Inserts or replaces an entry. Returns the key evicted to make room for a
    /// new key, if any.
    fn set(&self, key: &str, entry: CacheEntry) -> Result<Option<String>, DomainError>;

    /// Returns whether the key existed.
    fn delete(&self, key: &str) -> Result<bool, DomainError>;

    fn has(&self, key: &str) -> Result<bool, DomainError>;

    fn keys(&self) -> Result<Vec<String>, DomainError>;

    fn size(&self) -> Result<usize, DomainError>;

    fn clear(&self) -> Result<(), DomainError>;

    fn close(&self) -> Result<(), DomainError>;

    /// Removes every entry whose `expires_at + grace_ms` is at or before
    /// `now_ms` and returns the removed keys.
    ///
    /// The default walks `keys` and deletes one entry at a time, so a write
    /// landing between the check and the delete can be lost. Backends with a
    /// single lock should override it.
    fn prune_expired(&self, now_ms: u64, grace_ms: u64) -> Result<Vec<String>, DomainError> {
        let mut removed = Vec::new();
        for key in self.keys()? {
            let Some(entry) = self.peek(&key)? else {
                continue;
            };
            if entry.is_past_grace_at(now_ms, grace_ms) && self.delete(&key)? {
                removed.push(key);
            }
        }
        Ok(removed)
    }
}
