#![allow(dead_code)]

use ferrous_sd_application::ports::CacheStore;
use ferrous_sd_domain::{CacheEntry, DomainError};
use ferrous_sd_infrastructure::dns::LruStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::time::Duration;

/// Wraps an `LruStore` and, once armed, parks the next reading call until
/// released.
///
/// `get` and `peek` park after reading, holding a snapshot. `update` and
/// `prune_expired` park before running, since their read and write are one
/// step. Anything another thread does while the caller is parked therefore
/// lands between its read and whatever it writes next.
pub struct GatedStore {
    inner: LruStore,
    armed: AtomicBool,
    reached: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

/// Test-side handle for a [`GatedStore`].
pub struct Gate {
    reached: Receiver<()>,
    release: Sender<()>,
}

impl Gate {
    /// Blocks until a caller is parked in the store.
    pub fn wait_parked(&self) {
        self.reached
            .recv_timeout(Duration::from_secs(1))
            .expect("no store call reached the gate");
    }

    pub fn release(&self) {
        self.release.send(()).expect("gated caller went away");
    }
}

impl GatedStore {
    pub fn new(capacity: usize) -> (Self, Gate) {
        let (reached_tx, reached_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let store = Self {
            inner: LruStore::new(capacity),
            armed: AtomicBool::new(false),
            reached: Mutex::new(reached_tx),
            release: Mutex::new(release_rx),
        };
        let gate = Gate {
            reached: reached_rx,
            release: release_tx,
        };
        (store, gate)
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    fn park(&self) {
        if !self.armed.swap(false, Ordering::SeqCst) {
            return;
        }
        let _ = self.reached.lock().unwrap().send(());
        let _ = self
            .release
            .lock()
            .unwrap()
            .recv_timeout(Duration::from_secs(1));
    }
}

impl CacheStore for GatedStore {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, DomainError> {
        let entry = self.inner.get(key);
        self.park();
        entry
    }

    fn peek(&self, key: &str) -> Result<Option<CacheEntry>, DomainError> {
        let entry = self.inner.peek(key);
        self.park();
        entry
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(&mut CacheEntry),
    ) -> Result<Option<CacheEntry>, DomainError> {
        self.park();
        self.inner.update(key, apply)
    }

    fn set(&self, key: &str, entry: CacheEntry) -> Result<Option<String>, DomainError> {
        self.inner.set(key, entry)
    }

    fn delete(&self, key: &str) -> Result<bool, DomainError> {
        self.inner.delete(key)
    }

    fn has(&self, key: &str) -> Result<bool, DomainError> {
        self.inner.has(key)
    }

    fn keys(&self) -> Result<Vec<String>, DomainError> {
        self.inner.keys()
    }

    fn size(&self) -> Result<usize, DomainError> {
        self.inner.size()
    }

    fn clear(&self) -> Result<(), DomainError> {
        self.inner.clear()
    }

    fn close(&self) -> Result<(), DomainError> {
        self.inner.close()
    }

    fn prune_expired(&self, now_ms: u64, grace_ms: u64) -> Result<Vec<String>, DomainError> {
        self.park();
        self.inner.prune_expired(now_ms, grace_ms)
    }
}
