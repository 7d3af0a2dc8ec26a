use ferrous_sd_domain::ResolverEvent;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};
use tokio::sync::mpsc;
use tracing::warn;

pub type EventListener = Arc<dyn Fn(&ResolverEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct Listeners {
    entries: RwLock<Vec<(ListenerId, EventListener)>>,
    next_id: AtomicU64,
}

impl Listeners {
    fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() != before
    }
}

/// Synchronous observer list for resolver lifecycle events.
///
/// Listeners run on the emitting task in registration order. A panicking
/// listener is caught and logged; the remaining listeners still run and the
/// resolver operation that emitted the event is unaffected.
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Arc<Listeners>,
}

/// Handle returned by [`EventBus::on`]. Dropping it keeps the listener
/// registered; call [`Subscription::unsubscribe`] to remove it.
#[derive(Debug)]
pub struct Subscription {
    id: ListenerId,
    listeners: Weak<Listeners>,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Returns false if the listener was already removed.
    pub fn unsubscribe(self) -> bool {
        self.listeners
            .upgrade()
            .map(|listeners| listeners.remove(self.id))
            .unwrap_or(false)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ResolverEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.listeners.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, Arc::new(listener)));

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Forwards every event into an unbounded channel.
    pub fn subscribe_channel(&self) -> (Subscription, mpsc::UnboundedReceiver<ResolverEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.on(move |event| {
            let _ = tx.send(event.clone());
        });
        (subscription, rx)
    }

    pub fn emit(&self, event: ResolverEvent) {
        // Snapshot so listeners can (un)subscribe without deadlocking.
        let snapshot: Vec<EventListener> = self
            .listeners
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener(&event))).is_err() {
                warn!(event = event.name(), "Event listener panicked");
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
