pub mod emitter;

pub use emitter::{EventBus, EventListener, ListenerId, Subscription};
