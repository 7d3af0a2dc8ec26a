pub mod clock;
pub mod metrics;
pub mod storage;

pub use clock::{ManualClock, SystemClock};
pub use metrics::ResolverMetrics;
pub use storage::LruStore;
