use ferrous_sd_application::ports::CacheMaintenancePort;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

const DEFAULT_PRUNE_INTERVAL_MS: u64 = 60_000;

pub struct CacheMaintenanceJob {
    maintenance: Arc<dyn CacheMaintenancePort>,
    prune_interval_ms: u64,
    shutdown: CancellationToken,
}

impl CacheMaintenanceJob {
    pub fn new(maintenance: Arc<dyn CacheMaintenancePort>) -> Self {
        Self {
            maintenance,
            prune_interval_ms: DEFAULT_PRUNE_INTERVAL_MS,
            shutdown: CancellationToken::new(),
        }
    }

    /// A zero interval is raised to 1 ms.
    pub fn with_interval_ms(mut self, prune_interval_ms: u64) -> Self {
        self.prune_interval_ms = prune_interval_ms.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            interval_ms = self.prune_interval_ms,
            "Starting cache maintenance background job"
        );

        let job = Arc::clone(&self);
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_millis(job.prune_interval_ms));
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("CacheMaintenanceJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => job.run_once(),
                }
            }
        });
    }

    pub fn run_once(&self) {
        match self.maintenance.prune_expired() {
            Ok(0) => {}
            Ok(removed) => {
                let cache_size = self.maintenance.cache_size().unwrap_or_default();
                info!(removed, cache_size, "Cache prune cycle completed");
            }
            Err(e) => {
                error!(error = %e, "Cache prune cycle failed");
            }
        }
    }
}
