use ferrous_sd_application::ports::{HealthProbe, HealthReportPort};
use ferrous_sd_domain::{DomainError, Endpoint, HealthCheckConfig};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Probes every cached endpoint on a fixed interval and reports the results.
///
/// Probes of one round run concurrently, each bounded by `timeout_ms`; a
/// timed-out probe counts as a failure. Threshold handling is left to the
/// report port.
pub struct HealthProbeJob {
    reports: Arc<dyn HealthReportPort>,
    probe: Arc<dyn HealthProbe>,
    config: HealthCheckConfig,
    shutdown: CancellationToken,
}

/// Counts for one probing round.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProbeRoundOutcome {
    pub probed: usize,
    pub healthy: usize,
    pub failed: usize,
    pub changed: usize,
}

impl HealthProbeJob {
    pub fn new(
        reports: Arc<dyn HealthReportPort>,
        probe: Arc<dyn HealthProbe>,
        config: HealthCheckConfig,
    ) -> Self {
        Self {
            reports,
            probe,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        if !self.config.enabled {
            info!("Health checks disabled, probe job not started");
            return;
        }

        info!(
            interval_ms = self.config.interval_ms,
            timeout_ms = self.config.timeout_ms,
            "Starting health probe background job"
        );

        let job = Arc::clone(&self);
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_millis(job.config.interval_ms.max(1)));
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("HealthProbeJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match job.run_once().await {
                            Ok(outcome) => {
                                if outcome.changed > 0 {
                                    info!(
                                        probed = outcome.probed,
                                        failed = outcome.failed,
                                        changed = outcome.changed,
                                        "Health probe round completed"
                                    );
                                }
                            }
                            Err(e) => {
                                error!(error = %e, "Health probe round failed");
                            }
                        }
                    }
                }
            }
        });
    }

    pub async fn run_once(&self) -> Result<ProbeRoundOutcome, DomainError> {
        let targets = self.reports.health_targets()?;
        let timeout = Duration::from_millis(self.config.timeout_ms);

        let results = join_all(
            targets
                .iter()
                .map(|(_, endpoint)| self.probe_with_timeout(endpoint, timeout)),
        )
        .await;

        let mut outcome = ProbeRoundOutcome {
            probed: targets.len(),
            ..Default::default()
        };

        for ((dsn, endpoint), healthy) in targets.iter().zip(results) {
            if healthy {
                outcome.healthy += 1;
            } else {
                outcome.failed += 1;
            }
            if self.reports.record_health_check(dsn, endpoint, healthy)? {
                outcome.changed += 1;
            }
        }

        Ok(outcome)
    }

    async fn probe_with_timeout(&self, endpoint: &Endpoint, timeout: Duration) -> bool {
        match tokio::time::timeout(timeout, self.probe.probe(endpoint)).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                debug!(endpoint = %endpoint, error = %e, "Health probe failed");
                false
            }
            Err(_) => {
                debug!(endpoint = %endpoint, timeout_ms = timeout.as_millis() as u64, "Health probe timed out");
                false
            }
        }
    }
}
