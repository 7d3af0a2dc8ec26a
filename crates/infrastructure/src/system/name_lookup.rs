use async_trait::async_trait;
use ferrous_sd_application::ports::NameLookup;
use ferrous_sd_domain::DomainError;
use std::net::IpAddr;
use std::time::Duration;

const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves hostnames through the operating system resolver.
pub struct TokioNameLookup {
    timeout: Duration,
}

impl TokioNameLookup {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioNameLookup {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKUP_TIMEOUT)
    }
}

#[async_trait]
impl NameLookup for TokioNameLookup {
    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, DomainError> {
        // lookup_host wants a socket address; the port is discarded.
        let target = if host.contains(':') {
            format!("[{}]:0", host)
        } else {
            format!("{}:0", host)
        };

        let addrs_iter = tokio::time::timeout(self.timeout, tokio::net::lookup_host(&target))
            .await
            .map_err(|_| DomainError::LookupTimeout {
                host: host.to_string(),
            })?
            .map_err(|e| {
                DomainError::resolution_failed(host, format!("name lookup failed: {}", e))
            })?;

        let mut addrs: Vec<IpAddr> = Vec::new();
        for addr in addrs_iter {
            if !addrs.contains(&addr.ip()) {
                addrs.push(addr.ip());
            }
        }

        if addrs.is_empty() {
            return Err(DomainError::NoAddresses(host.to_string()));
        }

        Ok(addrs)
    }
}
