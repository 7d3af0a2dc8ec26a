use crate::system::TokioNameLookup;
use async_trait::async_trait;
use ferrous_sd_application::ports::{EndpointResolver, NameLookup};
use ferrous_sd_domain::{DomainError, DsnTarget, Endpoint};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default resolution function: parses the DSN and asks the system resolver
/// for the host's addresses.
///
/// A failed lookup is not an error here. The DSN is then treated as a literal
/// address with the parsed port (or 80), which keeps IP-literal DSNs and
/// hosts file entries working when the lookup collaborator is unavailable.
pub struct SystemEndpointResolver {
    lookup: Arc<dyn NameLookup>,
}

impl SystemEndpointResolver {
    pub fn new(lookup: Arc<dyn NameLookup>) -> Self {
        Self { lookup }
    }
}

impl Default for SystemEndpointResolver {
    fn default() -> Self {
        Self::new(Arc::new(TokioNameLookup::default()))
    }
}

#[async_trait]
impl EndpointResolver for SystemEndpointResolver {
    async fn resolve(&self, dsn: &str) -> Result<Vec<Endpoint>, DomainError> {
        let target = DsnTarget::parse(dsn)?;
        let port = target.port_or_default();

        match self.lookup.lookup(&target.host).await {
            Ok(addrs) => {
                debug!(dsn = %dsn, host = %target.host, addresses = addrs.len(), "Name lookup succeeded");
                Ok(addrs
                    .into_iter()
                    .map(|ip| Endpoint::new(ip.to_string(), port))
                    .collect())
            }
            Err(e) => {
                warn!(
                    dsn = %dsn,
                    host = %target.host,
                    error = %e,
                    "Name lookup failed, using DSN as literal address"
                );
                Ok(vec![Endpoint::new(target.host, port)])
            }
        }
    }
}
