use super::Endpoint;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Skip the cache and resolve synchronously.
    pub force_refresh: bool,

    /// TTL for the entry produced by this call, clamped to the configured range.
    pub ttl_ms: Option<u64>,
}

impl ResolveOptions {
    pub fn force_refresh() -> Self {
        Self {
            force_refresh: true,
            ttl_ms: None,
        }
    }

    pub fn with_ttl(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = Some(ttl_ms);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolveResult {
    pub dsn: String,
    pub endpoints: Vec<Endpoint>,
    pub from_cache: bool,
    pub ttl_remaining_ms: u64,
    /// Set when the result was served from a negative entry.
    pub error: Option<String>,
}

/// Output of a resolution function.
///
/// `ttl_ms` is the record TTL reported by the source, if it knows one; it is
/// only honoured when the resolver is configured to respect DNS TTLs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedEndpoints {
    pub endpoints: Vec<Endpoint>,
    pub ttl_ms: Option<u64>,
}

impl ResolvedEndpoints {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self {
            endpoints,
            ttl_ms: None,
        }
    }

    pub fn with_ttl(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = Some(ttl_ms);
        self
    }
}
