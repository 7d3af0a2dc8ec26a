use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Resolution failed for {dsn}: {reason}")]
    ResolutionFailed { dsn: String, reason: String },

    #[error("Invalid DSN: {0}")]
    InvalidDsn(String),

    #[error("Name lookup timeout for {host}")]
    LookupTimeout { host: String },

    #[error("No addresses found for {0}")]
    NoAddresses(String),

    #[error("Cache store error: {0}")]
    Store(String),

    #[error("Cache store is closed")]
    StoreClosed,
}

impl DomainError {
    pub fn resolution_failed(dsn: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResolutionFailed {
            dsn: dsn.into(),
            reason: reason.into(),
        }
    }
}
