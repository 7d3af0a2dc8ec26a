use async_trait::async_trait;
use ferrous_sd_application::ports::EndpointResolver;
use ferrous_sd_domain::{DomainError, Endpoint};
use std::future::Future;
use std::sync::Arc;

/// Adapts an async closure into an [`EndpointResolver`].
pub struct FnResolver<F> {
    f: F,
}

impl<F> FnResolver<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> EndpointResolver for FnResolver<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<Endpoint>, DomainError>> + Send + 'static,
{
    async fn resolve(&self, dsn: &str) -> Result<Vec<Endpoint>, DomainError> {
        (self.f)(dsn.to_string()).await
    }
}

pub fn resolver_fn<F, Fut>(f: F) -> Arc<dyn EndpointResolver>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<Endpoint>, DomainError>> + Send + 'static,
{
    Arc::new(FnResolver::new(f))
}
