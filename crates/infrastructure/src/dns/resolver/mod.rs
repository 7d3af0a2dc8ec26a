pub mod builder;
pub mod core;
pub mod fn_resolver;
mod maintenance;
pub mod revalidation;
pub mod system;

pub use builder::ResolverBuilder;
pub use self::core::ServiceResolver;
pub use fn_resolver::{resolver_fn, FnResolver};
pub use revalidation::{RevalidationGuard, RevalidationSet};
pub use system::SystemEndpointResolver;
