mod gated_store;
mod mock_resolvers;

pub use gated_store::*;
pub use mock_resolvers::*;
