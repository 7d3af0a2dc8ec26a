pub mod name_lookup;

pub use name_lookup::TokioNameLookup;
