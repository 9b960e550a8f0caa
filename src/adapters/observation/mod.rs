//! Observation Adapters - ValueProvider implementations.
//!
//! - `HashValueProvider` - deterministic hash-based default
//! - `TableValueProvider` - explicit observation table

mod hash_provider;
mod table_provider;

pub use hash_provider::{HashValueProvider, ObservationSettings};
pub use table_provider::TableValueProvider;
