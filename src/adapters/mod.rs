//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `observation` - Value providers (hash-based default, explicit tables)

pub mod observation;

pub use observation::{HashValueProvider, ObservationSettings, TableValueProvider};
