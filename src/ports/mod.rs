//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ValueProvider` - Observed value of an alternative on a criterion

mod value_provider;

pub use value_provider::ValueProvider;
