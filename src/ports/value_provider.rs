//! ValueProvider port - Observed performance of an alternative on a criterion.

use crate::domain::scenario::Criterion;

/// Source of observed values for (alternative, criterion) pairs.
///
/// Scoring pipelines never compute observations themselves; they ask a
/// provider. Production deployments inject a telemetry-backed provider,
/// tests inject explicit tables.
///
/// Implementations must be deterministic for a given input within a
/// process, and should return values in [0, 1]. Callers clamp whatever
/// is returned.
pub trait ValueProvider: Send + Sync {
    /// Observed value of `alternative` on the criterion named
    /// `criterion_name`.
    fn observe(&self, alternative: &str, criterion_name: &str, criterion: &Criterion) -> f64;
}
