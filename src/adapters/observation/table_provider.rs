//! Table-backed ValueProvider - Explicit observations.

use std::collections::HashMap;

use crate::domain::foundation::clamp_unit;
use crate::domain::scenario::Criterion;
use crate::ports::ValueProvider;

/// Serves observations from an explicit (alternative, criterion) table.
///
/// Pairs missing from the table fall back to the criterion's base value.
#[derive(Debug, Clone, Default)]
pub struct TableValueProvider {
    values: HashMap<(String, String), f64>,
}

impl TableValueProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observation.
    pub fn with(
        mut self,
        alternative: impl Into<String>,
        criterion: impl Into<String>,
        value: f64,
    ) -> Self {
        self.insert(alternative, criterion, value);
        self
    }

    /// Adds or replaces an observation.
    pub fn insert(
        &mut self,
        alternative: impl Into<String>,
        criterion: impl Into<String>,
        value: f64,
    ) {
        self.values
            .insert((alternative.into(), criterion.into()), value);
    }

    /// Number of explicit observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ValueProvider for TableValueProvider {
    fn observe(&self, alternative: &str, criterion_name: &str, criterion: &Criterion) -> f64 {
        let key = (alternative.to_string(), criterion_name.to_string());
        clamp_unit(self.values.get(&key).copied().unwrap_or(criterion.value))
    }
}
