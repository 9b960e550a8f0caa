//! Preprocessing - Windowing, filtering, ordering and min-max scaling.

use tracing::debug;

use super::stats::min_max;
use super::{
    DecisionHistoryRecord, NumericField, NumericFields, PatternContext, PatternRecognitionConfig,
};
use crate::domain::foundation::{DomainError, Timestamp};

/// A record in scope, with its min-max scaled measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRecord {
    pub record: DecisionHistoryRecord,
    /// Fields whose min equals max keep their raw value.
    pub normalized: NumericFields,
}

/// History ready for the detectors: in window, in category, oldest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreparedHistory {
    pub records: Vec<PreparedRecord>,
    /// Categories the analysis was restricted to.
    pub categories: Vec<String>,
}

impl PreparedHistory {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Scaled values of `field`, skipping records without it.
    pub fn values(&self, field: NumericField) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|r| r.normalized.get(field))
            .collect()
    }

    /// Raw values of `field`, skipping records without it.
    pub fn raw_values(&self, field: NumericField) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.record.value(field)).collect()
    }

    /// Scaled values of two fields on records that carry both.
    pub fn pairs(&self, x: NumericField, y: NumericField) -> Vec<(f64, f64)> {
        self.records
            .iter()
            .filter_map(|r| Some((r.normalized.get(x)?, r.normalized.get(y)?)))
            .collect()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.records.iter().map(|r| r.record.timestamp)
    }

    pub fn time_range(&self) -> Option<(Timestamp, Timestamp)> {
        let first = self.records.first()?.record.timestamp;
        let last = self.records.last()?.record.timestamp;
        Some((first, last))
    }

    /// Context shared by every pattern found in this history.
    pub fn context(&self) -> PatternContext {
        PatternContext {
            time_range: self.time_range(),
            decision_categories: self.categories.clone(),
            ..PatternContext::default()
        }
    }
}

pub struct Preprocessor;

impl Preprocessor {
    /// Keeps records with `timestamp > reference - window` in an accepted
    /// category, sorts them by time and scales each numeric field.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid record, carrying its id.
    pub fn prepare(
        history: &[DecisionHistoryRecord],
        config: &PatternRecognitionConfig,
        reference: Timestamp,
    ) -> Result<PreparedHistory, DomainError> {
        for record in history {
            record.validate()?;
        }

        let window = config.window();
        let cutoff = reference.minus(window.duration());

        let mut kept: Vec<&DecisionHistoryRecord> = history
            .iter()
            .filter(|r| r.timestamp.is_after(&cutoff) && config.accepts_category(&r.category))
            .collect();
        kept.sort_by_key(|r| r.timestamp);

        let records = scale(&kept);

        debug!(
            input = history.len(),
            kept = records.len(),
            timeframe = %window,
            "Decision history preprocessed"
        );

        Ok(PreparedHistory {
            records,
            categories: config.decision_types.clone(),
        })
    }
}

fn scale(records: &[&DecisionHistoryRecord]) -> Vec<PreparedRecord> {
    let bounds: Vec<(NumericField, Option<(f64, f64)>)> = NumericField::ALL
        .iter()
        .map(|&field| {
            let values: Vec<f64> = records.iter().filter_map(|r| r.value(field)).collect();
            (field, min_max(&values))
        })
        .collect();

    records
        .iter()
        .map(|record| {
            let mut normalized = record.numeric_fields;
            for (field, range) in &bounds {
                if let (Some(value), Some((min, max))) = (record.value(*field), range) {
                    if max > min {
                        normalized.set(*field, Some((value - min) / (max - min)));
                    }
                }
            }
            PreparedRecord {
                record: (*record).clone(),
                normalized,
            }
        })
        .collect()
}
