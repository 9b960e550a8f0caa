//! PatternDetector - One family of pattern detection.
//!
//! The engine runs every registered detector whose type the request asks
//! for. Contextual, sequential and performance detection are extension
//! points: the built-in detectors for them find nothing, and callers
//! register their own through `PatternRecognitionEngine::with_detector`.

use super::{IdentifiedPattern, PatternSettings, PatternType, PreparedHistory};

pub trait PatternDetector: Send + Sync {
    /// Family of the patterns this detector reports.
    fn pattern_type(&self) -> PatternType;

    /// Candidate patterns in `history`. Frequency and confidence filtering
    /// happen afterwards.
    fn detect(
        &self,
        history: &PreparedHistory,
        settings: &PatternSettings,
    ) -> Vec<IdentifiedPattern>;
}

/// Context-dependent patterns. Finds nothing yet.
pub struct ContextualDetector;

impl PatternDetector for ContextualDetector {
    fn pattern_type(&self) -> PatternType {
        PatternType::Contextual
    }

    fn detect(&self, _: &PreparedHistory, _: &PatternSettings) -> Vec<IdentifiedPattern> {
        Vec::new()
    }
}

/// Recurring decision sequences. Finds nothing yet.
pub struct SequentialDetector;

impl PatternDetector for SequentialDetector {
    fn pattern_type(&self) -> PatternType {
        PatternType::Sequential
    }

    fn detect(&self, _: &PreparedHistory, _: &PatternSettings) -> Vec<IdentifiedPattern> {
        Vec::new()
    }
}

/// Outcome patterns. Finds nothing yet.
pub struct PerformanceDetector;

impl PatternDetector for PerformanceDetector {
    fn pattern_type(&self) -> PatternType {
        PatternType::Performance
    }

    fn detect(&self, _: &PreparedHistory, _: &PatternSettings) -> Vec<IdentifiedPattern> {
        Vec::new()
    }
}
