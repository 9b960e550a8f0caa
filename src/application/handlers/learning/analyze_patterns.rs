//! AnalyzePatternsHandler - Command handler for mining decision history.

use serde::Deserialize;
use tracing::info;

use crate::domain::foundation::DomainError;
use crate::domain::patterns::{
    DecisionHistoryRecord, PatternAnalysis, PatternRecognitionConfig, PatternRecognitionEngine,
    PatternSettings,
};

/// Command to analyze decision history
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzePatternsCommand {
    pub history: Vec<DecisionHistoryRecord>,
    #[serde(default)]
    pub config: PatternRecognitionConfig,
}

/// Error type for pattern analysis
#[derive(Debug, Clone)]
pub enum AnalyzePatternsError {
    /// A history record or the request configuration failed validation
    InvalidInput(DomainError),
    /// Any other domain failure
    Domain(DomainError),
}

impl std::fmt::Display for AnalyzePatternsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzePatternsError::InvalidInput(err) => write!(f, "Invalid history: {}", err),
            AnalyzePatternsError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AnalyzePatternsError {}

impl From<DomainError> for AnalyzePatternsError {
    fn from(err: DomainError) -> Self {
        if err.is_validation() {
            AnalyzePatternsError::InvalidInput(err)
        } else {
            AnalyzePatternsError::Domain(err)
        }
    }
}

/// Handler for pattern analysis.
pub struct AnalyzePatternsHandler {
    engine: PatternRecognitionEngine,
}

impl AnalyzePatternsHandler {
    pub fn new(settings: PatternSettings) -> Self {
        Self {
            engine: PatternRecognitionEngine::new(settings),
        }
    }

    /// Handler around a preconfigured engine, e.g. one with custom detectors.
    pub fn with_engine(engine: PatternRecognitionEngine) -> Self {
        Self { engine }
    }

    pub fn handle(
        &self,
        cmd: AnalyzePatternsCommand,
    ) -> Result<PatternAnalysis, AnalyzePatternsError> {
        let analysis = self.engine.analyze(&cmd.history, &cmd.config)?;

        info!(
            records = cmd.history.len(),
            analyzed = analysis.learning_metrics.total_decisions,
            patterns = analysis.identified_patterns.len(),
            timeframe = %cmd.config.window(),
            "Decision history analyzed"
        );

        Ok(analysis)
    }
}
