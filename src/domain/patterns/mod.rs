//! Patterns module - Learning from past decisions.
//!
//! `PatternRecognitionEngine` mines caller-supplied decision history for
//! regularities:
//!
//! - `TemporalDetector` - daily/weekly cycles and trends
//! - `BehavioralDetector` - risk, speed and confidence styles
//! - `CorrelationDetector` - pairwise Pearson correlation
//! - `ContextualDetector`, `SequentialDetector`, `PerformanceDetector` -
//!   extension points
//!
//! Surviving patterns feed `LearningMetrics`, recommendations and
//! `PatternLayout` hints.

mod behavioral;
mod config;
mod correlation;
mod detector;
mod engine;
mod history;
mod layout;
mod learning;
mod pattern;
mod preprocess;
mod settings;
pub mod stats;
mod temporal;

pub use behavioral::{consistency, BehavioralDetector};
pub use config::{LearningGoal, LearningMode, PatternRecognitionConfig, PatternType, Timeframe};
pub use correlation::{CorrelationDetector, FieldCorrelation};
pub use detector::{ContextualDetector, PatternDetector, PerformanceDetector, SequentialDetector};
pub use engine::{filter_significant, PatternAnalysis, PatternRecognitionEngine};
pub use history::{DecisionHistoryRecord, NumericField, NumericFields};
pub use layout::PatternLayout;
pub use learning::{adaptation_speed, recommendations, LearningMetrics};
pub use pattern::{IdentifiedPattern, PatternContext, PatternVariable, VariableKind};
pub use preprocess::{PreparedHistory, PreparedRecord, Preprocessor};
pub use settings::PatternSettings;
pub use temporal::{cyclical_strength, TemporalDetector};
