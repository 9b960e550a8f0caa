//! Pattern recognition request configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UnitInterval, ValidationError};

/// Named analysis window ending at the reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1_day")]
    OneDay,
    #[serde(rename = "1_week")]
    OneWeek,
    #[serde(rename = "1_month")]
    OneMonth,
    #[default]
    #[serde(rename = "3_months")]
    ThreeMonths,
    #[serde(rename = "6_months")]
    SixMonths,
    #[serde(rename = "1_year")]
    OneYear,
}

impl Timeframe {
    pub fn token(&self) -> &'static str {
        match self {
            Self::OneDay => "1_day",
            Self::OneWeek => "1_week",
            Self::OneMonth => "1_month",
            Self::ThreeMonths => "3_months",
            Self::SixMonths => "6_months",
            Self::OneYear => "1_year",
        }
    }

    /// Window length. Months are 30 days, years 365.
    pub fn duration(&self) -> Duration {
        let days = match self {
            Self::OneDay => 1,
            Self::OneWeek => 7,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 365,
        };
        Duration::days(days)
    }

    /// Parses a token, falling back to the default window with a warning.
    pub fn resolve(token: &str) -> Self {
        token.parse().unwrap_or_else(|err: DomainError| {
            warn!(
                timeframe = token,
                fallback = Self::default().token(),
                error = %err,
                "Unknown timeframe, using default"
            );
            Self::default()
        })
    }
}

impl FromStr for Timeframe {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1_day" => Ok(Self::OneDay),
            "1_week" => Ok(Self::OneWeek),
            "1_month" => Ok(Self::OneMonth),
            "3_months" => Ok(Self::ThreeMonths),
            "6_months" => Ok(Self::SixMonths),
            "1_year" => Ok(Self::OneYear),
            other => Err(DomainError::new(
                ErrorCode::UnknownTimeframe,
                format!("Unknown timeframe '{}'", other),
            )),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Family a pattern belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Temporal,
    Behavioral,
    Contextual,
    Correlation,
    Sequential,
    Performance,
}

impl PatternType {
    pub const ALL: [PatternType; 6] = [
        Self::Temporal,
        Self::Behavioral,
        Self::Contextual,
        Self::Correlation,
        Self::Sequential,
        Self::Performance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temporal => "temporal",
            Self::Behavioral => "behavioral",
            Self::Contextual => "contextual",
            Self::Correlation => "correlation",
            Self::Sequential => "sequential",
            Self::Performance => "performance",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningMode {
    Supervised,
    Unsupervised,
    #[default]
    Adaptive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningGoal {
    #[default]
    Accuracy,
    Speed,
    Robustness,
}

/// What to analyze and how strict to be.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRecognitionConfig {
    /// Window token such as `3_months`. Unknown tokens fall back to the
    /// default window.
    #[serde(default = "default_timeframe")]
    pub timeframe: String,

    /// Categories to keep. Empty keeps every category.
    #[serde(default)]
    pub decision_types: Vec<String>,

    #[serde(default)]
    pub learning_mode: LearningMode,

    #[serde(default)]
    pub optimization_goal: LearningGoal,

    #[serde(default = "default_pattern_types")]
    pub pattern_types: Vec<PatternType>,

    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// End of the analysis window. Defaults to the time of the call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_time: Option<Timestamp>,
}

fn default_timeframe() -> String {
    Timeframe::default().token().to_string()
}

fn default_pattern_types() -> Vec<PatternType> {
    PatternType::ALL.to_vec()
}

fn default_min_confidence() -> f64 {
    0.6
}

impl Default for PatternRecognitionConfig {
    fn default() -> Self {
        Self {
            timeframe: default_timeframe(),
            decision_types: Vec::new(),
            learning_mode: LearningMode::default(),
            optimization_goal: LearningGoal::default(),
            pattern_types: default_pattern_types(),
            min_confidence: default_min_confidence(),
            reference_time: None,
        }
    }
}

impl PatternRecognitionConfig {
    pub fn with_timeframe(mut self, timeframe: impl Into<String>) -> Self {
        self.timeframe = timeframe.into();
        self
    }

    pub fn with_pattern_types(mut self, pattern_types: Vec<PatternType>) -> Self {
        self.pattern_types = pattern_types;
        self
    }

    pub fn with_decision_types(mut self, decision_types: Vec<impl Into<String>>) -> Self {
        self.decision_types = decision_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_reference_time(mut self, reference_time: Timestamp) -> Self {
        self.reference_time = Some(reference_time);
        self
    }

    /// Resolved window.
    pub fn window(&self) -> Timeframe {
        Timeframe::resolve(&self.timeframe)
    }

    /// Minimum confidence, checked to lie in [0, 1].
    pub fn min_confidence(&self) -> Result<UnitInterval, ValidationError> {
        UnitInterval::try_new("min_confidence", self.min_confidence)
    }

    pub fn includes(&self, pattern_type: PatternType) -> bool {
        self.pattern_types.contains(&pattern_type)
    }

    /// Whether a record of `category` is in scope.
    pub fn accepts_category(&self, category: &str) -> bool {
        self.decision_types.is_empty() || self.decision_types.iter().any(|t| t == category)
    }
}
