//! EvaluateScenarioHandler - Command handler for ranking a scenario.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::DomainError;
use crate::domain::fuzzy::{DecisionResult, FuzzyDecisionEngine, FuzzySettings};
use crate::domain::matrix::{
    Ahp, AhpOutcome, MatrixSettings, OptimizationGoal, PairwiseMatrix, SensitivityAnalyzer,
    SensitivityResult, Topsis, WeightOptimization, WeightOptimizer,
};
use crate::domain::scenario::{AlternativeRanking, Scenario};
use crate::ports::ValueProvider;

/// Ranking method to apply.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum DecisionMethod {
    /// Fuzzy aggregation with reasoning trace.
    #[default]
    Fuzzy,
    Topsis,
    /// AHP, synthesising criterion comparisons from weights unless supplied.
    Ahp {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comparisons: Option<PairwiseMatrix>,
    },
    Sensitivity,
    OptimizeWeights {
        #[serde(default)]
        goal: OptimizationGoal,
    },
}

impl DecisionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fuzzy => "fuzzy",
            Self::Topsis => "topsis",
            Self::Ahp { .. } => "ahp",
            Self::Sensitivity => "sensitivity",
            Self::OptimizeWeights { .. } => "optimize_weights",
        }
    }
}

/// Command to evaluate a scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateScenarioCommand {
    pub scenario: Scenario,
    #[serde(flatten)]
    pub method: DecisionMethod,
}

/// Result of a successful evaluation, one variant per method.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", content = "result", rename_all = "snake_case")]
pub enum EvaluateScenarioResult {
    Fuzzy(DecisionResult),
    Topsis(Vec<AlternativeRanking>),
    Ahp(AhpOutcome),
    Sensitivity(SensitivityResult),
    OptimizeWeights(WeightOptimization),
}

impl EvaluateScenarioResult {
    /// Rankings the method produced, best first.
    pub fn rankings(&self) -> &[AlternativeRanking] {
        match self {
            Self::Fuzzy(result) => &result.ranked_alternatives,
            Self::Topsis(rankings) => rankings,
            Self::Ahp(outcome) => &outcome.rankings,
            Self::Sensitivity(result) => &result.baseline,
            Self::OptimizeWeights(optimization) => &optimization.rankings,
        }
    }

    pub fn winner(&self) -> Option<&str> {
        self.rankings().first().map(|r| r.alternative.as_str())
    }
}

/// Error type for evaluating a scenario
#[derive(Debug, Clone)]
pub enum EvaluateScenarioError {
    /// Scenario or method parameters failed validation
    InvalidInput(DomainError),
    /// Any other domain failure
    Domain(DomainError),
}

impl std::fmt::Display for EvaluateScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluateScenarioError::InvalidInput(err) => write!(f, "Invalid scenario: {}", err),
            EvaluateScenarioError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for EvaluateScenarioError {}

impl From<DomainError> for EvaluateScenarioError {
    fn from(err: DomainError) -> Self {
        if err.is_validation() {
            EvaluateScenarioError::InvalidInput(err)
        } else {
            EvaluateScenarioError::Domain(err)
        }
    }
}

/// Handler for evaluating scenarios.
pub struct EvaluateScenarioHandler {
    provider: Arc<dyn ValueProvider>,
    fuzzy: FuzzySettings,
    matrix: MatrixSettings,
}

impl EvaluateScenarioHandler {
    pub fn new(
        provider: Arc<dyn ValueProvider>,
        fuzzy: FuzzySettings,
        matrix: MatrixSettings,
    ) -> Self {
        Self {
            provider,
            fuzzy,
            matrix,
        }
    }

    pub fn handle(
        &self,
        cmd: EvaluateScenarioCommand,
    ) -> Result<EvaluateScenarioResult, EvaluateScenarioError> {
        let provider = self.provider.as_ref();
        let scenario = &cmd.scenario;

        let result = match &cmd.method {
            DecisionMethod::Fuzzy => EvaluateScenarioResult::Fuzzy(
                FuzzyDecisionEngine::new(provider, self.fuzzy.clone()).execute(scenario)?,
            ),
            DecisionMethod::Topsis => {
                EvaluateScenarioResult::Topsis(Topsis::rank(scenario, provider)?)
            }
            DecisionMethod::Ahp { comparisons } => EvaluateScenarioResult::Ahp(Ahp::rank(
                scenario,
                provider,
                comparisons.as_ref(),
                &self.matrix,
            )?),
            DecisionMethod::Sensitivity => EvaluateScenarioResult::Sensitivity(
                SensitivityAnalyzer::analyze(scenario, provider, &self.matrix)?,
            ),
            DecisionMethod::OptimizeWeights { goal } => EvaluateScenarioResult::OptimizeWeights(
                WeightOptimizer::optimize(scenario, provider, *goal, &self.matrix)?,
            ),
        };

        info!(
            scenario_id = %scenario.id,
            method = cmd.method.as_str(),
            alternatives = result.rankings().len(),
            winner = result.winner().unwrap_or(""),
            "Scenario evaluated"
        );

        Ok(result)
    }
}
