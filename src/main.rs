//! Fuzzy Decision Engine CLI
//!
//! Reads one request file (JSON, or YAML by extension), runs it and prints
//! the result as pretty JSON on stdout. Logs go to stderr.
//!
//! ```text
//! {"operation": "evaluate_scenario", "input": {"scenario": {...}, "method": "topsis"}}
//! {"operation": "analyze_patterns", "input": {"history": [...], "config": {...}}}
//! ```

use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fuzzy_decision_engine::adapters::HashValueProvider;
use fuzzy_decision_engine::application::{
    AnalyzePatternsCommand, AnalyzePatternsError, AnalyzePatternsHandler, EvaluateScenarioCommand,
    EvaluateScenarioError, EvaluateScenarioHandler,
};
use fuzzy_decision_engine::config::{AppConfig, ConfigError, TelemetryConfig, ValidationError};

#[derive(Parser)]
#[command(name = "fuzzy-decision-engine")]
#[command(about = "Rank alternatives and analyze decision history", long_about = None)]
#[command(version)]
struct Cli {
    /// Request file (.json, .yaml or .yml)
    request: PathBuf,

    /// Configuration file layered under FUZZY_DECISION__* variables
    #[arg(short, long, env = "FUZZY_DECISION_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "operation", content = "input", rename_all = "snake_case")]
enum Request {
    EvaluateScenario(EvaluateScenarioCommand),
    AnalyzePatterns(AnalyzePatternsCommand),
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ValidationError),

    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed request: {0}")]
    Request(String),

    #[error(transparent)]
    Evaluate(#[from] EvaluateScenarioError),

    #[error(transparent)]
    Analyze(#[from] AnalyzePatternsError),

    #[error("Cannot encode result: {0}")]
    Output(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_tracing(&config.telemetry, cli.json_logs) {
        eprintln!("{}", err);
        return ExitCode::FAILURE;
    }

    match run(&cli.request, &config) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Request failed");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig, CliError> {
    let config = match path {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load()?,
    };
    config.validate()?;
    Ok(config)
}

fn init_tracing(telemetry: &TelemetryConfig, json_logs: bool) -> Result<(), CliError> {
    let env_filter = telemetry.env_filter()?;

    if json_logs || telemetry.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

fn run(path: &Path, config: &AppConfig) -> Result<String, CliError> {
    let output = match read_request(path)? {
        Request::EvaluateScenario(cmd) => {
            let handler = EvaluateScenarioHandler::new(
                Arc::new(HashValueProvider::new(config.observation.clone())),
                config.fuzzy.clone(),
                config.matrix.clone(),
            );
            serde_json::to_string_pretty(&handler.handle(cmd)?)?
        }
        Request::AnalyzePatterns(cmd) => {
            let handler = AnalyzePatternsHandler::new(config.patterns.clone());
            serde_json::to_string_pretty(&handler.handle(cmd)?)?
        }
    };
    Ok(output)
}

fn read_request(path: &Path) -> Result<Request, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if yaml {
        serde_yaml::from_str(&text).map_err(|e| CliError::Request(e.to_string()))
    } else {
        serde_json::from_str(&text).map_err(|e| CliError::Request(e.to_string()))
    }
}
