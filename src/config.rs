//! # Orchestrator Configuration
//!
//! Layered configuration for analysis thresholds and execution defaults.
//!
//! Sources are merged in this order, later sources winning:
//! 1. Built-in defaults (the fixed thresholds in [`crate::constants`])
//! 2. A configuration file (`config/workflow-core.{yaml,toml,json}` or an explicit path)
//! 3. Environment variables prefixed `WORKFLOW_CORE`, sections separated by `__`,
//!    e.g. `WORKFLOW_CORE__EXECUTION__DEFAULT_TIMEOUT_SECONDS=60`

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::constants::{
    BOTTLENECK_DURATION_THRESHOLD_MINUTES, BOTTLENECK_MIN_DEPENDENTS, COMPLEXITY_STEP_NORMALIZER,
    DEFAULT_EXECUTION_TIMEOUT_SECONDS, HIGH_COMPLEXITY_SCORE, HIGH_DEPENDENCY_COUNT,
    HIGH_RISK_RATIO, LONG_DURATION_THRESHOLD_MINUTES, LONG_WORKFLOW_THRESHOLD_MINUTES,
    MEDIUM_RISK_RATIO,
};
use crate::error::{Result, WorkflowError};

const DEFAULT_CONFIG_BASENAME: &str = "config/workflow-core";
const ENV_PREFIX: &str = "WORKFLOW_CORE";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub analysis: AnalysisConfig,
    pub execution: ExecutionConfig,
}

/// Thresholds used by workflow analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minutes a step must exceed to be considered a bottleneck
    pub bottleneck_duration_threshold: u32,
    /// Dependents a bottleneck must exceed
    pub bottleneck_min_dependents: usize,
    /// Dependencies above which a step is a risk factor
    pub high_dependency_count: usize,
    /// Minutes above which a step is a risk factor
    pub long_duration_threshold: u32,
    /// Step count at which the step-count part of complexity reaches 1.0
    pub complexity_step_normalizer: usize,
    /// Risk entries per step above which risk is `medium`
    pub medium_risk_ratio: f64,
    /// Risk entries per step above which risk is `high`
    pub high_risk_ratio: f64,
    /// Complexity above which a split is suggested
    pub high_complexity_score: f64,
    /// Sequential minutes above which checkpoints are suggested
    pub long_workflow_threshold: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bottleneck_duration_threshold: BOTTLENECK_DURATION_THRESHOLD_MINUTES,
            bottleneck_min_dependents: BOTTLENECK_MIN_DEPENDENTS,
            high_dependency_count: HIGH_DEPENDENCY_COUNT,
            long_duration_threshold: LONG_DURATION_THRESHOLD_MINUTES,
            complexity_step_normalizer: COMPLEXITY_STEP_NORMALIZER,
            medium_risk_ratio: MEDIUM_RISK_RATIO,
            high_risk_ratio: HIGH_RISK_RATIO,
            high_complexity_score: HIGH_COMPLEXITY_SCORE,
            long_workflow_threshold: LONG_WORKFLOW_THRESHOLD_MINUTES,
        }
    }
}

/// Defaults applied to execution calls that do not override them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    pub default_timeout_seconds: u64,
    /// Return partial results instead of failing when the deadline passes
    pub best_effort_on_timeout: bool,
    pub parallel_by_default: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            default_timeout_seconds: DEFAULT_EXECUTION_TIMEOUT_SECONDS,
            best_effort_on_timeout: false,
            parallel_by_default: false,
        }
    }
}

impl ExecutionConfig {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_seconds)
    }
}

impl OrchestratorConfig {
    /// Load defaults, the optional `config/workflow-core.*` file, then environment overrides
    pub fn load() -> Result<Self> {
        let builder = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
            .add_source(Self::environment_source());

        Self::finish(builder.build()?)
    }

    /// Load defaults, the given file (required), then environment overrides
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let builder = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path).required(true))
            .add_source(Self::environment_source());

        Self::finish(builder.build()?)
    }

    fn environment_source() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
    }

    fn finish(merged: Config) -> Result<Self> {
        let config: Self = merged.try_deserialize()?;
        config.validate()?;
        debug!(
            default_timeout_seconds = config.execution.default_timeout_seconds,
            best_effort_on_timeout = config.execution.best_effort_on_timeout,
            bottleneck_duration_threshold = config.analysis.bottleneck_duration_threshold,
            "Orchestrator configuration loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let analysis = &self.analysis;
        let mut errors = Vec::new();

        if analysis.complexity_step_normalizer == 0 {
            errors.push("analysis.complexity_step_normalizer must be greater than 0".to_string());
        }
        if analysis.medium_risk_ratio < 0.0 || analysis.high_risk_ratio < 0.0 {
            errors.push("analysis risk ratios must not be negative".to_string());
        }
        if !(0.0..=1.0).contains(&analysis.high_complexity_score) {
            errors.push("analysis.high_complexity_score must lie within [0, 1]".to_string());
        }
        if analysis.medium_risk_ratio > analysis.high_risk_ratio {
            errors.push(format!(
                "analysis.medium_risk_ratio ({}) must not exceed analysis.high_risk_ratio ({})",
                analysis.medium_risk_ratio, analysis.high_risk_ratio
            ));
        }
        if self.execution.default_timeout_seconds == 0 {
            errors.push("execution.default_timeout_seconds must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(WorkflowError::Configuration(errors.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_fixed_thresholds() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.analysis.bottleneck_duration_threshold, 30);
        assert_eq!(config.analysis.high_dependency_count, 3);
        assert_eq!(config.analysis.long_duration_threshold, 60);
        assert_eq!(config.execution.default_timeout(), Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_yaml_file_merges_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "execution:\n  default_timeout_seconds: 45\n  best_effort_on_timeout: true\nanalysis:\n  bottleneck_duration_threshold: 15"
        )
        .unwrap();

        let config = OrchestratorConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.execution.default_timeout_seconds, 45);
        assert!(config.execution.best_effort_on_timeout);
        assert_eq!(config.analysis.bottleneck_duration_threshold, 15);
        // Untouched keys keep their defaults
        assert_eq!(config.analysis.high_dependency_count, 3);
    }

    #[test]
    fn test_missing_required_file_is_a_configuration_error() {
        let err = OrchestratorConfig::load_from_file(Path::new("/nonexistent/workflow-core.yaml"))
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Configuration(_)));
    }

    #[test]
    fn test_validate_rejects_inverted_risk_ratios() {
        let mut config = OrchestratorConfig::default();
        config.analysis.medium_risk_ratio = 0.8;
        config.analysis.high_risk_ratio = 0.4;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("medium_risk_ratio"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = OrchestratorConfig::default();
        config.execution.default_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }
}
