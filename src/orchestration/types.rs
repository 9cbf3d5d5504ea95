//! # Orchestration Types
//!
//! Report structures produced by workflow analysis and optimization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::RiskLevel;
use crate::models::{ParallelGroup, Workflow};

/// A long step that blocks several dependents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bottleneck {
    pub step_id: String,
    pub name: String,
    pub duration: u32,
    pub dependent_count: usize,
    /// `duration × dependent_count`, the ranking key
    pub impact_score: u64,
}

/// Why a single step contributes to workflow risk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub step_id: String,
    pub dependency_count: usize,
    pub duration: u32,
    pub high_dependency_count: bool,
    pub long_duration: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    /// Risk entries per step; a step tripping both limits contributes two
    pub risk_ratio: f64,
    pub risk_factors: Vec<RiskFactor>,
}

/// Sequential vs. parallel duration comparison, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationEstimate {
    pub sequential_duration: u32,
    pub optimized_duration: u32,
    pub time_saved: u32,
    pub improvement_percentage: f64,
}

impl DurationEstimate {
    pub fn new(sequential_duration: u32, optimized_duration: u32) -> Self {
        let time_saved = sequential_duration.saturating_sub(optimized_duration);
        let improvement_percentage = if sequential_duration == 0 {
            0.0
        } else {
            f64::from(time_saved) / f64::from(sequential_duration) * 100.0
        };

        Self {
            sequential_duration,
            optimized_duration,
            time_saved,
            improvement_percentage,
        }
    }
}

/// Structured result of analyzing a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub workflow_id: String,
    pub workflow_name: String,
    pub step_count: usize,
    pub dependency_count: usize,
    /// Mean of normalized step count and dependency density, in [0, 1]
    pub complexity_score: f64,
    pub risk_assessment: RiskAssessment,
    pub parallel_groups: Vec<ParallelGroup>,
    pub bottlenecks: Vec<Bottleneck>,
    pub durations: DurationEstimate,
    pub suggestions: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

/// A workflow restructured for parallel execution plus the before/after comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedWorkflow {
    pub workflow: Workflow,
    pub parallel_groups: Vec<ParallelGroup>,
    pub durations: DurationEstimate,
}

impl OptimizedWorkflow {
    pub fn original_duration(&self) -> u32 {
        self.durations.sequential_duration
    }

    pub fn optimized_duration(&self) -> u32 {
        self.durations.optimized_duration
    }

    pub fn time_saved(&self) -> u32 {
        self.durations.time_saved
    }
}
