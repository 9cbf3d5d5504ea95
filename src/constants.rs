//! # System Constants
//!
//! Lifecycle enums and the fixed analysis thresholds that define the
//! operational boundaries of the workflow core.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Steps whose duration exceeds this many minutes are bottleneck candidates
pub const BOTTLENECK_DURATION_THRESHOLD_MINUTES: u32 = 30;

/// A bottleneck must have strictly more dependents than this
pub const BOTTLENECK_MIN_DEPENDENTS: usize = 1;

/// A step with more dependencies than this counts as a risk factor
pub const HIGH_DEPENDENCY_COUNT: usize = 3;

/// A step longer than this many minutes counts as a risk factor
pub const LONG_DURATION_THRESHOLD_MINUTES: u32 = 60;

/// Step count at which the step-count component of complexity saturates
pub const COMPLEXITY_STEP_NORMALIZER: usize = 10;

/// Risk entries per step above which risk is `medium`
pub const MEDIUM_RISK_RATIO: f64 = 0.1;

/// Risk entries per step above which risk is `high`
pub const HIGH_RISK_RATIO: f64 = 0.3;

/// Complexity score above which splitting steps is suggested
pub const HIGH_COMPLEXITY_SCORE: f64 = 0.7;

/// Sequential minutes above which adding checkpoints is suggested
pub const LONG_WORKFLOW_THRESHOLD_MINUTES: u32 = 240;

/// Default global deadline for an execution call
pub const DEFAULT_EXECUTION_TIMEOUT_SECONDS: u64 = 300;

/// Prefix used for parallel group identifiers (`group_1`, `group_2`, ...)
pub const PARALLEL_GROUP_PREFIX: &str = "group_";

/// Structured log operation names
pub mod events {
    pub const WORKFLOW_CREATED: &str = "workflow.created";
    pub const WORKFLOW_REJECTED: &str = "workflow.rejected";
    pub const WORKFLOW_ANALYZED: &str = "workflow.analyzed";
    pub const WORKFLOW_OPTIMIZED: &str = "workflow.optimized";
    pub const WORKFLOW_EXECUTION_STARTED: &str = "workflow.execution_started";
    pub const WORKFLOW_EXECUTION_COMPLETED: &str = "workflow.execution_completed";

    pub const STEP_STARTED: &str = "step.started";
    pub const STEP_COMPLETED: &str = "step.completed";
    pub const STEP_FAILED: &str = "step.failed";

    pub const SEQUENCE_STARTED: &str = "sequence.started";
    pub const SEQUENCE_COMPLETED: &str = "sequence.completed";
    pub const SEQUENCE_TIMED_OUT: &str = "sequence.timed_out";
}

/// Lifecycle status of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Failed)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a workflow's analysis artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    #[default]
    Created,
    Analyzing,
    Optimized,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Created => "created",
            WorkflowStatus::Analyzing => "analyzing",
            WorkflowStatus::Optimized => "optimized",
        }
    }

    /// Optimization always passes through `analyzing`; an optimized workflow
    /// may be re-analyzed from scratch.
    pub fn can_transition_to(&self, next: WorkflowStatus) -> bool {
        matches!(
            (self, next),
            (WorkflowStatus::Created, WorkflowStatus::Analyzing)
                | (WorkflowStatus::Analyzing, WorkflowStatus::Optimized)
                | (WorkflowStatus::Optimized, WorkflowStatus::Analyzing)
        )
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse risk classification produced by workflow analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the execution driver dispatches a task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Sequential,
    Parallel,
}

impl ExecutionMode {
    pub fn from_parallel_flag(parallel: bool) -> Self {
        if parallel {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Parallel => "parallel",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
