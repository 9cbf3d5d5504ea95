//! # Execution Types
//!
//! Inputs and outputs of the execution driver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;

use crate::config::ExecutionConfig;
use crate::constants::ExecutionMode;
use crate::models::Step;

/// One unit of work handed to a [`super::StepExecutor`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub payload: Value,
}

impl TaskDescriptor {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            payload: Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Descriptors for plain task descriptions, identified `task_1`, `task_2`, ...
    pub fn from_descriptions<I, S>(descriptions: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        descriptions
            .into_iter()
            .enumerate()
            .map(|(index, description)| Self::new(format!("task_{}", index + 1), description))
            .collect()
    }
}

impl From<&Step> for TaskDescriptor {
    fn from(step: &Step) -> Self {
        let description = if step.description.is_empty() {
            step.name.clone()
        } else {
            step.description.clone()
        };

        Self {
            id: step.id.clone(),
            description,
            payload: json!({
                "name": step.name,
                "estimated_duration": step.estimated_duration,
                "dependencies": step.dependencies,
            }),
        }
    }
}

/// What an executor reports for a task it ran to completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub success: bool,
    #[serde(default)]
    pub payload: Value,
}

impl TaskOutcome {
    pub fn succeeded(payload: Value) -> Self {
        Self {
            success: true,
            payload,
        }
    }

    pub fn failed(payload: Value) -> Self {
        Self {
            success: false,
            payload,
        }
    }
}

/// Per-task record in a [`SequenceResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub step_id: String,
    pub description: String,
    pub success: bool,
    pub execution_time: Duration,
    pub outcome: Value,
    /// Set when the executor returned an error or panicked
    pub error_message: Option<String>,
}

/// Aggregate result of one driver call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceResult {
    pub execution_id: Uuid,
    pub mode: ExecutionMode,
    pub total_tasks: usize,
    /// Tasks that produced a result
    pub completed_tasks: usize,
    pub successful_tasks: usize,
    pub failed_tasks: usize,
    pub total_execution_time: Duration,
    pub results: Vec<ExecutionResult>,
    /// True iff at least one task succeeded
    pub success: bool,
    /// The deadline passed before every task produced a result
    pub timed_out: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl SequenceResult {
    pub fn success_rate(&self) -> f64 {
        if self.completed_tasks == 0 {
            0.0
        } else {
            self.successful_tasks as f64 / self.completed_tasks as f64
        }
    }

    pub fn result_for(&self, step_id: &str) -> Option<&ExecutionResult> {
        self.results.iter().find(|result| result.step_id == step_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Run a task list concurrently instead of in list order
    pub parallel: bool,
    /// Global deadline covering the whole call
    pub timeout: Duration,
    /// Return partial results instead of an error when the deadline passes
    pub best_effort: bool,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self::from_config(&ExecutionConfig::default())
    }
}

impl ExecutionOptions {
    pub fn from_config(config: &ExecutionConfig) -> Self {
        Self {
            parallel: config.parallel_by_default,
            timeout: config.default_timeout(),
            best_effort: config.best_effort_on_timeout,
        }
    }

    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub fn parallel() -> Self {
        Self {
            parallel: true,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_best_effort(mut self, best_effort: bool) -> Self {
        self.best_effort = best_effort;
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        ExecutionMode::from_parallel_flag(self.parallel)
    }
}

/// Snapshot of a workflow after its execution order was walked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecution {
    pub workflow_id: String,
    /// Steps with status, timestamps and result payload filled in
    pub steps: Vec<Step>,
    pub sequence: SequenceResult,
}

impl WorkflowExecution {
    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == step_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::StepStatus;

    #[test]
    fn test_descriptors_from_descriptions_are_numbered() {
        let tasks = TaskDescriptor::from_descriptions(["fetch", "build"]);
        assert_eq!(tasks[0].id, "task_1");
        assert_eq!(tasks[1].id, "task_2");
        assert_eq!(tasks[1].description, "build");
        assert_eq!(tasks[1].payload, Value::Null);
    }

    #[test]
    fn test_descriptor_from_step_falls_back_to_name() {
        let step = Step::new("compile", 7).with_dependencies(["fetch"]);
        assert_eq!(step.status, StepStatus::Pending);

        let task = TaskDescriptor::from(&step);
        assert_eq!(task.id, "compile");
        assert_eq!(task.description, "compile");
        assert_eq!(task.payload["estimated_duration"], 7);
    }

    #[test]
    fn test_options_follow_config() {
        let config = ExecutionConfig {
            default_timeout_seconds: 9,
            best_effort_on_timeout: true,
            parallel_by_default: true,
        };
        let options = ExecutionOptions::from_config(&config);
        assert!(options.parallel);
        assert!(options.best_effort);
        assert_eq!(options.timeout, Duration::from_secs(9));
        assert_eq!(options.mode(), ExecutionMode::Parallel);
        assert_eq!(ExecutionOptions::sequential().mode(), ExecutionMode::Sequential);
    }
}
