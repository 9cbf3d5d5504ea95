//! Error types for the workflow core.
//!
//! Validation failures on malformed input are raised as distinguishable
//! [`WorkflowError`] variants. Failures of an individual step executor are
//! modelled separately as [`StepExecutionError`] and are always folded into a
//! structured execution result by the driver, never returned to callers.

use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    #[error("Invalid dependency: step '{step}' depends on unknown step '{dependency}'")]
    InvalidDependency { step: String, dependency: String },

    #[error("Circular dependency detected in workflow '{workflow}'{}", format_cycle(.cycle))]
    CircularDependency {
        workflow: String,
        /// Offending path when known, first id repeated at the end
        cycle: Vec<String>,
    },

    #[error("Workflow has no steps: {operation} requires at least one step")]
    EmptyWorkflow { operation: String },

    #[error(
        "Execution {execution_id} timed out after {timeout:?} with {completed_tasks} task(s) completed"
    )]
    ExecutionTimeout {
        execution_id: Uuid,
        timeout: Duration,
        completed_tasks: usize,
    },

    #[error("Duplicate step id '{step_id}'")]
    DuplicateStep { step_id: String },

    #[error("Invalid workflow status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Invalid workflow definition: {0}")]
    InvalidDefinition(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn format_cycle(cycle: &[String]) -> String {
    if cycle.is_empty() {
        String::new()
    } else {
        format!(": {}", cycle.join(" -> "))
    }
}

impl WorkflowError {
    pub fn invalid_dependency(step: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::InvalidDependency {
            step: step.into(),
            dependency: dependency.into(),
        }
    }

    pub fn circular_dependency(workflow: impl Into<String>, cycle: Vec<String>) -> Self {
        Self::CircularDependency {
            workflow: workflow.into(),
            cycle,
        }
    }

    pub fn empty_workflow(operation: impl Into<String>) -> Self {
        Self::EmptyWorkflow {
            operation: operation.into(),
        }
    }

    /// True for the errors raised while validating a workflow definition
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDependency { .. }
                | Self::CircularDependency { .. }
                | Self::DuplicateStep { .. }
                | Self::EmptyWorkflow { .. }
                | Self::InvalidDefinition(_)
        )
    }
}

impl From<serde_json::Error> for WorkflowError {
    fn from(error: serde_json::Error) -> Self {
        WorkflowError::InvalidDefinition(format!("JSON error: {error}"))
    }
}

impl From<serde_yaml::Error> for WorkflowError {
    fn from(error: serde_yaml::Error) -> Self {
        WorkflowError::InvalidDefinition(format!("YAML error: {error}"))
    }
}

impl From<config::ConfigError> for WorkflowError {
    fn from(error: config::ConfigError) -> Self {
        WorkflowError::Configuration(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Failure reported by (or on behalf of) an injected step executor
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StepExecutionError {
    #[error("Step execution failed: {message}")]
    Failed {
        message: String,
        payload: Option<serde_json::Value>,
    },

    #[error("Step executor panicked: {message}")]
    Panicked { message: String },

    #[error("Step execution cancelled: {reason}")]
    Cancelled { reason: String },
}

impl StepExecutionError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            payload: None,
        }
    }

    pub fn failed_with_payload(message: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::Failed {
            message: message.into(),
            payload: Some(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_dependency_message_includes_path() {
        let err = WorkflowError::circular_dependency(
            "release",
            vec!["x".to_string(), "y".to_string(), "x".to_string()],
        );
        assert_eq!(
            err.to_string(),
            "Circular dependency detected in workflow 'release': x -> y -> x"
        );
    }

    #[test]
    fn test_circular_dependency_message_without_path() {
        let err = WorkflowError::circular_dependency("release", Vec::new());
        assert_eq!(
            err.to_string(),
            "Circular dependency detected in workflow 'release'"
        );
    }

    #[test]
    fn test_validation_error_classification() {
        assert!(WorkflowError::invalid_dependency("b", "missing").is_validation_error());
        assert!(WorkflowError::empty_workflow("analyze").is_validation_error());
        assert!(!WorkflowError::ExecutionTimeout {
            execution_id: Uuid::new_v4(),
            timeout: Duration::from_secs(1),
            completed_tasks: 0,
        }
        .is_validation_error());
    }

    #[test]
    fn test_json_error_maps_to_invalid_definition() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: WorkflowError = parse_err.into();
        assert!(matches!(err, WorkflowError::InvalidDefinition(_)));
    }
}
