use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::step::{Step, StepDefinition};
use crate::constants::WorkflowStatus;
use crate::error::{Result, WorkflowError};

/// Workflow descriptor supplied by callers, loadable from JSON or YAML
///
/// ```yaml
/// name: release
/// description: Build and ship
/// steps:
///   - id: build
///     duration: 10
///   - id: test
///     dependencies: [build]
///     duration: 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<StepDefinition>,
}

impl WorkflowDefinition {
    pub fn new(name: impl Into<String>, steps: Vec<StepDefinition>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            steps,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a definition, choosing the format from the file extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WorkflowError::InvalidDefinition(format!(
                "Failed to read workflow file '{}': {e}",
                path.display()
            ))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }
}

/// One entry of an execution order: a lone step or an ordered group of steps
/// that may run concurrently
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecutionOrderEntry {
    Step(String),
    Group(Vec<String>),
}

impl ExecutionOrderEntry {
    pub fn step_ids(&self) -> &[String] {
        match self {
            ExecutionOrderEntry::Step(id) => std::slice::from_ref(id),
            ExecutionOrderEntry::Group(ids) => ids,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ExecutionOrderEntry::Group(_))
    }
}

/// Steps sharing an identical dependency set, safe to run concurrently
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelGroup {
    pub group_id: String,
    /// Members in workflow insertion order, always at least two
    pub step_ids: Vec<String>,
    /// Shared dependency set, sorted
    pub dependencies: Vec<String>,
    pub max_duration: u32,
}

impl ParallelGroup {
    pub fn contains(&self, step_id: &str) -> bool {
        self.step_ids.iter().any(|id| id == step_id)
    }

    pub fn len(&self) -> usize {
        self.step_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.step_ids.is_empty()
    }
}

/// A validated workflow with its derived scheduling artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Steps in insertion order
    pub steps: Vec<Step>,
    pub execution_order: Vec<ExecutionOrderEntry>,
    /// Sum of all step durations in minutes
    pub total_duration: u32,
    /// Estimated minutes when parallel groups run concurrently
    pub optimized_duration: Option<u32>,
    pub status: WorkflowStatus,
    pub created_at: DateTime<Utc>,
}

impl Workflow {
    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == step_id)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Execution order with groups expanded in place
    pub fn flattened_order(&self) -> Vec<&str> {
        self.execution_order
            .iter()
            .flat_map(|entry| entry.step_ids().iter().map(String::as_str))
            .collect()
    }

    pub fn transition_to(&mut self, next: WorkflowStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(WorkflowError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}
