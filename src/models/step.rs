use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::constants::StepStatus;

/// Caller-facing step descriptor as supplied in a workflow definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Estimated duration in minutes
    #[serde(default)]
    pub duration: u32,
}

impl StepDefinition {
    pub fn new(id: impl Into<String>, duration: u32) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: String::new(),
            dependencies: Vec::new(),
            duration,
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A unit of work within a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Ordered dependency ids; each references another step of the same workflow
    pub dependencies: Vec<String>,
    /// Estimated duration in minutes
    pub estimated_duration: u32,
    pub status: StepStatus,
    pub result: Option<serde_json::Value>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Parallel group annotation (`group_1`, ...) set by optimization
    #[serde(default)]
    pub parallel_group: Option<String>,
}

impl Step {
    pub fn new(id: impl Into<String>, estimated_duration: u32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            dependencies: Vec::new(),
            estimated_duration,
            status: StepStatus::Pending,
            result: None,
            started_at: None,
            completed_at: None,
            parallel_group: None,
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Dependencies as an unordered set, the identity used for parallel grouping
    pub fn dependency_set(&self) -> BTreeSet<&str> {
        self.dependencies.iter().map(String::as_str).collect()
    }

    pub fn depends_on(&self, other_step_id: &str) -> bool {
        self.dependencies.iter().any(|dep| dep == other_step_id)
    }

    pub fn mark_running(&mut self, at: DateTime<Utc>) {
        self.status = StepStatus::Running;
        self.started_at = Some(at);
        self.completed_at = None;
    }

    /// Back to `pending` with no timestamps or result
    pub fn reset(&mut self) {
        self.status = StepStatus::Pending;
        self.result = None;
        self.started_at = None;
        self.completed_at = None;
    }

    pub fn mark_finished(&mut self, success: bool, result: serde_json::Value, at: DateTime<Utc>) {
        self.status = if success {
            StepStatus::Completed
        } else {
            StepStatus::Failed
        };
        self.result = Some(result);
        self.completed_at = Some(at);
    }
}

impl From<StepDefinition> for Step {
    fn from(definition: StepDefinition) -> Self {
        let name = definition
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| definition.id.clone());

        Self {
            id: definition.id,
            name,
            description: definition.description,
            dependencies: definition.dependencies,
            estimated_duration: definition.duration,
            status: StepStatus::Pending,
            result: None,
            started_at: None,
            completed_at: None,
            parallel_group: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_from_definition_defaults_name_to_id() {
        let step: Step = StepDefinition::new("fetch", 5)
            .with_dependencies(["init"])
            .into();

        assert_eq!(step.name, "fetch");
        assert_eq!(step.dependencies, vec!["init".to_string()]);
        assert_eq!(step.estimated_duration, 5);
        assert_eq!(step.status, StepStatus::Pending);
        assert!(step.parallel_group.is_none());
    }

    #[test]
    fn test_dependency_set_ignores_order_and_duplicates() {
        let a = Step::new("a", 1).with_dependencies(["x", "y", "x"]);
        let b = Step::new("b", 1).with_dependencies(["y", "x"]);
        assert_eq!(a.dependency_set(), b.dependency_set());
        assert!(a.depends_on("y"));
        assert!(!a.depends_on("z"));
    }

    #[test]
    fn test_lifecycle_marks() {
        let mut step = Step::new("a", 1);
        let now = Utc::now();
        step.mark_running(now);
        assert_eq!(step.status, StepStatus::Running);
        assert_eq!(step.started_at, Some(now));

        step.mark_finished(false, serde_json::json!({"error": "boom"}), now);
        assert_eq!(step.status, StepStatus::Failed);
        assert!(step.status.is_terminal());
        assert_eq!(step.result, Some(serde_json::json!({"error": "boom"})));
    }

    #[test]
    fn test_definition_deserializes_with_defaults() {
        let definition: StepDefinition =
            serde_json::from_str(r#"{"id": "build", "duration": 12}"#).unwrap();
        assert_eq!(definition.id, "build");
        assert!(definition.dependencies.is_empty());
        assert_eq!(definition.duration, 12);
    }
}
