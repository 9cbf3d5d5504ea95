//! # Dependency Graph
//!
//! In-memory adjacency structures built from a workflow's step list.
//!
//! Steps are addressed internally by their insertion index so that every
//! traversal built on top of the graph (cycle detection, Kahn scheduling,
//! dependent counting) is deterministic and independent of hash ordering.
//!
//! Two edge lists are kept per step:
//! - `dependencies`: steps this step waits on (incoming edges)
//! - `dependents`: steps waiting on this step (outgoing edges), in insertion order

use std::collections::HashMap;

use crate::error::{Result, WorkflowError};
use crate::models::Step;

const DEFAULT_LABEL: &str = "workflow";

#[derive(Debug, Clone)]
pub struct DependencyGraph {
    label: String,
    step_ids: Vec<String>,
    index: HashMap<String, usize>,
    dependencies: Vec<Vec<usize>>,
    dependents: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Build the graph, rejecting duplicate ids and unknown dependencies
    pub fn build(steps: &[Step]) -> Result<Self> {
        Self::build_labeled(DEFAULT_LABEL, steps)
    }

    /// Build the graph with a label used in diagnostics (usually the workflow name)
    pub fn build_labeled(label: impl Into<String>, steps: &[Step]) -> Result<Self> {
        let index = Self::index_steps(steps, true)?;
        let mut graph = Self::empty(label.into(), steps, index);

        for (position, step) in steps.iter().enumerate() {
            for dependency in &step.dependencies {
                let Some(&dep_index) = graph.index.get(dependency) else {
                    return Err(WorkflowError::invalid_dependency(&step.id, dependency));
                };
                graph.add_edge(position, dep_index);
            }
        }

        Ok(graph)
    }

    /// Build the graph skipping unknown dependencies and later duplicates.
    ///
    /// Used where a graph is needed over input that has not been validated
    /// yet, e.g. answering "does this step list contain a cycle".
    pub(crate) fn build_lenient(steps: &[Step]) -> Self {
        let index = Self::index_steps(steps, false).unwrap_or_default();
        let mut graph = Self::empty(DEFAULT_LABEL.to_string(), steps, index);

        for (position, step) in steps.iter().enumerate() {
            if graph.index.get(&step.id) != Some(&position) {
                continue;
            }
            for dependency in &step.dependencies {
                if let Some(&dep_index) = graph.index.get(dependency) {
                    graph.add_edge(position, dep_index);
                }
            }
        }

        graph
    }

    fn index_steps(steps: &[Step], strict: bool) -> Result<HashMap<String, usize>> {
        let mut index = HashMap::with_capacity(steps.len());
        for (position, step) in steps.iter().enumerate() {
            if index.contains_key(&step.id) {
                if strict {
                    return Err(WorkflowError::DuplicateStep {
                        step_id: step.id.clone(),
                    });
                }
                continue;
            }
            index.insert(step.id.clone(), position);
        }
        Ok(index)
    }

    fn empty(label: String, steps: &[Step], index: HashMap<String, usize>) -> Self {
        Self {
            label,
            step_ids: steps.iter().map(|step| step.id.clone()).collect(),
            index,
            dependencies: vec![Vec::new(); steps.len()],
            dependents: vec![Vec::new(); steps.len()],
        }
    }

    fn add_edge(&mut self, step: usize, dependency: usize) {
        // Repeated dependency ids describe the same edge
        if self.dependencies[step].contains(&dependency) {
            return;
        }
        self.dependencies[step].push(dependency);
        self.dependents[dependency].push(step);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.step_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.step_ids.is_empty()
    }

    /// Number of distinct dependency edges
    pub fn edge_count(&self) -> usize {
        self.dependencies.iter().map(Vec::len).sum()
    }

    /// Step ids in insertion order
    pub fn step_ids(&self) -> &[String] {
        &self.step_ids
    }

    pub fn contains(&self, step_id: &str) -> bool {
        self.index.contains_key(step_id)
    }

    /// Number of distinct dependencies of a step, `None` for unknown ids
    pub fn in_degree(&self, step_id: &str) -> Option<usize> {
        self.position(step_id)
            .map(|position| self.dependencies[position].len())
    }

    /// Number of steps that depend directly on `step_id`
    pub fn dependent_count(&self, step_id: &str) -> usize {
        self.position(step_id)
            .map(|position| self.dependents[position].len())
            .unwrap_or(0)
    }

    /// Ids of steps depending directly on `step_id`, in insertion order
    pub fn dependents(&self, step_id: &str) -> Vec<&str> {
        self.position(step_id)
            .map(|position| self.ids_at(&self.dependents[position]))
            .unwrap_or_default()
    }

    /// Distinct dependency ids of `step_id`, in declaration order
    pub fn dependencies(&self, step_id: &str) -> Vec<&str> {
        self.position(step_id)
            .map(|position| self.ids_at(&self.dependencies[position]))
            .unwrap_or_default()
    }

    fn ids_at(&self, positions: &[usize]) -> Vec<&str> {
        positions
            .iter()
            .map(|&position| self.step_ids[position].as_str())
            .collect()
    }

    pub(crate) fn position(&self, step_id: &str) -> Option<usize> {
        self.index.get(step_id).copied()
    }

    pub(crate) fn id_at(&self, position: usize) -> &str {
        &self.step_ids[position]
    }

    pub(crate) fn dependency_positions(&self, position: usize) -> &[usize] {
        &self.dependencies[position]
    }

    pub(crate) fn dependent_positions(&self, position: usize) -> &[usize] {
        &self.dependents[position]
    }

    /// Positions whose id is the first occurrence of that id
    pub(crate) fn is_canonical(&self, position: usize) -> bool {
        self.position(&self.step_ids[position]) == Some(position)
    }
}
