//! # Topological Scheduler
//!
//! Kahn's algorithm with a FIFO frontier. The frontier is seeded with every
//! zero in-degree step in insertion order, and dependents are released in
//! insertion order as well, so equal candidates always leave the frontier in
//! the order they were declared. The output is fully deterministic.

use std::collections::VecDeque;

use super::cycle_detector::find_cycle_in_graph;
use super::dependency_graph::DependencyGraph;
use crate::error::{Result, WorkflowError};
use crate::models::Step;

/// Validate `steps` and return a linear execution order.
pub fn topological_order(steps: &[Step]) -> Result<Vec<String>> {
    let graph = DependencyGraph::build(steps)?;
    order(&graph)
}

/// Linear order over an already built graph.
///
/// The graph is expected to be acyclic. If it is not, the steps caught in or
/// behind a cycle never reach in-degree zero; rather than returning that
/// partial order this reports `CircularDependency`.
pub fn order(graph: &DependencyGraph) -> Result<Vec<String>> {
    let mut in_degree: Vec<usize> = (0..graph.len())
        .map(|position| graph.dependency_positions(position).len())
        .collect();

    let mut frontier: VecDeque<usize> = (0..graph.len())
        .filter(|&position| in_degree[position] == 0)
        .collect();

    let mut output = Vec::with_capacity(graph.len());
    while let Some(position) = frontier.pop_front() {
        output.push(graph.id_at(position).to_string());

        for &dependent in graph.dependent_positions(position) {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                frontier.push_back(dependent);
            }
        }
    }

    if output.len() < graph.len() {
        let cycle = find_cycle_in_graph(graph).unwrap_or_default();
        return Err(WorkflowError::circular_dependency(graph.label(), cycle));
    }

    Ok(output)
}

/// Reorder `steps` to follow `order`, keeping steps missing from it at the end
pub fn steps_in_order<'a>(steps: &'a [Step], order: &[String]) -> Vec<&'a Step> {
    let mut ordered: Vec<&Step> = order
        .iter()
        .filter_map(|id| steps.iter().find(|step| &step.id == id))
        .collect();

    for step in steps {
        if !order.contains(&step.id) {
            ordered.push(step);
        }
    }
    ordered
}
