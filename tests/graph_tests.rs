//! Dependency graph, cycle detection and ordering over concrete workflows

mod common;

use common::builders::{chain_definition, steps_from, two_cycle_definition};
use workflow_core::graph::{find_cycle, has_cycle, topological_order, DependencyGraph};
use workflow_core::models::Step;
use workflow_core::orchestration::{create_workflow, OrchestrationContext};
use workflow_core::WorkflowError;

#[test]
fn test_diamond_graph_structure() {
    let steps = steps_from(&[
        ("A", 10, &[]),
        ("B", 5, &["A"]),
        ("C", 5, &["A"]),
        ("D", 3, &["B", "C"]),
    ]);
    let graph = DependencyGraph::build(&steps).unwrap();

    assert_eq!(graph.len(), 4);
    assert_eq!(graph.edge_count(), 4);
    assert_eq!(graph.dependents("A"), vec!["B", "C"]);
    assert_eq!(graph.dependent_count("A"), 2);
    assert_eq!(graph.dependent_count("D"), 0);
    assert_eq!(graph.in_degree("A"), Some(0));
    assert_eq!(graph.in_degree("D"), Some(2));
    assert_eq!(graph.in_degree("missing"), None);
}

#[test]
fn test_diamond_order() {
    let steps = steps_from(&[
        ("A", 10, &[]),
        ("B", 5, &["A"]),
        ("C", 5, &["A"]),
        ("D", 3, &["B", "C"]),
    ]);
    assert_eq!(topological_order(&steps).unwrap(), vec!["A", "B", "C", "D"]);
}

#[test]
fn test_independent_steps_keep_insertion_order() {
    let steps = steps_from(&[("zeta", 1, &[]), ("alpha", 1, &[]), ("mid", 1, &[])]);
    assert_eq!(topological_order(&steps).unwrap(), vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_dependency_declared_after_dependent() {
    let steps = steps_from(&[("deploy", 1, &["build"]), ("build", 1, &[])]);
    assert_eq!(topological_order(&steps).unwrap(), vec!["build", "deploy"]);
}

#[test]
fn test_fifo_frontier_releases_in_insertion_order() {
    // Kahn with a FIFO frontier emits both roots before either child
    let steps = steps_from(&[
        ("r1", 1, &[]),
        ("r2", 1, &[]),
        ("c1", 1, &["r1"]),
        ("c2", 1, &["r2"]),
    ]);
    assert_eq!(topological_order(&steps).unwrap(), vec!["r1", "r2", "c1", "c2"]);
}

#[test]
fn test_unknown_dependency_is_rejected() {
    let steps = steps_from(&[("a", 1, &[]), ("b", 1, &["a", "ghost"])]);
    let err = DependencyGraph::build(&steps).unwrap_err();
    assert_eq!(
        err,
        WorkflowError::InvalidDependency {
            step: "b".to_string(),
            dependency: "ghost".to_string(),
        }
    );
    assert!(err.is_validation_error());
}

#[test]
fn test_duplicate_step_is_rejected() {
    let steps = steps_from(&[("a", 1, &[]), ("a", 2, &[])]);
    assert!(matches!(
        DependencyGraph::build(&steps),
        Err(WorkflowError::DuplicateStep { step_id }) if step_id == "a"
    ));
}

#[test]
fn test_two_step_cycle_is_detected() {
    let steps = steps_from(&[("X", 1, &["Y"]), ("Y", 1, &["X"])]);
    assert!(has_cycle(&steps));

    let cycle = find_cycle(&steps).unwrap();
    assert_eq!(cycle.first(), cycle.last());
    assert_eq!(cycle.len(), 3);
}

#[test]
fn test_self_dependency_is_a_cycle() {
    let steps = vec![Step::new("solo", 1).with_dependencies(["solo"])];
    assert!(has_cycle(&steps));
    assert_eq!(find_cycle(&steps).unwrap(), vec!["solo", "solo"]);
}

#[test]
fn test_acyclic_graph_has_no_cycle() {
    let steps = steps_from(&[("a", 1, &[]), ("b", 1, &["a"]), ("c", 1, &["a", "b"])]);
    assert!(!has_cycle(&steps));
    assert!(find_cycle(&steps).is_none());
}

#[test]
fn test_ordering_a_cyclic_list_reports_circular_dependency() {
    let steps = steps_from(&[("a", 1, &[]), ("X", 1, &["Y", "a"]), ("Y", 1, &["X"])]);
    assert!(matches!(
        topological_order(&steps),
        Err(WorkflowError::CircularDependency { .. })
    ));
}

#[test]
fn test_creating_cyclic_workflow_fails_before_ordering() {
    let ctx = OrchestrationContext::default();
    let err = create_workflow(two_cycle_definition(), &ctx).unwrap_err();

    match err {
        WorkflowError::CircularDependency { workflow, cycle } => {
            assert_eq!(workflow, "two_cycle");
            assert!(cycle.contains(&"X".to_string()));
            assert!(cycle.contains(&"Y".to_string()));
        }
        other => panic!("expected CircularDependency, got {other:?}"),
    }
}

#[test]
fn test_long_chain_orders_without_recursion() {
    let ctx = OrchestrationContext::default();
    let workflow = create_workflow(chain_definition(10_000), &ctx).unwrap();

    let order = workflow.flattened_order();
    assert_eq!(order.len(), 10_000);
    assert_eq!(order[0], "step_1");
    assert_eq!(order[9_999], "step_10000");
}
