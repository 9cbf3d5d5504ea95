//! Workflow fixtures shared by the integration tests

#![allow(dead_code)]

use workflow_core::models::{Step, StepDefinition, WorkflowDefinition};

/// A(10) -> {B(5), C(5)} -> D(3): sequential 23 minutes, optimized 18
pub fn diamond_definition() -> WorkflowDefinition {
    WorkflowDefinition::new(
        "diamond",
        vec![
            StepDefinition::new("A", 10),
            StepDefinition::new("B", 5).with_dependencies(["A"]),
            StepDefinition::new("C", 5).with_dependencies(["A"]),
            StepDefinition::new("D", 3).with_dependencies(["B", "C"]),
        ],
    )
    .with_description("Fan-out and fan-in around one parallel pair")
}

/// X depends on Y and Y depends on X
pub fn two_cycle_definition() -> WorkflowDefinition {
    WorkflowDefinition::new(
        "two_cycle",
        vec![
            StepDefinition::new("X", 1).with_dependencies(["Y"]),
            StepDefinition::new("Y", 1).with_dependencies(["X"]),
        ],
    )
}

/// step_1 -> step_2 -> ... -> step_n, one minute each
pub fn chain_definition(length: usize) -> WorkflowDefinition {
    let steps = (1..=length)
        .map(|index| {
            let step = StepDefinition::new(format!("step_{index}"), 1);
            if index == 1 {
                step
            } else {
                step.with_dependencies([format!("step_{}", index - 1)])
            }
        })
        .collect();
    WorkflowDefinition::new("chain", steps)
}

/// Build steps from `(id, duration, dependencies)` triples
pub fn steps_from(rows: &[(&str, u32, &[&str])]) -> Vec<Step> {
    rows.iter()
        .map(|(id, duration, dependencies)| {
            Step::new(*id, *duration).with_dependencies(dependencies.iter().copied())
        })
        .collect()
}

pub const RELEASE_YAML: &str = r#"
name: release
description: Build, verify and ship
steps:
  - id: checkout
    duration: 2
  - id: build
    name: Compile
    dependencies: [checkout]
    duration: 45
  - id: unit_tests
    dependencies: [build]
    duration: 20
  - id: integration_tests
    dependencies: [build]
    duration: 35
  - id: docs
    dependencies: [build]
    duration: 10
  - id: publish
    dependencies: [unit_tests, integration_tests, docs]
    duration: 5
"#;
