//! proptest strategies producing random step graphs

#![allow(dead_code)]

use proptest::prelude::*;
use workflow_core::models::Step;

pub const MAX_STEPS: usize = 24;

/// Strategy for estimated durations in minutes
pub fn duration_strategy() -> impl Strategy<Value = u32> {
    1u32..=120
}

/// Strategy for acyclic step lists.
///
/// Step `i` may only depend on steps with a lower index, which guarantees a
/// DAG; the list is then shuffled so dependencies are often declared after
/// the steps that use them.
pub fn dag_steps_strategy() -> impl Strategy<Value = Vec<Step>> {
    (1..=MAX_STEPS)
        .prop_flat_map(|count| {
            (
                prop::collection::vec(duration_strategy(), count),
                prop::collection::vec(prop::collection::vec(prop::bool::weighted(0.3), count), count),
            )
        })
        .prop_map(|(durations, edges)| {
            durations
                .iter()
                .enumerate()
                .map(|(index, duration)| {
                    let dependencies = (0..index)
                        .filter(|&candidate| edges[index][candidate])
                        .map(step_id);
                    Step::new(step_id(index), *duration).with_dependencies(dependencies)
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

/// Strategy for step lists containing at least one cycle.
///
/// Builds a chain `s0 <- s1 <- ... <- sN` and makes `s0` depend on `sN`
/// (length 1 is a self-dependency), then appends acyclic noise steps.
pub fn cyclic_steps_strategy() -> impl Strategy<Value = Vec<Step>> {
    (1usize..=8, 0usize..=6, duration_strategy())
        .prop_map(|(cycle_length, noise, duration)| {
            let mut steps: Vec<Step> = (0..cycle_length)
                .map(|index| {
                    let dependency = if index == 0 {
                        step_id(cycle_length - 1)
                    } else {
                        step_id(index - 1)
                    };
                    Step::new(step_id(index), duration).with_dependencies([dependency])
                })
                .collect();

            for extra in 0..noise {
                steps.push(
                    Step::new(format!("noise_{extra}"), duration).with_dependencies([step_id(0)]),
                );
            }
            steps
        })
        .prop_shuffle()
}

pub fn step_id(index: usize) -> String {
    format!("s{index}")
}
