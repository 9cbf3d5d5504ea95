use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use workflow_core::models::Step;
use workflow_core::orchestration::{
    create_workflow, estimate_optimized_duration, find_parallel_groups, optimize_workflow,
    OrchestrationContext,
};
use workflow_core::{topological_order, StepDefinition, WorkflowDefinition};

/// `layers` layers of `width` steps, each step depending on the whole previous layer
fn layered_steps(layers: usize, width: usize) -> Vec<Step> {
    let id = |layer: usize, column: usize| format!("l{layer}_c{column}");
    (0..layers)
        .flat_map(|layer| {
            (0..width).map(move |column| {
                let dependencies: Vec<String> = if layer == 0 {
                    Vec::new()
                } else {
                    (0..width).map(|previous| id(layer - 1, previous)).collect()
                };
                Step::new(id(layer, column), (column as u32 % 7) + 1).with_dependencies(dependencies)
            })
        })
        .collect()
}

fn layered_definition(layers: usize, width: usize) -> WorkflowDefinition {
    let steps = layered_steps(layers, width)
        .into_iter()
        .map(|step| {
            StepDefinition::new(step.id, step.estimated_duration)
                .with_dependencies(step.dependencies)
        })
        .collect();
    WorkflowDefinition::new("layered", steps)
}

fn benchmark_topological_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("topological_order");
    for (layers, width) in [(10, 10), (50, 20)] {
        let steps = layered_steps(layers, width);
        group.bench_with_input(
            BenchmarkId::from_parameter(steps.len()),
            &steps,
            |b, steps| b.iter(|| topological_order(black_box(steps))),
        );
    }
    group.finish();
}

fn benchmark_parallel_analysis(c: &mut Criterion) {
    let steps = layered_steps(20, 10);
    c.bench_function("parallel_groups_and_duration", |b| {
        b.iter(|| {
            let groups = find_parallel_groups(black_box(&steps));
            estimate_optimized_duration(&steps, &groups)
        })
    });
}

fn benchmark_create_and_optimize(c: &mut Criterion) {
    let ctx = OrchestrationContext::default();
    let definition = layered_definition(20, 10);
    c.bench_function("create_and_optimize_workflow", |b| {
        b.iter(|| {
            let workflow = create_workflow(black_box(definition.clone()), &ctx).ok()?;
            optimize_workflow(&workflow, &ctx).ok()
        })
    });
}

criterion_group!(
    benches,
    benchmark_topological_order,
    benchmark_parallel_analysis,
    benchmark_create_and_optimize
);
criterion_main!(benches);
