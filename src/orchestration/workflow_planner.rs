//! # Workflow Planner
//!
//! Public planning operations: create a validated workflow from a definition,
//! analyze it, and restructure it for parallel execution.
//!
//! Every operation takes the caller's [`OrchestrationContext`] and runs inside
//! its span, so log lines from one request share a correlation id. Workflows
//! are treated as immutable snapshots: analysis and optimization take
//! `&Workflow` and return new values.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::context::OrchestrationContext;
use super::parallel_analyzer::{
    estimate_optimized_duration, find_parallel_groups, order_with_groups,
    restructure_for_parallel, sequential_duration,
};
use super::types::{AnalysisReport, DurationEstimate, OptimizedWorkflow};
use super::workflow_analyzer::WorkflowAnalyzer;
use crate::constants::{events, WorkflowStatus};
use crate::error::{Result, WorkflowError};
use crate::graph::cycle_detector::find_cycle_in_graph;
use crate::graph::topological;
use crate::graph::DependencyGraph;
use crate::logging::{log_error, log_workflow_operation};
use crate::models::{ExecutionOrderEntry, Step, Workflow, WorkflowDefinition};

const COMPONENT: &str = "workflow_planner";

/// Validate a definition and build a workflow with a linear execution order.
///
/// Rejects duplicate step ids, dependencies on unknown steps, and cycles
/// (including self-dependencies) before any ordering is attempted. An empty
/// definition yields an empty workflow.
pub fn create_workflow(
    definition: WorkflowDefinition,
    ctx: &OrchestrationContext,
) -> Result<Workflow> {
    let span = ctx.span("create_workflow");
    let _guard = span.enter();

    let WorkflowDefinition {
        name,
        description,
        steps,
    } = definition;
    let steps: Vec<Step> = steps.into_iter().map(Step::from).collect();

    let execution_order = match plan_linear_order(&name, &steps) {
        Ok(order) => order,
        Err(error) => {
            log_error(COMPONENT, events::WORKFLOW_REJECTED, &error.to_string(), Some(&name));
            return Err(error);
        }
    };

    let workflow = Workflow {
        id: Uuid::new_v4().to_string(),
        name,
        description,
        total_duration: sequential_duration(&steps),
        steps,
        execution_order,
        optimized_duration: None,
        status: WorkflowStatus::Created,
        created_at: Utc::now(),
    };

    if workflow.is_empty() {
        warn!(workflow_name = %workflow.name, "Workflow created without steps");
    }
    log_workflow_operation(
        events::WORKFLOW_CREATED,
        Some(&workflow.id),
        &workflow.name,
        workflow.step_count(),
        None,
    );
    info!(
        workflow_id = %workflow.id,
        total_duration = workflow.total_duration,
        "Workflow created"
    );

    Ok(workflow)
}

fn plan_linear_order(name: &str, steps: &[Step]) -> Result<Vec<ExecutionOrderEntry>> {
    let graph = DependencyGraph::build_labeled(name, steps)?;

    if let Some(cycle) = find_cycle_in_graph(&graph) {
        return Err(WorkflowError::circular_dependency(name, cycle));
    }

    let order = topological::order(&graph)?;
    debug!(step_count = order.len(), edges = graph.edge_count(), "Execution order computed");

    Ok(order.into_iter().map(ExecutionOrderEntry::Step).collect())
}

/// Analyze a workflow using the context's analysis thresholds
pub fn analyze_workflow(workflow: &Workflow, ctx: &OrchestrationContext) -> Result<AnalysisReport> {
    let span = ctx.span("analyze_workflow");
    let _guard = span.enter();

    let analyzer = WorkflowAnalyzer::new(ctx.config().analysis.clone());
    let report = analyzer.analyze(workflow).inspect_err(|error| {
        log_error(COMPONENT, events::WORKFLOW_ANALYZED, &error.to_string(), Some(&workflow.name));
    })?;

    let details = format!(
        "groups={} bottlenecks={} risk={} time_saved={}",
        report.parallel_groups.len(),
        report.bottlenecks.len(),
        report.risk_assessment.level,
        report.durations.time_saved
    );
    log_workflow_operation(
        events::WORKFLOW_ANALYZED,
        Some(&workflow.id),
        &workflow.name,
        report.step_count,
        Some(&details),
    );

    Ok(report)
}

/// Restructure a workflow for parallel execution.
///
/// Returns a new snapshot whose steps carry their `parallel_group`, whose
/// execution order collapses each group into one entry, and whose status has
/// moved through `analyzing` to `optimized`.
pub fn optimize_workflow(
    workflow: &Workflow,
    ctx: &OrchestrationContext,
) -> Result<OptimizedWorkflow> {
    let span = ctx.span("optimize_workflow");
    let _guard = span.enter();

    if workflow.is_empty() {
        let error = WorkflowError::empty_workflow("optimize_workflow");
        log_error(COMPONENT, events::WORKFLOW_OPTIMIZED, &error.to_string(), Some(&workflow.name));
        return Err(error);
    }

    let mut optimized = workflow.clone();
    optimized.transition_to(WorkflowStatus::Analyzing)?;

    let graph = DependencyGraph::build_labeled(&optimized.name, &optimized.steps)?;
    let linear_order = topological::order(&graph)?;

    let parallel_groups = find_parallel_groups(&optimized.steps);
    let annotated = restructure_for_parallel(&optimized.steps, &parallel_groups);
    let execution_order =
        order_with_groups(topological::steps_in_order(&annotated, &linear_order));

    let durations = DurationEstimate::new(
        sequential_duration(&annotated),
        estimate_optimized_duration(&annotated, &parallel_groups),
    );

    optimized.steps = annotated;
    optimized.execution_order = execution_order;
    optimized.total_duration = durations.sequential_duration;
    optimized.optimized_duration = Some(durations.optimized_duration);
    optimized.transition_to(WorkflowStatus::Optimized)?;

    let details = format!(
        "groups={} original={} optimized={} saved={}",
        parallel_groups.len(),
        durations.sequential_duration,
        durations.optimized_duration,
        durations.time_saved
    );
    log_workflow_operation(
        events::WORKFLOW_OPTIMIZED,
        Some(&optimized.id),
        &optimized.name,
        optimized.step_count(),
        Some(&details),
    );

    Ok(OptimizedWorkflow {
        workflow: optimized,
        parallel_groups,
        durations,
    })
}
