//! # Orchestration
//!
//! Planning layer over the dependency graph.
//!
//! ## Core Components
//!
//! - **Parallel analyzer**: groups steps sharing an identical dependency set and
//!   estimates the duration when each group runs concurrently
//! - **WorkflowAnalyzer**: complexity score, bottlenecks, risk classification and
//!   suggestions, driven by [`crate::config::AnalysisConfig`]
//! - **Workflow planner**: the public create / analyze / optimize operations
//! - **OrchestrationContext**: per-call correlation id and configuration carried
//!   into tracing spans

pub mod context;
pub mod parallel_analyzer;
pub mod types;
pub mod workflow_analyzer;
pub mod workflow_planner;

pub use context::OrchestrationContext;
pub use parallel_analyzer::{
    estimate_optimized_duration, find_parallel_groups, order_with_groups,
    restructure_for_parallel, sequential_duration,
};
pub use types::{
    AnalysisReport, Bottleneck, DurationEstimate, OptimizedWorkflow, RiskAssessment, RiskFactor,
};
pub use workflow_analyzer::WorkflowAnalyzer;
pub use workflow_planner::{analyze_workflow, create_workflow, optimize_workflow};
