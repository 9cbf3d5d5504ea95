#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Workflow Core
//!
//! Workflow graph engine: validates step dependency graphs, orders them,
//! finds steps that can run in parallel, and drives execution through an
//! injected executor.
//!
//! ## Overview
//!
//! A workflow is a set of named steps, each with dependencies on other steps
//! and an estimated duration in minutes. The crate
//!
//! - rejects unknown dependencies, duplicate ids and cycles,
//! - computes a deterministic execution order (Kahn's algorithm, FIFO frontier),
//! - groups steps sharing an identical dependency set into parallel groups,
//! - estimates sequential vs. parallel duration and reports bottlenecks and risk,
//! - runs task lists or whole workflows sequentially or concurrently under a
//!   global deadline.
//!
//! ## Module Organization
//!
//! - [`models`] - Steps, workflows, definitions and parallel groups
//! - [`graph`] - Dependency graph, cycle detection, topological order
//! - [`orchestration`] - Parallel-group analysis, workflow analysis and planning
//! - [`execution`] - Executor trait and the sequence driver
//! - [`config`] - Layered configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Tracing subscriber setup and structured log helpers
//!
//! ## Quick Start
//!
//! ```rust
//! use workflow_core::models::{StepDefinition, WorkflowDefinition};
//! use workflow_core::orchestration::{create_workflow, optimize_workflow, OrchestrationContext};
//!
//! # fn main() -> workflow_core::Result<()> {
//! let ctx = OrchestrationContext::default();
//! let definition = WorkflowDefinition::new(
//!     "release",
//!     vec![
//!         StepDefinition::new("build", 10),
//!         StepDefinition::new("unit_tests", 5).with_dependencies(["build"]),
//!         StepDefinition::new("lint", 5).with_dependencies(["build"]),
//!         StepDefinition::new("ship", 3).with_dependencies(["unit_tests", "lint"]),
//!     ],
//! );
//!
//! let workflow = create_workflow(definition, &ctx)?;
//! let optimized = optimize_workflow(&workflow, &ctx)?;
//! assert_eq!(optimized.original_duration(), 23);
//! assert_eq!(optimized.optimized_duration(), 18);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod execution;
pub mod graph;
pub mod logging;
pub mod models;
pub mod orchestration;

pub use config::{AnalysisConfig, ExecutionConfig, OrchestratorConfig};
pub use constants::{ExecutionMode, RiskLevel, StepStatus, WorkflowStatus};
pub use error::{Result, StepExecutionError, WorkflowError};
pub use execution::{
    ExecutionOptions, ExecutionResult, FnExecutor, SequenceDriver, SequenceResult, StepExecutor,
    TaskDescriptor, TaskOutcome, WorkflowExecution,
};
pub use graph::{find_cycle, has_cycle, topological_order, DependencyGraph};
pub use models::{
    ExecutionOrderEntry, ParallelGroup, Step, StepDefinition, Workflow, WorkflowDefinition,
};
pub use orchestration::{
    analyze_workflow, create_workflow, optimize_workflow, AnalysisReport, OptimizedWorkflow,
    OrchestrationContext, WorkflowAnalyzer,
};
