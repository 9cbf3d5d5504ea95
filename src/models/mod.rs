//! # Workflow Models
//!
//! Pure data types for steps, workflows and their derived scheduling artifacts.

pub mod step;
pub mod workflow;

pub use step::{Step, StepDefinition};
pub use workflow::{ExecutionOrderEntry, ParallelGroup, Workflow, WorkflowDefinition};
