//! # Execution
//!
//! Drives steps through an injected [`StepExecutor`]: plain task lists via
//! [`SequenceDriver::run`], or a whole workflow's execution order via
//! [`SequenceDriver::execute_workflow`].

pub mod executor;
pub mod sequence_driver;
pub mod types;

pub use executor::{FnExecutor, StepExecutor};
pub use sequence_driver::SequenceDriver;
pub use types::{
    ExecutionOptions, ExecutionResult, SequenceResult, TaskDescriptor, TaskOutcome,
    WorkflowExecution,
};
