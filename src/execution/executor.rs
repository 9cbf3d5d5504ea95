//! # Step Executor
//!
//! The injected capability that actually performs a step. The driver owns
//! scheduling, deadlines and aggregation; an executor only turns one
//! [`TaskDescriptor`] into a [`TaskOutcome`] or an error.

use async_trait::async_trait;
use std::fmt;
use std::future::Future;

use super::types::{TaskDescriptor, TaskOutcome};
use crate::error::StepExecutionError;

#[async_trait]
pub trait StepExecutor: Send + Sync {
    /// Run one task. Errors and panics are recorded as failed results by the
    /// driver and never abort the surrounding execution.
    async fn execute(&self, task: &TaskDescriptor) -> Result<TaskOutcome, StepExecutionError>;

    /// Name used in log output
    fn name(&self) -> &str {
        "step_executor"
    }
}

/// Adapts an async closure into a [`StepExecutor`].
///
/// ```rust
/// use std::sync::Arc;
/// use workflow_core::error::StepExecutionError;
/// use workflow_core::execution::{FnExecutor, StepExecutor, TaskDescriptor, TaskOutcome};
///
/// let executor: Arc<dyn StepExecutor> = Arc::new(FnExecutor::new(|task: TaskDescriptor| async move {
///     Ok::<_, StepExecutionError>(TaskOutcome::succeeded(
///         serde_json::json!({ "echo": task.description }),
///     ))
/// }));
///
/// # tokio_test::block_on(async {
/// let outcome = executor.execute(&TaskDescriptor::new("task_1", "compile")).await?;
/// assert!(outcome.success);
/// assert_eq!(outcome.payload["echo"], "compile");
/// # Ok::<(), StepExecutionError>(())
/// # }).unwrap();
/// ```
pub struct FnExecutor<F> {
    name: String,
    handler: F,
}

impl<F> FnExecutor<F> {
    pub fn new(handler: F) -> Self {
        Self {
            name: "fn_executor".to_string(),
            handler,
        }
    }

    pub fn named(name: impl Into<String>, handler: F) -> Self {
        Self {
            name: name.into(),
            handler,
        }
    }
}

impl<F> fmt::Debug for FnExecutor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnExecutor").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<F, Fut> StepExecutor for FnExecutor<F>
where
    F: Fn(TaskDescriptor) -> Fut + Send + Sync,
    Fut: Future<Output = Result<TaskOutcome, StepExecutionError>> + Send,
{
    async fn execute(&self, task: &TaskDescriptor) -> Result<TaskOutcome, StepExecutionError> {
        (self.handler)(task.clone()).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
