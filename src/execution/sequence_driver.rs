//! # Sequence Driver
//!
//! Runs task lists through an injected [`StepExecutor`], either strictly in
//! order or all at once, under one global deadline.
//!
//! ## Modes
//!
//! - **Sequential**: tasks run in list order; the first failed task stops the
//!   sequence and later tasks are never issued.
//! - **Parallel**: every task is spawned immediately (no concurrency cap) and
//!   all results are collected regardless of failures. Results come back in
//!   input order.
//!
//! ## Deadline
//!
//! A single deadline covers the whole call. When it passes, outstanding tasks
//! are aborted and the call fails with [`WorkflowError::ExecutionTimeout`],
//! unless `best_effort` is set, in which case the partial result is returned
//! with `timed_out = true`.
//!
//! Every task runs on its own tokio task so a panicking executor is observed
//! as a `JoinError` and recorded as a failed result.

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, instrument, warn, Instrument};
use uuid::Uuid;

use super::executor::StepExecutor;
use super::types::{
    ExecutionOptions, ExecutionResult, SequenceResult, TaskDescriptor, TaskOutcome,
    WorkflowExecution,
};
use crate::constants::{events, ExecutionMode, StepStatus};
use crate::error::{Result, StepExecutionError, WorkflowError};
use crate::logging::log_step_operation;
use crate::models::{ExecutionOrderEntry, Workflow};
use crate::orchestration::OrchestrationContext;

type TaskRun = (std::result::Result<TaskOutcome, StepExecutionError>, Duration);

/// Results of one batch of tasks
#[derive(Debug, Default)]
struct Batch {
    results: Vec<ExecutionResult>,
    timed_out: bool,
}

impl Batch {
    fn has_failure(&self) -> bool {
        self.results.iter().any(|result| !result.success)
    }
}

/// Longest deadline honoured; larger timeouts (up to `Duration::MAX`) mean "no deadline"
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Bookkeeping shared by `run` and `execute_workflow`
struct Execution {
    id: Uuid,
    mode: ExecutionMode,
    total_tasks: usize,
    started_at: chrono::DateTime<Utc>,
    clock: Instant,
    deadline: Instant,
}

impl Execution {
    fn start(mode: ExecutionMode, total_tasks: usize, timeout: Duration) -> Self {
        let clock = Instant::now();
        Self {
            id: Uuid::new_v4(),
            mode,
            total_tasks,
            started_at: Utc::now(),
            clock,
            deadline: clock + timeout.min(FAR_FUTURE),
        }
    }
}

pub struct SequenceDriver {
    executor: Arc<dyn StepExecutor>,
}

impl std::fmt::Debug for SequenceDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceDriver")
            .field("executor", &self.executor.name())
            .finish()
    }
}

impl SequenceDriver {
    pub fn new(executor: Arc<dyn StepExecutor>) -> Self {
        Self { executor }
    }

    /// Execute a task list sequentially or in parallel per `options`.
    ///
    /// `success` in the returned result is true iff at least one task
    /// succeeded; an empty list therefore reports `success = false`.
    #[instrument(
        skip_all,
        fields(
            correlation_id = %ctx.correlation_id(),
            executor = %self.executor.name(),
            total_tasks = tasks.len(),
            mode = %options.mode()
        )
    )]
    pub async fn run(
        &self,
        tasks: &[TaskDescriptor],
        options: &ExecutionOptions,
        ctx: &OrchestrationContext,
    ) -> Result<SequenceResult> {
        let execution = Execution::start(options.mode(), tasks.len(), options.timeout);
        info!(
            execution_id = %execution.id,
            timeout_ms = options.timeout.as_millis() as u64,
            best_effort = options.best_effort,
            "{}",
            events::SEQUENCE_STARTED
        );

        let batch = match execution.mode {
            ExecutionMode::Sequential => self.run_sequential(tasks, execution.deadline).await,
            ExecutionMode::Parallel => self.run_parallel(tasks, execution.deadline).await,
        };

        self.finish(&execution, batch.results, batch.timed_out, options)
    }

    /// Walk a workflow's execution order.
    ///
    /// `Step` entries run one at a time; `Group` entries run their members
    /// concurrently. The walk stops after the first entry containing a
    /// failure, leaving unreached steps `pending`. `options.parallel` does not
    /// apply here: concurrency comes from the groups in the order.
    #[instrument(
        skip_all,
        fields(
            correlation_id = %ctx.correlation_id(),
            workflow_id = %workflow.id,
            executor = %self.executor.name(),
            total_tasks = workflow.step_count()
        )
    )]
    pub async fn execute_workflow(
        &self,
        workflow: &Workflow,
        options: &ExecutionOptions,
        ctx: &OrchestrationContext,
    ) -> Result<WorkflowExecution> {
        let mode = if workflow.execution_order.iter().any(ExecutionOrderEntry::is_group) {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        };
        let execution = Execution::start(mode, workflow.step_count(), options.timeout);
        info!(
            execution_id = %execution.id,
            entries = workflow.execution_order.len(),
            "{}",
            events::WORKFLOW_EXECUTION_STARTED
        );

        let mut steps = workflow.steps.clone();
        let mut results = Vec::with_capacity(workflow.step_count());
        let mut timed_out = false;

        for entry in &workflow.execution_order {
            let tasks: Vec<TaskDescriptor> = entry
                .step_ids()
                .iter()
                .filter_map(|id| workflow.step(id))
                .map(TaskDescriptor::from)
                .collect();

            let started = Utc::now();
            for task in &tasks {
                if let Some(step) = steps.iter_mut().find(|step| step.id == task.id) {
                    step.mark_running(started);
                }
            }

            let batch = match entry {
                ExecutionOrderEntry::Step(_) => self.run_sequential(&tasks, execution.deadline).await,
                ExecutionOrderEntry::Group(_) => self.run_parallel(&tasks, execution.deadline).await,
            };

            let finished = Utc::now();
            for task in &tasks {
                let Some(step) = steps.iter_mut().find(|step| step.id == task.id) else {
                    continue;
                };
                match batch.results.iter().find(|result| result.step_id == task.id) {
                    Some(result) => step.mark_finished(result.success, result.outcome.clone(), finished),
                    // Abandoned at the deadline
                    None => step.reset(),
                }
            }

            let halted = batch.has_failure();
            results.extend(batch.results);
            if batch.timed_out {
                timed_out = true;
                break;
            }
            if halted {
                debug!("Entry failed; remaining entries are not issued");
                break;
            }
        }

        let sequence = self.finish(&execution, results, timed_out, options)?;
        info!(
            execution_id = %sequence.execution_id,
            completed = steps.iter().filter(|step| step.status == StepStatus::Completed).count(),
            failed = steps.iter().filter(|step| step.status == StepStatus::Failed).count(),
            "{}",
            events::WORKFLOW_EXECUTION_COMPLETED
        );

        Ok(WorkflowExecution {
            workflow_id: workflow.id.clone(),
            steps,
            sequence,
        })
    }

    async fn run_sequential(&self, tasks: &[TaskDescriptor], deadline: Instant) -> Batch {
        let mut batch = Batch::default();

        for task in tasks {
            if Instant::now() >= deadline {
                batch.timed_out = true;
                break;
            }

            let dispatched = Instant::now();
            let mut handle = self.spawn(task);
            match timeout_at(deadline, &mut handle).await {
                Ok(joined) => {
                    let result = settle(task, joined, dispatched);
                    let failed = !result.success;
                    batch.results.push(result);
                    if failed {
                        debug!(step_id = %task.id, "Task failed; stopping sequence");
                        break;
                    }
                }
                Err(_) => {
                    handle.abort();
                    batch.timed_out = true;
                    break;
                }
            }
        }

        batch
    }

    async fn run_parallel(&self, tasks: &[TaskDescriptor], deadline: Instant) -> Batch {
        let dispatched = Instant::now();
        let mut abort_handles = Vec::with_capacity(tasks.len());
        let mut pending: FuturesUnordered<_> = tasks
            .iter()
            .enumerate()
            .map(|(index, task)| {
                let handle = self.spawn(task);
                abort_handles.push(handle.abort_handle());
                async move { (index, handle.await) }
            })
            .collect();

        let mut slots: Vec<Option<ExecutionResult>> = vec![None; tasks.len()];
        let mut timed_out = false;

        loop {
            match timeout_at(deadline, pending.next()).await {
                Ok(Some((index, joined))) => {
                    slots[index] = Some(settle(&tasks[index], joined, dispatched));
                }
                Ok(None) => break,
                Err(_) => {
                    for handle in &abort_handles {
                        handle.abort();
                    }
                    timed_out = true;
                    break;
                }
            }
        }

        Batch {
            results: slots.into_iter().flatten().collect(),
            timed_out,
        }
    }

    fn spawn(&self, task: &TaskDescriptor) -> JoinHandle<TaskRun> {
        log_step_operation(
            events::STEP_STARTED,
            &task.id,
            StepStatus::Running.as_str(),
            None,
            Some(&task.description),
        );

        let executor = Arc::clone(&self.executor);
        let task = task.clone();
        tokio::spawn(
            async move {
                let started = Instant::now();
                let outcome = executor.execute(&task).await;
                (outcome, started.elapsed())
            }
            .in_current_span(),
        )
    }

    fn finish(
        &self,
        execution: &Execution,
        results: Vec<ExecutionResult>,
        timed_out: bool,
        options: &ExecutionOptions,
    ) -> Result<SequenceResult> {
        let completed_tasks = results.len();

        if timed_out {
            warn!(
                execution_id = %execution.id,
                completed_tasks = completed_tasks,
                total_tasks = execution.total_tasks,
                best_effort = options.best_effort,
                "{}",
                events::SEQUENCE_TIMED_OUT
            );
            if !options.best_effort {
                return Err(WorkflowError::ExecutionTimeout {
                    execution_id: execution.id,
                    timeout: options.timeout,
                    completed_tasks,
                });
            }
        }

        let successful_tasks = results.iter().filter(|result| result.success).count();
        let sequence = SequenceResult {
            execution_id: execution.id,
            mode: execution.mode,
            total_tasks: execution.total_tasks,
            completed_tasks,
            successful_tasks,
            failed_tasks: completed_tasks - successful_tasks,
            total_execution_time: execution.clock.elapsed(),
            results,
            success: successful_tasks > 0,
            timed_out,
            started_at: execution.started_at,
            completed_at: Utc::now(),
        };

        info!(
            execution_id = %sequence.execution_id,
            completed_tasks = sequence.completed_tasks,
            successful_tasks = sequence.successful_tasks,
            failed_tasks = sequence.failed_tasks,
            elapsed_ms = sequence.total_execution_time.as_millis() as u64,
            success = sequence.success,
            "{}",
            events::SEQUENCE_COMPLETED
        );

        Ok(sequence)
    }
}

/// Fold a joined task into its result record
fn settle(
    task: &TaskDescriptor,
    joined: std::result::Result<TaskRun, JoinError>,
    dispatched: Instant,
) -> ExecutionResult {
    let (outcome, execution_time) = match joined {
        Ok((outcome, elapsed)) => (outcome, elapsed),
        Err(join_error) => (Err(join_failure(join_error)), dispatched.elapsed()),
    };

    let result = match outcome {
        Ok(outcome) => ExecutionResult {
            step_id: task.id.clone(),
            description: task.description.clone(),
            success: outcome.success,
            execution_time,
            outcome: outcome.payload,
            error_message: None,
        },
        Err(error) => {
            let message = error.to_string();
            let outcome = match error {
                StepExecutionError::Failed {
                    payload: Some(payload),
                    ..
                } => payload,
                _ => json!({ "error": message.clone() }),
            };
            ExecutionResult {
                step_id: task.id.clone(),
                description: task.description.clone(),
                success: false,
                execution_time,
                outcome,
                error_message: Some(message),
            }
        }
    };

    let (operation, status) = if result.success {
        (events::STEP_COMPLETED, "completed")
    } else {
        (events::STEP_FAILED, "failed")
    };
    log_step_operation(
        operation,
        &result.step_id,
        status,
        Some(result.execution_time.as_millis() as u64),
        result.error_message.as_deref(),
    );

    result
}

fn join_failure(error: JoinError) -> StepExecutionError {
    if error.is_panic() {
        StepExecutionError::Panicked {
            message: panic_message(error.into_panic()),
        }
    } else {
        StepExecutionError::Cancelled {
            reason: error.to_string(),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_string(),
            Err(_) => "executor panicked".to_string(),
        },
    }
}
