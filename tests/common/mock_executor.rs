//! Deterministic executors for driver tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use workflow_core::error::StepExecutionError;
use workflow_core::execution::{StepExecutor, TaskDescriptor, TaskOutcome};

/// Executor whose behavior per task id is scripted up front.
///
/// Unscripted tasks succeed immediately with `{"task": <id>}`.
#[derive(Debug, Default)]
pub struct MockExecutor {
    failing: HashSet<String>,
    soft_failing: HashSet<String>,
    panicking: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return an executor error for this task
    pub fn fail_on(mut self, task_id: &str) -> Self {
        self.failing.insert(task_id.to_string());
        self
    }

    /// Return `TaskOutcome { success: false }` for this task
    pub fn report_failure_on(mut self, task_id: &str) -> Self {
        self.soft_failing.insert(task_id.to_string());
        self
    }

    pub fn panic_on(mut self, task_id: &str) -> Self {
        self.panicking.insert(task_id.to_string());
        self
    }

    pub fn delay(mut self, task_id: &str, millis: u64) -> Self {
        self.delays
            .insert(task_id.to_string(), Duration::from_millis(millis));
        self
    }

    /// Task ids in the order execution started
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of tasks observed running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StepExecutor for MockExecutor {
    async fn execute(&self, task: &TaskDescriptor) -> Result<TaskOutcome, StepExecutionError> {
        self.calls.lock().unwrap().push(task.id.clone());
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&task.id) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panicking.contains(&task.id) {
            panic!("executor exploded on {}", task.id);
        }
        if self.failing.contains(&task.id) {
            return Err(StepExecutionError::failed_with_payload(
                format!("{} failed", task.id),
                json!({ "task": task.id, "reason": "scripted" }),
            ));
        }
        if self.soft_failing.contains(&task.id) {
            return Ok(TaskOutcome::failed(json!({ "task": task.id })));
        }

        Ok(TaskOutcome::succeeded(json!({ "task": task.id })))
    }

    fn name(&self) -> &str {
        "mock_executor"
    }
}
