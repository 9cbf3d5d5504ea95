//! # Orchestration Context
//!
//! Explicit per-call context handed to every planner and driver operation.
//! It replaces process-wide logging state: the caller owns the configuration
//! and the correlation id, and each operation opens its tracing span from it.

use std::sync::Arc;
use tracing::Span;
use uuid::Uuid;

use crate::config::OrchestratorConfig;

#[derive(Debug, Clone)]
pub struct OrchestrationContext {
    correlation_id: Uuid,
    config: Arc<OrchestratorConfig>,
}

impl OrchestrationContext {
    pub fn new(config: OrchestratorConfig) -> Self {
        Self::with_shared_config(Arc::new(config))
    }

    pub fn with_shared_config(config: Arc<OrchestratorConfig>) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            config,
        }
    }

    /// Same configuration, caller supplied correlation id
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn shared_config(&self) -> Arc<OrchestratorConfig> {
        Arc::clone(&self.config)
    }

    /// Span for one operation, tagged with the correlation id
    pub fn span(&self, operation: &'static str) -> Span {
        tracing::info_span!(
            "workflow_core",
            correlation_id = %self.correlation_id,
            operation = operation
        )
    }
}

impl Default for OrchestrationContext {
    fn default() -> Self {
        Self::new(OrchestratorConfig::default())
    }
}
