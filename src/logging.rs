//! # Structured Logging
//!
//! Environment-aware console logging on the tracing ecosystem.
//!
//! The library itself only emits `tracing` events and spans; installing a
//! subscriber is left to the embedding application, which calls
//! [`init_tracing`] once at startup. Every planner and driver operation runs
//! inside a span carrying the caller's `correlation_id` (see
//! [`crate::orchestration::OrchestrationContext`]).
//!
//! Environment variables:
//! - `WORKFLOW_ENV` (fallback `APP_ENV`, default `development`) picks the level
//! - `RUST_LOG` overrides the level entirely
//! - `WORKFLOW_LOG_FORMAT=json` switches the console layer to JSON lines

use chrono::Utc;
use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install the console subscriber. Safe to call repeatedly; an already
/// installed global subscriber is left in place.
pub fn init_tracing() {
    TRACING_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));
        let json_output = use_json_format();
        let use_ansi = !json_output && IsTerminal::is_terminal(&std::io::stdout());

        let console_layer = if json_output {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(use_ansi)
                .with_filter(filter)
                .boxed()
        };

        if tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        } else {
            tracing::info!(
                environment = %environment,
                ansi_colors = use_ansi,
                json_output = json_output,
                "Console logging initialized"
            );
        }
    });
}

fn get_environment() -> String {
    std::env::var("WORKFLOW_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        "test" => "warn",
        _ => "debug",
    }
}

fn use_json_format() -> bool {
    std::env::var("WORKFLOW_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Log structured data for workflow-level operations
pub fn log_workflow_operation(
    operation: &str,
    workflow_id: Option<&str>,
    workflow_name: &str,
    step_count: usize,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        workflow_id = workflow_id,
        workflow_name = %workflow_name,
        step_count = step_count,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "WORKFLOW_OPERATION"
    );
}

/// Log structured data for step-level operations
pub fn log_step_operation(
    operation: &str,
    step_id: &str,
    status: &str,
    duration_ms: Option<u64>,
    details: Option<&str>,
) {
    tracing::debug!(
        operation = %operation,
        step_id = %step_id,
        status = %status,
        duration_ms = duration_ms,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "STEP_OPERATION"
    );
}

/// Log an error with its component and operation
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}
