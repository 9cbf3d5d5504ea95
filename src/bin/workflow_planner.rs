//! # Workflow Planner
//!
//! Command-line tool that validates a workflow definition file and prints its
//! analysis (and optionally its optimized form) as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process;
use tracing::error;

use workflow_core::logging::init_tracing;
use workflow_core::models::WorkflowDefinition;
use workflow_core::orchestration::{
    analyze_workflow, create_workflow, optimize_workflow, OrchestrationContext,
};
use workflow_core::OrchestratorConfig;

#[derive(Parser)]
#[command(name = "workflow-planner")]
#[command(about = "Validate, analyze and optimize workflow definitions")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file (defaults to config/workflow-core.* when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a definition and print its execution order
    Validate {
        /// Workflow definition (.json, .yaml or .yml)
        file: PathBuf,
    },

    /// Print the analysis report
    Analyze {
        file: PathBuf,

        /// Also restructure the workflow for parallel execution
        #[arg(long)]
        optimize: bool,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            error!(error = %e, "workflow-planner failed");
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    let config = match &cli.config {
        Some(path) => OrchestratorConfig::load_from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => OrchestratorConfig::load().context("loading configuration")?,
    };
    let ctx = OrchestrationContext::new(config);

    let report = match &cli.command {
        Commands::Validate { file } => {
            let workflow = create_workflow(load_definition(file)?, &ctx)?;
            json!({
                "workflow_id": workflow.id,
                "name": workflow.name,
                "step_count": workflow.step_count(),
                "total_duration": workflow.total_duration,
                "execution_order": workflow.execution_order,
            })
        }
        Commands::Analyze { file, optimize } => {
            let workflow = create_workflow(load_definition(file)?, &ctx)?;
            let analysis = analyze_workflow(&workflow, &ctx)?;
            if *optimize {
                let optimized = optimize_workflow(&workflow, &ctx)?;
                json!({ "analysis": analysis, "optimized": optimized })
            } else {
                json!({ "analysis": analysis })
            }
        }
    };

    let output = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    Ok(output)
}

fn load_definition(file: &Path) -> Result<WorkflowDefinition> {
    WorkflowDefinition::from_file(file)
        .with_context(|| format!("reading workflow definition {}", file.display()))
}
