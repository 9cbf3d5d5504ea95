//! # Workflow Analyzer
//!
//! Structural analysis of a validated workflow: complexity, bottlenecks, risk,
//! and the human-readable suggestions derived from them.
//!
//! All thresholds come from [`AnalysisConfig`]; the defaults are the fixed
//! values in [`crate::constants`].

use chrono::Utc;
use tracing::debug;

use super::parallel_analyzer::{
    estimate_optimized_duration, find_parallel_groups, sequential_duration,
};
use super::types::{AnalysisReport, Bottleneck, DurationEstimate, RiskAssessment, RiskFactor};
use crate::config::AnalysisConfig;
use crate::constants::RiskLevel;
use crate::error::{Result, WorkflowError};
use crate::graph::DependencyGraph;
use crate::models::{ParallelGroup, Step, Workflow};

#[derive(Debug, Clone, Default)]
pub struct WorkflowAnalyzer {
    config: AnalysisConfig,
}

impl WorkflowAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Full analysis report for a non-empty workflow
    pub fn analyze(&self, workflow: &Workflow) -> Result<AnalysisReport> {
        if workflow.is_empty() {
            return Err(WorkflowError::empty_workflow("analyze_workflow"));
        }

        let steps = &workflow.steps;
        let graph = DependencyGraph::build_labeled(&workflow.name, steps)?;

        let parallel_groups = find_parallel_groups(steps);
        let durations = DurationEstimate::new(
            sequential_duration(steps),
            estimate_optimized_duration(steps, &parallel_groups),
        );
        let complexity_score = self.complexity_score(steps);
        let bottlenecks = self.identify_bottlenecks(steps, &graph);
        let risk_assessment = self.assess_risk(steps);
        let suggestions = self.generate_suggestions(
            &parallel_groups,
            &bottlenecks,
            complexity_score,
            durations.sequential_duration,
        );

        debug!(
            workflow_id = %workflow.id,
            complexity_score = complexity_score,
            parallel_groups = parallel_groups.len(),
            bottlenecks = bottlenecks.len(),
            risk_level = %risk_assessment.level,
            "Workflow analysis computed"
        );

        Ok(AnalysisReport {
            workflow_id: workflow.id.clone(),
            workflow_name: workflow.name.clone(),
            step_count: steps.len(),
            dependency_count: graph.edge_count(),
            complexity_score,
            risk_assessment,
            parallel_groups,
            bottlenecks,
            durations,
            suggestions,
            analyzed_at: Utc::now(),
        })
    }

    /// Mean of the normalized step count and the dependency density, in [0, 1].
    ///
    /// Density is declared dependencies per step over two, saturating at 1.
    pub fn complexity_score(&self, steps: &[Step]) -> f64 {
        let step_count = steps.len();
        if step_count == 0 {
            return 0.0;
        }

        let normalizer = self.config.complexity_step_normalizer.max(1) as f64;
        let size_factor = (step_count as f64 / normalizer).min(1.0);

        let total_dependencies: usize = steps.iter().map(|step| step.dependencies.len()).sum();
        let density = (total_dependencies as f64 / (step_count * 2) as f64).min(1.0);

        (size_factor + density) / 2.0
    }

    /// Long steps blocking several dependents, highest impact first.
    ///
    /// Impact is `duration × dependent_count`; equal impacts keep insertion order.
    pub fn identify_bottlenecks(&self, steps: &[Step], graph: &DependencyGraph) -> Vec<Bottleneck> {
        let mut bottlenecks: Vec<Bottleneck> = steps
            .iter()
            .filter_map(|step| {
                let dependent_count = graph.dependent_count(&step.id);
                let is_bottleneck = step.estimated_duration
                    > self.config.bottleneck_duration_threshold
                    && dependent_count > self.config.bottleneck_min_dependents;

                is_bottleneck.then(|| Bottleneck {
                    step_id: step.id.clone(),
                    name: step.name.clone(),
                    duration: step.estimated_duration,
                    dependent_count,
                    impact_score: u64::from(step.estimated_duration) * dependent_count as u64,
                })
            })
            .collect();

        // sort_by is stable
        bottlenecks.sort_by(|a, b| b.impact_score.cmp(&a.impact_score));
        bottlenecks
    }

    /// Classify workflow risk by risk entries per step.
    ///
    /// Each tripped limit is one entry, so a long step with a wide fan-in
    /// counts twice. Levels are reached when entries strictly exceed the
    /// configured share of the step count.
    pub fn assess_risk(&self, steps: &[Step]) -> RiskAssessment {
        let risk_factors: Vec<RiskFactor> = steps
            .iter()
            .filter_map(|step| {
                let dependency_count = step.dependencies.len();
                let high_dependency_count = dependency_count > self.config.high_dependency_count;
                let long_duration = step.estimated_duration > self.config.long_duration_threshold;

                (high_dependency_count || long_duration).then(|| RiskFactor {
                    step_id: step.id.clone(),
                    dependency_count,
                    duration: step.estimated_duration,
                    high_dependency_count,
                    long_duration,
                })
            })
            .collect();

        let risk_entries: usize = risk_factors
            .iter()
            .map(|factor| usize::from(factor.high_dependency_count) + usize::from(factor.long_duration))
            .sum();
        let step_count = steps.len() as f64;

        let level = if risk_entries as f64 > step_count * self.config.high_risk_ratio {
            RiskLevel::High
        } else if risk_entries as f64 > step_count * self.config.medium_risk_ratio {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        let risk_ratio = if steps.is_empty() {
            0.0
        } else {
            risk_entries as f64 / step_count
        };

        RiskAssessment {
            level,
            risk_ratio,
            risk_factors,
        }
    }

    pub fn generate_suggestions(
        &self,
        parallel_groups: &[ParallelGroup],
        bottlenecks: &[Bottleneck],
        complexity_score: f64,
        sequential_duration: u32,
    ) -> Vec<String> {
        let mut suggestions = Vec::new();

        if !parallel_groups.is_empty() {
            suggestions.push(format!(
                "Consider parallelizing {} groups of steps to save time",
                parallel_groups.len()
            ));
        }

        if !bottlenecks.is_empty() {
            suggestions.push(format!(
                "Address {} bottleneck steps to improve flow",
                bottlenecks.len()
            ));
        }

        if complexity_score > self.config.high_complexity_score {
            suggestions.push("Consider breaking down complex steps into smaller tasks".to_string());
        }

        if sequential_duration > self.config.long_workflow_threshold {
            suggestions.push(
                "Workflow is quite long - consider adding checkpoints or splitting".to_string(),
            );
        }

        suggestions
    }
}
