//! # Workflow Graph
//!
//! Graph construction and validation, cycle detection, and topological
//! scheduling over a workflow's step list.
//!
//! Processing always runs in this order: the [`DependencyGraph`] rejects
//! unknown dependencies, the [`cycle_detector`] gates everything downstream,
//! and only then does the [`topological`] scheduler produce an order.

pub mod cycle_detector;
pub mod dependency_graph;
pub mod topological;

pub use cycle_detector::{find_cycle, graph_has_cycle, has_cycle};
pub use dependency_graph::DependencyGraph;
pub use topological::topological_order;
