//! # Parallel-Group Analyzer
//!
//! Discovers steps that may run concurrently and estimates how long the
//! workflow takes when they do.
//!
//! ## Grouping heuristic
//!
//! Steps are grouped by their exact dependency *set* (order and repeats in the
//! declared list do not matter). Steps sharing identical prerequisites have no
//! ordering constraint between them, so any such set with two or more members
//! becomes a [`ParallelGroup`].
//!
//! This is an approximation of true independence: two steps with different
//! dependency sets that are both satisfied at the same point are also safe to
//! run together, but are not detected. Exact-set grouping keeps the result
//! simple and deterministic.
//!
//! ## Duration model
//!
//! Grouped steps run fully in parallel (a group costs its longest member);
//! everything else runs strictly sequentially.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::constants::PARALLEL_GROUP_PREFIX;
use crate::graph::dependency_graph::DependencyGraph;
use crate::graph::topological;
use crate::models::{ExecutionOrderEntry, ParallelGroup, Step};

/// Group step ids by identical dependency set.
///
/// Groups are numbered `group_1`, `group_2`, ... in the order their first
/// member appears in `steps`. Every step lands in at most one group.
pub fn find_parallel_groups(steps: &[Step]) -> Vec<ParallelGroup> {
    let mut buckets: Vec<(BTreeSet<&str>, Vec<&Step>)> = Vec::new();
    let mut bucket_index: HashMap<BTreeSet<&str>, usize> = HashMap::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for step in steps {
        if !seen.insert(step.id.as_str()) {
            continue;
        }
        let key = step.dependency_set();
        match bucket_index.get(&key) {
            Some(&position) => buckets[position].1.push(step),
            None => {
                bucket_index.insert(key.clone(), buckets.len());
                buckets.push((key, vec![step]));
            }
        }
    }

    buckets
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .enumerate()
        .map(|(position, (dependencies, members))| ParallelGroup {
            group_id: format!("{PARALLEL_GROUP_PREFIX}{}", position + 1),
            step_ids: members.iter().map(|step| step.id.clone()).collect(),
            dependencies: dependencies.into_iter().map(str::to_string).collect(),
            max_duration: members
                .iter()
                .map(|step| step.estimated_duration)
                .max()
                .unwrap_or(0),
        })
        .collect()
}

/// Estimated wall-clock minutes when every group runs concurrently.
///
/// Walks `steps` in dependency order. The first member of a group that is met
/// adds the group's longest duration and marks the group processed; later
/// members add nothing. Ungrouped steps add their own duration.
pub fn estimate_optimized_duration(steps: &[Step], groups: &[ParallelGroup]) -> u32 {
    let membership = group_membership(groups);
    let mut processed: HashSet<&str> = HashSet::new();
    let mut total: u32 = 0;

    for step in dependency_order(steps) {
        match membership.get(step.id.as_str()) {
            Some(group) => {
                if processed.insert(group.group_id.as_str()) {
                    total = total.saturating_add(group_duration(group, steps));
                }
            }
            None => total = total.saturating_add(step.estimated_duration),
        }
    }

    total
}

/// Sum of every step's duration
pub fn sequential_duration(steps: &[Step]) -> u32 {
    steps
        .iter()
        .fold(0u32, |total, step| total.saturating_add(step.estimated_duration))
}

/// Annotate each grouped step with its group id, leaving list order untouched
pub fn restructure_for_parallel(steps: &[Step], groups: &[ParallelGroup]) -> Vec<Step> {
    let membership = group_membership(groups);

    steps
        .iter()
        .map(|step| {
            let mut annotated = step.clone();
            annotated.parallel_group = membership
                .get(step.id.as_str())
                .map(|group| group.group_id.clone());
            annotated
        })
        .collect()
}

/// Build an execution order from annotated steps.
///
/// `steps` is expected in dependency order. Members of the same group collapse
/// into one `Group` entry, emitted where the group's first member appears and
/// listing members in input order; ungrouped steps stay single entries. Pulling
/// a later member forward is always safe because it shares its first member's
/// dependencies, all of which precede that position.
pub fn order_with_groups<'a, I>(steps: I) -> Vec<ExecutionOrderEntry>
where
    I: IntoIterator<Item = &'a Step>,
{
    let steps: Vec<&Step> = steps.into_iter().collect();
    let mut order = Vec::new();
    let mut emitted_groups: HashSet<&str> = HashSet::new();

    for step in &steps {
        match step.parallel_group.as_deref() {
            None => order.push(ExecutionOrderEntry::Step(step.id.clone())),
            Some(group_id) => {
                if !emitted_groups.insert(group_id) {
                    continue;
                }
                let members: Vec<String> = steps
                    .iter()
                    .filter(|candidate| candidate.parallel_group.as_deref() == Some(group_id))
                    .map(|candidate| candidate.id.clone())
                    .collect();
                order.push(ExecutionOrderEntry::Group(members));
            }
        }
    }

    order
}

/// Steps in Kahn order, falling back to insertion order for input that is not
/// a valid DAG
fn dependency_order(steps: &[Step]) -> Vec<&Step> {
    let graph = DependencyGraph::build_lenient(steps);
    match topological::order(&graph) {
        Ok(order) => topological::steps_in_order(steps, &order),
        Err(_) => steps.iter().collect(),
    }
}

fn group_membership(groups: &[ParallelGroup]) -> HashMap<&str, &ParallelGroup> {
    groups
        .iter()
        .flat_map(|group| group.step_ids.iter().map(move |id| (id.as_str(), group)))
        .collect()
}

/// Longest member duration, read from the steps themselves when present
fn group_duration(group: &ParallelGroup, steps: &[Step]) -> u32 {
    steps
        .iter()
        .filter(|step| group.contains(&step.id))
        .map(|step| step.estimated_duration)
        .max()
        .unwrap_or(group.max_duration)
}
