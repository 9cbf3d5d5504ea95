//! # Cycle Detector
//!
//! White/gray/black depth-first search over the dependency relation.
//!
//! Every step starts white (unvisited). Entering a step paints it gray (in
//! progress); meeting a gray step while walking its dependencies means the
//! walk has looped back onto its own path. A step whose dependencies are all
//! explored turns black and leaves the in-progress path. Each step is entered
//! exactly once across all roots, so a full pass is O(steps + edges).
//!
//! The traversal keeps an explicit stack instead of recursing, so very long
//! dependency chains cannot exhaust the thread stack.

use super::dependency_graph::DependencyGraph;
use crate::models::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Returns true iff the dependency relation of `steps` contains a cycle.
///
/// Unknown dependency ids are ignored; they are reported separately by
/// [`DependencyGraph::build`].
pub fn has_cycle(steps: &[Step]) -> bool {
    find_cycle_in_graph(&DependencyGraph::build_lenient(steps)).is_some()
}

/// Returns one offending cycle as a path of step ids with the first id
/// repeated at the end (`a -> b -> a`), or `None` when acyclic.
pub fn find_cycle(steps: &[Step]) -> Option<Vec<String>> {
    find_cycle_in_graph(&DependencyGraph::build_lenient(steps))
}

pub fn graph_has_cycle(graph: &DependencyGraph) -> bool {
    find_cycle_in_graph(graph).is_some()
}

pub fn find_cycle_in_graph(graph: &DependencyGraph) -> Option<Vec<String>> {
    let mut colors = vec![Color::White; graph.len()];

    for root in 0..graph.len() {
        if colors[root] != Color::White || !graph.is_canonical(root) {
            continue;
        }

        // Each frame is (step position, index of the next dependency to explore)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        colors[root] = Color::Gray;

        while let Some(frame) = stack.last_mut() {
            let (node, next_edge) = *frame;
            let dependencies = graph.dependency_positions(node);

            if next_edge == dependencies.len() {
                colors[node] = Color::Black;
                stack.pop();
                continue;
            }

            frame.1 += 1;
            let neighbor = dependencies[next_edge];

            match colors[neighbor] {
                Color::White => {
                    colors[neighbor] = Color::Gray;
                    stack.push((neighbor, 0));
                }
                Color::Gray => return Some(cycle_path(graph, &stack, neighbor)),
                Color::Black => {}
            }
        }
    }

    None
}

fn cycle_path(graph: &DependencyGraph, stack: &[(usize, usize)], entry: usize) -> Vec<String> {
    let start = stack
        .iter()
        .position(|&(node, _)| node == entry)
        .unwrap_or(0);

    let mut path: Vec<String> = stack[start..]
        .iter()
        .map(|&(node, _)| graph.id_at(node).to_string())
        .collect();
    path.push(graph.id_at(entry).to_string());
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acyclic_diamond() {
        let steps = vec![
            Step::new("a", 1),
            Step::new("b", 1).with_dependencies(["a"]),
            Step::new("c", 1).with_dependencies(["a"]),
            Step::new("d", 1).with_dependencies(["b", "c"]),
        ];
        assert!(!has_cycle(&steps));
        assert_eq!(find_cycle(&steps), None);
    }

    #[test]
    fn test_two_step_cycle() {
        let steps = vec![
            Step::new("x", 1).with_dependencies(["y"]),
            Step::new("y", 1).with_dependencies(["x"]),
        ];
        assert!(has_cycle(&steps));
        assert_eq!(
            find_cycle(&steps),
            Some(vec!["x".to_string(), "y".to_string(), "x".to_string()])
        );
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let steps = vec![Step::new("solo", 1).with_dependencies(["solo"])];
        assert_eq!(
            find_cycle(&steps),
            Some(vec!["solo".to_string(), "solo".to_string()])
        );
    }

    #[test]
    fn test_cycle_behind_acyclic_prefix() {
        let steps = vec![
            Step::new("root", 1),
            Step::new("a", 1).with_dependencies(["root", "c"]),
            Step::new("b", 1).with_dependencies(["a"]),
            Step::new("c", 1).with_dependencies(["b"]),
        ];
        let cycle = find_cycle(&steps).unwrap();
        assert_eq!(cycle.first(), cycle.last());
        assert_eq!(cycle.len(), 4);
        assert!(cycle.contains(&"b".to_string()));
        assert!(!cycle.contains(&"root".to_string()));
    }

    #[test]
    fn test_shared_dependency_is_not_a_cycle() {
        // "shared" is reached twice but turns black after the first visit
        let steps = vec![
            Step::new("shared", 1),
            Step::new("left", 1).with_dependencies(["shared"]),
            Step::new("right", 1).with_dependencies(["shared", "left"]),
        ];
        assert!(!has_cycle(&steps));
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let mut steps = vec![Step::new("s0", 1)];
        for i in 1..50_000 {
            steps.push(Step::new(format!("s{i}"), 1).with_dependencies([format!("s{}", i - 1)]));
        }
        assert!(!has_cycle(&steps));
    }
}
