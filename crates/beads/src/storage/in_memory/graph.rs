//! Dependency graph algorithms.

use crate::domain::{DependencyType, Issue, IssueId, IssueStatus};
use crate::error::{Error, Result};
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};

/// Maximum depth for BFS traversal in blocking detection.
///
/// Bounds the parent-child propagation so malformed or cyclic graphs
/// terminate.
const MAX_BLOCKING_DEPTH: usize = 50;

/// Whether adding `from -> to` would create a cycle.
///
/// True when a path `to -> ... -> from` already exists.
pub(super) fn has_cycle_impl(
    graph: &DiGraph<IssueId, DependencyType>,
    node_map: &HashMap<IssueId, NodeIndex>,
    from: &IssueId,
    to: &IssueId,
) -> Result<bool> {
    let from_node = node_map
        .get(from)
        .ok_or_else(|| Error::IssueNotFound(from.clone()))?;
    let to_node = node_map
        .get(to)
        .ok_or_else(|| Error::IssueNotFound(to.clone()))?;

    Ok(algo::has_path_connecting(graph, *to_node, *from_node, None))
}

/// Find all blocked issues.
///
/// Phase 1 marks issues with a `Blocks` edge to an unclosed issue. Phase 2
/// propagates blocking to children through incoming `ParentChild` edges
/// (edge direction is child -> parent), depth-capped by
/// [`MAX_BLOCKING_DEPTH`].
pub(super) fn find_blocked_issues(
    graph: &DiGraph<IssueId, DependencyType>,
    node_map: &HashMap<IssueId, NodeIndex>,
    issues: &HashMap<IssueId, Issue>,
) -> HashSet<IssueId> {
    let mut blocked = HashSet::new();

    for (id, issue) in issues {
        if issue.status == IssueStatus::Closed {
            continue;
        }

        let Some(&node) = node_map.get(id) else {
            continue;
        };

        for edge in graph.edges(node) {
            if edge.weight() == &DependencyType::Blocks {
                let blocker_id = &graph[edge.target()];
                if let Some(blocker) = issues.get(blocker_id) {
                    if blocker.status != IssueStatus::Closed {
                        blocked.insert(id.clone());
                        break;
                    }
                }
            }
        }
    }

    let mut to_process: VecDeque<(IssueId, usize)> =
        blocked.iter().map(|id| (id.clone(), 0)).collect();

    while let Some((id, depth)) = to_process.pop_front() {
        if depth >= MAX_BLOCKING_DEPTH {
            continue;
        }

        let Some(&node) = node_map.get(&id) else {
            continue;
        };

        for edge in graph.edges_directed(node, Direction::Incoming) {
            if edge.weight() == &DependencyType::ParentChild {
                let child_id = &graph[edge.source()];
                if blocked.insert(child_id.clone()) {
                    to_process.push_back((child_id.clone(), depth + 1));
                }
            }
        }
    }

    blocked
}
