//! Focus subgraph extraction.
//!
//! Given a focal person, keep that person plus everyone reachable by walking
//! parent edges upward (ancestors) and child edges downward (descendants).
//! Siblings, spouses and cousins are not included unless they are also
//! ancestors or descendants.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::graph::Graph;

/// How many generations to walk in each direction. `None` is unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FocusBounds {
    pub ancestors: Option<u32>,
    pub descendants: Option<u32>,
}

impl FocusBounds {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn generations(ancestors: u32, descendants: u32) -> Self {
        Self {
            ancestors: Some(ancestors),
            descendants: Some(descendants),
        }
    }
}

/// Focal node plus all transitive ancestors and descendants.
///
/// Returns an empty graph when `focal_id` is not in `graph`.
pub fn extract_focus_subgraph(graph: &Graph, focal_id: &str) -> Graph {
    extract_focus_subgraph_bounded(graph, focal_id, FocusBounds::unlimited())
}

/// Like [`extract_focus_subgraph`], limited to a number of generations.
pub fn extract_focus_subgraph_bounded(graph: &Graph, focal_id: &str, bounds: FocusBounds) -> Graph {
    let index = graph.index();
    let Some(focal) = index.slot(focal_id) else {
        tracing::debug!(focal_id, "focus node not found");
        return Graph::default();
    };

    let mut keep = vec![false; graph.nodes.len()];
    keep[focal] = true;
    walk(focal, bounds.ancestors, &mut keep, |slot| index.parents(slot));
    walk(focal, bounds.descendants, &mut keep, |slot| index.children(slot));

    let nodes: Vec<_> = graph
        .nodes
        .iter()
        .zip(&keep)
        .filter(|&(_, &kept)| kept)
        .map(|(node, _)| node.clone())
        .collect();

    let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let edges = graph
        .edges
        .iter()
        .filter(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
        .cloned()
        .collect();

    let focused = Graph { nodes, edges };
    tracing::trace!(
        focal_id,
        nodes = focused.nodes.len(),
        edges = focused.edges.len(),
        "focus subgraph extracted"
    );
    focused
}

/// Breadth-first walk from `start` along `next`, marking slots in `keep`.
///
/// Each slot is expanded at most once per walk, so cycles terminate.
fn walk(start: usize, limit: Option<u32>, keep: &mut [bool], next: impl Fn(usize) -> Vec<usize>) {
    let mut visited = vec![false; keep.len()];
    visited[start] = true;
    let mut queue = VecDeque::from([(start, 0u32)]);

    while let Some((slot, depth)) = queue.pop_front() {
        if limit.is_some_and(|max| depth >= max) {
            continue;
        }
        for neighbor in next(slot) {
            if !visited[neighbor] {
                visited[neighbor] = true;
                keep[neighbor] = true;
                queue.push_back((neighbor, depth + 1));
            }
        }
    }
}
