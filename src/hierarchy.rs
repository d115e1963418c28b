//! Parent→children forest for tree-style navigation.

use serde::Serialize;

use crate::graph::{Graph, GraphIndex, PersonNode};

/// One person and the people listed under them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyEntry<'a> {
    pub node: &'a PersonNode,
    pub children: Vec<HierarchyEntry<'a>>,
}

impl HierarchyEntry<'_> {
    /// Number of entries in this subtree, including itself.
    pub fn size(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(entry) = stack.pop() {
            total += 1;
            stack.extend(entry.children.iter());
        }
        total
    }
}

/// Pending expansion of one entry.
struct Frame<'a> {
    slot: usize,
    pending: Vec<usize>,
    next: usize,
    built: Vec<HierarchyEntry<'a>>,
}

impl Frame<'_> {
    fn new(index: &GraphIndex<'_>, slot: usize) -> Self {
        Self {
            slot,
            pending: index.children(slot),
            next: 0,
            built: Vec::new(),
        }
    }
}

/// Build the forest of roots (nodes no edge targets), in node order.
///
/// Children follow edge order. A person with two parents is listed under
/// both, but their own subtree is expanded only under the first parent that
/// reaches them; later parents get a leaf entry. An edge leading back to
/// someone already on the path from the root is skipped, so cycles
/// terminate. The forest has at most one entry per root plus one per edge.
pub fn build_hierarchy(graph: &Graph) -> Vec<HierarchyEntry<'_>> {
    let index = graph.index();
    let mut on_path = vec![false; graph.nodes.len()];
    let mut expanded = vec![false; graph.nodes.len()];
    let mut forest = Vec::new();

    for root in index.roots() {
        on_path[root] = true;
        expanded[root] = true;
        let mut stack = vec![Frame::new(&index, root)];

        while let Some(top) = stack.last_mut() {
            if let Some(&child) = top.pending.get(top.next) {
                top.next += 1;
                if on_path[child] {
                    continue;
                }
                if expanded[child] {
                    top.built.push(HierarchyEntry {
                        node: &graph.nodes[child],
                        children: Vec::new(),
                    });
                    continue;
                }
                on_path[child] = true;
                expanded[child] = true;
                stack.push(Frame::new(&index, child));
                continue;
            }

            let Some(frame) = stack.pop() else { break };
            on_path[frame.slot] = false;
            let entry = HierarchyEntry {
                node: &graph.nodes[frame.slot],
                children: frame.built,
            };
            match stack.last_mut() {
                Some(parent) => parent.built.push(entry),
                None => forest.push(entry),
            }
        }
    }

    tracing::trace!(roots = forest.len(), "hierarchy built");
    forest
}
