//! Strict-partition tree layout.
//!
//! Every subtree reserves a rigid horizontal block ("footprint") wide enough
//! for all of its descendants, so no branch can ever overlap a sibling
//! branch. Parents are centered over their first and last child.
//!
//! # Algorithm Overview
//!
//! 1. **Ownership walk (pre-order):** Starting from each root, an explicit
//!    stack walks the parent→child adjacency. A node expanding its children
//!    claims every child no other node has claimed yet, so each person is
//!    placed exactly once even with multiple parents or cycles.
//! 2. **Width pass (reverse pre-order):** A leaf is one card wide. An internal
//!    node needs the sum of its children plus the sibling gaps between them,
//!    but never less than one card.
//! 3. **Placement pass:** A forward sweep hands each child its starting x
//!    (left to right, advancing by footprint + sibling gap). A backward sweep
//!    fixes x: leaves sit at their start, parents at the midpoint of their
//!    outer children. `y = depth * generation_gap`.
//! 4. **Root spacing:** Root branches sit left to right, each advancing by its
//!    footprint plus the cousin gap.

use crate::graph::{Edge, PersonNode, Position};

use super::{Adjacency, LayoutConfig};

/// Ownership forest produced by the pre-order walk.
struct Partition {
    /// Every slot exactly once, grouped by root, parents before children.
    order: Vec<usize>,
    /// Children this slot owns, in edge order.
    owned: Vec<Vec<usize>>,
    depth: Vec<u32>,
    roots: Vec<usize>,
}

impl Partition {
    fn build(adjacency: &Adjacency) -> Self {
        let n = adjacency.len();
        let mut order = Vec::with_capacity(n);
        let mut owned: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut depth = vec![0u32; n];
        let mut roots = Vec::new();
        let mut claimed = vec![false; n];
        let mut stack = Vec::new();

        adjacency.for_each_root(&mut claimed, |root, claimed| {
            roots.push(root);
            claimed[root] = true;
            depth[root] = 0;
            stack.push(root);

            while let Some(slot) = stack.pop() {
                order.push(slot);
                for &child in &adjacency.children[slot] {
                    if !claimed[child] {
                        claimed[child] = true;
                        depth[child] = depth[slot].saturating_add(1);
                        owned[slot].push(child);
                    }
                }
                // Reversed so the first child is popped (and placed) first.
                stack.extend(owned[slot].iter().rev().copied());
            }
        });

        Self {
            order,
            owned,
            depth,
            roots,
        }
    }
}

/// The strict-partition layout engine.
pub struct StrictPartitionLayout {
    config: LayoutConfig,
}

impl StrictPartitionLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(LayoutConfig::default())
    }

    /// Compute one position per node, in node order.
    ///
    /// Terminates for any edge set; all coordinates are finite.
    pub fn compute(&self, nodes: &[PersonNode], edges: &[Edge]) -> Vec<Position> {
        if nodes.is_empty() {
            return Vec::new();
        }

        let adjacency = Adjacency::build(nodes, edges);
        let partition = Partition::build(&adjacency);
        let widths = self.widths(&partition);

        // ===== Placement =====

        let n = nodes.len();
        let mut start = vec![0.0f64; n];

        let mut cursor = 0.0;
        for &root in &partition.roots {
            start[root] = cursor;
            cursor += widths[root] + self.config.cousin_gap;
        }

        for &slot in &partition.order {
            let mut child_cursor = start[slot];
            for &child in &partition.owned[slot] {
                start[child] = child_cursor;
                child_cursor += widths[child] + self.config.sibling_gap;
            }
        }

        let mut xs = start.clone();
        for &slot in partition.order.iter().rev() {
            let owned = &partition.owned[slot];
            if let (Some(&first), Some(&last)) = (owned.first(), owned.last()) {
                xs[slot] = (xs[first] + xs[last]) / 2.0;
            }
        }

        tracing::trace!(
            nodes = n,
            roots = partition.roots.len(),
            "strict-partition layout placed"
        );

        xs.into_iter()
            .zip(&partition.depth)
            .map(|(x, &depth)| {
                Position::new(x, f64::from(depth) * self.config.generation_gap).sanitized()
            })
            .collect()
    }

    /// Footprint of every slot's owned subtree.
    fn widths(&self, partition: &Partition) -> Vec<f64> {
        let node_width = self.config.node_width;
        let mut widths = vec![node_width; partition.owned.len()];

        for &slot in partition.order.iter().rev() {
            let owned = &partition.owned[slot];
            if owned.is_empty() {
                continue;
            }
            let children: f64 = owned.iter().map(|&child| widths[child]).sum();
            let gaps = (owned.len() - 1) as f64 * self.config.sibling_gap;
            widths[slot] = (children + gaps).max(node_width);
        }

        widths
    }
}
