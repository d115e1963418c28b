//! Radial and fan layouts.
//!
//! Generations sit on concentric rings: breadth-first depth picks the ring,
//! discovery order within a generation picks the angle. Radial mode uses the
//! full circle, fan mode the upper half.

use std::collections::VecDeque;
use std::f64::consts::PI;

use crate::graph::{Edge, PersonNode, Position};

use super::{Adjacency, LayoutConfig, LayoutMode};

/// Ring-per-generation layout engine.
pub struct RadialLayout {
    config: LayoutConfig,
}

impl RadialLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// `(sweep, offset)` in radians for the configured mode.
    fn arc(&self) -> (f64, f64) {
        match self.config.mode {
            LayoutMode::Fan => (PI, PI),
            LayoutMode::Radial | LayoutMode::Tree => (2.0 * PI, 0.0),
        }
    }

    /// Compute one position per node, in node order.
    ///
    /// With more than one root the roots share the first ring instead of
    /// stacking on the center.
    pub fn compute(&self, nodes: &[PersonNode], edges: &[Edge]) -> Vec<Position> {
        if nodes.is_empty() {
            return Vec::new();
        }

        let adjacency = Adjacency::build(nodes, edges);
        let n = adjacency.len();

        let mut level = vec![0usize; n];
        let mut rings: Vec<Vec<usize>> = Vec::new();
        let mut root_count = 0usize;
        let mut claimed = vec![false; n];
        let mut queue = VecDeque::new();

        adjacency.for_each_root(&mut claimed, |root, claimed| {
            root_count += 1;
            claimed[root] = true;
            queue.push_back(root);

            while let Some(slot) = queue.pop_front() {
                let depth = level[slot];
                if rings.len() <= depth {
                    rings.resize_with(depth + 1, Vec::new);
                }
                rings[depth].push(slot);

                for &child in &adjacency.children[slot] {
                    if !claimed[child] {
                        claimed[child] = true;
                        level[child] = depth + 1;
                        queue.push_back(child);
                    }
                }
            }
        });

        let base = usize::from(root_count > 1);
        let (sweep, offset) = self.arc();
        let mut positions = vec![Position::default(); n];

        for (depth, ring) in rings.iter().enumerate() {
            let radius = (depth + base) as f64 * self.config.ring_gap;
            let count = ring.len() as f64;
            for (i, &slot) in ring.iter().enumerate() {
                let angle = (i as f64 / count) * sweep + offset;
                positions[slot] = Position::new(radius * angle.cos(), radius * angle.sin()).sanitized();
            }
        }

        tracing::trace!(nodes = n, rings = rings.len(), roots = root_count, "radial layout placed");
        positions
    }
}
