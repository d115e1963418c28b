//! Layout algorithms for family tree canvases.
//!
//! This module assigns every person a canvas position. The reference strategy
//! is the strict-partition tree in [`tree`]; [`radial`] provides the ring
//! based skins. Both accept any input graph, including cycles and forests,
//! and always return finite coordinates.

pub mod config;
pub mod radial;
pub mod tree;

use serde::Serialize;
use std::collections::HashMap;

use crate::graph::{Edge, PersonNode, Position};

pub use config::{LayoutConfig, LayoutMode};
pub use radial::RadialLayout;
pub use tree::StrictPartitionLayout;

/// Lay out `nodes` and return them with `position` populated.
///
/// Output has the same nodes in the same order; only positions change.
pub fn compute_layout(nodes: &[PersonNode], edges: &[Edge], config: &LayoutConfig) -> Vec<PersonNode> {
    let positions = compute_positions(nodes, edges, config);
    nodes
        .iter()
        .zip(positions)
        .map(|(node, position)| PersonNode {
            position,
            ..node.clone()
        })
        .collect()
}

/// Lay out `nodes` and return one position per node, in node order.
pub fn compute_positions(nodes: &[PersonNode], edges: &[Edge], config: &LayoutConfig) -> Vec<Position> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let positions = match config.mode {
        LayoutMode::Tree => StrictPartitionLayout::new(config.clone()).compute(nodes, edges),
        LayoutMode::Radial | LayoutMode::Fan => RadialLayout::new(config.clone()).compute(nodes, edges),
    };

    tracing::trace!(nodes = nodes.len(), edges = edges.len(), mode = ?config.mode, "layout computed");
    positions
}

/// Axis-aligned box around a set of laid-out person cards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// Bounding box of every card (`position` to `position + node size`).
///
/// Returns `None` for an empty slice.
pub fn layout_bounds(nodes: &[PersonNode], config: &LayoutConfig) -> Option<Bounds> {
    if nodes.is_empty() {
        return None;
    }

    let mut bounds = Bounds {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    for node in nodes {
        let p = node.position.sanitized();
        bounds.min_x = bounds.min_x.min(p.x);
        bounds.min_y = bounds.min_y.min(p.y);
        bounds.max_x = bounds.max_x.max(p.x + config.node_width);
        bounds.max_y = bounds.max_y.max(p.y + config.node_height);
    }

    Some(bounds)
}

/// Parent→children adjacency built by a single scan over the edges.
///
/// Children keep edge order. Edges naming an unknown id are skipped; when ids
/// repeat, edges attach to the first slot carrying that id.
pub(crate) struct Adjacency {
    pub children: Vec<Vec<usize>>,
    pub has_parent: Vec<bool>,
}

impl Adjacency {
    pub fn build(nodes: &[PersonNode], edges: &[Edge]) -> Self {
        let mut slots: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
        for (slot, node) in nodes.iter().enumerate() {
            slots.entry(node.id.as_str()).or_insert(slot);
        }

        let mut children = vec![Vec::new(); nodes.len()];
        let mut has_parent = vec![false; nodes.len()];

        for edge in edges {
            let (Some(&parent), Some(&child)) =
                (slots.get(edge.source.as_str()), slots.get(edge.target.as_str()))
            else {
                continue;
            };
            children[parent].push(child);
            has_parent[child] = true;
        }

        Self { children, has_parent }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Run `lay_out` once per root until every slot is claimed.
    ///
    /// Detected roots (no incoming edge) go first, in slot order. Whatever is
    /// still unclaimed afterwards can only be reached through a cycle; the
    /// first such slot is promoted to a root, repeatedly. `lay_out` must mark
    /// at least the root it receives as claimed.
    pub fn for_each_root(&self, claimed: &mut [bool], mut lay_out: impl FnMut(usize, &mut [bool])) {
        for root in 0..self.len() {
            if !self.has_parent[root] && !claimed[root] {
                lay_out(root, claimed);
            }
        }

        for slot in 0..self.len() {
            if !claimed[slot] {
                tracing::debug!(slot, "promoting node unreachable from any root");
                lay_out(slot, claimed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(ids: &[&str]) -> Vec<PersonNode> {
        ids.iter().map(|id| PersonNode::new(*id)).collect()
    }

    #[test]
    fn test_empty_input() {
        let config = LayoutConfig::default();
        assert!(compute_layout(&[], &[], &config).is_empty());
        assert!(layout_bounds(&[], &config).is_none());
    }

    #[test]
    fn test_compute_layout_preserves_identity_and_order() {
        let mut input = nodes(&["c", "a", "b"]);
        input[1].display_name = "Alice".to_string();
        let edges = vec![Edge::new("a", "b")];

        let out = compute_layout(&input, &edges, &LayoutConfig::default());
        let ids: Vec<&str> = out.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(out[1].display_name, "Alice");
    }

    #[test]
    fn test_every_mode_handles_cycles() {
        let input = nodes(&["a", "b", "c"]);
        let edges = vec![Edge::new("a", "b"), Edge::new("b", "c"), Edge::new("c", "a")];
        for mode in [LayoutMode::Tree, LayoutMode::Radial, LayoutMode::Fan] {
            let out = compute_layout(&input, &edges, &LayoutConfig::with_mode(mode));
            assert_eq!(out.len(), 3);
            assert!(out.iter().all(|n| n.position.is_finite()), "{mode:?}");
        }
    }

    #[test]
    fn test_adjacency() {
        let input = nodes(&["p", "a", "b"]);
        let edges = vec![Edge::new("p", "b"), Edge::new("p", "a"), Edge::new("p", "ghost")];
        let adjacency = Adjacency::build(&input, &edges);
        assert_eq!(adjacency.children[0], vec![2, 1]);
        assert_eq!(adjacency.has_parent, vec![false, true, true]);
    }

    #[test]
    fn test_for_each_root_promotes_cycle_members() {
        // 0 is a real root; 1 <-> 2 is a detached cycle.
        let input = nodes(&["r", "x", "y"]);
        let edges = vec![Edge::new("x", "y"), Edge::new("y", "x")];
        let adjacency = Adjacency::build(&input, &edges);

        let mut claimed = vec![false; 3];
        let mut order = Vec::new();
        adjacency.for_each_root(&mut claimed, |root, claimed| {
            order.push(root);
            claimed[root] = true;
            for &child in &adjacency.children[root] {
                claimed[child] = true;
            }
        });
        assert_eq!(order, vec![0, 1]);
        assert!(claimed.iter().all(|&c| c));
    }

    #[test]
    fn test_bounds_cover_node_boxes() {
        let mut input = nodes(&["a", "b"]);
        input[0].position = Position::new(0.0, 0.0);
        input[1].position = Position::new(350.0, 250.0);
        let config = LayoutConfig::default();

        let bounds = layout_bounds(&input, &config).unwrap();
        assert_eq!(bounds.min_x, 0.0);
        assert_eq!(bounds.max_x, 650.0);
        assert_eq!(bounds.max_y, 430.0);
        assert_eq!(bounds.width(), 650.0);
        assert_eq!(bounds.height(), 430.0);
        assert_eq!(bounds.center(), Position::new(325.0, 215.0));
    }
}
