//! R-tree over laid-out person cards using the rstar crate.
//!
//! Each entry is the card's box, so pointer hits anywhere on a card resolve
//! to that person, and distances are measured to the nearest card edge.

use rstar::{AABB, Envelope, PointDistance, RTree, RTreeObject};

use crate::graph::PersonNode;
use crate::layout::LayoutConfig;

/// One card in the index, keyed by its slot in the node slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBox {
    pub slot: usize,
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl NodeBox {
    pub fn new(slot: usize, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            slot,
            min: [x, y],
            max: [x + width, y + height],
        }
    }
}

impl RTreeObject for NodeBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

impl PointDistance for NodeBox {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        Envelope::distance_2(&self.envelope(), point)
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        Envelope::contains_point(&self.envelope(), point)
    }
}

/// Spatial index for hit testing on the canvas.
pub struct SpatialIndex {
    tree: RTree<NodeBox>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk load card boxes for `nodes` at their current positions.
    pub fn from_layout(nodes: &[PersonNode], config: &LayoutConfig) -> Self {
        let boxes = nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| {
                let p = node.position.sanitized();
                NodeBox::new(slot, p.x, p.y, config.node_width, config.node_height)
            })
            .collect();

        Self {
            tree: RTree::bulk_load(boxes),
        }
    }

    /// Slot of the card under the point; the earliest slot wins on overlap.
    pub fn node_at(&self, x: f64, y: f64) -> Option<usize> {
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        self.tree
            .locate_all_at_point(&[x, y])
            .map(|card| card.slot)
            .min()
    }

    /// Slot of the card closest to the point.
    pub fn nearest(&self, x: f64, y: f64) -> Option<usize> {
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        self.tree.nearest_neighbor(&[x, y]).map(|card| card.slot)
    }

    /// Like [`Self::nearest`], but only within `max_distance` of a card edge.
    pub fn nearest_within(&self, x: f64, y: f64, max_distance: f64) -> Option<usize> {
        if !(x.is_finite() && y.is_finite() && max_distance.is_finite()) {
            return None;
        }
        let max_distance_sq = max_distance * max_distance;
        self.tree
            .nearest_neighbor(&[x, y])
            .filter(|card| card.distance_2(&[x, y]) <= max_distance_sq)
            .map(|card| card.slot)
    }

    /// Slots of every card intersecting the rectangle, sorted.
    pub fn in_rect(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<usize> {
        if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
            return Vec::new();
        }
        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        let mut slots: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|card| card.slot)
            .collect();
        slots.sort_unstable();
        slots
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Position;

    fn placed(points: &[(f64, f64)]) -> Vec<PersonNode> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let mut node = PersonNode::new(format!("n{i}"));
                node.position = Position::new(x, y);
                node
            })
            .collect()
    }

    fn index(points: &[(f64, f64)]) -> SpatialIndex {
        SpatialIndex::from_layout(&placed(points), &LayoutConfig::default())
    }

    #[test]
    fn test_node_at_hits_card_body() {
        let index = index(&[(0.0, 0.0), (350.0, 0.0)]);
        assert_eq!(index.node_at(10.0, 10.0), Some(0));
        assert_eq!(index.node_at(299.0, 179.0), Some(0));
        assert_eq!(index.node_at(400.0, 90.0), Some(1));
        // Gap between the two cards.
        assert_eq!(index.node_at(325.0, 90.0), None);
    }

    #[test]
    fn test_node_at_overlap_prefers_first() {
        let index = index(&[(0.0, 0.0), (100.0, 0.0)]);
        assert_eq!(index.node_at(150.0, 50.0), Some(0));
    }

    #[test]
    fn test_nearest() {
        let index = index(&[(0.0, 0.0), (1000.0, 0.0)]);
        assert_eq!(index.nearest(320.0, 0.0), Some(0));
        assert_eq!(index.nearest(990.0, 500.0), Some(1));
        assert_eq!(SpatialIndex::new().nearest(0.0, 0.0), None);
    }

    #[test]
    fn test_nearest_within() {
        let index = index(&[(0.0, 0.0)]);
        // 20 to the right of the card's right edge.
        assert_eq!(index.nearest_within(320.0, 10.0, 25.0), Some(0));
        assert_eq!(index.nearest_within(320.0, 10.0, 15.0), None);
    }

    #[test]
    fn test_in_rect() {
        let index = index(&[(0.0, 0.0), (350.0, 0.0), (0.0, 500.0)]);
        assert_eq!(index.in_rect(250.0, 0.0, 400.0, 50.0), vec![0, 1]);
        assert_eq!(index.in_rect(-10.0, 450.0, 10.0, 520.0), vec![2]);
    }

    #[test]
    fn test_non_finite_queries() {
        let index = index(&[(0.0, 0.0)]);
        assert_eq!(index.node_at(f64::NAN, 0.0), None);
        assert_eq!(index.nearest(0.0, f64::INFINITY), None);
        assert!(index.in_rect(0.0, 0.0, f64::NAN, 1.0).is_empty());
        assert_eq!(index.len(), 1);
    }
}
