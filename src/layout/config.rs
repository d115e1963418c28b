//! Layout tunables.

use serde::{Deserialize, Serialize};

pub const DEFAULT_NODE_WIDTH: f64 = 300.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 180.0;
/// Gap between brothers and sisters.
pub const DEFAULT_SIBLING_GAP: f64 = 50.0;
/// Gap between unrelated top-level branches. Kept much larger than the
/// sibling gap so separate family lines read as separate.
pub const DEFAULT_COUSIN_GAP: f64 = 300.0;
/// Vertical distance between a parent's row and its children's row.
pub const DEFAULT_GENERATION_GAP: f64 = 250.0;
/// Radius step between rings in the radial and fan modes.
pub const DEFAULT_RING_GAP: f64 = 300.0;

/// Which placement strategy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Strict-partition top-down tree: every branch owns a rigid block of
    /// horizontal space.
    #[default]
    Tree,
    /// Concentric rings by generation, full circle.
    Radial,
    /// Concentric rings by generation, upper half circle.
    Fan,
}

/// Configuration for the layout engine.
///
/// Deserializes from camelCase JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Width of one person card.
    pub node_width: f64,
    /// Height of one person card.
    pub node_height: f64,
    /// Horizontal gap between sibling subtrees.
    pub sibling_gap: f64,
    /// Horizontal gap between disjoint root branches.
    pub cousin_gap: f64,
    /// Vertical spacing per generation.
    pub generation_gap: f64,
    /// Radius step per generation (radial and fan modes).
    pub ring_gap: f64,
    /// Placement strategy.
    pub mode: LayoutMode,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
            sibling_gap: DEFAULT_SIBLING_GAP,
            cousin_gap: DEFAULT_COUSIN_GAP,
            generation_gap: DEFAULT_GENERATION_GAP,
            ring_gap: DEFAULT_RING_GAP,
            mode: LayoutMode::Tree,
        }
    }
}

impl LayoutConfig {
    /// Default spacing with a different placement strategy.
    pub fn with_mode(mode: LayoutMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}
