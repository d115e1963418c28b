//! Family Tree Layout - WASM Module
//!
//! This module provides the layout core for an interactive family tree
//! canvas. It is compiled to WebAssembly and exposes a JavaScript-friendly
//! API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `normalize`: Raw storage rows to canonical people and relationships
//! - `graph`: Validated graph snapshot, JSON documents, petgraph topology index
//! - `layout`: Strict-partition tree layout plus radial and fan skins
//! - `focus`: Ancestor/descendant subgraph around one person
//! - `hierarchy`: Parent→children forest for tree navigation
//! - `spatial`: R-tree spatial indexing for O(log n) hit testing

use js_sys::Float32Array;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use wasm_bindgen::prelude::*;

pub mod focus;
pub mod graph;
pub mod hierarchy;
pub mod layout;
pub mod normalize;
pub mod spatial;

use focus::FocusBounds;
use graph::{Edge, Graph, PersonNode};
use layout::LayoutConfig;
use spatial::SpatialIndex;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Serialize to plain JS objects (not `Map`s).
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(JsValue::from)
}

/// `undefined`/`null` mean the default configuration.
fn config_from_js(value: JsValue) -> Result<LayoutConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        Ok(LayoutConfig::default())
    } else {
        from_js(value)
    }
}

fn error_to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// =========================================================================
// Stateless API
// =========================================================================

/// Normalize one raw person record. Never throws.
#[wasm_bindgen(js_name = normalizeNode)]
pub fn normalize_node(raw: JsValue) -> Result<JsValue, JsValue> {
    let raw: Value = from_js(raw).unwrap_or(Value::Null);
    to_js(&normalize::normalize_node(&raw))
}

/// Normalize one raw relationship record.
///
/// Returns `null` when either endpoint is missing.
#[wasm_bindgen(js_name = normalizeEdge)]
pub fn normalize_edge(raw: JsValue, tree_id: &str) -> Result<JsValue, JsValue> {
    let raw: Value = from_js(raw).unwrap_or(Value::Null);
    match normalize::normalize_edge(&raw, tree_id) {
        Some(edge) => to_js(&edge),
        None => Ok(JsValue::NULL),
    }
}

/// Lay out canonical nodes; returns the same nodes with `position` set.
///
/// `config` is optional.
#[wasm_bindgen(js_name = computeLayout)]
pub fn compute_layout(nodes: JsValue, edges: JsValue, config: JsValue) -> Result<JsValue, JsValue> {
    let nodes: Vec<PersonNode> = from_js(nodes)?;
    let edges: Vec<Edge> = from_js(edges)?;
    let config = config_from_js(config)?;
    to_js(&layout::compute_layout(&nodes, &edges, &config))
}

/// Focal person plus all ancestors and descendants.
#[wasm_bindgen(js_name = extractFocusSubgraph)]
pub fn extract_focus_subgraph(graph: JsValue, focal_id: &str) -> Result<JsValue, JsValue> {
    let graph: Graph = from_js(graph)?;
    to_js(&focus::extract_focus_subgraph(&graph, focal_id))
}

/// Forest of `{ node, children }` entries.
#[wasm_bindgen(js_name = buildHierarchy)]
pub fn build_hierarchy(graph: JsValue) -> Result<JsValue, JsValue> {
    let graph: Graph = from_js(graph)?;
    to_js(&hierarchy::build_hierarchy(&graph))
}

// =========================================================================
// Canvas handle
// =========================================================================

/// Stateful handle for one family tree canvas.
///
/// Holds the current graph, layout tunables and a spatial index over the
/// last known positions.
#[wasm_bindgen]
pub struct FamilyTreeWasm {
    graph: Graph,
    config: LayoutConfig,
    spatial: SpatialIndex,
}

#[wasm_bindgen]
impl FamilyTreeWasm {
    /// Create an empty tree.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            graph: Graph::default(),
            config: LayoutConfig::default(),
            spatial: SpatialIndex::new(),
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Replace the tree with raw storage rows.
    ///
    /// Rows are normalized; unusable relationships are dropped.
    #[wasm_bindgen(js_name = loadRecords)]
    pub fn load_records(&mut self, nodes: JsValue, edges: JsValue, tree_id: &str) -> Result<(), JsValue> {
        let nodes: Vec<Value> = from_js(nodes)?;
        let edges: Vec<Value> = from_js(edges)?;
        self.set_graph(Graph::from_records(&nodes, &edges, tree_id));
        Ok(())
    }

    /// Replace the tree with an exported `{ nodes, edges }` JSON document.
    #[wasm_bindgen(js_name = importJson)]
    pub fn import_json(&mut self, text: &str, tree_id: &str) -> Result<(), JsValue> {
        let graph = Graph::from_json(text, tree_id).map_err(error_to_js)?;
        self.set_graph(graph);
        Ok(())
    }

    /// Export the tree, with current positions, as a JSON document.
    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, JsValue> {
        self.graph.to_json().map_err(error_to_js)
    }

    /// Replace layout tunables. Missing fields take their defaults.
    #[wasm_bindgen(js_name = setLayoutConfig)]
    pub fn set_layout_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        self.config = config_from_js(config)?;
        self.spatial = SpatialIndex::from_layout(&self.graph.nodes, &self.config);
        Ok(())
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Run the layout and return the positioned nodes.
    pub fn layout(&mut self) -> Result<JsValue, JsValue> {
        self.relayout();
        to_js(&self.graph.nodes)
    }

    /// Current positions as `[x0, y0, x1, y1, ...]` in node order.
    #[wasm_bindgen(js_name = layoutPositions)]
    pub fn layout_positions(&self) -> Float32Array {
        Float32Array::from(&self.interleaved_positions()[..])
    }

    /// Bounding box of all cards, or `null` when empty.
    pub fn bounds(&self) -> Result<JsValue, JsValue> {
        to_js(&self.graph.bounds(&self.config))
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Id of the person whose card is under the point.
    #[wasm_bindgen(js_name = nodeAt)]
    pub fn node_at(&self, x: f64, y: f64) -> Option<String> {
        self.spatial.node_at(x, y).map(|slot| self.id_at(slot))
    }

    /// Id of the closest card, optionally within `max_distance`.
    #[wasm_bindgen(js_name = nearestNode)]
    pub fn nearest_node(&self, x: f64, y: f64, max_distance: Option<f64>) -> Option<String> {
        let slot = match max_distance {
            Some(max_distance) => self.spatial.nearest_within(x, y, max_distance),
            None => self.spatial.nearest(x, y),
        };
        slot.map(|slot| self.id_at(slot))
    }

    /// Ids of every card intersecting the rectangle, in node order.
    #[wasm_bindgen(js_name = nodesInRect)]
    pub fn nodes_in_rect(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<String> {
        self.spatial
            .in_rect(min_x, min_y, max_x, max_y)
            .into_iter()
            .map(|slot| self.id_at(slot))
            .collect()
    }

    // =========================================================================
    // Graph Queries
    // =========================================================================

    /// Ancestors and descendants of `id`, optionally limited in generations.
    pub fn focus(&self, id: &str, ancestors: Option<u32>, descendants: Option<u32>) -> Result<JsValue, JsValue> {
        let bounds = FocusBounds { ancestors, descendants };
        to_js(&focus::extract_focus_subgraph_bounded(&self.graph, id, bounds))
    }

    pub fn hierarchy(&self) -> Result<JsValue, JsValue> {
        to_js(&hierarchy::build_hierarchy(&self.graph))
    }

    /// People whose name contains `query` (case-insensitive).
    pub fn search(&self, query: &str) -> Result<JsValue, JsValue> {
        to_js(&self.graph.search(query))
    }

    /// `{ parents, children }` of `id`.
    pub fn relatives(&self, id: &str) -> Result<JsValue, JsValue> {
        to_js(&self.graph.relatives(id))
    }

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl FamilyTreeWasm {
    fn set_graph(&mut self, graph: Graph) {
        self.graph = graph;
        self.spatial = SpatialIndex::from_layout(&self.graph.nodes, &self.config);
    }

    fn relayout(&mut self) {
        self.graph.nodes = layout::compute_layout(&self.graph.nodes, &self.graph.edges, &self.config);
        self.spatial = SpatialIndex::from_layout(&self.graph.nodes, &self.config);
    }

    fn interleaved_positions(&self) -> Vec<f32> {
        let mut positions = Vec::with_capacity(self.graph.nodes.len() * 2);
        for node in &self.graph.nodes {
            positions.push(node.position.x as f32);
            positions.push(node.position.y as f32);
        }
        positions
    }

    fn id_at(&self, slot: usize) -> String {
        self.graph.nodes[slot].id.clone()
    }
}

impl Default for FamilyTreeWasm {
    fn default() -> Self {
        Self::new()
    }
}
