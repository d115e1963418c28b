//! Graph container and topology index.
//!
//! [`Graph`] is the validated `{nodes, edges}` snapshot handed to every other
//! component: node ids are unique and every edge points at known nodes.
//! [`GraphIndex`] is a petgraph `StableGraph` over a node slice, keyed by slot
//! (position in the slice), for parent/child queries without rescanning the
//! edge list.

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use super::edge::Edge;
use super::error::GraphError;
use super::node::PersonNode;
use crate::layout::{Bounds, LayoutConfig, layout_bounds};
use crate::normalize::{normalize_edge, normalize_node};

/// A validated family graph.
///
/// May contain cycles and several disconnected components; every consumer
/// tolerates both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<PersonNode>,
    pub edges: Vec<Edge>,
}

/// Direct relatives of one person.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relatives<'a> {
    pub parents: Vec<&'a PersonNode>,
    pub children: Vec<&'a PersonNode>,
}

impl Graph {
    /// Build a graph from canonical nodes and edges.
    ///
    /// Nodes with an empty id and repeated ids (after the first) are dropped,
    /// as are edges whose endpoints are not known node ids.
    pub fn new(nodes: Vec<PersonNode>, edges: Vec<Edge>) -> Self {
        let mut seen: HashSet<String> = HashSet::with_capacity(nodes.len());
        let mut kept_nodes = Vec::with_capacity(nodes.len());

        for node in nodes {
            if node.id.is_empty() {
                tracing::warn!(name = %node.display_name, "dropping person without an id");
                continue;
            }
            if !seen.insert(node.id.clone()) {
                tracing::warn!(id = %node.id, "dropping duplicate person id");
                continue;
            }
            kept_nodes.push(node);
        }

        let edge_total = edges.len();
        let kept_edges: Vec<Edge> = edges
            .into_iter()
            .filter(|edge| {
                let known = seen.contains(&edge.source) && seen.contains(&edge.target);
                if !known {
                    tracing::warn!(
                        edge = %edge.id,
                        source = %edge.source,
                        target = %edge.target,
                        "dropping relationship with unknown endpoint"
                    );
                }
                known
            })
            .collect();

        tracing::trace!(
            nodes = kept_nodes.len(),
            edges = kept_edges.len(),
            dropped_edges = edge_total - kept_edges.len(),
            "graph built"
        );

        Self {
            nodes: kept_nodes,
            edges: kept_edges,
        }
    }

    /// Normalize raw storage rows and build a graph from them.
    pub fn from_records(raw_nodes: &[Value], raw_edges: &[Value], tree_id: &str) -> Self {
        let nodes = raw_nodes.iter().map(normalize_node).collect();
        let edges = raw_edges
            .iter()
            .filter_map(|raw| {
                let edge = normalize_edge(raw, tree_id);
                if edge.is_none() {
                    tracing::warn!(record = %raw, "dropping relationship without both endpoints");
                }
                edge
            })
            .collect();
        Self::new(nodes, edges)
    }

    /// Parse an exported `{ "nodes": [...], "edges": [...] }` document.
    ///
    /// Records inside the arrays go through the normalizer, so hand-edited or
    /// foreign files load as long as the two arrays are present.
    pub fn from_json(text: &str, tree_id: &str) -> Result<Self, GraphError> {
        let doc: Value = serde_json::from_str(text)?;
        let nodes = doc
            .get("nodes")
            .and_then(Value::as_array)
            .ok_or(GraphError::InvalidDocument { field: "nodes" })?;
        let edges = doc
            .get("edges")
            .and_then(Value::as_array)
            .ok_or(GraphError::InvalidDocument { field: "edges" })?;
        Ok(Self::from_records(nodes, edges, tree_id))
    }

    /// Export as a pretty-printed document readable by [`Graph::from_json`].
    pub fn to_json(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Build a topology index over this graph.
    pub fn index(&self) -> GraphIndex<'_> {
        GraphIndex::build(&self.nodes, &self.edges)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Case-insensitive substring search over display names.
    ///
    /// A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&PersonNode> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.nodes
            .iter()
            .filter(|n| n.display_name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Parents and children of `id`, in edge order. Unknown ids have none.
    pub fn relatives(&self, id: &str) -> Relatives<'_> {
        let index = self.index();
        let Some(slot) = index.slot(id) else {
            return Relatives {
                parents: Vec::new(),
                children: Vec::new(),
            };
        };

        Relatives {
            parents: index.parents(slot).into_iter().map(|s| &self.nodes[s]).collect(),
            children: index.children(slot).into_iter().map(|s| &self.nodes[s]).collect(),
        }
    }

    /// Bounding box of all node boxes at their current positions.
    pub fn bounds(&self, config: &LayoutConfig) -> Option<Bounds> {
        layout_bounds(&self.nodes, config)
    }
}

/// Parent/child topology over a node slice.
///
/// Node weights are slots into the slice; edge weights are positions in the
/// edge slice, so children come back in the order their edges were given.
/// Edges naming an unknown id are ignored. If ids repeat, the first slot wins.
pub struct GraphIndex<'a> {
    graph: StableGraph<usize, usize, Directed>,
    id_to_index: HashMap<&'a str, NodeIndex>,
    slot_to_index: Vec<NodeIndex>,
}

impl<'a> GraphIndex<'a> {
    pub fn build(nodes: &'a [PersonNode], edges: &'a [Edge]) -> Self {
        let mut graph = StableGraph::with_capacity(nodes.len(), edges.len());
        let mut id_to_index = HashMap::with_capacity(nodes.len());
        let mut slot_to_index = Vec::with_capacity(nodes.len());

        for (slot, node) in nodes.iter().enumerate() {
            let index = graph.add_node(slot);
            slot_to_index.push(index);
            id_to_index.entry(node.id.as_str()).or_insert(index);
        }

        for (position, edge) in edges.iter().enumerate() {
            let (Some(&source), Some(&target)) = (
                id_to_index.get(edge.source.as_str()),
                id_to_index.get(edge.target.as_str()),
            ) else {
                continue;
            };
            graph.add_edge(source, target, position);
        }

        Self {
            graph,
            id_to_index,
            slot_to_index,
        }
    }

    /// Slot of the node with the given id.
    pub fn slot(&self, id: &str) -> Option<usize> {
        self.id_to_index
            .get(id)
            .and_then(|&index| self.graph.node_weight(index).copied())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Slots with no incoming edge, in slot order.
    pub fn roots(&self) -> Vec<usize> {
        let mut roots: Vec<usize> = self
            .graph
            .externals(Direction::Incoming)
            .filter_map(|index| self.graph.node_weight(index).copied())
            .collect();
        roots.sort_unstable();
        roots
    }

    /// Whether any edge targets this slot.
    pub fn has_parent(&self, slot: usize) -> bool {
        self.slot_to_index.get(slot).is_some_and(|&index| {
            self.graph
                .edges_directed(index, Direction::Incoming)
                .next()
                .is_some()
        })
    }

    /// Child slots in edge order.
    pub fn children(&self, slot: usize) -> Vec<usize> {
        self.neighbors_in_edge_order(slot, Direction::Outgoing)
    }

    /// Parent slots in edge order.
    pub fn parents(&self, slot: usize) -> Vec<usize> {
        self.neighbors_in_edge_order(slot, Direction::Incoming)
    }

    fn neighbors_in_edge_order(&self, slot: usize, direction: Direction) -> Vec<usize> {
        let Some(&index) = self.slot_to_index.get(slot) else {
            return Vec::new();
        };

        let mut found: Vec<(usize, usize)> = self
            .graph
            .edges_directed(index, direction)
            .filter_map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                self.graph.node_weight(other).map(|&s| (*e.weight(), s))
            })
            .collect();
        found.sort_unstable_by_key(|&(position, _)| position);
        found.into_iter().map(|(_, s)| s).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Position;
    use serde_json::json;

    fn family() -> Graph {
        Graph::new(
            vec![
                PersonNode::new("gran").with_name("Granny Weatherwax"),
                PersonNode::new("mum").with_name("Magrat Garlick"),
                PersonNode::new("aunt").with_name("Agnes Nitt"),
                PersonNode::new("kid").with_name("Esme Junior"),
            ],
            vec![
                Edge::new("gran", "mum"),
                Edge::new("gran", "aunt"),
                Edge::new("mum", "kid"),
            ],
        )
    }

    #[test]
    fn test_new_drops_dangling_edges() {
        let graph = Graph::new(
            vec![PersonNode::new("a"), PersonNode::new("b")],
            vec![Edge::new("a", "b"), Edge::new("a", "ghost"), Edge::new("ghost", "b")],
        );
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges[0].id, "a->b");
    }

    #[test]
    fn test_new_drops_duplicate_and_empty_ids() {
        let graph = Graph::new(
            vec![
                PersonNode::new("a").with_name("First"),
                PersonNode::new("a").with_name("Second"),
                PersonNode::new(""),
            ],
            vec![],
        );
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.nodes[0].display_name, "First");
    }

    #[test]
    fn test_from_records() {
        let nodes = vec![
            json!({ "id": "p1", "data": { "name": "Parent" } }),
            json!({ "id": "c1", "data": { "first_name": "Child", "last_name": "One" } }),
        ];
        let edges = vec![
            json!({ "parent_id": "p1", "child_id": "c1" }),
            json!({ "parent_id": "p1" }),
            json!({ "source": "p1", "target": "nobody" }),
        ];

        let graph = Graph::from_records(&nodes, &edges, "tree-1");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges[0].tree_id.as_deref(), Some("tree-1"));
        assert_eq!(graph.nodes[1].display_name, "Child One");
    }

    #[test]
    fn test_json_round_trip() {
        let mut graph = family();
        graph.nodes[1].position = Position::new(350.0, 250.0);

        let text = graph.to_json().unwrap();
        let back = Graph::from_json(&text, "").unwrap();
        assert_eq!(back, graph);
    }

    #[test]
    fn test_from_json_rejects_bad_documents() {
        assert!(matches!(
            Graph::from_json("{ not json", "t"),
            Err(GraphError::Json(_))
        ));
        assert!(matches!(
            Graph::from_json(r#"{ "edges": [] }"#, "t"),
            Err(GraphError::InvalidDocument { field: "nodes" })
        ));
        assert!(matches!(
            Graph::from_json(r#"{ "nodes": [], "edges": {} }"#, "t"),
            Err(GraphError::InvalidDocument { field: "edges" })
        ));
        assert!(matches!(
            Graph::from_json("[1, 2]", "t"),
            Err(GraphError::InvalidDocument { .. })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = GraphError::InvalidDocument { field: "nodes" };
        assert_eq!(err.to_string(), "invalid graph document: `nodes` must be an array");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let graph = family();
        let hits: Vec<&str> = graph.search("GAR").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(hits, vec!["mum"]);

        let hits: Vec<&str> = graph.search("es").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(hits, vec!["aunt", "kid"]);

        assert!(graph.search("   ").is_empty());
        assert!(graph.search("zebra").is_empty());
    }

    #[test]
    fn test_relatives() {
        let graph = family();
        let mum = graph.relatives("mum");
        assert_eq!(mum.parents.len(), 1);
        assert_eq!(mum.parents[0].id, "gran");
        assert_eq!(mum.children.len(), 1);
        assert_eq!(mum.children[0].id, "kid");

        let gran = graph.relatives("gran");
        let kids: Vec<&str> = gran.children.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(kids, vec!["mum", "aunt"]);

        let nobody = graph.relatives("missing");
        assert!(nobody.parents.is_empty() && nobody.children.is_empty());
    }

    #[test]
    fn test_index_roots_and_children() {
        let graph = family();
        let index = graph.index();

        assert_eq!(index.node_count(), 4);
        assert_eq!(index.edge_count(), 3);
        assert_eq!(index.roots(), vec![0]);
        assert_eq!(index.children(0), vec![1, 2]);
        assert_eq!(index.parents(3), vec![1]);
        assert!(index.has_parent(3));
        assert!(!index.has_parent(0));
        assert_eq!(index.slot("kid"), Some(3));
        assert_eq!(index.slot("nobody"), None);
    }

    #[test]
    fn test_index_children_follow_edge_order() {
        let nodes = vec![
            PersonNode::new("p"),
            PersonNode::new("a"),
            PersonNode::new("b"),
            PersonNode::new("c"),
        ];
        let edges = vec![Edge::new("p", "c"), Edge::new("p", "a"), Edge::new("p", "b")];
        let index = GraphIndex::build(&nodes, &edges);
        assert_eq!(index.children(0), vec![3, 1, 2]);
    }

    #[test]
    fn test_index_ignores_unknown_endpoints() {
        let nodes = vec![PersonNode::new("a")];
        let edges = vec![Edge::new("a", "ghost")];
        let index = GraphIndex::build(&nodes, &edges);
        assert_eq!(index.edge_count(), 0);
        assert_eq!(index.roots(), vec![0]);
    }
}
