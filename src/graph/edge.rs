//! Edge type.
//!
//! Edges are directed parent→child relationships between two person ids.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical parent→child relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Edge {
    /// Create an edge with the default `"source->target"` id.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: default_edge_id(&source, &target),
            tree_id: None,
            source,
            target,
            kind: None,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source, self.target)
    }
}

pub(crate) fn default_edge_id(source: &str, target: &str) -> String {
    format!("{source}->{target}")
}
