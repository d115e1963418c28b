//! Person node type and related structures.
//!
//! Nodes are the people in a family tree. Each node has:
//! - A stable string identifier (survives sessions and re-imports)
//! - A resolved display name (never empty)
//! - A sex marker derived from free-form source fields
//! - An opaque attribute bag carried through untouched
//! - A position, assigned by the layout engine

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A point in canvas space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a new position.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Replace any non-finite coordinate with 0.
    #[inline]
    pub fn sanitized(self) -> Self {
        Self {
            x: finite_or_zero(self.x),
            y: finite_or_zero(self.y),
        }
    }

    /// Check that both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[inline]
pub(crate) fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Sex marker resolved from free-form record fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[default]
    #[serde(rename = "unknown", other)]
    Unknown,
}

impl Sex {
    /// Parse a free-form value. Accepts `m`/`male` and `f`/`female` in any case.
    /// Surrounding whitespace is not stripped, so `" m"` is unknown.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        match lower.as_str() {
            "m" | "male" => Self::Male,
            "f" | "female" => Self::Female,
            _ => Self::Unknown,
        }
    }

    /// The short wire form (`M`, `F` or `unknown`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical person record.
///
/// Produced by [`crate::normalize::normalize_node`]. The `position` field holds
/// the persisted canvas position until a layout pass overwrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub display_name: String,
    #[serde(default)]
    pub sex: Sex,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub position: Position,
}

impl PersonNode {
    /// Create a bare node with a synthesized display name.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let display_name = fallback_name(&id);
        Self {
            id,
            tree_id: None,
            kind: None,
            display_name,
            sex: Sex::Unknown,
            data: Map::new(),
            position: Position::default(),
        }
    }

    /// Builder-style setter for the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.display_name = name;
        }
        self
    }
}

/// `"Person "` followed by the first six characters of the id.
pub(crate) fn fallback_name(id: &str) -> String {
    let prefix: String = id.chars().take(6).collect();
    format!("Person {prefix}")
}
