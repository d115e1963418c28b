//! Record normalization.
//!
//! Person and relationship rows arrive with whatever column names the storage
//! layer or an imported file happened to use. This module maps any JSON value
//! onto the canonical [`PersonNode`] / [`Edge`] shapes.
//!
//! Every logical field is resolved from an ordered table of field-name aliases;
//! the first alias holding a usable value wins. Adding an alias means adding a
//! string to a table, never touching the resolution code.
//!
//! Nothing here fails: malformed input degrades to defaults (`Sex::Unknown`, a
//! synthesized name, or `None` for an edge with a missing endpoint).

use serde_json::{Map, Value};

use crate::graph::edge::default_edge_id;
use crate::graph::node::{fallback_name, finite_or_zero};
use crate::graph::{Edge, PersonNode, Position, Sex};

/// Fields holding an already-assembled name, in priority order.
pub const FULL_NAME_FIELDS: &[&str] = &[
    "full_name",
    "fullName",
    "display_name",
    "displayName",
    "name",
    "label",
    "title",
];

pub const FIRST_NAME_FIELDS: &[&str] = &["first_name", "firstName", "fname", "first"];

pub const LAST_NAME_FIELDS: &[&str] = &["last_name", "lastName", "lname", "last"];

pub const SEX_FIELDS: &[&str] = &["sex", "gender", "Sex", "Gender"];

pub const TREE_ID_FIELDS: &[&str] = &["tree_id", "treeId"];

const POSITION_X_FIELDS: &[&str] = &["position_x", "positionX", "pos_x"];

const POSITION_Y_FIELDS: &[&str] = &["position_y", "positionY", "pos_y"];

/// Parent side of a relationship row.
pub const EDGE_SOURCE_FIELDS: &[&str] = &[
    "source",
    "parent",
    "parent_id",
    "parentId",
    "from",
    "from_id",
    "fromId",
    "src",
    "src_id",
    "srcId",
];

/// Child side of a relationship row.
pub const EDGE_TARGET_FIELDS: &[&str] = &[
    "target",
    "child",
    "child_id",
    "childId",
    "to",
    "to_id",
    "toId",
    "dst",
    "dst_id",
    "dstId",
];

/// Map an arbitrary record onto a canonical [`PersonNode`].
///
/// Name fields are looked up in the record's `data` object first and then on
/// the record itself, so canvas records (`label`) and already-canonical
/// records (`displayName`) resolve to the same name.
pub fn normalize_node(raw: &Value) -> PersonNode {
    let id = raw.get("id").and_then(id_string).unwrap_or_default();
    let data = raw
        .get("data")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let data_value = Value::Object(data);

    let display_name = resolve_name(&data_value)
        .or_else(|| resolve_name(raw))
        .unwrap_or_else(|| fallback_name(&id));

    let sex = pick_present(&data_value, SEX_FIELDS)
        .or_else(|| pick_present(raw, SEX_FIELDS))
        .and_then(Value::as_str)
        .map(Sex::parse)
        .unwrap_or_default();

    let tree_id = pick_present(raw, TREE_ID_FIELDS).and_then(id_string);
    let kind = raw.get("type").and_then(Value::as_str).map(str::to_owned);

    let data = match data_value {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    PersonNode {
        id,
        tree_id,
        kind,
        display_name,
        sex,
        data,
        position: resolve_position(raw),
    }
}

/// Map an arbitrary relationship row onto a canonical [`Edge`].
///
/// Returns `None` when either endpoint is missing or falsy. `tree_id` is used
/// when the row does not carry its own; an empty `tree_id` counts as no tree,
/// so the edge gets `None` rather than `Some("")`.
pub fn normalize_edge(raw: &Value, tree_id: &str) -> Option<Edge> {
    let source = pick_present(raw, EDGE_SOURCE_FIELDS).and_then(truthy_id)?;
    let target = pick_present(raw, EDGE_TARGET_FIELDS).and_then(truthy_id)?;

    let id = raw
        .get("id")
        .and_then(id_string)
        .unwrap_or_else(|| default_edge_id(&source, &target));

    let tree_id = pick_present(raw, TREE_ID_FIELDS)
        .and_then(id_string)
        .or_else(|| (!tree_id.is_empty()).then(|| tree_id.to_owned()));

    Some(Edge {
        id,
        tree_id,
        source,
        target,
        kind: raw.get("type").and_then(Value::as_str).map(str::to_owned),
    })
}

/// Full name field, else `first last`, else nothing.
fn resolve_name(obj: &Value) -> Option<String> {
    if let Some(full) = pick_string(obj, FULL_NAME_FIELDS) {
        return Some(full.to_owned());
    }

    let first = pick_string(obj, FIRST_NAME_FIELDS);
    let last = pick_string(obj, LAST_NAME_FIELDS);
    let joined = [first, last]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    (!joined.is_empty()).then_some(joined)
}

fn resolve_position(raw: &Value) -> Position {
    if let Some(pos) = raw.get("position").and_then(Value::as_object) {
        return Position::new(number_field(pos, "x"), number_field(pos, "y"));
    }

    let x = pick_present(raw, POSITION_X_FIELDS)
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    let y = pick_present(raw, POSITION_Y_FIELDS)
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    Position::new(x, y).sanitized()
}

fn number_field(obj: &Map<String, Value>, key: &str) -> f64 {
    obj.get(key)
        .and_then(Value::as_f64)
        .map(finite_or_zero)
        .unwrap_or(0.0)
}

/// First alias holding a non-blank string, trimmed.
fn pick_string<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// First alias whose value is present and not null.
fn pick_present<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// Strings as-is, numbers in decimal. Anything else is not an identifier.
fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Like [`id_string`] but rejects the empty string and zero.
fn truthy_id(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => id_string(other),
    }
}
