//! Tests for the JS-facing surface. Run with `wasm-pack test --node`.

#![cfg(target_arch = "wasm32")]

use family_tree_layout::graph::{Edge, Graph, PersonNode};
use family_tree_layout::{FamilyTreeWasm, compute_layout, extract_focus_subgraph, normalize_edge, normalize_node};
use serde_json::{Value, json};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

/// Plain JS objects, the way a browser caller would build them.
fn js<T: serde::Serialize + ?Sized>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap()
}

fn rust<T: serde::de::DeserializeOwned>(value: JsValue) -> T {
    serde_wasm_bindgen::from_value(value).unwrap()
}

#[wasm_bindgen_test]
fn normalize_node_returns_plain_object() {
    let out = normalize_node(js(&json!({ "id": "abc123456", "gender": "Female" }))).unwrap();
    let node: Value = rust(out);
    assert_eq!(node["displayName"], "Person abc123");
    assert_eq!(node["sex"], "F");
}

#[wasm_bindgen_test]
fn normalize_node_tolerates_garbage() {
    let out = normalize_node(JsValue::from_f64(42.0)).unwrap();
    let node: PersonNode = rust(out);
    assert_eq!(node.id, "");
}

#[wasm_bindgen_test]
fn normalize_edge_without_source_is_null() {
    let out = normalize_edge(js(&json!({ "source": null, "target": "x" })), "t1").unwrap();
    assert!(out.is_null());
}

#[wasm_bindgen_test]
fn compute_layout_accepts_missing_config() {
    let nodes = vec![PersonNode::new("root"), PersonNode::new("child")];
    let edges = vec![Edge::new("root", "child")];
    let out = compute_layout(
        js(&nodes),
        js(&edges),
        JsValue::UNDEFINED,
    )
    .unwrap();

    let laid_out: Vec<PersonNode> = rust(out);
    assert_eq!(laid_out[1].position.y, 250.0);
    assert_eq!(laid_out[1].position.x, laid_out[0].position.x);
}

#[wasm_bindgen_test]
fn focus_on_missing_id_is_empty() {
    let graph = Graph::new(vec![PersonNode::new("a")], Vec::new());
    let out = extract_focus_subgraph(js(&graph), "missing-id").unwrap();
    let focused: Graph = rust(out);
    assert_eq!(focused, Graph::default());
}

#[wasm_bindgen_test]
fn canvas_handle_round_trip() {
    let mut tree = FamilyTreeWasm::new();
    tree.load_records(
        js(&json!([{ "id": "p", "name": "Pat" }, { "id": "c", "name": "Cam" }])),
        js(&json!([{ "parent": "p", "child": "c" }])),
        "tree-1",
    )
    .unwrap();
    tree.layout().unwrap();

    assert_eq!(tree.node_count(), 2);
    assert_eq!(tree.layout_positions().to_vec(), vec![0.0, 0.0, 0.0, 250.0]);
    assert_eq!(tree.node_at(5.0, 255.0), Some("c".to_string()));

    let exported = tree.export_json().unwrap();
    let mut restored = FamilyTreeWasm::new();
    restored.import_json(&exported, "tree-1").unwrap();
    assert_eq!(restored.edge_count(), 1);
    assert!(restored.import_json("[1, 2]", "tree-1").is_err());
}
