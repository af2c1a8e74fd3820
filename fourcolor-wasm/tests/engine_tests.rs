use fourcolor_wasm::Engine;
use js_sys::{Array, Float32Array, Reflect, Uint32Array, Uint8Array};
use serde::Deserialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn get(v: &JsValue, k: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str(k)).unwrap()
}

fn value_u32(v: &JsValue) -> u32 {
    assert_eq!(get(v, "ok").as_bool(), Some(true));
    get(v, "value").as_f64().unwrap() as u32
}

fn ids(v: &[u32]) -> Uint32Array {
    Uint32Array::from(v)
}

#[wasm_bindgen_test]
fn anchors_and_typed_arrays() {
    let mut g = Engine::new();
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edge_count(), 1);
    let c = value_u32(&g.create_node_res(300.0, 300.0, &ids(&[0, 1])));
    assert_eq!(c, 2);

    let nd = g.get_node_data();
    let n_ids = Uint32Array::new(&get(&nd, "ids"));
    let n_pos = Float32Array::new(&get(&nd, "positions"));
    let n_pri = Uint8Array::new(&get(&nd, "priorities"));
    let n_enc = Uint8Array::new(&get(&nd, "enclosed"));
    assert_eq!(n_ids.to_vec(), vec![0, 1, 2]);
    assert_eq!(n_pos.length(), 6);
    assert_eq!(n_pri.to_vec(), vec![1, 2, 3]);
    assert_eq!(n_enc.to_vec(), vec![0, 0, 0]);

    let ed = g.get_edge_data();
    let e_ids = Uint32Array::new(&get(&ed, "ids"));
    let e_ep = Uint32Array::new(&get(&ed, "endpoints"));
    let e_cv = Float32Array::new(&get(&ed, "curves"));
    assert_eq!(e_ids.length(), 3);
    assert_eq!(e_ep.length(), 6);
    assert_eq!(e_cv.length(), 6);
}

#[wasm_bindgen_test]
fn enclosed_node_reported_in_node_data() {
    let mut g = Engine::new();
    let c = value_u32(&g.create_node_res(120.0, 120.0, &ids(&[0, 1])));
    value_u32(&g.create_node_res(400.0, 400.0, &ids(&[0, 1, c])));
    let nd = g.get_node_data();
    let n_enc = Uint8Array::new(&get(&nd, "enclosed"));
    assert_eq!(n_enc.to_vec(), vec![0, 0, 1, 0]);
    let n_pri = Uint8Array::new(&get(&nd, "priorities"));
    assert_eq!(n_pri.to_vec(), vec![1, 2, 3, 4]);
}

#[wasm_bindgen_test]
fn rotation_and_entry_angles() {
    let mut g = Engine::new();
    let c = value_u32(&g.create_node_res(300.0, 300.0, &ids(&[0, 1])));
    let order = Uint32Array::new(&g.ordered_connections(c)).to_vec();
    assert_eq!(order.len(), 2);
    let mut last = -1.0;
    for e in order {
        let r = g.entry_angle_res(c, e);
        let deg = get(&r, "value").as_f64().unwrap();
        assert!(deg >= last);
        last = deg;
    }
    assert!(g.ordered_connections(99).is_null());
}

#[wasm_bindgen_test]
fn curve_handle_moves_with_set_handle() {
    let mut g = Engine::new();
    let c = value_u32(&g.create_node_res(300.0, 300.0, &ids(&[0, 1])));
    g.finalize();
    let d = value_u32(&g.create_node_res(500.0, 300.0, &ids(&[c])));
    let ver = g.version();
    let ed = g.get_edge_data();
    let e_ids = Uint32Array::new(&get(&ed, "ids")).to_vec();
    let cd = *e_ids.last().unwrap();
    assert_eq!(get(&g.set_handle_res(cd, 400.0, 340.0), "ok").as_bool(), Some(true));
    assert!(g.version() > ver);
    let handles = Float32Array::new(&get(&g.get_edge_data(), "handles")).to_vec();
    let n = handles.len();
    assert!((handles[n - 1] - 340.0).abs() < 1e-3);
    let removed = Uint32Array::new(&get(&g.remove_node_res(d), "value")).to_vec();
    assert_eq!(removed, vec![cd]);
}

#[derive(Deserialize)]
struct NodeSnap {
    id: u32,
    color: String,
    ordered: Vec<u32>,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u64,
    nodes: Vec<NodeSnap>,
}

#[wasm_bindgen_test]
fn snapshot_and_diagnostics() {
    let mut g = Engine::new();
    value_u32(&g.create_node_res(300.0, 300.0, &ids(&[0, 1])));
    let snap: Snapshot = serde_wasm_bindgen::from_value(g.snapshot()).unwrap();
    assert_eq!(snap.version, g.version());
    assert_eq!(snap.nodes.len(), 3);
    assert_eq!(snap.nodes[2].id, 2);
    assert_eq!(snap.nodes[2].color, "blue");
    assert_eq!(snap.nodes[2].ordered.len(), 2);

    let ds = Array::from(&g.drain_diagnostics());
    assert_eq!(ds.length(), 0);
    let report = g.resolve_deferred();
    assert_eq!(Uint32Array::new(&get(&report, "remaining")).length(), 0);
}
