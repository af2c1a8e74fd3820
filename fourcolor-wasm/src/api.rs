use crate::Engine;
use js_sys::Uint32Array;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;
use crate::error;
use crate::interop::{arr_f32, arr_u32, arr_u8, new_obj, set_kv, to_js};

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn id_val(id: u32) -> JsValue {
    JsValue::from_f64(id as f64)
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Engine {
        crate::Engine::rs_new()
    }

    /// Builds an engine from a partial JSON config; missing fields take defaults.
    pub fn with_config(json: &str) -> Result<Engine, JsValue> {
        fourcolor::EngineConfig::from_json_str(json)
            .and_then(fourcolor::Engine::with_config)
            .map(|inner| Engine { inner })
            .map_err(|e| error::from_engine(&e))
    }

    pub fn version(&self) -> u64 {
        self.rs_version()
    }
    pub fn node_count(&self) -> u32 {
        self.inner.node_count() as u32
    }
    pub fn edge_count(&self) -> u32 {
        self.inner.edge_count() as u32
    }
    pub fn anchors(&self) -> JsValue {
        match self.inner.anchors() {
            Some((a, b)) => arr_u32(&[a, b]).into(),
            None => JsValue::NULL,
        }
    }

    // Structural edits
    pub fn create_node_res(&mut self, x: f32, y: f32, neighbors: &Uint32Array) -> JsValue {
        let nbrs = neighbors.to_vec();
        error::res(self.inner.create_node(x, y, &nbrs), id_val)
    }
    pub fn connect_res(&mut self, from: u32, to: u32) -> JsValue {
        error::res(self.inner.connect(from, to), id_val)
    }
    pub fn move_node_res(&mut self, id: u32, x: f32, y: f32) -> JsValue {
        error::res(self.inner.move_node(id, x, y), |_| JsValue::TRUE)
    }
    pub fn adjust_curvature_res(&mut self, edge: u32, dx: f32, dy: f32) -> JsValue {
        error::res(self.inner.adjust_curvature(edge, dx, dy), |_| JsValue::TRUE)
    }
    pub fn set_handle_res(&mut self, edge: u32, x: f32, y: f32) -> JsValue {
        error::res(self.inner.set_handle(edge, x, y), |_| JsValue::TRUE)
    }
    pub fn remove_node_res(&mut self, id: u32) -> JsValue {
        error::res(self.inner.remove_node(id), |edges| arr_u32(&edges).into())
    }
    pub fn remove_edge_res(&mut self, id: u32) -> JsValue {
        error::res(self.inner.remove_edge(id), |_| JsValue::TRUE)
    }

    // Edit session
    pub fn active(&self) -> Option<u32> {
        self.inner.active()
    }
    pub fn finalize(&mut self) {
        self.inner.finalize();
    }
    pub fn reopen_last(&mut self) -> Option<u32> {
        self.inner.reopen_last()
    }

    /// Runs the Kempe-chain pass; returns `{fixed, remaining}` node ids.
    pub fn resolve_deferred(&mut self) -> JsValue {
        let report = self.inner.resolve_deferred();
        let obj = new_obj();
        set_kv(&obj, "fixed", &arr_u32(&report.fixed).into());
        set_kv(&obj, "remaining", &arr_u32(&report.remaining).into());
        set_kv(&obj, "flips", &JsValue::from_f64(report.flips.len() as f64));
        obj.into()
    }

    // Typed arrays getters
    pub fn get_node_data(&self) -> JsValue {
        let store = self.inner.store();
        let n = store.node_count();
        let mut ids = Vec::with_capacity(n);
        let mut pos = Vec::with_capacity(n * 2);
        let mut prio = Vec::with_capacity(n);
        let mut enclosed = Vec::with_capacity(n);
        let mut locked = Vec::with_capacity(n);
        for (id, node) in store.nodes() {
            ids.push(id);
            pos.push(node.pos.x);
            pos.push(node.pos.y);
            prio.push(node.priority.as_u8());
            enclosed.push(node.enclosed as u8);
            locked.push(node.locked as u8);
        }
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "positions", &arr_f32(&pos).into());
        set_kv(&obj, "priorities", &arr_u8(&prio).into());
        set_kv(&obj, "enclosed", &arr_u8(&enclosed).into());
        set_kv(&obj, "locked", &arr_u8(&locked).into());
        obj.into()
    }
    pub fn get_edge_data(&self) -> JsValue {
        let store = self.inner.store();
        let n = store.edge_count();
        let mut ids = Vec::with_capacity(n);
        let mut endpoints = Vec::with_capacity(n * 2);
        let mut curves = Vec::with_capacity(n * 2);
        let mut handles = Vec::with_capacity(n * 2);
        for (id, e) in store.edges() {
            ids.push(id);
            endpoints.push(e.a);
            endpoints.push(e.b);
            curves.push(e.offset.x);
            curves.push(e.offset.y);
            let h = self.inner.handle_position(id).unwrap_or_default();
            handles.push(h.x);
            handles.push(h.y);
        }
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "endpoints", &arr_u32(&endpoints).into());
        set_kv(&obj, "curves", &arr_f32(&curves).into());
        set_kv(&obj, "handles", &arr_f32(&handles).into());
        obj.into()
    }
    pub fn ordered_connections(&self, id: u32) -> JsValue {
        match self.inner.ordered_connections(id) {
            Some(order) => arr_u32(order).into(),
            None => JsValue::NULL,
        }
    }
    pub fn entry_angle_res(&self, node: u32, edge: u32) -> JsValue {
        error::res(self.inner.entry_angle(node, edge), |deg| JsValue::from_f64(deg as f64))
    }
    pub fn angle_violations(&self) -> JsValue {
        to_js(&self.inner.angle_violations())
    }
    pub fn conflicts(&self) -> JsValue {
        let flat: Vec<u32> = self
            .inner
            .conflicts()
            .into_iter()
            .flat_map(|(e, a, b)| [e, a, b])
            .collect();
        arr_u32(&flat).into()
    }

    /// Hands pending diagnostics to the caller and echoes each to the console.
    pub fn drain_diagnostics(&mut self) -> JsValue {
        let ds = self.inner.drain_diagnostics();
        for d in &ds {
            web_sys::console::warn_1(&to_js(d));
        }
        to_js(&ds)
    }

    pub fn snapshot(&self) -> JsValue {
        to_js(&self.inner.to_json_value())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}
