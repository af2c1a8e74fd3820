use fourcolor::EngineError;
use wasm_bindgen::prelude::*;

use crate::interop::{new_obj, set_kv};

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data {
        set_kv(&e, "data", &d);
    }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
fn num(v: impl Into<f64>) -> JsValue {
    JsValue::from_f64(v.into())
}

/// Maps an engine refusal to `{ok:false, error:{code, message, data}}`.
pub fn from_engine(e: &EngineError) -> JsValue {
    let d = new_obj();
    match e {
        EngineError::UnknownNode { id }
        | EngineError::FixedNode { id }
        | EngineError::NotActive { id }
        | EngineError::DuplicateNeighbor { id }
        | EngineError::SelfLoop { id }
        | EngineError::EnclosedNeighbor { id }
        | EngineError::PlacementEnclosed { id } => {
            set_kv(&d, "kind", &JsValue::from_str("node"));
            set_kv(&d, "id", &num(*id));
        }
        EngineError::UnknownEdge { id } | EngineError::FixedEdge { id } => {
            set_kv(&d, "kind", &JsValue::from_str("edge"));
            set_kv(&d, "id", &num(*id));
        }
        EngineError::Locked { what, id } => {
            set_kv(&d, "kind", &JsValue::from_str(what));
            set_kv(&d, "id", &num(*id));
        }
        EngineError::NotIncident { node, edge } => {
            set_kv(&d, "node", &num(*node));
            set_kv(&d, "edge", &num(*edge));
        }
        EngineError::NonFinite { param } => {
            set_kv(&d, "param", &JsValue::from_str(param));
        }
        EngineError::OutOfBounds { param, got } => {
            set_kv(&d, "param", &JsValue::from_str(param));
            set_kv(&d, "min", &num(fourcolor::geometry::limits::COORD_MIN));
            set_kv(&d, "max", &num(fourcolor::geometry::limits::COORD_MAX));
            set_kv(&d, "got", &num(*got));
        }
        EngineError::ProtectedZone { x, y } | EngineError::BehindAnchors { x, y } => {
            set_kv(&d, "x", &num(*x));
            set_kv(&d, "y", &num(*y));
        }
        EngineError::TooClose { other, dist, min } => {
            set_kv(&d, "other", &num(*other));
            set_kv(&d, "dist", &num(*dist));
            set_kv(&d, "min", &num(*min));
        }
        EngineError::HandleTooClose { edge, dist, min } => {
            set_kv(&d, "edge", &num(*edge));
            set_kv(&d, "dist", &num(*dist));
            set_kv(&d, "min", &num(*min));
        }
        EngineError::AlreadyConnected { a, b } => {
            set_kv(&d, "a", &num(*a));
            set_kv(&d, "b", &num(*b));
        }
        EngineError::Capacity { what, max } => {
            set_kv(&d, "what", &JsValue::from_str(what));
            set_kv(&d, "max", &num(*max as f64));
        }
        EngineError::TraceAborted(t) => {
            set_kv(&d, "reason", &JsValue::from_str(&t.to_string()));
        }
        EngineError::NoNeighbors | EngineError::Config { .. } => {
            return err(e.code(), e.to_string(), None);
        }
    }
    err(e.code(), e.to_string(), Some(d.into()))
}

/// `ok(value)` or the mapped engine error.
pub fn res<T>(r: fourcolor::Result<T>, to_js: impl FnOnce(T) -> JsValue) -> JsValue {
    match r {
        Ok(v) => ok(to_js(v)),
        Err(e) => from_engine(&e),
    }
}
