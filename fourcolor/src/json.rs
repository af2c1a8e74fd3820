use serde::Serialize;
use serde_json::Value;

use crate::model::{EdgeId, NodeId, Vec2};
use crate::Engine;

/// Overlay snapshot of the whole engine state. Not a persistence format.
pub fn to_json_impl(engine: &Engine) -> Value {
    #[derive(Serialize)]
    struct NodeSer {
        id: NodeId,
        x: f32,
        y: f32,
        priority: u8,
        color: &'static str,
        enclosed: bool,
        fixed: bool,
        locked: bool,
        ordered: Vec<EdgeId>,
    }
    #[derive(Serialize)]
    struct EdgeSer {
        id: EdgeId,
        a: NodeId,
        b: NodeId,
        offset: Vec2,
        handle: Option<Vec2>,
        fixed: bool,
        locked: bool,
    }
    #[derive(Serialize)]
    struct Snapshot {
        version: u64,
        active: Option<NodeId>,
        nodes: Vec<NodeSer>,
        edges: Vec<EdgeSer>,
        histogram: [usize; 4],
    }

    let store = engine.store();
    let nodes = store
        .nodes()
        .map(|(id, n)| NodeSer {
            id,
            x: n.pos.x,
            y: n.pos.y,
            priority: n.priority.as_u8(),
            color: n.priority.color_name(),
            enclosed: n.enclosed,
            fixed: n.fixed,
            locked: n.locked,
            ordered: n.ordered.clone(),
        })
        .collect();
    let edges = store
        .edges()
        .map(|(id, e)| EdgeSer {
            id,
            a: e.a,
            b: e.b,
            offset: e.offset,
            handle: engine.handle_position(id),
            fixed: e.fixed,
            locked: e.locked,
        })
        .collect();
    let snap = Snapshot {
        version: engine.version(),
        active: engine.active(),
        nodes,
        edges,
        histogram: engine.color_histogram(),
    };
    serde_json::to_value(snap).unwrap_or(Value::Null)
}
