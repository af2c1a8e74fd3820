use std::collections::{BTreeSet, HashSet};

use thiserror::Error;
use tracing::debug;

use crate::model::{EdgeId, NodeId};
use crate::store::GraphStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    #[error("directed edge {edge} leaving node {node} revisited before the walk closed")]
    DirectedEdgeRevisited { node: NodeId, edge: EdgeId },
    #[error("edge {edge} missing from the rotation of node {node}")]
    MissingIncidence { node: NodeId, edge: EdgeId },
    #[error("walk exceeded {limit} steps")]
    StepLimit { limit: usize },
}

/// Result of one walk around the outer face.
#[derive(Clone, Debug, Default)]
pub struct OuterWalk {
    /// (node, edge taken out of it) in walk order, starting at the start edge.
    pub steps: Vec<(NodeId, EdgeId)>,
    pub boundary: BTreeSet<NodeId>,
}

/// Directed edge the walk begins on: the anchor edge leaving A when anchors exist,
/// otherwise the first clockwise edge at the topmost node.
fn start_edge(store: &GraphStore) -> Option<(NodeId, EdgeId)> {
    if let Some((a, _, e)) = store.anchors() {
        if store.edge(e).map_or(false, |edge| edge.touches(a)) {
            return Some((a, e));
        }
    }
    let mut best: Option<(NodeId, f32, f32)> = None;
    for (id, n) in store.nodes() {
        if n.ordered.is_empty() {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, bx, by)) => n.pos.y < by || (n.pos.y == by && n.pos.x < bx),
        };
        if better {
            best = Some((id, n.pos.x, n.pos.y));
        }
    }
    let (id, _, _) = best?;
    let first = *store.node(id)?.ordered.first()?;
    Some((id, first))
}

/// Walks the outer face with the right-hand rule: having arrived at a node along
/// an edge, leave along the next edge clockwise after it.
pub fn walk_outer(store: &GraphStore) -> Result<OuterWalk, TraceError> {
    let mut walk = OuterWalk::default();
    if store.node_count() <= 1 || store.edge_count() == 0 {
        return Ok(walk);
    }
    let Some(start) = start_edge(store) else {
        return Ok(walk);
    };
    let limit = 2 * store.edge_count() + 1;
    let mut seen: HashSet<(NodeId, EdgeId)> = HashSet::new();
    let (mut at, mut via) = start;
    walk.boundary.insert(at);
    loop {
        if !seen.insert((at, via)) {
            return Err(TraceError::DirectedEdgeRevisited { node: at, edge: via });
        }
        walk.steps.push((at, via));
        if walk.steps.len() > limit {
            return Err(TraceError::StepLimit { limit });
        }
        let next = store
            .edge(via)
            .and_then(|e| e.other(at))
            .ok_or(TraceError::MissingIncidence { node: at, edge: via })?;
        let ordered = store.incident_edges(next);
        let pos = ordered
            .iter()
            .position(|&e| e == via)
            .ok_or(TraceError::MissingIncidence { node: next, edge: via })?;
        let out = ordered[(pos + 1) % ordered.len()];
        walk.boundary.insert(next);
        at = next;
        via = out;
        if (at, via) == start {
            break;
        }
    }
    Ok(walk)
}

/// Full retrace: nodes on the outer walk are boundary, all others enclosed. On
/// failure the previous classification stays in place.
pub fn retrace(store: &mut GraphStore) -> Result<OuterWalk, TraceError> {
    let walk = walk_outer(store)?;
    let trivial = walk.steps.is_empty();
    for (i, slot) in store.nodes.iter_mut().enumerate() {
        if let Some(n) = slot.as_mut() {
            n.enclosed = !trivial && !walk.boundary.contains(&(i as NodeId));
        }
    }
    debug!(
        steps = walk.steps.len(),
        boundary = walk.boundary.len(),
        "outer boundary traced"
    );
    Ok(walk)
}

/// Enclosed flags by node, for restoring after a rejected edit.
pub fn snapshot_enclosed(store: &GraphStore) -> Vec<(NodeId, bool)> {
    store.nodes().map(|(id, n)| (id, n.enclosed)).collect()
}

pub fn restore_enclosed(store: &mut GraphStore, flags: &[(NodeId, bool)]) {
    for &(id, enclosed) in flags {
        if let Some(n) = store.node_mut(id) {
            n.enclosed = enclosed;
        }
    }
}
