use tracing::debug;

use crate::model::{EdgeId, NodeId, Priority};
use crate::store::GraphStore;

/// Permanent priorities taken by the neighbors of `node`. Overflowing neighbors
/// block nothing.
pub fn used_by_neighbors(store: &GraphStore, node: NodeId) -> [bool; 4] {
    let mut used = [false; 4];
    for nb in store.neighbors(node) {
        if let Some(i) = store.node(nb).and_then(|n| n.priority.index()) {
            used[i] = true;
        }
    }
    used
}

/// Lowest permanent priority no neighbor holds, or overflow.
pub fn lowest_free(store: &GraphStore, node: NodeId) -> Priority {
    let used = used_by_neighbors(store, node);
    Priority::PERMANENT
        .iter()
        .copied()
        .find(|p| p.index().map_or(false, |i| !used[i]))
        .unwrap_or(Priority::Overflow)
}

fn set_priority(store: &mut GraphStore, node: NodeId, p: Priority) {
    if let Some(n) = store.node_mut(node) {
        n.priority = p;
    }
}

/// Greedy assignment for a newly placed node.
pub fn assign(store: &mut GraphStore, node: NodeId) -> Priority {
    let p = lowest_free(store, node);
    set_priority(store, node, p);
    debug!(node, priority = p.as_u8(), "color assigned");
    p
}

/// Keeps the current priority when it is permanent and unshared with neighbors;
/// otherwise recolors greedily.
pub fn check_and_resolve(store: &mut GraphStore, node: NodeId) -> Priority {
    let Some(current) = store.node(node).map(|n| n.priority) else {
        return Priority::Overflow;
    };
    let used = used_by_neighbors(store, node);
    match current.index() {
        Some(i) if !used[i] => current,
        _ => assign(store, node),
    }
}

/// Edges whose endpoints share a permanent priority.
pub fn conflicts(store: &GraphStore) -> Vec<(EdgeId, NodeId, NodeId)> {
    let mut out = Vec::new();
    for (eid, e) in store.edges() {
        let (Some(na), Some(nb)) = (store.node(e.a), store.node(e.b)) else {
            continue;
        };
        if na.priority == nb.priority && !na.priority.is_overflow() {
            out.push((eid, e.a, e.b));
        }
    }
    out
}

pub fn has_conflict(store: &GraphStore, node: NodeId) -> bool {
    let Some(p) = store.node(node).map(|n| n.priority) else {
        return false;
    };
    !p.is_overflow()
        && store
            .neighbors(node)
            .into_iter()
            .any(|nb| store.node(nb).map_or(false, |n| n.priority == p))
}

pub fn overflowing(store: &GraphStore) -> Vec<NodeId> {
    store
        .nodes()
        .filter(|(_, n)| n.priority.is_overflow())
        .map(|(id, _)| id)
        .collect()
}

/// Count per permanent priority, optionally restricted to boundary nodes.
pub fn histogram(store: &GraphStore, boundary_only: bool) -> [usize; 4] {
    let mut counts = [0usize; 4];
    for (_, n) in store.nodes() {
        if boundary_only && n.enclosed {
            continue;
        }
        if let Some(i) = n.priority.index() {
            counts[i] += 1;
        }
    }
    counts
}
