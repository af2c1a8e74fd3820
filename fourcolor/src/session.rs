use tracing::debug;

use crate::model::NodeId;
use crate::store::GraphStore;

/// Tracks which node is open for editing. Every other non-fixed node and edge is
/// locked.
#[derive(Clone, Debug, Default)]
pub struct Session {
    active: Option<NodeId>,
    // creation order, pruned on removal
    created: Vec<NodeId>,
}

fn set_lock(store: &mut GraphStore, node: NodeId, locked: bool) {
    let Some(n) = store.node_mut(node) else {
        return;
    };
    if n.fixed {
        return;
    }
    n.locked = locked;
    let incident = n.ordered.clone();
    for eid in incident {
        if let Some(e) = store.edge_mut(eid) {
            if !e.fixed {
                e.locked = locked;
            }
        }
    }
}

impl Session {
    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    pub fn last_created(&self, store: &GraphStore) -> Option<NodeId> {
        self.created
            .iter()
            .rev()
            .copied()
            .find(|&id| store.contains_node(id))
    }

    pub(crate) fn record_created(&mut self, id: NodeId) {
        self.created.push(id);
    }

    pub(crate) fn forget(&mut self, id: NodeId) {
        self.created.retain(|&n| n != id);
        if self.active == Some(id) {
            self.active = None;
        }
    }

    /// Single mode transition: locks the previous active node with its edges,
    /// then unlocks `next` with its edges.
    pub fn transition(&mut self, store: &mut GraphStore, next: Option<NodeId>) {
        if let Some(prev) = self.active.take() {
            set_lock(store, prev, true);
        }
        if let Some(n) = next {
            set_lock(store, n, false);
        }
        self.active = next.filter(|&n| store.contains_node(n));
        debug!(active = ?self.active, "edit session transition");
    }
}
