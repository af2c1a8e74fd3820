use std::collections::{HashSet, VecDeque};

use tracing::{debug, info};

use crate::algorithms::coloring::{check_and_resolve, histogram, overflowing};
use crate::diagnostics::Diagnostic;
use crate::model::{NodeId, Priority};
use crate::store::GraphStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    OverflowDetected,
    SearchingSwapTarget,
    Swapped,
    PostSwapConflictCheck,
    Resolved,
    StillOverflow,
}

#[derive(Clone, Debug, Default)]
pub struct ReassignReport {
    /// Every phase each node went through, in order.
    pub trail: Vec<(NodeId, Phase)>,
    pub swaps: Vec<(NodeId, NodeId)>,
    pub unresolved: Vec<NodeId>,
    pub diagnostics: Vec<Diagnostic>,
    /// Color classes exchanged by the closing rebalance.
    pub rebalanced: Option<(Priority, Priority)>,
}

/// Exchanges the priorities of two nodes. Applying it twice is the identity.
pub fn swap_priorities(store: &mut GraphStore, a: NodeId, b: NodeId) -> bool {
    let (Some(pa), Some(pb)) = (
        store.node(a).map(|n| n.priority),
        store.node(b).map(|n| n.priority),
    ) else {
        return false;
    };
    if let Some(n) = store.node_mut(a) {
        n.priority = pb;
    }
    if let Some(n) = store.node_mut(b) {
        n.priority = pa;
    }
    true
}

fn argmax(counts: &[usize; 4]) -> usize {
    let mut best = 0;
    for i in 1..4 {
        if counts[i] > counts[best] {
            best = i;
        }
    }
    best
}

fn argmin(counts: &[usize; 4]) -> usize {
    let mut best = 0;
    for i in 1..4 {
        if counts[i] < counts[best] {
            best = i;
        }
    }
    best
}

/// Relabels the most used boundary color as the least used color overall (and
/// back). Overflow nodes keep their marker. Ties go to the lower priority.
pub fn rebalance(store: &mut GraphStore) -> Option<(Priority, Priority)> {
    let boundary = histogram(store, true);
    if boundary.iter().all(|&c| c == 0) {
        return None;
    }
    let overall = histogram(store, false);
    let cmax = Priority::PERMANENT[argmax(&boundary)];
    let cmin = Priority::PERMANENT[argmin(&overall)];
    if cmax == cmin {
        return None;
    }
    for slot in store.nodes.iter_mut() {
        if let Some(n) = slot.as_mut() {
            if n.priority == cmax {
                n.priority = cmin;
            } else if n.priority == cmin {
                n.priority = cmax;
            }
        }
    }
    info!(from = cmax.as_u8(), to = cmin.as_u8(), "color classes rebalanced");
    Some((cmax, cmin))
}

/// Repairs overflow by swapping with an enclosed neighbor. Pending nodes are
/// queued; each is attempted at most once per batch, so a batch always drains.
#[derive(Debug, Default)]
pub struct NetworkReassigner {
    queue: VecDeque<NodeId>,
    attempted: HashSet<NodeId>,
    phase: Option<Phase>,
}

impl NetworkReassigner {
    pub fn new() -> Self {
        NetworkReassigner::default()
    }

    pub fn enqueue(&mut self, node: NodeId) {
        if !self.attempted.contains(&node) && !self.queue.contains(&node) {
            self.queue.push_back(node);
        }
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Phase of the node most recently handled.
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    fn advance(&mut self, node: NodeId, next: Phase, report: &mut ReassignReport) {
        debug!(node, ?next, "reassign phase");
        self.phase = Some(next);
        report.trail.push((node, next));
    }

    /// Drains the queue, then rebalances once.
    pub fn run(&mut self, store: &mut GraphStore) -> ReassignReport {
        let mut report = ReassignReport::default();
        while let Some(n) = self.queue.pop_front() {
            if !self.attempted.insert(n) {
                continue;
            }
            self.repair_one(store, n, &mut report);
        }
        for n in overflowing(store) {
            if !report.unresolved.contains(&n) {
                report.unresolved.push(n);
                report.diagnostics.push(Diagnostic::OverflowUnresolved { node: n });
            }
        }
        report.rebalanced = rebalance(store);
        self.attempted.clear();
        report
    }

    fn repair_one(&mut self, store: &mut GraphStore, n: NodeId, report: &mut ReassignReport) {
        match store.node(n) {
            Some(node) if node.priority.is_overflow() => {}
            // fixed by an earlier swap in this batch, or removed
            _ => return,
        }
        self.advance(n, Phase::OverflowDetected, report);
        self.advance(n, Phase::SearchingSwapTarget, report);
        let target = store
            .neighbors(n)
            .into_iter()
            .find(|&m| store.node(m).map_or(false, |node| node.enclosed));
        let Some(m) = target else {
            self.advance(n, Phase::StillOverflow, report);
            report.unresolved.push(n);
            report.diagnostics.push(Diagnostic::OverflowUnresolved { node: n });
            return;
        };
        swap_priorities(store, n, m);
        report.swaps.push((n, m));
        self.advance(n, Phase::Swapped, report);
        self.advance(n, Phase::PostSwapConflictCheck, report);
        let pn = check_and_resolve(store, n);
        let pm = check_and_resolve(store, m);
        if pn.is_overflow() || pm.is_overflow() {
            report.diagnostics.push(Diagnostic::PostSwapConflict { node: n, neighbor: m });
            if pm.is_overflow() {
                self.enqueue(m);
            }
        }
        let end = if pn.is_overflow() {
            Phase::StillOverflow
        } else {
            Phase::Resolved
        };
        self.advance(n, end, report);
    }
}
