use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, info};

use crate::algorithms::coloring::{lowest_free, overflowing};
use crate::model::{NodeId, Priority};
use crate::store::GraphStore;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct KempeReport {
    pub fixed: Vec<NodeId>,
    pub remaining: Vec<NodeId>,
    /// (node, c1, c2, chain size) for every chain flipped.
    pub flips: Vec<(NodeId, Priority, Priority, usize)>,
}

/// The (c1, c2) chain grown from every c1-colored neighbor of `node`.
fn chain_from(store: &GraphStore, node: NodeId, c1: Priority, c2: Priority) -> BTreeSet<NodeId> {
    let mut chain = BTreeSet::new();
    let mut queue: VecDeque<NodeId> = store
        .neighbors(node)
        .into_iter()
        .filter(|&nb| store.node(nb).map_or(false, |n| n.priority == c1))
        .collect();
    while let Some(v) = queue.pop_front() {
        if !chain.insert(v) {
            continue;
        }
        for w in store.neighbors(v) {
            if w == node || chain.contains(&w) {
                continue;
            }
            if store.node(w).map_or(false, |n| n.priority == c1 || n.priority == c2) {
                queue.push_back(w);
            }
        }
    }
    chain
}

/// Tries to free a permanent color at `node` by flipping one Kempe chain.
fn free_by_chain(store: &mut GraphStore, node: NodeId, report: &mut KempeReport) -> Option<Priority> {
    let neighbors = store.neighbors(node);
    for c1 in Priority::PERMANENT {
        for c2 in Priority::PERMANENT {
            if c1 == c2 {
                continue;
            }
            let chain = chain_from(store, node, c1, c2);
            if chain.is_empty() {
                continue;
            }
            let blocks = neighbors.iter().any(|nb| {
                chain.contains(nb) && store.node(*nb).map_or(false, |n| n.priority == c2)
            });
            if blocks {
                continue;
            }
            for &v in &chain {
                if let Some(n) = store.node_mut(v) {
                    n.priority = if n.priority == c1 { c2 } else { c1 };
                }
            }
            debug!(node, c1 = c1.as_u8(), c2 = c2.as_u8(), size = chain.len(), "kempe chain flipped");
            report.flips.push((node, c1, c2, chain.len()));
            return Some(c1);
        }
    }
    None
}

/// Revisits every overflowing node: takes a free color if one exists, else flips
/// the first Kempe chain that frees one. Flips keep the coloring proper.
pub fn resolve_deferred(store: &mut GraphStore) -> KempeReport {
    let mut report = KempeReport::default();
    for node in overflowing(store) {
        let mut p = lowest_free(store, node);
        if p.is_overflow() {
            p = free_by_chain(store, node, &mut report).unwrap_or(Priority::Overflow);
        }
        if let Some(n) = store.node_mut(node) {
            n.priority = p;
        }
        if p.is_overflow() {
            report.remaining.push(node);
        } else {
            report.fixed.push(node);
        }
    }
    info!(
        fixed = report.fixed.len(),
        remaining = report.remaining.len(),
        "deferred overflow pass"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::coloring::conflicts;
    use crate::model::Vec2;

    fn set(s: &mut GraphStore, n: NodeId, p: u8) {
        s.node_mut(n).unwrap().priority = Priority::from_u8(p).unwrap();
    }

    #[test]
    fn free_color_is_taken_directly() {
        let mut s = GraphStore::new();
        let a = s.add_node(Vec2::new(0.0, 0.0));
        let b = s.add_node(Vec2::new(50.0, 0.0));
        s.add_edge(a, b).unwrap();
        set(&mut s, b, 1);
        let report = resolve_deferred(&mut s);
        assert_eq!(report.fixed, vec![a]);
        assert!(report.flips.is_empty());
        assert_eq!(s.node(a).unwrap().priority, Priority::Green);
    }

    #[test]
    fn chain_flip_frees_a_color() {
        // wheel of four around n: 1-2-3-4 with 1 and 3 not adjacent
        let mut s = GraphStore::new();
        let n = s.add_node(Vec2::new(0.0, 0.0));
        let ring: Vec<NodeId> = (0..4)
            .map(|i| s.add_node(Vec2::new(i as f32 * 50.0, 50.0)))
            .collect();
        for i in 0..4 {
            s.add_edge(n, ring[i]).unwrap();
            s.add_edge(ring[i], ring[(i + 1) % 4]).unwrap();
            set(&mut s, ring[i], (i + 1) as u8);
        }
        let report = resolve_deferred(&mut s);
        assert_eq!(report.fixed, vec![n]);
        assert!(report.remaining.is_empty());
        assert_eq!(report.flips.len(), 1);
        assert!(conflicts(&s).is_empty());
        assert!(!s.node(n).unwrap().priority.is_overflow());
    }

    #[test]
    fn k5_cannot_be_freed() {
        let mut s = GraphStore::new();
        for i in 0..5 {
            s.add_node(Vec2::new(i as f32 * 50.0, 0.0));
        }
        for a in 0..5u32 {
            for b in (a + 1)..5 {
                s.add_edge(a, b).unwrap();
            }
        }
        for n in 0..4 {
            set(&mut s, n, (n + 1) as u8);
        }
        let report = resolve_deferred(&mut s);
        assert_eq!(report.remaining, vec![4]);
        assert!(conflicts(&s).is_empty());
    }
}
