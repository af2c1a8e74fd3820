use serde::Serialize;
use tracing::debug;

use crate::geometry::math::{bearing_deg, bearing_gap, departure_dir, quad_control};
use crate::geometry::tolerance::quantize_deg;
use crate::model::{EdgeId, NodeId};
use crate::store::GraphStore;

/// Bearing, clockwise from North, at which `edge` leaves `node`. The curve's
/// tangent at the endpoint points at the quadratic control point.
pub fn entry_angle(store: &GraphStore, node: NodeId, edge: EdgeId) -> Option<f32> {
    let e = store.edge(edge)?;
    let other = e.other(node)?;
    let at = store.node(node)?.pos;
    let to = store.node(other)?.pos;
    let (pa, pb) = store.endpoints(edge)?;
    let control = quad_control(pa, pb, e.offset);
    let (dx, dy) = departure_dir(at, control, to);
    Some(bearing_deg(dx, dy))
}

/// Re-sorts the incident edges of `node` by (bearing, edge id).
pub fn recompute(store: &mut GraphStore, node: NodeId) {
    let Some(n) = store.node(node) else {
        return;
    };
    let mut keyed: Vec<(i64, EdgeId)> = n
        .ordered
        .iter()
        .map(|&eid| {
            let ang = entry_angle(store, node, eid).unwrap_or(0.0);
            (quantize_deg(ang), eid)
        })
        .collect();
    keyed.sort_unstable();
    let ordered: Vec<EdgeId> = keyed.into_iter().map(|(_, eid)| eid).collect();
    debug!(node, ?ordered, "rotation recomputed");
    if let Some(n) = store.node_mut(node) {
        n.ordered = ordered;
    }
}

pub fn recompute_many(store: &mut GraphStore, nodes: impl IntoIterator<Item = NodeId>) {
    for n in nodes {
        recompute(store, n);
    }
}

pub fn recompute_all(store: &mut GraphStore) {
    let ids = store.node_ids();
    recompute_many(store, ids);
}

/// A node plus the nodes whose entry angles change when it moves.
pub fn affected_by_move(store: &GraphStore, node: NodeId) -> Vec<NodeId> {
    let mut out = store.neighbors(node);
    out.push(node);
    out
}

/// Two cyclically adjacent edges at a node that leave it too close together.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AngleViolation {
    pub node: NodeId,
    pub first: EdgeId,
    pub second: EdgeId,
    pub gap_deg: f32,
}

pub fn angle_violations(store: &GraphStore, min_sep_deg: f32) -> Vec<AngleViolation> {
    let mut out = Vec::new();
    for (id, n) in store.nodes() {
        let k = n.ordered.len();
        if k < 2 {
            continue;
        }
        let angles: Vec<f32> = n
            .ordered
            .iter()
            .map(|&e| entry_angle(store, id, e).unwrap_or(0.0))
            .collect();
        // two edges form a single adjacent pair
        let pairs = if k == 2 { 1 } else { k };
        for i in 0..pairs {
            let j = (i + 1) % k;
            let gap = bearing_gap(angles[i], angles[j]);
            if gap < min_sep_deg {
                out.push(AngleViolation {
                    node: id,
                    first: n.ordered[i],
                    second: n.ordered[j],
                    gap_deg: gap,
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Vec2;

    fn star() -> (GraphStore, NodeId, Vec<EdgeId>) {
        let mut s = GraphStore::new();
        let c = s.add_node(Vec2::new(100.0, 100.0));
        let w = s.add_node(Vec2::new(50.0, 100.0));
        let n = s.add_node(Vec2::new(100.0, 50.0));
        let so = s.add_node(Vec2::new(100.0, 150.0));
        let e = s.add_node(Vec2::new(150.0, 100.0));
        let ew = s.add_edge(c, w).unwrap();
        let en = s.add_edge(c, n).unwrap();
        let es = s.add_edge(c, so).unwrap();
        let ee = s.add_edge(c, e).unwrap();
        (s, c, vec![ew, en, es, ee])
    }

    #[test]
    fn compass_order_is_clockwise_from_north() {
        let (mut s, c, es) = star();
        recompute(&mut s, c);
        // north, east, south, west
        assert_eq!(s.node(c).unwrap().ordered, vec![es[1], es[3], es[2], es[0]]);
        assert!((entry_angle(&s, c, es[3]).unwrap() - 90.0).abs() < 1e-3);
        assert!((entry_angle(&s, c, es[0]).unwrap() - 270.0).abs() < 1e-3);
    }

    #[test]
    fn curvature_moves_the_entry_angle() {
        let mut s = GraphStore::new();
        let a = s.add_node(Vec2::new(0.0, 0.0));
        let b = s.add_node(Vec2::new(100.0, 0.0));
        let e = s.add_edge(a, b).unwrap();
        assert!((entry_angle(&s, a, e).unwrap() - 90.0).abs() < 1e-3);
        s.edge_mut(e).unwrap().offset = Vec2::new(0.0, -50.0);
        // control at (50,-50): leaves a toward the north-east
        assert!((entry_angle(&s, a, e).unwrap() - 45.0).abs() < 1e-3);
        assert!((entry_angle(&s, b, e).unwrap() - 315.0).abs() < 1e-3);
    }

    #[test]
    fn equal_angles_tie_break_on_edge_id() {
        let mut s = GraphStore::new();
        let a = s.add_node(Vec2::new(0.0, 0.0));
        let b = s.add_node(Vec2::new(100.0, 0.0));
        let c = s.add_node(Vec2::new(200.0, 0.0));
        let e_ac = s.add_edge(a, c).unwrap();
        let e_ab = s.add_edge(a, b).unwrap();
        recompute(&mut s, a);
        assert_eq!(s.node(a).unwrap().ordered, vec![e_ac, e_ab]);
    }

    #[test]
    fn violations_report_close_pairs() {
        let mut s = GraphStore::new();
        let a = s.add_node(Vec2::new(0.0, 0.0));
        let b = s.add_node(Vec2::new(100.0, 0.0));
        let c = s.add_node(Vec2::new(100.0, 5.0));
        let d = s.add_node(Vec2::new(-100.0, 0.0));
        s.add_edge(a, b).unwrap();
        s.add_edge(a, c).unwrap();
        s.add_edge(a, d).unwrap();
        recompute_all(&mut s);
        let v = angle_violations(&s, 10.0);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].node, a);
        assert!(v[0].gap_deg < 3.0);
        assert!(angle_violations(&s, 2.0).is_empty());
    }
}
