pub mod config;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod geometry {
    pub mod limits;
    pub mod math;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod boundary;
    pub mod coloring;
    pub mod kempe;
    pub mod reassign;
    pub mod rotation;
}
mod json;

use std::collections::HashSet;

use tracing::{info, warn};

use algorithms::{
    boundary, coloring,
    kempe::{self, KempeReport},
    reassign::{self, NetworkReassigner},
    rotation::{self, AngleViolation},
};
use geometry::{
    limits::{in_coord_bounds, MAX_EDGES, MAX_NODES},
    math::{dist, midpoint, quad_control, quad_point},
};
use model::{Edge, Node};
use session::Session;
use store::GraphStore;

pub use config::EngineConfig;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{EngineError, Result};
pub use model::{EdgeId, NodeId, Priority, Vec2};

/// Incrementally built planar graph with a maintained rotation system, outer
/// boundary classification and four-color repair. Every public mutation runs
/// the whole cascade (rotation, retrace, coloring, repair) before returning.
pub struct Engine {
    store: GraphStore,
    config: EngineConfig,
    session: Session,
    reassigner: NetworkReassigner,
    diagnostics: Diagnostics,
    ver: u64,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Engine::build(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Engine::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let mut store = GraphStore::new();
        let a = store.add_node(config.anchor_a);
        let b = store.add_node(config.anchor_b);
        if let Some(e) = store.add_edge(a, b) {
            store.set_anchors(a, b, e);
            if let Some(edge) = store.edge_mut(e) {
                edge.fixed = true;
                edge.locked = true;
            }
        }
        for id in [a, b] {
            if let Some(n) = store.node_mut(id) {
                n.fixed = true;
                n.locked = true;
            }
        }
        let mut engine = Engine {
            store,
            config,
            session: Session::default(),
            reassigner: NetworkReassigner::new(),
            diagnostics: Diagnostics::default(),
            ver: 1,
        };
        rotation::recompute_many(&mut engine.store, [a, b]);
        engine.retrace();
        coloring::assign(&mut engine.store, a);
        coloring::assign(&mut engine.store, b);
        engine
    }

    pub fn version(&self) -> u64 {
        self.ver
    }
    fn bump(&mut self) {
        self.ver += 1;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    // Cascade helpers
    fn retrace(&mut self) {
        if let Err(e) = boundary::retrace(&mut self.store) {
            self.diagnostics.push(Diagnostic::BoundaryTraceAborted {
                reason: e.to_string(),
            });
        }
    }

    fn run_repair(&mut self) {
        if self.reassigner.is_idle() {
            return;
        }
        let report = self.reassigner.run(&mut self.store);
        self.diagnostics.extend(report.diagnostics);
    }

    fn node_ref(&self, id: NodeId) -> Result<&Node> {
        self.store.node(id).ok_or(EngineError::UnknownNode { id })
    }

    fn edge_ref(&self, id: EdgeId) -> Result<&Edge> {
        self.store.edge(id).ok_or(EngineError::UnknownEdge { id })
    }

    fn check_position(&self, p: Vec2, ignore: Option<NodeId>) -> Result<()> {
        for (param, v) in [("x", p.x), ("y", p.y)] {
            if !v.is_finite() {
                return Err(EngineError::NonFinite { param });
            }
            if !in_coord_bounds(v) {
                return Err(EngineError::OutOfBounds { param, got: v });
            }
        }
        if self.config.in_protected_zone(p) {
            return Err(EngineError::ProtectedZone { x: p.x, y: p.y });
        }
        if !self.config.right_of_anchors(p) {
            return Err(EngineError::BehindAnchors { x: p.x, y: p.y });
        }
        let min = self.config.min_node_distance;
        for (id, n) in self.store.nodes() {
            if Some(id) == ignore {
                continue;
            }
            let d = dist(p, n.pos);
            if d < min {
                return Err(EngineError::TooClose { other: id, dist: d, min });
            }
        }
        Ok(())
    }

    // The curve lies inside the triangle of its endpoints and control point.
    fn check_control(&self, pa: Vec2, pb: Vec2, offset: Vec2) -> Result<()> {
        let c = quad_control(pa, pb, offset);
        if self.config.right_of_anchors(c) {
            Ok(())
        } else {
            Err(EngineError::BehindAnchors { x: c.x, y: c.y })
        }
    }

    fn rollback_node(&mut self, id: NodeId, neighbors: &[NodeId], flags: &[(NodeId, bool)]) {
        self.store.remove_node(id);
        rotation::recompute_many(&mut self.store, neighbors.iter().copied());
        boundary::restore_enclosed(&mut self.store, flags);
    }

    fn rollback_edge(&mut self, eid: EdgeId, ends: [NodeId; 2], flags: &[(NodeId, bool)]) {
        self.store.remove_edge(eid);
        rotation::recompute_many(&mut self.store, ends);
        boundary::restore_enclosed(&mut self.store, flags);
    }

    // Structural edits
    /// Places a node at (x, y) connected to every listed neighbor, all-or-nothing.
    /// The new node becomes the one open for editing.
    pub fn create_node(&mut self, x: f32, y: f32, neighbors: &[NodeId]) -> Result<NodeId> {
        let pos = Vec2::new(x, y);
        self.check_position(pos, None)?;
        if self.store.node_count() >= MAX_NODES {
            return Err(EngineError::Capacity { what: "nodes", max: MAX_NODES });
        }
        if self.store.edge_count() + neighbors.len() > MAX_EDGES {
            return Err(EngineError::Capacity { what: "edges", max: MAX_EDGES });
        }
        if neighbors.is_empty() {
            return Err(EngineError::NoNeighbors);
        }
        let mut seen = HashSet::with_capacity(neighbors.len());
        for &nb in neighbors {
            if !seen.insert(nb) {
                return Err(EngineError::DuplicateNeighbor { id: nb });
            }
            if self.node_ref(nb)?.enclosed {
                return Err(EngineError::EnclosedNeighbor { id: nb });
            }
        }

        let flags = boundary::snapshot_enclosed(&self.store);
        let id = self.store.add_node(pos);
        for &nb in neighbors {
            self.store.add_edge(id, nb);
        }
        rotation::recompute(&mut self.store, id);
        rotation::recompute_many(&mut self.store, neighbors.iter().copied());
        if let Err(e) = boundary::retrace(&mut self.store) {
            self.rollback_node(id, neighbors, &flags);
            warn!(id, error = %e, "placement rolled back");
            return Err(e.into());
        }
        if self.store.node(id).map_or(false, |n| n.enclosed) {
            self.rollback_node(id, neighbors, &flags);
            warn!(id, "placement would be enclosed, rolled back");
            return Err(EngineError::PlacementEnclosed { id });
        }

        self.session.transition(&mut self.store, Some(id));
        self.session.record_created(id);
        if coloring::assign(&mut self.store, id).is_overflow() {
            self.reassigner.enqueue(id);
            self.run_repair();
        }
        self.bump();
        info!(id, x, y, neighbors = neighbors.len(), "node created");
        Ok(id)
    }

    /// Adds an edge from the node open for editing to a boundary node.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Result<EdgeId> {
        self.node_ref(from)?;
        let target = self.node_ref(to)?;
        if from == to {
            return Err(EngineError::SelfLoop { id: from });
        }
        if target.enclosed {
            return Err(EngineError::EnclosedNeighbor { id: to });
        }
        if self.session.active() != Some(from) {
            return Err(EngineError::NotActive { id: from });
        }
        if self.store.edge_between(from, to).is_some() {
            return Err(EngineError::AlreadyConnected { a: from, b: to });
        }
        if self.store.edge_count() >= MAX_EDGES {
            return Err(EngineError::Capacity { what: "edges", max: MAX_EDGES });
        }

        let flags = boundary::snapshot_enclosed(&self.store);
        let eid = self
            .store
            .add_edge(from, to)
            .ok_or(EngineError::AlreadyConnected { a: from, b: to })?;
        rotation::recompute_many(&mut self.store, [from, to]);
        if let Err(e) = boundary::retrace(&mut self.store) {
            self.rollback_edge(eid, [from, to], &flags);
            warn!(from, to, error = %e, "connection rolled back");
            return Err(e.into());
        }
        if self.store.node(from).map_or(false, |n| n.enclosed) {
            self.rollback_edge(eid, [from, to], &flags);
            warn!(from, to, "connection would enclose the edited node, rolled back");
            return Err(EngineError::PlacementEnclosed { id: from });
        }

        if coloring::check_and_resolve(&mut self.store, from).is_overflow() {
            self.reassigner.enqueue(from);
            self.run_repair();
        }
        self.bump();
        info!(from, to, edge = eid, "connection added");
        Ok(eid)
    }

    pub fn move_node(&mut self, id: NodeId, x: f32, y: f32) -> Result<()> {
        let n = self.node_ref(id)?;
        if n.fixed {
            return Err(EngineError::FixedNode { id });
        }
        if n.locked {
            return Err(EngineError::Locked { what: "node", id });
        }
        let pos = Vec2::new(x, y);
        self.check_position(pos, Some(id))?;
        for &eid in &self.node_ref(id)?.ordered {
            let e = self.edge_ref(eid)?;
            let other = e.other(id).ok_or(EngineError::NotIncident { node: id, edge: eid })?;
            let q = self.node_ref(other)?.pos;
            self.check_control(pos, q, e.offset)?;
        }
        if let Some(n) = self.store.node_mut(id) {
            n.pos = pos;
        }
        let affected = rotation::affected_by_move(&self.store, id);
        rotation::recompute_many(&mut self.store, affected);
        self.retrace();
        self.bump();
        info!(id, x, y, "node moved");
        Ok(())
    }

    /// Sets the curvature offset of an edge: the control point sits at the chord
    /// midpoint plus (dx, dy).
    pub fn adjust_curvature(&mut self, edge: EdgeId, dx: f32, dy: f32) -> Result<()> {
        for (param, v) in [("dx", dx), ("dy", dy)] {
            if !v.is_finite() {
                return Err(EngineError::NonFinite { param });
            }
            if !in_coord_bounds(v) {
                return Err(EngineError::OutOfBounds { param, got: v });
            }
        }
        let e = self.edge_ref(edge)?;
        if e.fixed {
            return Err(EngineError::FixedEdge { id: edge });
        }
        if e.locked {
            return Err(EngineError::Locked { what: "edge", id: edge });
        }
        let ends = [e.a, e.b];
        let (pa, pb) = self
            .store
            .endpoints(edge)
            .ok_or(EngineError::UnknownEdge { id: edge })?;
        self.check_control(pa, pb, Vec2::new(dx, dy))?;
        if let Some(e) = self.store.edge_mut(edge) {
            e.offset = Vec2::new(dx, dy);
        }
        rotation::recompute_many(&mut self.store, ends);
        self.retrace();
        self.bump();
        info!(edge, dx, dy, "curvature adjusted");
        Ok(())
    }

    /// Drags the curve so that its midpoint passes through (x, y).
    pub fn set_handle(&mut self, edge: EdgeId, x: f32, y: f32) -> Result<()> {
        for (param, v) in [("x", x), ("y", y)] {
            if !v.is_finite() {
                return Err(EngineError::NonFinite { param });
            }
        }
        let (pa, pb) = self
            .store
            .endpoints(edge)
            .ok_or(EngineError::UnknownEdge { id: edge })?;
        let h = Vec2::new(x, y);
        let d = dist(h, pa).min(dist(h, pb));
        let min = self.config.min_handle_distance;
        if d < min {
            return Err(EngineError::HandleTooClose { edge, dist: d, min });
        }
        let m = midpoint(pa, pb);
        self.adjust_curvature(edge, 2.0 * (h.x - m.x), 2.0 * (h.y - m.y))
    }

    /// Point of the curve at t = 0.5, where the canvas draws the drag handle.
    pub fn handle_position(&self, edge: EdgeId) -> Option<Vec2> {
        let e = self.store.edge(edge)?;
        let (pa, pb) = self.store.endpoints(edge)?;
        Some(quad_point(0.5, pa, quad_control(pa, pb, e.offset), pb))
    }

    /// Removes a node with its edges. Former neighbors are re-checked, which can
    /// clear an overflow.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Vec<EdgeId>> {
        if self.node_ref(id)?.fixed {
            return Err(EngineError::FixedNode { id });
        }
        let former = self.store.neighbors(id);
        let removed = self
            .store
            .remove_node(id)
            .ok_or(EngineError::UnknownNode { id })?;
        self.session.forget(id);
        rotation::recompute_many(&mut self.store, former.iter().copied());
        self.retrace();
        for nb in former {
            if coloring::check_and_resolve(&mut self.store, nb).is_overflow() {
                self.reassigner.enqueue(nb);
            }
        }
        self.run_repair();
        self.bump();
        info!(id, edges = removed.len(), "node removed");
        Ok(removed)
    }

    pub fn remove_edge(&mut self, edge: EdgeId) -> Result<()> {
        let e = self.edge_ref(edge)?;
        if e.fixed {
            return Err(EngineError::FixedEdge { id: edge });
        }
        if e.locked {
            return Err(EngineError::Locked { what: "edge", id: edge });
        }
        let ends = [e.a, e.b];
        self.store.remove_edge(edge);
        rotation::recompute_many(&mut self.store, ends);
        self.retrace();
        for n in ends {
            let overflowing = self.store.node(n).map_or(false, |n| n.priority.is_overflow());
            if overflowing && coloring::check_and_resolve(&mut self.store, n).is_overflow() {
                self.reassigner.enqueue(n);
            }
        }
        self.run_repair();
        self.bump();
        info!(edge, "connection removed");
        Ok(())
    }

    // Edit session
    pub fn active(&self) -> Option<NodeId> {
        self.session.active()
    }

    /// Locks the node being edited and its edges.
    pub fn finalize(&mut self) {
        if self.session.active().is_none() {
            return;
        }
        self.session.transition(&mut self.store, None);
        self.bump();
    }

    /// Reopens the most recently created node that still exists.
    pub fn reopen_last(&mut self) -> Option<NodeId> {
        let last = self.session.last_created(&self.store)?;
        self.session.transition(&mut self.store, Some(last));
        self.bump();
        Some(last)
    }

    // Queries
    pub fn entry_angle(&self, node: NodeId, edge: EdgeId) -> Result<f32> {
        self.node_ref(node)?;
        if !self.edge_ref(edge)?.touches(node) {
            return Err(EngineError::NotIncident { node, edge });
        }
        rotation::entry_angle(&self.store, node, edge).ok_or(EngineError::NotIncident { node, edge })
    }

    pub fn angle_violations(&self) -> Vec<AngleViolation> {
        rotation::angle_violations(&self.store, self.config.min_angle_separation_deg)
    }
    pub fn has_angle_violations(&self) -> bool {
        !self.angle_violations().is_empty()
    }

    /// Kempe-chain pass over nodes still at the overflow priority. A rebalance
    /// follows when anything was recolored.
    pub fn resolve_deferred(&mut self) -> KempeReport {
        let report = kempe::resolve_deferred(&mut self.store);
        for &node in &report.remaining {
            self.diagnostics.push(Diagnostic::OverflowUnresolved { node });
        }
        if !report.fixed.is_empty() {
            reassign::rebalance(&mut self.store);
            self.bump();
        }
        report
    }

    pub fn priority(&self, id: NodeId) -> Option<Priority> {
        self.store.node(id).map(|n| n.priority)
    }
    pub fn is_enclosed(&self, id: NodeId) -> Option<bool> {
        self.store.node(id).map(|n| n.enclosed)
    }
    pub fn ordered_connections(&self, id: NodeId) -> Option<&[EdgeId]> {
        self.store.node(id).map(|n| n.ordered.as_slice())
    }
    pub fn position(&self, id: NodeId) -> Option<Vec2> {
        self.store.node(id).map(|n| n.pos)
    }
    pub fn edge_endpoints(&self, id: EdgeId) -> Option<(NodeId, NodeId)> {
        self.store.edge(id).map(|e| (e.a, e.b))
    }
    pub fn curvature(&self, id: EdgeId) -> Option<Vec2> {
        self.store.edge(id).map(|e| e.offset)
    }
    pub fn is_locked(&self, id: NodeId) -> Option<bool> {
        self.store.node(id).map(|n| n.locked)
    }
    pub fn anchors(&self) -> Option<(NodeId, NodeId)> {
        self.store.anchors().map(|(a, b, _)| (a, b))
    }
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.store.node_ids()
    }
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.store.edge_ids()
    }
    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }
    pub fn edge_count(&self) -> usize {
        self.store.edge_count()
    }
    pub fn conflicts(&self) -> Vec<(EdgeId, NodeId, NodeId)> {
        coloring::conflicts(&self.store)
    }
    pub fn overflowing(&self) -> Vec<NodeId> {
        coloring::overflowing(&self.store)
    }
    pub fn color_histogram(&self) -> [usize; 4] {
        coloring::histogram(&self.store, false)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.pending()
    }
    pub fn drain_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.drain()
    }

    // JSON
    pub fn to_json_value(&self) -> serde_json::Value {
        json::to_json_impl(self)
    }
}
