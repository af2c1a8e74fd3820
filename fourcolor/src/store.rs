use crate::model::{Edge, EdgeId, Node, NodeId, Vec2};

/// Arena of nodes and edges. Ids are slot indices and are never reused: removal
/// leaves a hole.
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
    pub(crate) nodes: Vec<Option<Node>>, // id is index
    pub(crate) edges: Vec<Option<Edge>>, // id is index
    pub(crate) anchors: Option<(NodeId, NodeId, EdgeId)>,
}

impl GraphStore {
    pub fn new() -> Self {
        GraphStore::default()
    }

    // Nodes
    pub fn add_node(&mut self, pos: Vec2) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Some(Node::new(pos)));
        id
    }
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize).and_then(|n| n.as_ref())
    }
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id as usize).and_then(|n| n.as_mut())
    }
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|_| i as NodeId))
            .collect()
    }
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (i as NodeId, n)))
    }
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Removes the node and every incident edge. Returns the removed edge ids.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Vec<EdgeId>> {
        let incident = self.node(id)?.ordered.clone();
        for &eid in &incident {
            self.remove_edge(eid);
        }
        if let Some(slot) = self.nodes.get_mut(id as usize) {
            *slot = None;
        }
        Some(incident)
    }

    // Edges
    /// Inserts an edge and appends it to both endpoint lists. Rejects self loops,
    /// unknown endpoints and parallel edges.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        if a == b || !self.contains_node(a) || !self.contains_node(b) {
            return None;
        }
        if self.edge_between(a, b).is_some() {
            return None;
        }
        let id = self.edges.len() as EdgeId;
        self.edges.push(Some(Edge {
            a,
            b,
            offset: Vec2::ZERO,
            fixed: false,
            locked: false,
        }));
        for n in [a, b] {
            if let Some(node) = self.node_mut(n) {
                node.ordered.push(id);
            }
        }
        Some(id)
    }
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id as usize).and_then(|e| e.as_ref())
    }
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id as usize).and_then(|e| e.as_mut())
    }
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|_| i as EdgeId))
            .collect()
    }
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (i as EdgeId, e)))
    }
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_some()).count()
    }
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.get_mut(id as usize)?.take()?;
        for n in [edge.a, edge.b] {
            if let Some(node) = self.node_mut(n) {
                node.ordered.retain(|&e| e != id);
            }
        }
        Some(edge)
    }
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        let node = self.node(a)?;
        node.ordered.iter().copied().find(|&eid| {
            self.edge(eid)
                .map_or(false, |e| e.other(a) == Some(b))
        })
    }

    // Adjacency
    pub fn incident_edges(&self, id: NodeId) -> &[EdgeId] {
        self.node(id).map_or(&[], |n| n.ordered.as_slice())
    }
    /// Neighbors in ascending id order.
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self
            .incident_edges(id)
            .iter()
            .filter_map(|&eid| self.edge(eid).and_then(|e| e.other(id)))
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }
    pub fn endpoints(&self, eid: EdgeId) -> Option<(Vec2, Vec2)> {
        let e = self.edge(eid)?;
        Some((self.node(e.a)?.pos, self.node(e.b)?.pos))
    }

    // Anchors
    pub fn set_anchors(&mut self, a: NodeId, b: NodeId, edge: EdgeId) {
        self.anchors = Some((a, b, edge));
    }
    pub fn anchors(&self) -> Option<(NodeId, NodeId, EdgeId)> {
        self.anchors
    }
}
