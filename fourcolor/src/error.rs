use thiserror::Error;

use crate::algorithms::boundary::TraceError;
use crate::model::{EdgeId, NodeId};

pub type Result<T> = std::result::Result<T, EngineError>;

/// Every way a request against the engine can be refused. A refused request
/// leaves the graph untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("unknown node {id}")]
    UnknownNode { id: NodeId },

    #[error("unknown edge {id}")]
    UnknownEdge { id: EdgeId },

    #[error("edge {edge} is not incident to node {node}")]
    NotIncident { node: NodeId, edge: EdgeId },

    #[error("node {id} is an anchor and cannot be edited")]
    FixedNode { id: NodeId },

    #[error("edge {id} joins the anchors and cannot be edited")]
    FixedEdge { id: EdgeId },

    #[error("{what} {id} is locked")]
    Locked { what: &'static str, id: u32 },

    #[error("node {id} is not the node being edited")]
    NotActive { id: NodeId },

    #[error("parameter '{param}' must be finite")]
    NonFinite { param: &'static str },

    #[error("parameter '{param}' out of range ({got})")]
    OutOfBounds { param: &'static str, got: f32 },

    #[error("position ({x}, {y}) lies in the zone reserved for the anchors")]
    ProtectedZone { x: f32, y: f32 },

    #[error("point ({x}, {y}) is not on the drawing side of the anchor edge")]
    BehindAnchors { x: f32, y: f32 },

    #[error("position is {dist} from node {other}, closer than {min}")]
    TooClose { other: NodeId, dist: f32, min: f32 },

    #[error("curve handle is {dist} from an endpoint of edge {edge}, closer than {min}")]
    HandleTooClose { edge: EdgeId, dist: f32, min: f32 },

    #[error("a node needs at least one neighbor")]
    NoNeighbors,

    #[error("neighbor {id} listed twice")]
    DuplicateNeighbor { id: NodeId },

    #[error("node {id} cannot connect to itself")]
    SelfLoop { id: NodeId },

    #[error("nodes {a} and {b} are already connected")]
    AlreadyConnected { a: NodeId, b: NodeId },

    #[error("neighbor {id} is enclosed by the outer boundary")]
    EnclosedNeighbor { id: NodeId },

    #[error("node {id} would end up enclosed")]
    PlacementEnclosed { id: NodeId },

    #[error("boundary trace aborted: {0}")]
    TraceAborted(#[from] TraceError),

    #[error("capacity exceeded: at most {max} {what}")]
    Capacity { what: &'static str, max: usize },

    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl EngineError {
    /// Stable machine-readable code for bindings.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownNode { .. } | Self::UnknownEdge { .. } => "invalid_id",
            Self::NotIncident { .. } => "not_incident",
            Self::FixedNode { .. } | Self::FixedEdge { .. } => "fixed",
            Self::Locked { .. } => "locked",
            Self::NotActive { .. } => "not_active",
            Self::NonFinite { .. } => "non_finite",
            Self::OutOfBounds { .. } => "out_of_range",
            Self::ProtectedZone { .. } => "protected_zone",
            Self::BehindAnchors { .. } => "behind_anchors",
            Self::TooClose { .. } => "too_close",
            Self::HandleTooClose { .. } => "handle_too_close",
            Self::NoNeighbors => "no_neighbors",
            Self::DuplicateNeighbor { .. } => "duplicate_neighbor",
            Self::SelfLoop { .. } => "self_loop",
            Self::AlreadyConnected { .. } => "already_connected",
            Self::EnclosedNeighbor { .. } => "enclosed_neighbor",
            Self::PlacementEnclosed { .. } => "placement_enclosed",
            Self::TraceAborted(_) => "trace_aborted",
            Self::Capacity { .. } => "capacity",
            Self::Config { .. } => "invalid_config",
        }
    }

    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(EngineError::UnknownNode { id: 3 }.code(), "invalid_id");
        assert_eq!(EngineError::PlacementEnclosed { id: 3 }.code(), "placement_enclosed");
        assert_eq!(EngineError::config("x").code(), "invalid_config");
        assert_eq!(EngineError::BehindAnchors { x: 0.0, y: 0.0 }.code(), "behind_anchors");
    }

    #[test]
    fn trace_errors_convert() {
        let e: EngineError = TraceError::StepLimit { limit: 7 }.into();
        assert_eq!(e.code(), "trace_aborted");
        assert!(e.to_string().contains("7"));
    }
}
