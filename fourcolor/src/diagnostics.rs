use serde::Serialize;
use tracing::warn;

use crate::model::NodeId;

/// Non-fatal conditions surfaced to the canvas layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Node still carries the overflow priority after repair.
    OverflowUnresolved { node: NodeId },
    /// A swap left one of the pair overflowing.
    PostSwapConflict { node: NodeId, neighbor: NodeId },
    /// Outer walk gave up; the previous classification was kept.
    BoundaryTraceAborted { reason: String },
}

#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    pending: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, d: Diagnostic) {
        match &d {
            Diagnostic::OverflowUnresolved { node } => warn!(node, "overflow unresolved"),
            Diagnostic::PostSwapConflict { node, neighbor } => {
                warn!(node, neighbor, "conflict remains after priority swap")
            }
            Diagnostic::BoundaryTraceAborted { reason } => warn!(%reason, "boundary trace aborted"),
        }
        self.pending.push(d);
    }
    pub fn extend(&mut self, ds: impl IntoIterator<Item = Diagnostic>) {
        for d in ds {
            self.push(d);
        }
    }
    pub fn pending(&self) -> &[Diagnostic] {
        &self.pending
    }
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.pending)
    }
}
