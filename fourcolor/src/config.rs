use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::geometry::limits::in_coord_bounds;
use crate::geometry::math::{dist, side};
use crate::geometry::tolerance::EPS_POS;
use crate::model::Vec2;

/// Tunables for placement and curve editing. Every field has a default, so a
/// partial JSON document is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub anchor_a: Vec2,
    pub anchor_b: Vec2,
    /// Positions with both x and y below this are reserved for the anchors.
    pub protected_limit: f32,
    pub min_node_distance: f32,
    pub min_handle_distance: f32,
    pub min_angle_separation_deg: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            anchor_a: Vec2 { x: 15.0, y: 60.0 },
            anchor_b: Vec2 { x: 60.0, y: 15.0 },
            protected_limit: 75.0,
            min_node_distance: 30.0,
            min_handle_distance: 20.0,
            min_angle_separation_deg: 10.0,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: EngineConfig =
            serde_json::from_str(s).map_err(|e| EngineError::config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, p) in [("anchor_a", self.anchor_a), ("anchor_b", self.anchor_b)] {
            if !in_coord_bounds(p.x) || !in_coord_bounds(p.y) {
                return Err(EngineError::config(format!("{} must be a finite in-range point", name)));
            }
        }
        if dist(self.anchor_a, self.anchor_b) <= EPS_POS {
            return Err(EngineError::config("anchors must not coincide"));
        }
        // the drawing grows toward +x, +y and must sit on the right of A->B
        let toward = Vec2::new(self.anchor_a.x + 1.0, self.anchor_a.y + 1.0);
        if side(self.anchor_a, self.anchor_b, toward) <= 0.0 {
            return Err(EngineError::config(
                "anchor_a -> anchor_b must run with the drawing area on its right",
            ));
        }
        for (name, v) in [
            ("protected_limit", self.protected_limit),
            ("min_node_distance", self.min_node_distance),
            ("min_handle_distance", self.min_handle_distance),
            ("min_angle_separation_deg", self.min_angle_separation_deg),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(EngineError::config(format!("{} must be finite and non-negative", name)));
            }
        }
        if self.min_angle_separation_deg >= 180.0 {
            return Err(EngineError::config("min_angle_separation_deg must be below 180"));
        }
        Ok(())
    }

    pub(crate) fn in_protected_zone(&self, p: Vec2) -> bool {
        p.x < self.protected_limit && p.y < self.protected_limit
    }

    /// Strictly on the drawing side of the fixed edge.
    pub(crate) fn right_of_anchors(&self, p: Vec2) -> bool {
        side(self.anchor_a, self.anchor_b, p) > 0.0
    }
}
