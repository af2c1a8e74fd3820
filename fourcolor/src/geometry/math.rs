use crate::model::Vec2;

use super::tolerance::{norm2, EPS_LEN};

#[inline]
pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 { Vec2 { x: 0.5 * (a.x + b.x), y: 0.5 * (a.y + b.y) } }

#[inline]
pub fn dist(a: Vec2, b: Vec2) -> f32 { let dx = b.x - a.x; let dy = b.y - a.y; (dx*dx + dy*dy).sqrt() }

/// Control point of the quadratic edge: chord midpoint pushed by the curvature offset.
#[inline]
pub fn quad_control(a: Vec2, b: Vec2, offset: Vec2) -> Vec2 {
    let m = midpoint(a, b);
    Vec2 { x: m.x + offset.x, y: m.y + offset.y }
}

pub fn quad_point(t: f32, p0: Vec2, c: Vec2, p1: Vec2) -> Vec2 {
    let u = 1.0 - t;
    let uu = u*u; let ut2 = 2.0*u*t; let tt = t*t;
    Vec2 { x: uu*p0.x + ut2*c.x + tt*p1.x, y: uu*p0.y + ut2*c.y + tt*p1.y }
}

/// Departure direction of a quadratic at `at`, falling back to the chord when the
/// control point sits on the endpoint. Zero when both are degenerate.
pub fn departure_dir(at: Vec2, control: Vec2, other: Vec2) -> (f32, f32) {
    let ((ux, uy), len) = norm2(control.x - at.x, control.y - at.y);
    if len > EPS_LEN { return (ux, uy); }
    let ((cx, cy), clen) = norm2(other.x - at.x, other.y - at.y);
    if clen > EPS_LEN { (cx, cy) } else { (0.0, 0.0) }
}

/// Bearing of a screen-space direction (y grows down), clockwise from North, in [0, 360).
pub fn bearing_deg(dx: f32, dy: f32) -> f32 {
    if dx == 0.0 && dy == 0.0 { return 0.0; }
    let deg = dx.atan2(-dy).to_degrees().rem_euclid(360.0);
    if deg >= 360.0 { 0.0 } else { deg }
}

/// Cross product of (b - a) and (p - a). With y growing down, positive means `p`
/// lies on the right of the directed line a->b.
#[inline]
pub fn side(a: Vec2, b: Vec2, p: Vec2) -> f32 { (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x) }

/// Smallest absolute difference between two bearings, in [0, 180].
pub fn bearing_gap(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(360.0);
    if d > 180.0 { 360.0 - d } else { d }
}
