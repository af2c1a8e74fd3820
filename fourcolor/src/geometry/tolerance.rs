// Centralized tolerances for angle ordering and placement checks

pub const EPS_POS: f32 = 1e-4;            // point coincidence threshold (px)
pub const EPS_LEN: f32 = 1e-6;            // zero-length vector threshold
pub const EPS_ANG_DEG: f32 = 1e-4;        // bearings closer than this compare equal (degrees)

/// Integer bucket for a bearing so that near-equal angles share a key.
#[inline]
pub fn quantize_deg(deg: f32) -> i64 { (deg / EPS_ANG_DEG).round() as i64 }

#[inline]
pub fn norm2(mut x: f32, mut y: f32) -> ((f32,f32), f32) {
    let len = (x*x + y*y).sqrt();
    if len > EPS_LEN { x/=len; y/=len; ((x,y), len) } else { ((0.0,0.0), 0.0) }
}
