//! Clamping helpers shared by fusion, geometry, hand and pointer input.

/// Clamp into `[0, 1]`; non-finite values collapse to 0 so the wall goes flat.
#[inline]
pub fn clamp_unit(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Clamp into `[-1, 1]`; non-finite values collapse to the neutral 0.
#[inline]
pub fn clamp_signed(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
