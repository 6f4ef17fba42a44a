//! Angle interpolation helpers.
//!
//! Yaw facing is stored as a raw euler angle, so turning toward a heading
//! has to take the short way around the circle rather than interpolating
//! the raw values.

use std::f64::consts::{PI, TAU};

/// Wrap a signed angular difference into `(-PI, PI]`.
#[must_use]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Linearly interpolate from angle `a` toward angle `b` by factor `t`,
/// taking the shortest signed angular path.
///
/// The factor is deliberately not clamped to `[0, 1]`; callers deriving it
/// from a frame delta must keep it at or below 1 for stable convergence.
#[must_use]
pub fn lerp_angle(a: f64, b: f64, t: f64) -> f64 {
    a + wrap_angle(b - a) * t
}
