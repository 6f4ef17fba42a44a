//! # sim_math
//!
//! Math types for the simulation kernel. Re-exports [`glam`] for linear
//! algebra and defines the angle and planar-distance helpers used by the
//! movement and AI systems.
//!
//! Simulation state is `f64` throughout, so the primary vector type is
//! [`DVec3`].

pub mod angle;

// Re-export glam types for convenience.
pub use glam::{DMat3, DMat4, DQuat, DVec2, DVec3, DVec4};

pub use angle::{lerp_angle, wrap_angle};

/// Planar (XZ) Euclidean distance between two points.
///
/// The Y axis is ignored — hovering entities move on the ground plane and
/// their height is managed separately by the movement integrator.
#[must_use]
pub fn planar_distance(a: DVec3, b: DVec3) -> f64 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_distance_ignores_y() {
        let a = DVec3::new(0.0, 10.0, 0.0);
        let b = DVec3::new(3.0, -5.0, 4.0);
        assert!((planar_distance(a, b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_planar_distance_zero() {
        let p = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(planar_distance(p, p), 0.0);
    }
}
