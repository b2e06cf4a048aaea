//! Pairwise force law
//!
//! Positive magnitudes attract (pull the target toward the source), negative
//! magnitudes repel.

use crate::constants::REPULSION_FACTOR;
use glam::Vec2;

/// Inverse-square attraction between two masses
/// F = strength * m1 * m2 / r²
pub fn gravitational_force(m1: f32, m2: f32, r: f32, strength: f32) -> f32 {
    strength * m1 * m2 / (r * r)
}

/// Signed force between two particles at distance `r`.
///
/// Closer than `repulsion_threshold` the attraction is flipped and doubled,
/// which overcorrects on purpose so particles never collapse into a clump.
pub fn pair_force(m1: f32, m2: f32, r: f32, strength: f32, repulsion_threshold: f32) -> f32 {
    let force = gravitational_force(m1, m2, r, strength);
    if r < repulsion_threshold {
        force * REPULSION_FACTOR
    } else {
        force
    }
}

/// Acceleration of the target particle along `delta` (source - target, length `r`).
///
/// Only the target's own mass divides the force.
pub fn acceleration(delta: Vec2, r: f32, force: f32, target_mass: f32) -> Vec2 {
    delta * (force / r) / target_mass
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRENGTH: f32 = 1e-4;
    const THRESHOLD: f32 = 20.0;

    #[test]
    fn test_inverse_square_magnitude() {
        let f = gravitational_force(2.0, 1.5, 50.0, STRENGTH);
        assert!((f - STRENGTH * 3.0 / 2500.0).abs() < 1e-12);
    }

    #[test]
    fn test_attraction_outside_threshold() {
        let f = pair_force(1.0, 1.0, 40.0, STRENGTH, THRESHOLD);
        assert_eq!(f, gravitational_force(1.0, 1.0, 40.0, STRENGTH));
        assert!(f > 0.0);
    }

    #[test]
    fn test_repulsion_is_double_and_flipped() {
        let attractive = gravitational_force(1.0, 2.0, 10.0, STRENGTH);
        let f = pair_force(1.0, 2.0, 10.0, STRENGTH, THRESHOLD);
        assert_eq!(f, -2.0 * attractive);
    }

    #[test]
    fn test_threshold_boundary_still_attracts() {
        // Strictly-less comparison: sitting exactly on the threshold attracts
        assert!(pair_force(1.0, 1.0, THRESHOLD, STRENGTH, THRESHOLD) > 0.0);
    }

    #[test]
    fn test_acceleration_divides_by_target_mass_only() {
        let delta = Vec2::new(30.0, 40.0);
        let light = acceleration(delta, 50.0, 1.0, 0.5);
        let heavy = acceleration(delta, 50.0, 1.0, 2.0);
        assert!((light.length() - 2.0).abs() < 1e-6);
        assert!((heavy.length() - 0.5).abs() < 1e-6);
        // Direction follows delta
        assert!((light.normalize() - delta.normalize()).length() < 1e-6);
    }
}
