//! Particle value type

use glam::Vec2;

/// A single point mass.
///
/// Mass is fixed at construction and never changes, so it is only exposed
/// through [`Particle::mass`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in viewport pixels
    pub position: Vec2,
    /// Velocity in pixels per frame
    pub velocity: Vec2,
    mass: f32,
}

impl Particle {
    /// Create a particle.
    ///
    /// Panics if `mass` is not strictly positive and finite: every
    /// acceleration divides by it.
    pub fn new(position: Vec2, velocity: Vec2, mass: f32) -> Self {
        assert!(
            mass.is_finite() && mass > 0.0,
            "particle mass must be positive and finite, got {mass}"
        );
        Self {
            position,
            velocity,
            mass,
        }
    }

    /// Create a particle at rest
    pub fn at_rest(position: Vec2, mass: f32) -> Self {
        Self::new(position, Vec2::ZERO, mass)
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }
}
