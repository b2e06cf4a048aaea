//! Physical constants for the particle sandbox
//!
//! World units are viewport pixels and time is measured in frames, so every
//! velocity here is "pixels per frame".

/// Default number of particles in a field
pub const DEFAULT_PARTICLE_COUNT: usize = 2000;

/// Maximum initial speed per axis (units/frame)
pub const INITIAL_SPEED: f32 = 0.9;

/// Lightest particle a fresh field can contain
pub const MIN_MASS: f32 = 0.5;

/// Heaviest particle a fresh field can contain
pub const MAX_MASS: f32 = 2.5;

/// Uniform velocity damping applied after every step.
/// Keeps the discrete integrator from pumping energy into the system.
pub const FRICTION: f32 = 0.995;

/// Inside the repulsion threshold the attractive force is negated and scaled by this
pub const REPULSION_FACTOR: f32 = -2.0;
