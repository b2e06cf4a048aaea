//! Particle population and its render-ready position buffer

use glam::Vec2;
use particle_physics::{Particle, INITIAL_SPEED, MAX_MASS, MIN_MASS};
use rand::Rng;

/// Owns a fixed-size particle population inside a `width × height` box.
///
/// A particle's index is its identity for the lifetime of the field. The
/// flat `positions` buffer (interleaved x, y) is the only data handed to the
/// renderer and is rewritten in place after every step.
pub struct ParticleField {
    particles: Vec<Particle>,
    positions: Vec<f32>,
    width: f32,
    height: f32,
    initial_speed: f32,
}

impl ParticleField {
    /// Create a randomly seeded field of `count` particles
    pub fn new(count: usize, width: f32, height: f32) -> Self {
        Self::with_speed(count, width, height, INITIAL_SPEED)
    }

    pub fn with_speed(count: usize, width: f32, height: f32, initial_speed: f32) -> Self {
        // Placeholder slots, overwritten by initialize() before anyone can observe them
        let mut field = Self {
            particles: vec![Particle::at_rest(Vec2::ZERO, MIN_MASS); count],
            positions: vec![0.0; count * 2],
            width,
            height,
            initial_speed,
        };
        field.initialize();
        field
    }

    /// Build a field from explicit particles, e.g. for a scripted scenario
    pub fn from_particles(particles: Vec<Particle>, width: f32, height: f32) -> Self {
        let mut field = Self {
            positions: vec![0.0; particles.len() * 2],
            particles,
            width,
            height,
            initial_speed: INITIAL_SPEED,
        };
        field.sync_position_buffer();
        field
    }

    /// Re-randomize every particle using the thread-local generator
    pub fn initialize(&mut self) {
        self.initialize_with(&mut rand::rng());
    }

    /// Re-randomize every particle.
    ///
    /// Position is uniform in `[0, width) × [0, height)`, velocity uniform in
    /// `[-speed, speed]` per axis, mass uniform in `[MIN_MASS, MAX_MASS]`.
    pub fn initialize_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let speed = self.initial_speed;
        for particle in &mut self.particles {
            let position = Vec2::new(
                sample_extent(rng, self.width),
                sample_extent(rng, self.height),
            );
            let velocity = Vec2::new(
                rng.random_range(-speed..=speed),
                rng.random_range(-speed..=speed),
            );
            let mass = rng.random_range(MIN_MASS..=MAX_MASS);
            *particle = Particle::new(position, velocity, mass);
        }
        self.sync_position_buffer();

        log::info!(
            "Seeded {} particles in {}x{}",
            self.particles.len(),
            self.width,
            self.height
        );
    }

    /// Change the bounds and reseed. Existing particle state is discarded.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.resize_with(width, height, &mut rand::rng());
    }

    pub fn resize_with<R: Rng + ?Sized>(&mut self, width: f32, height: f32, rng: &mut R) {
        self.width = width;
        self.height = height;
        self.initialize_with(rng);
    }

    /// Copy every particle position into the interleaved buffer
    pub fn sync_position_buffer(&mut self) {
        for (slot, particle) in self.positions.chunks_exact_mut(2).zip(&self.particles) {
            slot[0] = particle.position.x;
            slot[1] = particle.position.y;
        }
    }

    /// Interleaved `[x0, y0, x1, y1, ...]`, valid until the next step
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

/// Uniform in `[0, extent)`; a degenerate extent pins the axis to 0
fn sample_extent<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> f32 {
    if extent > 0.0 {
        rng.random_range(0.0..extent)
    } else {
        0.0
    }
}
