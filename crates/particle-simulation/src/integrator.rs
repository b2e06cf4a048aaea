//! Brute-force O(n²) force integrator
//!
//! Each step runs in two passes. The read pass fills one private
//! acceleration slot per particle from an unchanging view of the field; the
//! integration pass then applies velocity, friction, motion and wraparound.
//! In parallel mode the read pass is split across rayon workers and the
//! integration pass only starts once every worker has returned.

use crate::{ParticleField, SimulationParams};
use glam::Vec2;
use particle_physics::{acceleration, pair_force, Particle, FRICTION};
use rayon::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StepMode {
    #[default]
    Serial,
    Parallel,
}

pub struct ForceIntegrator {
    mode: StepMode,
    accelerations: Vec<Vec2>,
}

impl ForceIntegrator {
    pub fn new(mode: StepMode) -> Self {
        Self {
            mode,
            accelerations: Vec::new(),
        }
    }

    pub fn mode(&self) -> StepMode {
        self.mode
    }

    /// Accelerations applied during the most recent step, before friction
    pub fn accelerations(&self) -> &[Vec2] {
        &self.accelerations
    }

    /// Advance the field by exactly one step and refresh its position buffer
    pub fn step(&mut self, field: &mut ParticleField, params: &SimulationParams) {
        self.accumulate(field.particles(), params);

        let (width, height) = (field.width(), field.height());
        for (index, (particle, accel)) in field
            .particles_mut()
            .iter_mut()
            .zip(&self.accelerations)
            .enumerate()
        {
            integrate(index, particle, *accel, width, height);
        }

        field.sync_position_buffer();
    }

    fn accumulate(&mut self, particles: &[Particle], params: &SimulationParams) {
        self.accelerations.clear();
        self.accelerations.resize(particles.len(), Vec2::ZERO);

        match self.mode {
            StepMode::Serial => {
                for (index, slot) in self.accelerations.iter_mut().enumerate() {
                    *slot = acceleration_on(index, particles, params);
                }
            }
            StepMode::Parallel => {
                self.accelerations
                    .par_iter_mut()
                    .enumerate()
                    .for_each(|(index, slot)| *slot = acceleration_on(index, particles, params));
            }
        }
    }
}

impl Default for ForceIntegrator {
    fn default() -> Self {
        Self::new(StepMode::default())
    }
}

/// Net acceleration on `particles[index]` from every other particle.
///
/// Pairs at zero distance or at/beyond the gravity radius contribute nothing.
pub fn acceleration_on(index: usize, particles: &[Particle], params: &SimulationParams) -> Vec2 {
    let target = &particles[index];
    let mass = target.mass();
    assert!(mass > 0.0, "particle {index} has non-positive mass {mass}");

    let mut accel = Vec2::ZERO;
    for (other, source) in particles.iter().enumerate() {
        if other == index {
            continue;
        }

        let delta = source.position - target.position;
        let r = delta.length();
        if r == 0.0 || r >= params.gravity_radius {
            continue;
        }

        let force = pair_force(
            mass,
            source.mass(),
            r,
            params.gravity_strength,
            params.repulsion_threshold,
        );
        accel += acceleration(delta, r, force, mass);
    }
    accel
}

fn integrate(index: usize, particle: &mut Particle, accel: Vec2, width: f32, height: f32) {
    particle.velocity += accel;
    particle.velocity *= FRICTION;
    particle.position += particle.velocity;

    // Checked before wrapping: wrap_axis would fold an infinity back inside the box
    assert!(
        particle.velocity.is_finite() && particle.position.is_finite(),
        "particle {index} reached non-finite state: position {:?}, velocity {:?}",
        particle.position,
        particle.velocity
    );

    particle.position.x = wrap_axis(particle.position.x, width);
    particle.position.y = wrap_axis(particle.position.y, height);
}

/// Toroidal wrap. Only strict overshoot teleports, so `0` and `extent` are
/// both valid resting coordinates.
pub fn wrap_axis(value: f32, extent: f32) -> f32 {
    if value < 0.0 {
        extent
    } else if value > extent {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params() -> SimulationParams {
        SimulationParams {
            gravity_strength: 1e-4,
            gravity_radius: 150.0,
            repulsion_threshold: 20.0,
        }
    }

    fn pair(distance: f32, m1: f32, m2: f32) -> Vec<Particle> {
        vec![
            Particle::at_rest(Vec2::new(200.0, 200.0), m1),
            Particle::at_rest(Vec2::new(200.0 + distance, 200.0), m2),
        ]
    }

    #[test]
    fn test_attraction_between_threshold_and_radius() {
        let (m1, m2, r) = (2.0, 1.5, 50.0);
        let particles = pair(r, m1, m2);
        let accel = acceleration_on(0, &particles, &params());

        let force = 1e-4 * m1 * m2 / (r * r);
        // Points toward the other particle (+x), magnitude F / m1
        assert!(accel.x > 0.0);
        assert_eq!(accel.y, 0.0);
        assert!((accel.x * m1 - force).abs() < 1e-12);
    }

    #[test]
    fn test_repulsion_inside_threshold() {
        let (m1, m2, r) = (1.0, 2.0, 10.0);
        let particles = pair(r, m1, m2);
        let accel = acceleration_on(0, &particles, &params());

        let force = 1e-4 * m1 * m2 / (r * r);
        // Points away from the other particle (-x), doubled
        assert!(accel.x < 0.0);
        assert!((accel.x.abs() * m1 - 2.0 * force).abs() < 1e-12);
    }

    #[test]
    fn test_no_force_at_or_beyond_radius() {
        for r in [150.0, 151.0, 400.0] {
            let particles = pair(r, 1.0, 1.0);
            assert_eq!(acceleration_on(0, &particles, &params()), Vec2::ZERO);
            assert_eq!(acceleration_on(1, &particles, &params()), Vec2::ZERO);
        }
    }

    #[test]
    fn test_coincident_particles_are_skipped() {
        let particles = pair(0.0, 1.0, 1.0);
        assert_eq!(acceleration_on(0, &particles, &params()), Vec2::ZERO);
    }

    #[test]
    fn test_two_body_scenario() {
        let mut field = ParticleField::from_particles(
            vec![
                Particle::at_rest(Vec2::new(0.0, 0.0), 1.0),
                Particle::at_rest(Vec2::new(100.0, 0.0), 1.0),
            ],
            800.0,
            600.0,
        );
        let mut integrator = ForceIntegrator::default();
        integrator.step(&mut field, &params());

        let accel = integrator.accelerations();
        assert!(accel[0].x > 0.0);
        assert_eq!(accel[0].x, -accel[1].x);
        assert_eq!(accel[0].y, 0.0);

        let particles = field.particles();
        assert!(particles[0].velocity.x > 0.0);
        assert!(particles[1].velocity.x < 0.0);
        assert_eq!(particles[0].velocity.y, 0.0);
        assert_eq!(particles[0].velocity.x, accel[0].x * FRICTION);
    }

    #[test]
    fn test_step_refreshes_position_buffer() {
        let mut field = ParticleField::from_particles(
            vec![Particle::new(Vec2::new(10.0, 10.0), Vec2::new(2.0, -1.0), 1.0)],
            100.0,
            100.0,
        );
        ForceIntegrator::default().step(&mut field, &params());

        let p = field.particles()[0].position;
        assert_eq!(field.positions(), &[p.x, p.y]);
        assert!(p.x > 10.0 && p.y < 10.0);
    }

    #[test]
    fn test_wrap_is_strict() {
        assert_eq!(wrap_axis(800.0 + 1e-3, 800.0), 0.0);
        assert_eq!(wrap_axis(-1e-3, 800.0), 800.0);
        assert_eq!(wrap_axis(800.0, 800.0), 800.0);
        assert_eq!(wrap_axis(0.0, 800.0), 0.0);
    }

    #[test]
    fn test_particle_on_edge_stays_put() {
        let mut field = ParticleField::from_particles(
            vec![Particle::at_rest(Vec2::new(800.0, 600.0), 1.0)],
            800.0,
            600.0,
        );
        ForceIntegrator::default().step(&mut field, &params());
        assert_eq!(field.particles()[0].position, Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_overshoot_wraps_to_opposite_edge() {
        let mut field = ParticleField::from_particles(
            vec![Particle::new(Vec2::new(799.5, 300.0), Vec2::new(1.0, 0.0), 1.0)],
            800.0,
            600.0,
        );
        ForceIntegrator::default().step(&mut field, &params());
        assert_eq!(field.particles()[0].position.x, 0.0);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let mut serial_field = ParticleField::from_particles(
            vec![Particle::at_rest(Vec2::ZERO, 1.0); 300],
            400.0,
            300.0,
        );
        serial_field.initialize_with(&mut StdRng::seed_from_u64(42));
        let mut parallel_field =
            ParticleField::from_particles(serial_field.particles().to_vec(), 400.0, 300.0);

        let mut serial = ForceIntegrator::new(StepMode::Serial);
        let mut parallel = ForceIntegrator::new(StepMode::Parallel);
        for _ in 0..5 {
            serial.step(&mut serial_field, &params());
            parallel.step(&mut parallel_field, &params());
        }

        assert_eq!(serial_field.particles(), parallel_field.particles());
        assert_eq!(serial_field.positions(), parallel_field.positions());
    }

    #[test]
    #[should_panic(expected = "non-finite state")]
    fn test_non_finite_state_aborts() {
        let mut field = ParticleField::from_particles(pair(50.0, 1.0, 1.0), 800.0, 600.0);
        let params = SimulationParams {
            gravity_strength: f32::INFINITY,
            ..params()
        };
        ForceIntegrator::default().step(&mut field, &params);
    }

    #[test]
    #[should_panic(expected = "non-finite state")]
    fn test_overflowing_diagonal_force_aborts() {
        // Both delta components are nonzero, so the overflow yields ±inf, not NaN
        let mut field = ParticleField::from_particles(
            vec![
                Particle::at_rest(Vec2::new(100.0, 100.0), 1.0),
                Particle::at_rest(Vec2::new(100.3, 100.4), 1.0),
            ],
            800.0,
            600.0,
        );
        let params = SimulationParams {
            gravity_strength: 3e38,
            ..params()
        };
        let mut integrator = ForceIntegrator::default();
        for _ in 0..3 {
            integrator.step(&mut field, &params);
        }
    }
}
