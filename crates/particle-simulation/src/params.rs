//! Physics parameters for runtime tuning

use particle_physics::{DEFAULT_PARTICLE_COUNT, INITIAL_SPEED};

/// Recognized range and step size of a tunable.
///
/// The core never validates against these; writers (UI, key bindings) use
/// them to keep their own edits sensible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Move `value` by `steps` increments, snapped to the step grid and clamped
    pub fn nudge(&self, value: f32, steps: i32) -> f32 {
        let index = ((value - self.min) / self.step).round() + steps as f32;
        self.clamp(self.min + index * self.step)
    }
}

pub const GRAVITY_STRENGTH_RANGE: ParamRange = ParamRange::new(0.0, 1e-4, 1e-6);
pub const GRAVITY_RADIUS_RANGE: ParamRange = ParamRange::new(50.0, 300.0, 10.0);
pub const REPULSION_THRESHOLD_RANGE: ParamRange = ParamRange::new(5.0, 50.0, 1.0);

/// The three live tunables read by every simulation step.
///
/// No cross-validation happens here: a radius below the repulsion threshold
/// is a legal (if odd) configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParams {
    pub gravity_strength: f32,
    pub gravity_radius: f32,
    pub repulsion_threshold: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            gravity_strength: 5e-5,
            gravity_radius: 150.0,
            repulsion_threshold: 20.0,
        }
    }
}

/// Names a single tunable so writers can address it generically
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tunable {
    GravityStrength,
    GravityRadius,
    RepulsionThreshold,
}

impl Tunable {
    pub const ALL: [Tunable; 3] = [
        Tunable::GravityStrength,
        Tunable::GravityRadius,
        Tunable::RepulsionThreshold,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tunable::GravityStrength => "gravity strength",
            Tunable::GravityRadius => "gravity radius",
            Tunable::RepulsionThreshold => "repulsion threshold",
        }
    }

    pub fn range(self) -> ParamRange {
        match self {
            Tunable::GravityStrength => GRAVITY_STRENGTH_RANGE,
            Tunable::GravityRadius => GRAVITY_RADIUS_RANGE,
            Tunable::RepulsionThreshold => REPULSION_THRESHOLD_RANGE,
        }
    }
}

impl SimulationParams {
    pub fn get(&self, tunable: Tunable) -> f32 {
        match tunable {
            Tunable::GravityStrength => self.gravity_strength,
            Tunable::GravityRadius => self.gravity_radius,
            Tunable::RepulsionThreshold => self.repulsion_threshold,
        }
    }

    /// Unvalidated write
    pub fn set(&mut self, tunable: Tunable, value: f32) {
        match tunable {
            Tunable::GravityStrength => self.gravity_strength = value,
            Tunable::GravityRadius => self.gravity_radius = value,
            Tunable::RepulsionThreshold => self.repulsion_threshold = value,
        }
    }

    /// Step a tunable within its recognized range and return the new value
    pub fn nudge(&mut self, tunable: Tunable, steps: i32) -> f32 {
        let value = tunable.range().nudge(self.get(tunable), steps);
        self.set(tunable, value);
        log::info!("{} = {}", tunable.name(), value);
        value
    }
}

/// Startup configuration for a simulation session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    pub particle_count: usize,
    pub initial_speed: f32,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            initial_speed: INITIAL_SPEED,
            window_width: 1280,
            window_height: 720,
        }
    }
}
