//! Step-then-draw sequencing, one iteration per display refresh

use crate::{ForceIntegrator, ParticleField, SimulationParams};

/// Anything that can present a frame's position buffer
pub trait FrameSink {
    type Error;

    fn draw(&mut self, positions: &[f32], particle_count: u32) -> Result<(), Self::Error>;
}

/// Drives the simulation: every [`FrameLoop::tick`] runs one full step and
/// then one draw of the freshly synced buffer. Owns no particle state.
pub struct FrameLoop {
    integrator: ForceIntegrator,
    running: bool,
    frames: u64,
}

impl FrameLoop {
    pub fn new(integrator: ForceIntegrator) -> Self {
        Self {
            integrator,
            running: false,
            frames: 0,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            log::info!("Frame loop started ({:?} step mode)", self.integrator.mode());
        }
        self.running = true;
    }

    /// Stop scheduling further iterations. Takes effect before the next tick.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Frame loop stopped after {} frames", self.frames);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of completed step + draw iterations
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one iteration. Returns `Ok(false)` without touching the field when
    /// the loop is stopped, so the caller knows not to schedule another.
    /// A draw error leaves the step applied and the frame uncounted.
    pub fn tick<S: FrameSink>(
        &mut self,
        field: &mut ParticleField,
        params: &SimulationParams,
        sink: &mut S,
    ) -> Result<bool, S::Error> {
        if !self.running {
            return Ok(false);
        }

        self.integrator.step(field, params);
        sink.draw(field.positions(), field.len() as u32)?;
        self.frames += 1;

        Ok(self.running)
    }
}
