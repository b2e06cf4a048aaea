//! # Particle Simulation Engine
//!
//! CPU N-body simulation: the particle field, the brute-force force
//! integrator and the frame loop that sequences a step with a draw.

pub mod field;
pub mod frame_loop;
pub mod integrator;
pub mod params;

pub use field::*;
pub use frame_loop::*;
pub use integrator::*;
pub use params::*;
