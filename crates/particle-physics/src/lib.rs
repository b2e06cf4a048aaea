//! # Particle Physics
//!
//! Core physics for the 2D gravity sandbox: the particle value type, the
//! constants that shape a fresh population, and the pairwise force law.

pub mod constants;
pub mod forces;
pub mod particle;

pub use constants::*;
pub use forces::*;
pub use particle::*;
