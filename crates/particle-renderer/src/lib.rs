//! # Particle Renderer
//!
//! Draws the simulation's position buffer as small translucent squares.

pub mod error;
pub mod program;
pub mod renderer;
pub mod transform;

pub use error::*;
pub use program::*;
pub use renderer::*;
pub use transform::*;
