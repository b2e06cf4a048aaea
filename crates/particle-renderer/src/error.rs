//! Error types for program compilation and device setup.

use std::fmt;

/// Pipeline stage a shader source belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Errors that stop the frame loop from ever starting.
#[derive(Debug)]
pub enum RenderError {
    /// A shader stage failed to parse or validate. Carries the compiler diagnostic.
    ShaderCompile {
        stage: ShaderStage,
        diagnostic: String,
    },
    /// Both stages compiled but could not be combined into a pipeline.
    ProgramLink(String),
    /// No usable graphics adapter or device.
    UnsupportedDevice(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::ShaderCompile { stage, diagnostic } => {
                write!(f, "Failed to compile {} shader:\n{}", stage, diagnostic)
            }
            RenderError::ProgramLink(msg) => write!(f, "Failed to link shader program: {}", msg),
            RenderError::UnsupportedDevice(msg) => {
                write!(f, "No usable graphics device: {}", msg)
            }
        }
    }
}

impl std::error::Error for RenderError {}

impl From<wgpu::RequestAdapterError> for RenderError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        RenderError::UnsupportedDevice(e.to_string())
    }
}

impl From<wgpu::RequestDeviceError> for RenderError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        RenderError::UnsupportedDevice(e.to_string())
    }
}
