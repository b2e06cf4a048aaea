//! Shader program compilation
//!
//! Each stage is compiled on the CPU with naga first so failures come back
//! with a readable diagnostic instead of a device-lost panic. The stages are
//! then "linked" by checking their entry points and stage interface, and
//! finally turned into a wgpu render pipeline inside a validation error scope.

use crate::error::{RenderError, ShaderStage};
use crate::renderer::ViewportUniform;
use naga::valid::{Capabilities, ValidationFlags, Validator};

pub const VERTEX_SHADER: &str = include_str!("shaders/points.vert.wgsl");
pub const FRAGMENT_SHADER: &str = include_str!("shaders/points.frag.wgsl");

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Vertices per particle quad
pub const VERTICES_PER_POINT: u32 = 6;

/// A linked point-sprite program.
///
/// Dropping it releases the pipeline and its layouts.
pub struct PointProgram {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) bind_group_layout: wgpu::BindGroupLayout,
}

/// Parse and validate one WGSL stage
pub fn compile_stage(source: &str, stage: ShaderStage) -> Result<naga::Module, RenderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|err| {
        RenderError::ShaderCompile {
            stage,
            diagnostic: err.emit_to_string(source),
        }
    })?;

    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    validator
        .validate(&module)
        .map_err(|err| RenderError::ShaderCompile {
            stage,
            diagnostic: err.to_string(),
        })?;

    Ok(module)
}

/// Check that the two stages fit together: both entry points exist with the
/// right stage, and every fragment input location is written by the vertex stage.
pub fn link_stages(vertex: &naga::Module, fragment: &naga::Module) -> Result<(), RenderError> {
    let vs = find_entry(vertex, VERTEX_ENTRY, naga::ShaderStage::Vertex)?;
    let fs = find_entry(fragment, FRAGMENT_ENTRY, naga::ShaderStage::Fragment)?;

    let written = vs
        .function
        .result
        .as_ref()
        .map(|result| locations(vertex, result.ty, result.binding.as_ref()))
        .unwrap_or_default();

    for argument in &fs.function.arguments {
        for location in locations(fragment, argument.ty, argument.binding.as_ref()) {
            if !written.contains(&location) {
                return Err(RenderError::ProgramLink(format!(
                    "fragment input @location({}) is not written by `{}`",
                    location, VERTEX_ENTRY
                )));
            }
        }
    }

    Ok(())
}

fn find_entry<'a>(
    module: &'a naga::Module,
    name: &str,
    stage: naga::ShaderStage,
) -> Result<&'a naga::EntryPoint, RenderError> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name && ep.stage == stage)
        .ok_or_else(|| {
            RenderError::ProgramLink(format!("missing {:?} entry point `{}`", stage, name))
        })
}

/// User-defined `@location`s carried by a binding or a struct of bindings
fn locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
) -> Vec<u32> {
    if let Some(binding) = binding {
        return match binding {
            naga::Binding::Location { location, .. } => vec![*location],
            _ => Vec::new(),
        };
    }

    match &module.types[ty].inner {
        naga::TypeInner::Struct { members, .. } => members
            .iter()
            .filter_map(|member| match member.binding {
                Some(naga::Binding::Location { location, .. }) => Some(location),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Compile both stages and link them into a render pipeline for `format`.
///
/// Anything created before a failure is dropped on the way out.
pub fn compile_program(
    device: &wgpu::Device,
    vertex_source: &str,
    fragment_source: &str,
    format: wgpu::TextureFormat,
) -> Result<PointProgram, RenderError> {
    let vertex = compile_stage(vertex_source, ShaderStage::Vertex)?;
    let fragment = compile_stage(fragment_source, ShaderStage::Fragment)?;
    link_stages(&vertex, &fragment)?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Point Vertex Shader"),
        source: wgpu::ShaderSource::Wgsl(vertex_source.into()),
    });
    let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Point Fragment Shader"),
        source: wgpu::ShaderSource::Wgsl(fragment_source.into()),
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Viewport Bind Group Layout"),
        entries: &[
            // Viewport (Uniform) - Binding 0
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ViewportUniform>() as u64,
                    ),
                },
                count: None,
            },
        ],
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Point Pipeline Layout"),
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Point Render Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &vertex_module,
            entry_point: Some(VERTEX_ENTRY),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: (2 * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![0 => Float32x2],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &fragment_module,
            entry_point: Some(FRAGMENT_ENTRY),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(RenderError::ProgramLink(err.to_string()));
    }

    log::debug!("Point program linked ({:?})", format);
    Ok(PointProgram {
        pipeline,
        bind_group_layout,
    })
}
