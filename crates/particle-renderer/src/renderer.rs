//! Point-sprite rendering of the particle position buffer

use crate::error::RenderError;
use crate::program::{
    compile_program, PointProgram, FRAGMENT_SHADER, VERTEX_SHADER, VERTICES_PER_POINT,
};
use bytemuck::{Pod, Zeroable};

/// Viewport uniform for the vertex stage (matches WGSL `Viewport`)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ViewportUniform {
    pub resolution: [f32; 2],
    pub _padding: [f32; 2],
}

/// Bytes per particle in the vertex buffer (x, y)
const POSITION_STRIDE: u64 = 2 * std::mem::size_of::<f32>() as u64;

pub struct PointRenderer {
    program: PointProgram,
    viewport_buffer: wgpu::Buffer,
    viewport_bind_group: wgpu::BindGroup,
    position_buffer: wgpu::Buffer,
    capacity: u32,
}

impl PointRenderer {
    /// Compile the bundled program, then allocate buffers for `particle_count` points
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        particle_count: u32,
    ) -> Result<Self, RenderError> {
        let program = compile_program(device, VERTEX_SHADER, FRAGMENT_SHADER, format)?;
        Ok(Self::with_program(device, program, particle_count))
    }

    pub fn with_program(device: &wgpu::Device, program: PointProgram, particle_count: u32) -> Self {
        let viewport_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Viewport Buffer"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let viewport_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Viewport Bind Group"),
            layout: &program.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_buffer.as_entire_binding(),
            }],
        });

        let capacity = particle_count.max(1);
        let position_buffer = Self::create_position_buffer(device, capacity);
        log::debug!("Allocated point buffers for {} particles", capacity);

        Self {
            program,
            viewport_buffer,
            viewport_bind_group,
            position_buffer,
            capacity,
        }
    }

    fn create_position_buffer(device: &wgpu::Device, capacity: u32) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Position Buffer"),
            size: POSITION_STRIDE * capacity as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Upload `positions` (full replace) and draw `particle_count` points
    /// into `target`, cleared first.
    pub fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        positions: &[f32],
        particle_count: u32,
        viewport_width: u32,
        viewport_height: u32,
    ) {
        debug_assert!(positions.len() >= particle_count as usize * 2);

        if particle_count > self.capacity {
            self.capacity = particle_count;
            self.position_buffer = Self::create_position_buffer(device, particle_count);
            log::debug!("Grew point buffer to {} particles", particle_count);
        }

        queue.write_buffer(
            &self.viewport_buffer,
            0,
            bytemuck::cast_slice(&[ViewportUniform {
                resolution: [viewport_width as f32, viewport_height as f32],
                _padding: [0.0; 2],
            }]),
        );
        if particle_count > 0 {
            queue.write_buffer(
                &self.position_buffer,
                0,
                bytemuck::cast_slice(&positions[..particle_count as usize * 2]),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Point Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Point Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.program.pipeline);
            render_pass.set_bind_group(0, &self.viewport_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.position_buffer.slice(..));
            render_pass.draw(0..VERTICES_PER_POINT, 0..particle_count);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

impl Drop for PointRenderer {
    fn drop(&mut self) {
        log::debug!("Released point program and buffers");
    }
}
