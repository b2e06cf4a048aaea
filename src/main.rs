//! 2D Gravity Sandbox
//!
//! Brute-force N-body particles under a tunable inverse-square law, drawn as
//! translucent points.
//!
//! Keys: `Q`/`A` gravity strength, `W`/`S` gravity radius, `E`/`D` repulsion
//! threshold, `R` reseed, `Esc` quit.

use particle_renderer::{PointRenderer, RenderError};
use particle_simulation::{
    ForceIntegrator, FrameLoop, FrameSink, ParticleField, SimulationConfig, SimulationParams,
    StepMode, Tunable,
};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

/// Errors that prevent the sandbox from starting.
#[derive(Debug)]
enum AppError {
    EventLoop(winit::error::EventLoopError),
    Window(winit::error::OsError),
    Surface(wgpu::CreateSurfaceError),
    Render(RenderError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            AppError::Window(e) => write!(f, "Failed to create window: {}", e),
            AppError::Surface(e) => write!(f, "Failed to create GPU surface: {}", e),
            AppError::Render(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::EventLoop(e) => Some(e),
            AppError::Window(e) => Some(e),
            AppError::Surface(e) => Some(e),
            AppError::Render(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for AppError {
    fn from(e: winit::error::OsError) -> Self {
        AppError::Window(e)
    }
}

impl From<wgpu::CreateSurfaceError> for AppError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        AppError::Surface(e)
    }
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::Render(e)
    }
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: PointRenderer,
}

impl GpuState {
    async fn new(window: Arc<Window>, particle_count: u32) -> Result<Self, AppError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(RenderError::from)?;

        log::info!("✓ Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(RenderError::from)?;

        // Point color is given in display space, so skip the sRGB encode when we can
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| {
                RenderError::UnsupportedDevice("surface reports no texture formats".into())
            })?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = PointRenderer::new(&device, config.format, particle_count)?;
        log::info!("✓ Renderer initialized");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

impl FrameSink for GpuState {
    type Error = wgpu::SurfaceError;

    fn draw(&mut self, positions: &[f32], particle_count: u32) -> Result<(), Self::Error> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.draw(
            &self.device,
            &self.queue,
            &view,
            positions,
            particle_count,
            self.config.width,
            self.config.height,
        );

        output.present();
        Ok(())
    }
}

struct FrameStats {
    frame_times: VecDeque<f32>,
    last_frame_time: Instant,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(100),
            last_frame_time: Instant::now(),
        }
    }

    /// Record a finished frame, returning (fps, average frame time in ms)
    fn record(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let frame_time = (now - self.last_frame_time).as_secs_f32() * 1000.0;
        self.last_frame_time = now;

        if self.frame_times.len() == 100 {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);

        let avg_frame_time = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        let fps = if avg_frame_time > 0.0 {
            1000.0 / avg_frame_time
        } else {
            0.0
        };
        (fps, avg_frame_time)
    }
}

struct App {
    config: SimulationConfig,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    field: Option<ParticleField>,
    params: SimulationParams,
    frame_loop: FrameLoop,
    stats: FrameStats,
    init_error: Option<AppError>,
}

impl App {
    fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            window: None,
            gpu_state: None,
            field: None,
            params: SimulationParams::default(),
            frame_loop: FrameLoop::new(ForceIntegrator::new(StepMode::Parallel)),
            stats: FrameStats::new(),
            init_error: None,
        }
    }

    /// Window → program → buffers → field → loop. Nothing is kept on failure.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attributes = Window::default_attributes()
            .with_title("Gravity Points")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let gpu_state = pollster::block_on(GpuState::new(
            window.clone(),
            self.config.particle_count as u32,
        ))?;

        let field = ParticleField::with_speed(
            self.config.particle_count,
            gpu_state.config.width as f32,
            gpu_state.config.height as f32,
            self.config.initial_speed,
        );

        self.window = Some(window.clone());
        self.gpu_state = Some(gpu_state);
        self.field = Some(field);
        self.frame_loop.start();
        window.request_redraw();
        Ok(())
    }

    /// Stop the loop and release GPU resources before leaving
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.frame_loop.stop();
        self.gpu_state = None;
        event_loop.exit();
    }

    fn handle_key(&mut self, code: KeyCode) {
        let nudge = match code {
            KeyCode::KeyQ => Some((Tunable::GravityStrength, 1)),
            KeyCode::KeyA => Some((Tunable::GravityStrength, -1)),
            KeyCode::KeyW => Some((Tunable::GravityRadius, 1)),
            KeyCode::KeyS => Some((Tunable::GravityRadius, -1)),
            KeyCode::KeyE => Some((Tunable::RepulsionThreshold, 1)),
            KeyCode::KeyD => Some((Tunable::RepulsionThreshold, -1)),
            _ => None,
        };

        if let Some((tunable, steps)) = nudge {
            self.params.nudge(tunable, steps);
        } else if code == KeyCode::KeyR {
            if let Some(field) = &mut self.field {
                field.initialize();
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu_state), Some(field)) =
            (&self.window, &mut self.gpu_state, &mut self.field)
        else {
            return;
        };

        match self.frame_loop.tick(field, &self.params, gpu_state) {
            Ok(true) => {
                let (fps, frame_time) = self.stats.record();
                window.set_title(&format!(
                    "Gravity Points - {:.0} FPS ({:.2}ms) - {} particles",
                    fps,
                    frame_time,
                    field.len()
                ));
                window.request_redraw();
            }
            Ok(false) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                // The step already ran; only this frame's draw is gone
                log::debug!(
                    "Dropped draw of frame {} after its step",
                    self.frame_loop.frames() + 1
                );
                gpu_state.reconfigure();
                window.request_redraw();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, stopping");
                self.shutdown(event_loop);
            }
            Err(e) => {
                log::warn!("Render error: {:?}", e);
                window.request_redraw();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.init_error.is_some() {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            log::error!("{}", e);
            self.init_error = Some(e);
            self.shutdown(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.shutdown(event_loop),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.handle_key(code),

            WindowEvent::Resized(physical_size) => {
                // Minimized windows report 0x0; keep the old field until a real size arrives
                if physical_size.width > 0 && physical_size.height > 0 {
                    if let Some(gpu_state) = &mut self.gpu_state {
                        gpu_state.resize(physical_size.width, physical_size.height);
                    }
                    if let Some(field) = &mut self.field {
                        field.resize(physical_size.width as f32, physical_size.height as f32);
                    }
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

fn run() -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(SimulationConfig::default());
    event_loop.run_app(&mut app)?;

    match app.init_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting gravity sandbox...");

    if let Err(e) = run() {
        log::error!("Fatal: {}", e);
        std::process::exit(1);
    }
}
