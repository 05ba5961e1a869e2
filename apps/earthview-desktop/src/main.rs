use anyhow::{Context, Result};
use clap::Parser;
use earthview_assets::load_model;
use earthview_input::InputEvent;
use earthview_render_wgpu::WgpuRenderer;
use earthview_scene::{Scene, Viewer, ViewerConfig};
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Pixels of scroll per wheel notch.
const LINE_SCROLL_PX: f32 = 40.0;

#[derive(Parser)]
#[command(name = "earthview-desktop", about = "Interactive glTF model viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// glTF model to display
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Drag sensitivity in radians per pixel
    #[arg(long)]
    sensitivity: Option<f32>,

    /// Initial window width
    #[arg(long)]
    width: Option<u32>,

    /// Initial window height
    #[arg(long)]
    height: Option<u32>,
}

impl Cli {
    /// Config file values, overridden by any flags given on the command line.
    fn resolve_config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => ViewerConfig::default(),
        };
        if let Some(model) = &self.model {
            config.model_path = model.clone();
        }
        if let Some(sensitivity) = self.sensitivity {
            config.input.sensitivity = sensitivity;
        }
        if let Some(width) = self.width {
            config.window_width = width;
        }
        if let Some(height) = self.height {
            config.window_height = height;
        }
        Ok(config)
    }
}

/// Window, surface and GPU resources, created once the event loop resumes.
struct GpuContext {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl GpuContext {
    fn new(
        event_loop: &ActiveEventLoop,
        egui_ctx: &EguiContext,
        config: &ViewerConfig,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Earth Viewer")
            .with_inner_size(PhysicalSize::new(config.window_width, config.window_height));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("find adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("earthview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let renderer = WgpuRenderer::new(
            &device,
            surface_format,
            surface_config.width,
            surface_config.height,
        );

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&device, renderer.surface_format(), None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config: surface_config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn draw(&mut self, egui_ctx: &EguiContext, scene: &Scene) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(&self.device, &self.queue, &view, scene);

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| draw_caption(ctx, scene));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

/// Caption panel, slid horizontally according to its placement.
fn draw_caption(ctx: &EguiContext, scene: &Scene) {
    let screen = ctx.screen_rect();
    let left = screen.min.x + screen.width() * scene.caption.placement.left_fraction();
    let top = screen.min.y + screen.height() * 0.4;

    egui::Area::new(egui::Id::new("caption"))
        .fixed_pos(egui::pos2(left, top))
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(&scene.caption.text)
                    .size(32.0)
                    .color(egui::Color32::WHITE),
            );
        });
}

struct App {
    viewer: Viewer,
    config: ViewerConfig,
    gpu: Option<GpuContext>,
    egui_ctx: EguiContext,
}

impl App {
    fn new(config: ViewerConfig) -> Result<Self> {
        let viewer = Viewer::new(&config, config.window_width, config.window_height)?;
        Ok(Self {
            viewer,
            config,
            gpu: None,
            egui_ctx: EguiContext::default(),
        })
    }

    fn dispatch(&mut self, event: InputEvent) {
        if let Err(e) = self.viewer.handle(event) {
            tracing::warn!("input rejected: {e}");
        }
    }

    /// One-shot model load. On failure the viewer keeps running without it.
    fn load_model(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        match load_model(&self.config.model_path) {
            Ok(mesh) => {
                gpu.renderer.upload_model(&gpu.device, &gpu.queue, &mesh);
                self.viewer.attach_model(mesh.name);
            }
            Err(e) => self.viewer.model_failed(&e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match GpuContext::new(event_loop, &self.egui_ctx, &self.config) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.gpu = Some(gpu);
                if size.width > 0 && size.height > 0 {
                    self.dispatch(InputEvent::Resize {
                        width: size.width,
                        height: size.height,
                    });
                }
                self.load_model();
            }
            Err(e) => {
                tracing::error!("failed to initialize GPU: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                // Minimized windows report 0x0.
                if new_size.width == 0 || new_size.height == 0 {
                    return;
                }
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
                self.dispatch(InputEvent::Resize {
                    width: new_size.width,
                    height: new_size.height,
                });
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                let event = match state {
                    ElementState::Pressed => InputEvent::PointerDown,
                    ElementState::Released => InputEvent::PointerUp,
                };
                self.dispatch(event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.dispatch(InputEvent::pointer_move(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // Wheel down scrolls the page down, increasing the offset.
                let delta_px = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_SCROLL_PX,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
                if let Err(e) = self.viewer.scroll_by(delta_px) {
                    tracing::warn!("scroll rejected: {e}");
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.draw(&self.egui_ctx, self.viewer.scene());
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = cli.resolve_config()?;
    tracing::info!(model = %config.model_path.display(), "earthview-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}
