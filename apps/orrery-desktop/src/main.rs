use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use orrery_config::Config;
use orrery_input::{Action, ActionQueue};
use orrery_kernel::OrbitSystem;
use orrery_render::{FrameDriver, SceneStyle};
use orrery_render_wgpu::{OrbitCamera, WgpuRenderer};
use orrery_tools::OrbitInspector;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Pixel-delta scroll events are converted to wheel notches at this rate.
const PIXELS_PER_NOTCH: f32 = 50.0;

#[derive(Parser)]
#[command(name = "orrery-desktop", about = "Earth and Moon orrery")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// MSAA sample count (1 or 4), overrides the config
    #[arg(long)]
    msaa: Option<u32>,

    /// Start with the animation paused
    #[arg(long)]
    paused: bool,
}

/// Application state: simulation, camera and input, independent of the GPU.
struct AppState {
    config: Config,
    driver: FrameDriver,
    camera: OrbitCamera,
    actions: ActionQueue,
    show_inspector: bool,
    rotating: bool,
    panning: bool,
    cursor: Option<PhysicalPosition<f64>>,
}

impl AppState {
    fn new(config: Config, paused: bool) -> Self {
        let system = OrbitSystem::new(
            config.primary_body(),
            config.satellite_body(),
            config.orbit_relation(),
        );
        let camera = OrbitCamera::from_config(&config.camera);
        let mut driver = FrameDriver::new(system, camera.view());
        driver.set_paused(paused);

        Self {
            config,
            driver,
            camera,
            actions: ActionQueue::new(),
            show_inspector: true,
            rotating: false,
            panning: false,
            cursor: None,
        }
    }

    /// The input-controller update: apply queued actions once per tick,
    /// before the driver advances and renders.
    fn before_frame(&mut self) {
        for action in self.actions.drain() {
            if action == Action::ToggleInspector {
                self.show_inspector = !self.show_inspector;
            } else if !self.camera.apply(action) && !self.driver.apply(action) {
                tracing::debug!(?action, "unhandled action");
            }
        }
        *self.driver.view_mut() = self.camera.view();
    }

    fn handle_key(&mut self, key: KeyCode) {
        let action = match key {
            KeyCode::Space => Action::TogglePause,
            KeyCode::Period => Action::StepOnce,
            KeyCode::KeyC => Action::ResetCamera,
            KeyCode::KeyR => Action::ResetSimulation,
            KeyCode::F1 => Action::ToggleInspector,
            _ => Action::Noop,
        };
        self.actions.push(action);
    }

    fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.rotating = pressed,
            MouseButton::Right => self.panning = pressed,
            _ => {}
        }
    }

    /// Drop any drag in progress, e.g. when the window loses focus.
    fn release_pointer(&mut self) {
        self.rotating = false;
        self.panning = false;
    }

    fn handle_cursor(&mut self, position: PhysicalPosition<f64>) {
        if let Some(last) = self.cursor {
            let delta = Vec2::new((position.x - last.x) as f32, (position.y - last.y) as f32);
            if self.rotating {
                self.actions.push(Action::OrbitCamera(delta));
            } else if self.panning {
                self.actions.push(Action::Pan(delta));
            }
        }
        self.cursor = Some(position);
    }

    fn handle_wheel(&mut self, delta: MouseScrollDelta) {
        let notches = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_NOTCH,
        };
        self.actions.push(Action::Zoom(notches));
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_inspector {
            return;
        }

        let summary = OrbitInspector::summary(self.driver.system());

        egui::SidePanel::left("inspector")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Orrery");
                ui.separator();
                ui.label(format!("Tick: {}", summary.tick));
                ui.label(format!("Revolutions: {:.3}", summary.revolutions));
                ui.label(format!("Orbit radius: {:.2}", summary.radius));
                ui.label(format!("Orbit error: {:.2e}", summary.orbit_error));
                ui.separator();

                for (name, body) in [
                    (&self.config.primary.name, &summary.primary),
                    (&self.config.satellite.name, &summary.satellite),
                ] {
                    ui.label(format!(
                        "{name}: rot {:.3} pos ({:.2}, {:.2}, {:.2})",
                        body.rotation_y, body.position[0], body.position[1], body.position[2]
                    ));
                }
                ui.separator();

                ui.heading("Playback");
                ui.horizontal(|ui| {
                    let label = if self.driver.paused() {
                        "Resume (Space)"
                    } else {
                        "Pause (Space)"
                    };
                    if ui.button(label).clicked() {
                        self.actions.push(Action::TogglePause);
                    }
                    if ui
                        .add_enabled(self.driver.paused(), egui::Button::new("Step (.)"))
                        .clicked()
                    {
                        self.actions.push(Action::StepOnce);
                    }
                });
                ui.horizontal(|ui| {
                    if ui.button("Reset orbit (R)").clicked() {
                        self.actions.push(Action::ResetSimulation);
                    }
                    if ui.button("Reset camera (C)").clicked() {
                        self.actions.push(Action::ResetCamera);
                    }
                });

                ui.separator();
                ui.label(format!(
                    "Camera distance: {:.1}",
                    self.camera.distance
                ));
                ui.small("F1: Toggle Inspector | LMB: Orbit | RMB: Pan | Wheel: Zoom");
            });
    }
}

/// Everything that exists only once a window and GPU device are up.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, app: &Config, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(app.window.title.clone())
            .with_inner_size(PhysicalSize::new(app.window.width, app.window.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("orrery_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

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

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if app.window.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(
            &device,
            surface_format,
            config.width,
            config.height,
            SceneStyle::from_config(app),
            app.render.msaa_samples,
        );

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    /// Keep the surface valid for the new size.
    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    /// Paint the egui overlay on top of the already rendered frame.
    fn draw_overlay(
        &mut self,
        egui_ctx: &EguiContext,
        view: &wgpu::TextureView,
        state: &mut AppState,
    ) {
        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
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
                        view,
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
    }
}

/// What to do when the surface refuses to hand out a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceRecovery {
    /// Reconfigure with the current size, then try again next frame.
    Reconfigure,
    /// Transient; skip this frame.
    Retry,
    /// Nothing left to render with.
    Exit,
}

impl SurfaceRecovery {
    fn for_error(error: &wgpu::SurfaceError) -> Self {
        match error {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigure,
            wgpu::SurfaceError::OutOfMemory => Self::Exit,
            _ => Self::Retry,
        }
    }
}

/// Events `AppState` must see even when egui claims them. A button release
/// over the overlay would otherwise leave a drag stuck on, and cursor moves
/// keep the last pointer position current.
fn forwarded_when_consumed(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::MouseInput {
            state: ElementState::Released,
            ..
        } | WindowEvent::CursorMoved { .. }
            | WindowEvent::CursorLeft { .. }
            | WindowEvent::Focused(false)
    )
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(config: Config, paused: bool) -> Self {
        Self {
            state: AppState::new(config, paused),
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    /// One tick: input update, advance, render, overlay, present, then ask
    /// winit for the next frame. Returns `false` when the surface cannot
    /// recover and the app should exit.
    fn redraw(&mut self) -> bool {
        let Self {
            state,
            gpu,
            egui_ctx,
        } = self;
        let Some(gpu) = gpu.as_mut() else {
            return true;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                match SurfaceRecovery::for_error(&e) {
                    SurfaceRecovery::Reconfigure => {
                        gpu.surface.configure(&gpu.device, &gpu.config);
                    }
                    SurfaceRecovery::Retry => {
                        tracing::warn!("surface error, retrying next frame: {e}");
                    }
                    SurfaceRecovery::Exit => {
                        tracing::error!("unrecoverable surface error: {e}");
                        return false;
                    }
                }
                // The loop waits on redraw requests, so always queue the next frame.
                gpu.window.request_redraw();
                return true;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        state.before_frame();
        state
            .driver
            .frame(&gpu.renderer.target(&gpu.device, &gpu.queue, &view));
        gpu.draw_overlay(egui_ctx, &view, state);

        output.present();
        gpu.window.request_redraw();
        true
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.state.config, &self.egui_ctx) {
            Ok(gpu) => {
                self.state.camera.set_viewport_height(gpu.config.height);
                gpu.window.request_redraw();
                self.gpu = Some(gpu);
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
            if response.consumed && !forwarded_when_consumed(&event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                    self.state.camera.set_viewport_height(gpu.config.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if key == KeyCode::Escape {
                    event_loop.exit();
                } else {
                    self.state.handle_key(key);
                }
            }
            WindowEvent::MouseInput { button, state, .. } => {
                self.state
                    .handle_mouse_button(button, state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.handle_cursor(position);
            }
            WindowEvent::Focused(false) => {
                self.state.release_pointer();
            }
            WindowEvent::CursorLeft { .. } => {
                self.state.cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.state.handle_wheel(delta);
            }
            WindowEvent::RedrawRequested => {
                if !self.redraw() {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(samples) = cli.msaa {
        config.render.msaa_samples = samples;
        config.validate()?;
    }

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("orrery-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(config, cli.paused);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(Config::default(), false)
    }

    #[test]
    fn drag_with_left_button_orbits_camera() {
        let mut s = state();
        s.handle_cursor(PhysicalPosition::new(100.0, 100.0));
        s.handle_mouse_button(MouseButton::Left, true);
        s.handle_cursor(PhysicalPosition::new(110.0, 100.0));
        s.before_frame();
        assert!(s.camera.yaw < 0.0);
        assert_eq!(s.driver.view().eye, s.camera.eye());
    }

    #[test]
    fn cursor_motion_without_button_is_ignored() {
        let mut s = state();
        s.handle_cursor(PhysicalPosition::new(0.0, 0.0));
        s.handle_cursor(PhysicalPosition::new(50.0, 50.0));
        assert!(s.actions.is_empty());
    }

    #[test]
    fn space_toggles_pause() {
        let mut s = state();
        s.handle_key(KeyCode::Space);
        s.before_frame();
        assert!(s.driver.paused());
    }

    #[test]
    fn f1_toggles_inspector() {
        let mut s = state();
        s.handle_key(KeyCode::F1);
        s.before_frame();
        assert!(!s.show_inspector);
    }

    #[test]
    fn wheel_zooms_in() {
        let mut s = state();
        let before = s.camera.distance;
        s.handle_wheel(MouseScrollDelta::LineDelta(0.0, 1.0));
        s.before_frame();
        assert!(s.camera.distance < before);
    }

    #[test]
    fn release_after_drag_stops_orbiting() {
        let mut s = state();
        s.handle_cursor(PhysicalPosition::new(10.0, 10.0));
        s.handle_mouse_button(MouseButton::Left, true);
        s.handle_cursor(PhysicalPosition::new(40.0, 10.0));
        s.handle_mouse_button(MouseButton::Left, false);
        s.before_frame();
        let yaw = s.camera.yaw;

        s.handle_cursor(PhysicalPosition::new(90.0, 60.0));
        assert!(s.actions.is_empty());
        s.before_frame();
        assert_eq!(s.camera.yaw, yaw);
    }

    #[test]
    fn focus_loss_releases_drag() {
        let mut s = state();
        s.handle_mouse_button(MouseButton::Right, true);
        s.handle_cursor(PhysicalPosition::new(0.0, 0.0));
        s.release_pointer();
        s.handle_cursor(PhysicalPosition::new(25.0, 25.0));
        assert!(s.actions.is_empty());
    }

    #[test]
    fn focus_loss_reaches_state_even_when_consumed() {
        assert!(forwarded_when_consumed(&WindowEvent::Focused(false)));
        assert!(!forwarded_when_consumed(&WindowEvent::Focused(true)));
        assert!(!forwarded_when_consumed(&WindowEvent::RedrawRequested));
    }

    #[test]
    fn transient_surface_errors_retry() {
        assert_eq!(
            SurfaceRecovery::for_error(&wgpu::SurfaceError::Timeout),
            SurfaceRecovery::Retry
        );
        assert_eq!(
            SurfaceRecovery::for_error(&wgpu::SurfaceError::Lost),
            SurfaceRecovery::Reconfigure
        );
        assert_eq!(
            SurfaceRecovery::for_error(&wgpu::SurfaceError::Outdated),
            SurfaceRecovery::Reconfigure
        );
        assert_eq!(
            SurfaceRecovery::for_error(&wgpu::SurfaceError::OutOfMemory),
            SurfaceRecovery::Exit
        );
    }

    #[test]
    fn paused_start_holds_tick() {
        let mut s = AppState::new(Config::default(), true);
        s.before_frame();
        assert!(!s.driver.advance());
        assert_eq!(s.driver.system().tick(), 0);
    }
}
