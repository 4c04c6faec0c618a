//! Native window + OpenGL context runtime shared by every exercise.

use std::num::NonZeroU32;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{anyhow, Context as _};
use clap::Parser;
use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::DisplayBuilder;
use log::{error, info, warn};
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

use crate::engine::config::{Cli, ExerciseConfig};
use crate::engine::gpu::{load_gl_functions, Gpu};
use crate::engine::logging::{init_logging, LoggingConfig};
use crate::engine::systems::keyboard_input_system::InputState;

/// Timing and framebuffer size for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Seconds since the exercise started.
    pub time: f32,
    pub delta_time: f32,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// One runnable exercise. `setup` runs once the context is current; then
/// every frame calls `update` followed by `render`.
pub trait Exercise<G: Gpu>: Sized {
    const TITLE: &'static str;
    /// Hide and confine the cursor for mouse look.
    const CAPTURE_CURSOR: bool = false;

    fn setup(gpu: Rc<G>, config: &ExerciseConfig) -> anyhow::Result<Self>;

    fn update(&mut self, _input: &mut InputState, _frame: &Frame) {}

    fn render(&mut self, frame: &Frame);
}

// field order is drop order: GPU objects go before the context
struct Running<E> {
    exercise: E,
    gpu: Rc<glow::Context>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
    start_time: Instant,
    last_frame_time: Instant,
}

struct App<E> {
    config: ExerciseConfig,
    running: Option<Running<E>>,
    input: InputState,
    error: Option<anyhow::Error>,
}

impl<E: Exercise<glow::Context>> App<E> {
    fn start(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<Running<E>> {
        let window_config = &self.config.window;
        let attributes = Window::default_attributes()
            .with_title(E::TITLE)
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height))
            .with_resizable(window_config.resizable);

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, template, |configs| {
                // find_configs fails before an empty list reaches the picker
                configs
                    .max_by_key(|c| c.num_samples())
                    .expect("display offered no framebuffer configs")
            })
            .map_err(|e| anyhow!("could not build a GL display: {e}"))?;
        let window = window.context("display builder did not create a window")?;
        let raw_handle = window.window_handle()?.as_raw();

        let display = gl_config.display();
        let version = self.config.gl;
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(version.major, version.minor))))
            .build(Some(raw_handle));
        let not_current = unsafe { display.create_context(&gl_config, &context_attributes) }
            .with_context(|| format!("OpenGL {}.{} core context unavailable", version.major, version.minor))?;

        let size = window.inner_size();
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_handle,
            NonZeroU32::new(size.width).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(size.height).unwrap_or(NonZeroU32::MIN),
        );
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }
            .context("could not create the window surface")?;
        let context = not_current.make_current(&surface).context("could not make the context current")?;

        let interval = if window_config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            warn!("⚠️  could not set swap interval: {e}");
        }

        if E::CAPTURE_CURSOR {
            let grab = window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
            if let Err(e) = grab {
                warn!("⚠️  cursor grab not supported: {e}");
            }
            window.set_cursor_visible(false);
        }

        let gpu = Rc::new(unsafe {
            glow::Context::from_loader_function_cstr(|s| display.get_proc_address(s) as *const _)
        });
        load_gl_functions(|s| display.get_proc_address(s) as *const _);
        gpu.viewport(size.width, size.height);
        info!("🪟 {} ({}x{}, OpenGL {}.{})", E::TITLE, size.width, size.height, version.major, version.minor);

        let exercise = E::setup(gpu.clone(), &self.config)?;

        let now = Instant::now();
        window.request_redraw();
        Ok(Running {
            exercise,
            gpu,
            surface,
            context,
            window,
            start_time: now,
            last_frame_time: now,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.error = Some(err);
        self.running = None;
        event_loop.exit();
    }
}

impl<E: Exercise<glow::Context>> ApplicationHandler for App<E> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    self.input.receive_key(key_code, event.state, event.repeat);
                }
                if self.input.quit_requested() {
                    event_loop.exit();
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.input.receive_cursor(position.x, position.y);
            }

            WindowEvent::Resized(size) => {
                if let Some(running) = &self.running {
                    if let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
                        running.surface.resize(&running.context, w, h);
                        running.gpu.viewport(size.width, size.height);
                    }
                    running.window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                let Some(running) = &mut self.running else {
                    return;
                };
                let now = Instant::now();
                let size = running.window.inner_size();
                let frame = Frame {
                    time: (now - running.start_time).as_secs_f32(),
                    delta_time: (now - running.last_frame_time).as_secs_f32(),
                    width: size.width,
                    height: size.height,
                };
                running.last_frame_time = now;

                running.exercise.update(&mut self.input, &frame);
                running.exercise.render(&frame);

                if let Err(e) = running.surface.swap_buffers(&running.context) {
                    error!("❌ swap_buffers failed: {e}");
                }
                running.window.request_redraw();
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // GPU objects must be released while the context is still current
        self.running = None;
    }
}

/// Opens the window and drives `E` until the window closes or Esc is hit.
pub fn run<E: Exercise<glow::Context>>(config: ExerciseConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("could not create the event loop")?;
    let mut app = App::<E> {
        config,
        running: None,
        input: InputState::new(),
        error: None,
    };
    event_loop.run_app(&mut app)?;
    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Entry point of every exercise binary: parses the command line, sets up
/// logging and runs `E`. Failures are logged and turned into exit code 1.
pub fn launch<E: Exercise<glow::Context>>() -> ExitCode {
    let cli = Cli::parse();
    let config = ExerciseConfig::resolve(&cli);
    let filter = match &config {
        Ok(config) => config.logging.clone(),
        Err(_) => cli.log.clone(),
    };
    init_logging(LoggingConfig::with_filter(filter));

    match config.and_then(run::<E>) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {}: {e:#}", E::TITLE);
            ExitCode::FAILURE
        }
    }
}
