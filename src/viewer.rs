//! Windowed viewer.
//!
//! [`Viewer`] opens a window, drives a [`SimulationState`] once per frame
//! and draws it through a [`GpuCanvas`]. If no GPU surface can be
//! acquired the viewer keeps simulating and logs a warning instead of
//! drawing.
//!
//! ```ignore
//! Viewer::new()
//!     .with_params(params)
//!     .with_title("Training data")
//!     .run()?;
//! ```

use std::path::Path;
use std::sync::Arc;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::SceneConfig;
use crate::convergence::Choreography;
use crate::demo::DemoCycle;
use crate::error::{RenderError, ViewerError};
use crate::gpu::GpuCanvas;
use crate::input::{Bindings, Command, Input};
use crate::params::SimulationParams;
use crate::render::{render_frame, Canvas};
use crate::simulation::SimulationState;
use crate::time::{Clock, FrameStats, SystemClock};
use crate::viewport::Viewport;

/// Frames between window title refreshes.
const TITLE_REFRESH_FRAMES: u64 = 30;

/// A viewer builder.
///
/// Use method chaining to configure, then call `.run()` to start.
pub struct Viewer {
    params: SimulationParams,
    title: String,
    size: (f64, f64),
    seed: Option<u64>,
    demo: Option<DemoCycle>,
    bindings: Bindings,
}

impl Viewer {
    pub fn new() -> Self {
        Self {
            params: SimulationParams::default(),
            title: "biasfield".to_string(),
            size: (1280.0, 720.0),
            seed: None,
            demo: None,
            bindings: Bindings::default(),
        }
    }

    /// A viewer showing the scene stored at `path`.
    pub fn from_scene_file(path: impl AsRef<Path>) -> Result<Self, ViewerError> {
        let params = SceneConfig::load(path)?.to_params()?;
        Ok(Self::new().with_params(params))
    }

    pub fn with_params(mut self, params: SimulationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = (width, height);
        self
    }

    /// Fix the random seed for a reproducible formation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run a demo cycle instead of a fixed formation.
    pub fn with_demo(mut self, demo: DemoCycle) -> Self {
        self.demo = Some(demo);
        self
    }

    pub fn with_bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), ViewerError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    title: String,
    size: (f64, f64),
    window: Option<Arc<Window>>,
    canvas: Option<GpuCanvas>,
    state: SimulationState,
    demo: Option<DemoCycle>,
    choreography: Choreography,
    input: Input,
    clock: SystemClock,
    stats: FrameStats,
    error: Option<ViewerError>,
}

impl App {
    fn new(viewer: Viewer) -> Self {
        let viewport = Viewport::new(viewer.size.0 as f32, viewer.size.1 as f32, 1.0);
        let state = match viewer.seed {
            Some(seed) => SimulationState::with_seed(viewer.params, viewport, seed),
            None => SimulationState::new(viewer.params, viewport),
        };

        Self {
            title: viewer.title,
            size: viewer.size,
            window: None,
            canvas: None,
            state,
            demo: viewer.demo,
            choreography: Choreography::default(),
            input: Input::new(viewer.bindings),
            clock: SystemClock::new(),
            stats: FrameStats::new(),
            error: None,
        }
    }

    /// Match the simulation and surface to the window's current size.
    fn sync_size(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let physical = window.inner_size();
        let scale = window.scale_factor() as f32;
        self.state.resize(
            physical.width as f32 / scale,
            physical.height as f32 / scale,
            scale,
        );

        if let Some(canvas) = &mut self.canvas {
            canvas.resize(physical.width, physical.height);
            let (buffer_w, buffer_h) = self.state.viewport().buffer_size();
            let origin = Vec2::new(
                buffer_w as f32 - physical.width as f32,
                buffer_h as f32 - physical.height as f32,
            ) / 2.0;
            canvas.set_origin(origin.max(Vec2::ZERO));
        }
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop) {
        let now = self.clock.now();
        for command in self.input.commands() {
            match command {
                Command::ToggleTheme => {
                    let dark = !self.state.dark_mode();
                    let params = self.state.params().clone().with_dark_mode(dark);
                    self.state.set_params(params, now);
                    log::debug!("Theme: {}", if dark { "dark" } else { "light" });
                }
                Command::Pulse => {
                    self.choreography = Choreography::pulse();
                }
                Command::NextEntry => {
                    if let Some(demo) = &mut self.demo {
                        demo.advance(now, &mut self.state);
                    }
                }
                Command::Quit => event_loop.exit(),
            }
        }
        self.input.begin_frame();
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        self.apply_commands(event_loop);

        let now = self.clock.now();
        self.stats.tick(now);

        if let Some(demo) = &mut self.demo {
            demo.update(now, &mut self.state);
        }
        self.choreography.update(now, self.state.convergence_mut());
        self.state.step(now);

        if let Some(canvas) = &mut self.canvas {
            render_frame(&self.state, canvas);
            match canvas.present() {
                Ok(()) => {}
                Err(RenderError::Surface(wgpu::SurfaceError::Lost))
                | Err(RenderError::Surface(wgpu::SurfaceError::Outdated)) => canvas.reconfigure(),
                Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                    log::error!("GPU out of memory, closing viewer");
                    event_loop.exit();
                }
                Err(e) => log::warn!("Render error: {}", e),
            }
        }

        if self.stats.frame() % TITLE_REFRESH_FRAMES == 0 {
            self.refresh_title(now);
        }
    }

    fn refresh_title(&self, now: std::time::Duration) {
        let Some(window) = &self.window else {
            return;
        };
        let mut title = self.title.clone();
        if let Some(entry) = self.demo.as_ref().and_then(|d| d.current()) {
            let progress = self.demo.as_ref().map_or(0.0, |d| d.progress(now));
            title = format!(
                "{} - {} {} [{:>3.0}%]",
                title,
                entry.provider_name,
                entry.model_name,
                progress * 100.0
            );
        }
        window.set_title(&format!("{} ({:.0} fps)", title, self.stats.fps()));
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(self.size.0, self.size.1));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        match pollster::block_on(GpuCanvas::new(window)) {
            Ok(canvas) => self.canvas = Some(canvas),
            Err(e) => log::warn!("Rendering unavailable, running without drawing: {}", e),
        }

        self.sync_size();
        let now = self.clock.now();
        if let Some(demo) = &mut self.demo {
            demo.start(now, &mut self.state);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                self.sync_size();
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(demo) = &mut self.demo {
            demo.stop();
        }
        self.choreography.cancel();
        self.canvas = None;
        log::info!("Viewer closed after {} frames", self.stats.frame());
    }
}
