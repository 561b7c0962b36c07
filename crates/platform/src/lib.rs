//! Platform layer: windowing & event loop.
//!
//! - Creates the window on `resumed` and builds the [`RenderContext`] for it.
//! - Continuous redraws (the cube animates); resize/close/Escape handled.
//! - Setup failures end the loop and are returned from [`run_with_renderer`].

mod fps;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use renderer::RenderContext;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

pub use fps::FpsCounter;
pub use renderer::{SceneKind, SceneSetup};

/// Window and renderer options picked by the binary.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub title: String,
    pub backends: wgpu::Backends,
    pub show_fps: bool,
    pub width: u32,
    pub height: u32,
}

struct App {
    config: RunConfig,
    setup: Option<SceneSetup>,
    window: Option<Arc<Window>>,
    ctx: Option<RenderContext>,
    fps: Option<FpsCounter>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: RunConfig, setup: SceneSetup) -> Self {
        let fps = config
            .show_fps
            .then(|| FpsCounter::new(Duration::from_secs(1)));
        Self {
            config,
            setup: Some(setup),
            window: None,
            ctx: None,
            fps,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let setup = self
            .setup
            .take()
            .context("Scene was already uploaded")?;

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("Failed to create window")?,
        );
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        let ctx = pollster::block_on(RenderContext::new(
            window.clone(),
            self.config.backends,
            setup,
        ))
        .context("Failed to initialise renderer")?;
        let (width, height) = ctx.size();
        log::info!(
            "Renderer ready: {:?} scene, surface {}x{}",
            ctx.scene_kind(),
            width,
            height
        );

        window.request_redraw();
        self.window = Some(window);
        self.ctx = Some(ctx);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(ctx) = self.ctx.as_mut() else {
            return;
        };

        match ctx.render() {
            Ok(()) => {
                if let Some(fps) = self.fps.as_mut().and_then(FpsCounter::tick) {
                    log::info!("{:.1} fps", fps);
                }
            }
            Err(err) if RenderContext::is_surface_lost(&err) => {
                log::warn!("Surface lost/outdated; reconfiguring");
                ctx.recreate_surface();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, anyhow::anyhow!("GPU out of memory"));
            }
            Err(err) => {
                log::warn!("Skipping frame: {err}");
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(ctx) = self.ctx.as_mut() {
                    ctx.resize(new_size.width, new_size.height);
                    let (width, height) = ctx.size();
                    log::debug!("Resized: surface {}x{}", width, height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // GPU resources go before the window they render into.
        self.ctx = None;
        self.window = None;
    }
}

/// Open a window, upload `setup` and draw it until the window is closed.
pub fn run_with_renderer(config: RunConfig, setup: SceneSetup) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, setup);
    event_loop
        .run_app(&mut app)
        .context("Event loop error")?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
