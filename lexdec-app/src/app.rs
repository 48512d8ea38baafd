use anyhow::{Context, Result};
use lexdec_core::Stimulus;
use lexdec_experiment::RunnerConfig;
use lexdec_render::{FontVec, SkiaRenderer};
use lexdec_session::{SessionStore, Storage};
use lexdec_timing::{HighPrecisionTimer, Timer};
use pixels::{Pixels, SurfaceTexture};
use std::sync::Arc;
use tracing::{debug, error, info, trace};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Fullscreen, Window, WindowId},
};

use crate::session::TaskSession;

pub struct App<S: Storage> {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    renderer: Option<SkiaRenderer>,
    font: Option<FontVec>,

    session: TaskSession<HighPrecisionTimer, S>,
    timer: HighPrecisionTimer,
    cursor: Option<(f32, f32)>,

    should_exit: bool,
}

impl<S: Storage> App<S> {
    pub fn new(
        stimuli: Vec<Stimulus>,
        config: RunnerConfig,
        font: FontVec,
        store: SessionStore<S>,
    ) -> Self {
        let timer = HighPrecisionTimer::new();
        Self {
            window: None,
            pixels: None,
            renderer: None,
            font: Some(font),
            session: TaskSession::new(stimuli, config, timer.clone(), store),
            timer,
            cursor: None,
            should_exit: false,
        }
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        let keys = self.session.config().keys();
        info!(
            word_key = %keys.label(true),
            nonword_key = %keys.label(false),
            "press SPACE to start or ESC to exit"
        );
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());

        let window_attributes = Window::default_attributes()
            .with_title("lexdec")
            .with_fullscreen(Some(Fullscreen::Borderless(monitor)))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let physical_size = window.inner_size();
        info!(
            width = physical_size.width,
            height = physical_size.height,
            scale_factor = window.scale_factor(),
            "window created"
        );

        let surface_texture =
            SurfaceTexture::new(physical_size.width, physical_size.height, window.clone());
        self.pixels = Some(Pixels::new(
            physical_size.width,
            physical_size.height,
            surface_texture,
        )?);

        let font = self.font.take().context("renderer already created")?;
        self.renderer = Some(SkiaRenderer::new(
            physical_size.width,
            physical_size.height,
            font,
            self.session.config().keys(),
        )?);

        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let (Some(pixels), Some(renderer)) = (self.pixels.as_mut(), self.renderer.as_mut()) else {
            return Ok(());
        };

        let hover = self
            .cursor
            .and_then(|(x, y)| renderer.layout().hit_test(x, y));
        let view = self.session.view(hover);

        let stats = renderer.render_frame(&view, pixels.frame_mut(), &mut self.timer)?;
        pixels.render()?;

        trace!(
            clear_ms = stats.clear.as_secs_f64() * 1e3,
            draw_ms = stats.draw.as_secs_f64() * 1e3,
            copy_ms = stats.copy.as_secs_f64() * 1e3,
            total_ms = stats.total.as_secs_f64() * 1e3,
            "frame"
        );
        Ok(())
    }

    fn handle_key(&mut self, event: &KeyEvent, event_loop: &ActiveEventLoop) {
        // Holding a key must not answer twice.
        if event.repeat {
            trace!("key repeat ignored");
            return;
        }
        match &event.logical_key {
            Key::Named(NamedKey::Escape) => self.cleanup_and_exit(event_loop),
            Key::Named(NamedKey::Space) => self.session.press_space(),
            Key::Character(s) => {
                if let Some(ch) = s.chars().next() {
                    self.session.press_char(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_click(&mut self) {
        let (Some((x, y)), Some(renderer)) = (self.cursor, self.renderer.as_ref()) else {
            return;
        };
        if let Some(answer) = renderer.layout().hit_test(x, y) {
            self.session.submit(answer);
        }
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                error!(error = %e, "failed to resize surface");
            }
            if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                error!(error = %e, "failed to resize buffer");
            }
        }
        if let Some(renderer) = &mut self.renderer {
            if let Err(e) = renderer.resize(new_size.width, new_size.height) {
                error!(error = %e, "failed to resize renderer");
            }
        }
        debug!(width = new_size.width, height = new_size.height, "display resized");
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        let stats = self.timer.frame_stats();
        debug!(
            frames = stats.samples,
            avg_frame_ms = stats.average_frame_time_ns / 1e6,
            jitter_ms = stats.jitter_ns / 1e6,
            "frame timing"
        );
        info!("exiting");
        self.should_exit = true;
        event_loop.exit();
    }
}

impl<S: Storage> ApplicationHandler for App<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                error!(error = %e, "failed to create window and surface");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.cleanup_and_exit(event_loop),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    error!(error = %e, "render failed");
                    self.cleanup_and_exit(event_loop);
                    return;
                }
                self.session.update();
                if let Some(win) = &self.window {
                    win.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
                self.handle_key(&event, event_loop);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some((position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.handle_click(),
            WindowEvent::Resized(sz) => self.handle_resize(sz),
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.handle_resize(size);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
        }
    }
}
