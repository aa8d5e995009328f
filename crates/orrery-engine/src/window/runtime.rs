use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use glam::Mat4;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{CursorGrabMode, Fullscreen, Window, WindowId};

use crate::backend::{Backend, DisplaySize};
use crate::device::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputDevice, Key, Keyboard};
use crate::paint::Color;
use crate::render::{Camera3D, DrawList, LineRenderer, LineVertex, RenderCtx, RenderTarget, lines};
use crate::time::FramePacer;

/// Settings for the winit/wgpu backend.
#[derive(Debug, Clone)]
pub struct WinitConfig {
    pub gpu: GpuInit,
    pub grid_color: Color,
    pub grid_axis_color: Color,

    /// How long startup requests (monitor query, window creation) may wait on
    /// the event loop.
    pub startup_timeout: Duration,
}

impl Default for WinitConfig {
    fn default() -> Self {
        Self {
            gpu: GpuInit::default(),
            grid_color: Color::GRAY,
            grid_axis_color: Color::LIGHT_GRAY,
            startup_timeout: Duration::from_secs(5),
        }
    }
}

/// Window requests made by the engine.
///
/// `ActiveEventLoop` only exists inside the handler callbacks, so requests are
/// buffered and applied by the handler on the next pump.
enum Request {
    QueryMonitor,
    CreateWindow { size: DisplaySize, title: String },
}

/// Event-loop side of the backend.
#[derive(Default)]
struct PumpState {
    requests: Vec<Request>,

    window: Option<Arc<Window>>,
    monitor_size: Option<DisplaySize>,
    monitor_queried: bool,

    keyboard: Keyboard,
    close_requested: bool,
    resized: Option<PhysicalSize<u32>>,

    failure: Option<anyhow::Error>,
}

impl PumpState {
    fn apply_requests(&mut self, event_loop: &ActiveEventLoop) {
        for request in std::mem::take(&mut self.requests) {
            match request {
                Request::QueryMonitor => {
                    let monitor = event_loop
                        .primary_monitor()
                        .or_else(|| event_loop.available_monitors().next());
                    self.monitor_size = monitor.map(|m| {
                        let size = m.size();
                        DisplaySize::new(size.width, size.height)
                    });
                    self.monitor_queried = true;
                }
                Request::CreateWindow { size, title } => {
                    let attrs = Window::default_attributes()
                        .with_title(title)
                        .with_inner_size(PhysicalSize::new(size.width, size.height));

                    match event_loop.create_window(attrs) {
                        Ok(window) => self.window = Some(Arc::new(window)),
                        Err(e) => {
                            self.failure = Some(anyhow!(e).context("failed to create window"))
                        }
                    }
                }
            }
        }
    }

    fn is_current(&self, id: WindowId) -> bool {
        self.window.as_ref().is_some_and(|w| w.id() == id)
    }
}

impl ApplicationHandler for PumpState {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, _cause: StartCause) {
        self.apply_requests(event_loop);
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.apply_requests(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if !self.is_current(window_id) {
            return;
        }

        let modifiers = self.keyboard.state().modifiers;
        if let Some(ev) = translate_window_event(modifiers, &event) {
            self.keyboard.apply_event(ev);
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window close requested");
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => self.resized = Some(size),
            WindowEvent::ScaleFactorChanged { .. } => {
                self.resized = self.window.as_ref().map(|w| w.inner_size());
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.apply_requests(event_loop);
    }
}

/// `Backend` on a native window with a wgpu surface.
///
/// The event loop is pumped rather than run, so the engine keeps its own loop:
/// every `end_frame` presents, paces, then drains pending window events.
pub struct WinitBackend {
    config: WinitConfig,
    event_loop: EventLoop<()>,
    pump: PumpState,

    gpu: Option<Gpu>,
    renderer: LineRenderer,
    pacer: FramePacer,

    frame: Option<GpuFrame>,
    clear: Color,
    view_proj: Mat4,
    vertices: Vec<LineVertex>,
}

impl WinitBackend {
    pub fn new(config: WinitConfig) -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;

        Ok(Self {
            config,
            event_loop,
            pump: PumpState::default(),
            gpu: None,
            renderer: LineRenderer::new(),
            pacer: FramePacer::new(),
            frame: None,
            clear: Color::BLACK,
            view_proj: Mat4::IDENTITY,
            vertices: Vec::new(),
        })
    }

    pub fn window(&self) -> Option<&Window> {
        self.pump.window.as_deref()
    }

    fn pump(&mut self, timeout: Option<Duration>) -> Result<()> {
        if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(timeout, &mut self.pump) {
            log::info!("event loop exited with code {code}");
            self.pump.close_requested = true;
        }

        match self.pump.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Pumps until `done` holds or the startup timeout runs out.
    fn pump_until(&mut self, what: &str, done: impl Fn(&PumpState) -> bool) -> Result<()> {
        let deadline = Instant::now() + self.config.startup_timeout;
        while !done(&self.pump) {
            if self.pump.close_requested {
                bail!("event loop closed while waiting for {what}");
            }
            if Instant::now() >= deadline {
                bail!("timed out waiting for {what}");
            }
            self.pump(Some(Duration::from_millis(10)))?;
        }
        Ok(())
    }

    fn apply_resize(&mut self) {
        if let (Some(size), Some(gpu)) = (self.pump.resized.take(), self.gpu.as_mut()) {
            log::debug!("surface resized to {}x{}", size.width, size.height);
            gpu.resize(size);
        }
    }

    fn present(&mut self, mut frame: GpuFrame) {
        let Some(gpu) = self.gpu.as_ref() else {
            return;
        };

        let ctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format());
        let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
        self.renderer
            .render(&ctx, &mut target, self.clear, self.view_proj, &self.vertices);

        if let Some(window) = self.pump.window.as_ref() {
            window.pre_present_notify();
        }
        gpu.submit(frame);
    }
}

impl InputDevice for WinitBackend {
    fn is_key_pressed(&self, key: Key) -> bool {
        self.pump.keyboard.is_key_pressed(key)
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.pump.keyboard.is_key_down(key)
    }

    fn is_key_buffered(&self) -> bool {
        self.pump.keyboard.is_key_buffered()
    }

    fn read_key(&mut self) -> Option<Key> {
        self.pump.keyboard.read_key()
    }

    fn drain_buffered(&mut self, limit: usize) -> usize {
        self.pump.keyboard.drain_buffered(limit)
    }
}

impl Backend for WinitBackend {
    fn query_display_size(&mut self) -> Result<DisplaySize> {
        self.pump.requests.push(Request::QueryMonitor);
        self.pump_until("monitor query", |p| p.monitor_queried)?;
        self.pump
            .monitor_size
            .filter(|size| !size.is_empty())
            .context("platform reported no monitor")
    }

    fn create_window(&mut self, size: DisplaySize, title: &str) -> Result<()> {
        if self.pump.window.is_some() {
            bail!("window already created");
        }

        self.pump.requests.push(Request::CreateWindow {
            size,
            title: title.to_string(),
        });
        self.pump_until("window creation", |p| p.window.is_some())?;

        let window = self.pump.window.clone().context("window vanished after creation")?;
        let gpu = pollster::block_on(Gpu::new(window, self.config.gpu.clone()))
            .context("GPU initialization failed for window")?;
        self.gpu = Some(gpu);

        log::debug!("window \"{title}\" created at {}x{}", size.width, size.height);
        Ok(())
    }

    fn set_cursor_hidden(&mut self, hidden: bool) {
        let Some(window) = self.pump.window.as_ref() else {
            return;
        };

        window.set_cursor_visible(!hidden);
        let mode = if hidden { CursorGrabMode::Confined } else { CursorGrabMode::None };
        let grabbed = window.set_cursor_grab(mode).or_else(|_| {
            if hidden {
                window.set_cursor_grab(CursorGrabMode::Locked)
            } else {
                Ok(())
            }
        });
        if let Err(e) = grabbed {
            log::warn!("cursor grab unsupported: {e}");
        }
    }

    fn maximize_window(&mut self) {
        if let Some(window) = self.pump.window.as_ref() {
            window.set_maximized(true);
        }
    }

    fn set_target_frame_rate(&mut self, fps: u32) {
        log::debug!("target frame rate: {fps}");
        self.pacer.set_target_fps(fps);
    }

    fn should_close(&self) -> bool {
        self.pump.close_requested
    }

    fn begin_frame(&mut self) -> Result<()> {
        if self.frame.is_some() {
            bail!("begin_frame called twice without end_frame");
        }
        self.apply_resize();
        self.vertices.clear();

        let gpu = self.gpu.as_mut().context("no window to draw into")?;
        match gpu.begin_frame() {
            Ok(frame) => self.frame = Some(frame),
            Err(e) => match gpu.handle_surface_error(e) {
                SurfaceErrorAction::Fatal => bail!("surface lost beyond recovery"),
                action => log::warn!("skipping frame ({action:?})"),
            },
        }
        Ok(())
    }

    fn begin_3d(&mut self, camera: &Camera3D) {
        let aspect = self.gpu.as_ref().map_or(1.0, Gpu::aspect);
        self.view_proj = camera.view_proj(aspect);
    }

    fn clear_background(&mut self, color: Color) {
        self.clear = color;
    }

    fn draw_grid(&mut self, cells: u32, spacing: f32) {
        lines::grid(
            &mut self.vertices,
            cells,
            spacing,
            self.config.grid_color,
            self.config.grid_axis_color,
        );
    }

    fn draw(&mut self, list: &DrawList) {
        lines::tessellate_list(&mut self.vertices, list);
    }

    fn end_3d(&mut self) {
        // Geometry is flushed in a single pass by `end_frame`.
        log::trace!("3d batch: {} vertices", self.vertices.len());
    }

    fn end_frame(&mut self) -> Result<()> {
        if let Some(frame) = self.frame.take() {
            self.present(frame);
        }
        self.pacer.wait();

        self.pump.keyboard.end_frame();
        self.pump(Some(Duration::ZERO))
    }

    fn toggle_fullscreen(&mut self) {
        let Some(window) = self.pump.window.as_ref() else {
            return;
        };

        if window.fullscreen().is_some() {
            window.set_fullscreen(None);
        } else {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }
    }

    fn close_window(&mut self) {
        // The surface holds the window; drop it first.
        self.frame = None;
        self.gpu = None;
        if self.pump.window.take().is_some() {
            log::debug!("window closed");
        }
    }
}
