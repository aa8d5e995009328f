use anyhow::Result;

use crate::backend::{Backend, DisplaySize};
use crate::input::{InputDevice, Key};
use crate::render::{Camera3D, DrawList};
use crate::scene::{Scene, SceneRegistry};
use crate::time::{Clock, FrameTime, FrameTimer, Stopwatch};

use super::close::CloseSignal;
use super::config::EngineConfig;
use super::ctx::{DrawCtx, UpdateCtx};
use super::error::{EngineError, ScenePhase};

/// Lifecycle of an `Engine`. Transitions only move forward.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EngineState {
    Uninitialized,
    Running,
    Closing,
    Closed,
}

/// Outcome of a single `Engine::frame` call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    /// The frame ran; call `frame` again.
    Continue,
    /// A close condition was observed before the frame ran; call `end`.
    Closing,
}

/// Loop controller.
///
/// Owns the clock, the scene registry, the close signal and the backend, and
/// drives them through `start`, repeated `frame` calls and `end`. `run` does all
/// three.
pub struct Engine<B: Backend, C: Clock = Stopwatch> {
    config: EngineConfig,
    backend: B,
    clock: C,
    timer: FrameTimer,
    scenes: SceneRegistry,
    close: CloseSignal,
    state: EngineState,

    /// Registry indices whose `start` has run.
    started: Vec<usize>,

    draw_list: DrawList,
    camera: Camera3D,
    last_frame: Option<FrameTime>,
}

impl<B: Backend> Engine<B, Stopwatch> {
    pub fn new(backend: B, config: EngineConfig) -> Self {
        Self::with_clock(backend, Stopwatch::new(), config)
    }
}

impl<B: Backend, C: Clock> Engine<B, C> {
    pub fn with_clock(backend: B, clock: C, config: EngineConfig) -> Self {
        let scenes = match config.max_scenes {
            Some(capacity) => SceneRegistry::bounded(capacity),
            None => SceneRegistry::new(),
        };
        let timer = match config.max_delta {
            Some(max) => FrameTimer::with_max_delta(max),
            None => FrameTimer::new(),
        };

        Self {
            camera: config.fallback_camera,
            config,
            backend,
            clock,
            timer,
            scenes,
            close: CloseSignal::new(),
            state: EngineState::Uninitialized,
            started: Vec::new(),
            draw_list: DrawList::new(),
            last_frame: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Handle for collaborators that need to stop the loop.
    pub fn close_signal(&self) -> CloseSignal {
        self.close.clone()
    }

    /// Observed at the top of the next frame.
    pub fn request_close(&self) {
        self.close.request();
    }

    /// Non-blocking, destructive read of one buffered key.
    pub fn poll_key(&mut self) -> Option<Key> {
        self.backend.read_key()
    }

    pub fn scenes(&self) -> &SceneRegistry {
        &self.scenes
    }

    /// Registers an additional scene. The current scene is not changed.
    pub fn add_scene(&mut self, scene: Box<dyn Scene>) -> Result<usize, EngineError> {
        Ok(self.scenes.add(scene)?)
    }

    pub fn current_scene(&self) -> Result<&dyn Scene, EngineError> {
        Ok(self.scenes.current()?)
    }

    /// Makes the registered scene at `index` current from the next frame on.
    ///
    /// An out-of-range index leaves the current scene unchanged. While running,
    /// a scene that becomes current for the first time is started here; a
    /// failing `start` stops the engine like any scene error.
    pub fn set_current_scene(&mut self, index: usize) -> Result<(), EngineError> {
        self.scenes.set_current_index(index)?;
        log::debug!("current scene: {index}");

        if self.state == EngineState::Running && !self.started.contains(&index) {
            self.start_current()?;
        }
        Ok(())
    }

    /// Camera used by the most recent draw pass.
    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    pub fn last_frame(&self) -> Option<FrameTime> {
        self.last_frame
    }

    /// Starts the engine, drives frames until a close condition is observed and
    /// shuts down.
    pub fn run<F>(&mut self, build: F) -> Result<(), EngineError>
    where
        F: FnOnce(DisplaySize) -> Result<Box<dyn Scene>>,
    {
        self.start(build)?;
        while self.frame()? == FrameStatus::Continue {}
        self.end()
    }

    /// Opens the window, builds and registers the initial scene and starts it.
    ///
    /// `build` receives the window size. A backend or build failure leaves the
    /// engine `Uninitialized`.
    pub fn start<F>(&mut self, build: F) -> Result<(), EngineError>
    where
        F: FnOnce(DisplaySize) -> Result<Box<dyn Scene>>,
    {
        if self.state != EngineState::Uninitialized {
            return Err(EngineError::AlreadyStarted);
        }

        self.clock.start();

        let size = match self.backend.query_display_size() {
            Ok(size) if !size.is_empty() => size,
            Ok(_) | Err(_) => {
                log::warn!(
                    "display size unavailable; using {}x{}",
                    self.config.fallback_size.width,
                    self.config.fallback_size.height
                );
                self.config.fallback_size
            }
        };

        self.backend
            .create_window(size, &self.config.title)
            .map_err(EngineError::Startup)?;

        self.backend.set_cursor_hidden(self.config.hide_cursor);
        if self.config.maximize {
            self.backend.maximize_window();
        }
        self.backend.set_target_frame_rate(self.config.target_fps);

        let scene = match build(size) {
            Ok(scene) => scene,
            Err(err) => {
                self.backend.close_window();
                return Err(EngineError::Startup(err.context("failed to build initial scene")));
            }
        };

        let registered = self
            .scenes
            .add(scene)
            .and_then(|index| self.scenes.set_current_index(index).map(|()| index));
        let index = match registered {
            Ok(index) => index,
            Err(err) => {
                self.backend.close_window();
                return Err(err.into());
            }
        };

        self.state = EngineState::Running;
        log::info!(
            "engine running: \"{}\" at {}x{}, scene {index}",
            self.config.title,
            size.width,
            size.height
        );

        self.start_current()
    }

    /// Runs one frame unless a close condition is pending.
    ///
    /// The close signal and the backend's native close request are checked once,
    /// before any work; a request made during this frame is seen by the next call.
    pub fn frame(&mut self) -> Result<FrameStatus, EngineError> {
        if self.state != EngineState::Running {
            return Err(EngineError::NotRunning(self.state));
        }

        if self.close.is_requested() || self.backend.should_close() {
            log::info!("close observed; shutting down");
            self.state = EngineState::Closing;
            return Ok(FrameStatus::Closing);
        }

        if let Err(err) = self.update().and_then(|()| self.draw()) {
            return Err(self.fail(err));
        }
        Ok(FrameStatus::Continue)
    }

    /// Ends the current scene and releases the backend. Terminal.
    ///
    /// The backend is released even when the scene's `end` fails.
    pub fn end(&mut self) -> Result<(), EngineError> {
        match self.state {
            EngineState::Running | EngineState::Closing => {}
            state => return Err(EngineError::NotRunning(state)),
        }
        self.state = EngineState::Closing;

        let ended = self
            .scenes
            .current_mut()
            .map_err(EngineError::from)
            .and_then(|scene| scene.end().map_err(EngineError::scene(ScenePhase::End)));

        self.backend.close_window();
        self.state = EngineState::Closed;

        match &ended {
            Ok(()) => log::info!("engine closed"),
            Err(err) => log::error!("engine closed with error: {}", report(err)),
        }
        ended
    }

    fn start_current(&mut self) -> Result<(), EngineError> {
        let started = self
            .scenes
            .current_mut()
            .map_err(EngineError::from)
            .and_then(|scene| scene.start().map_err(EngineError::scene(ScenePhase::Start)));
        if let Err(err) = started {
            return Err(self.fail(err));
        }
        self.started.extend(self.scenes.current_index());
        Ok(())
    }

    fn update(&mut self) -> Result<(), EngineError> {
        let time = self.timer.tick(self.clock.elapsed_seconds());
        self.last_frame = Some(time);

        if self.backend.is_key_pressed(self.config.fullscreen_key) {
            log::debug!("toggling fullscreen");
            self.backend.toggle_fullscreen();
        }

        let scene = self.scenes.current_mut()?;
        let mut ctx = UpdateCtx {
            time,
            input: &mut self.backend,
            close: &self.close,
        };
        scene
            .update(&mut ctx)
            .map_err(EngineError::scene(ScenePhase::Update))?;
        scene
            .update_ui(&mut ctx)
            .map_err(EngineError::scene(ScenePhase::UpdateUi))?;

        let drained = self.backend.drain_buffered(self.config.input_drain_limit);
        if drained > 0 {
            log::trace!("discarded {drained} unread keys");
        }
        Ok(())
    }

    fn draw(&mut self) -> Result<(), EngineError> {
        self.backend.begin_frame().map_err(EngineError::Backend)?;

        let scene = self.scenes.current()?;
        self.camera = scene.camera().unwrap_or(self.config.fallback_camera);

        self.backend.begin_3d(&self.camera);
        self.backend.clear_background(self.config.clear_color);
        self.backend
            .draw_grid(self.config.grid.cells, self.config.grid.spacing);

        self.draw_list.clear();
        let mut ctx = DrawCtx::new(&self.camera, &mut self.draw_list);
        scene
            .draw(&mut ctx)
            .map_err(EngineError::scene(ScenePhase::Draw))?;
        scene
            .draw_ui(&mut ctx)
            .map_err(EngineError::scene(ScenePhase::DrawUi))?;

        self.backend.draw(&self.draw_list);
        self.backend.end_3d();
        self.backend.end_frame().map_err(EngineError::Backend)
    }

    /// Stops the loop after an error. `end` is not called on the scene.
    fn fail(&mut self, err: EngineError) -> EngineError {
        log::error!("engine stopped: {}", report(&err));
        self.backend.close_window();
        self.state = EngineState::Closed;
        err
    }
}

/// Error message followed by its source chain, as anyhow's `{:#}` prints it.
fn report(err: &EngineError) -> String {
    anyhow::Chain::new(err)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::anyhow;
    use glam::Vec3;

    use super::*;
    use crate::backend::{BackendCall, HeadlessBackend};
    use crate::core::RegistryError;
    use crate::paint::Color;
    use crate::time::ManualClock;

    #[derive(Debug, Clone, PartialEq)]
    enum Ev {
        Start,
        Update(f32),
        UpdateUi,
        Draw,
        DrawUi,
        End,
        Polled(Option<Key>),
    }

    type Log = Rc<RefCell<Vec<Ev>>>;

    #[derive(Default)]
    struct Recorder {
        log: Log,
        updates: usize,
        close_on_update: Option<usize>,
        fail_on: Option<ScenePhase>,
        poll: bool,
        close_on_draw: Option<CloseSignal>,
        camera: Option<Camera3D>,
    }

    impl Recorder {
        fn new(log: &Log) -> Self {
            Self {
                log: log.clone(),
                ..Self::default()
            }
        }

        fn check(&self, phase: ScenePhase) -> Result<()> {
            if self.fail_on == Some(phase) {
                return Err(anyhow!("{phase} exploded"));
            }
            Ok(())
        }
    }

    impl Scene for Recorder {
        fn start(&mut self) -> Result<()> {
            self.log.borrow_mut().push(Ev::Start);
            self.check(ScenePhase::Start)
        }

        fn update(&mut self, ctx: &mut UpdateCtx<'_>) -> Result<()> {
            self.updates += 1;
            self.log.borrow_mut().push(Ev::Update(ctx.dt()));
            if self.poll {
                let key = ctx.poll_key();
                self.log.borrow_mut().push(Ev::Polled(key));
            }
            if self.close_on_update == Some(self.updates) {
                ctx.request_close();
            }
            self.check(ScenePhase::Update)
        }

        fn update_ui(&mut self, _ctx: &mut UpdateCtx<'_>) -> Result<()> {
            self.log.borrow_mut().push(Ev::UpdateUi);
            self.check(ScenePhase::UpdateUi)
        }

        fn draw(&self, ctx: &mut DrawCtx<'_>) -> Result<()> {
            self.log.borrow_mut().push(Ev::Draw);
            ctx.cube(Vec3::ZERO, Vec3::ONE, Color::RED);
            if let Some(signal) = &self.close_on_draw {
                signal.request();
            }
            self.check(ScenePhase::Draw)
        }

        fn draw_ui(&self, _ctx: &mut DrawCtx<'_>) -> Result<()> {
            self.log.borrow_mut().push(Ev::DrawUi);
            self.check(ScenePhase::DrawUi)
        }

        fn end(&mut self) -> Result<()> {
            self.log.borrow_mut().push(Ev::End);
            self.check(ScenePhase::End)
        }

        fn camera(&self) -> Option<Camera3D> {
            self.camera
        }
    }

    fn engine(backend: HeadlessBackend, clock: &ManualClock) -> Engine<HeadlessBackend, ManualClock> {
        Engine::with_clock(backend, clock.clone(), EngineConfig::default())
    }

    fn boxed(scene: Recorder) -> impl FnOnce(DisplaySize) -> Result<Box<dyn Scene>> {
        move |_| Ok(Box::new(scene) as Box<dyn Scene>)
    }

    fn count(log: &Log, ev: &Ev) -> usize {
        log.borrow().iter().filter(|e| *e == ev).count()
    }

    fn frame_calls(backend: &HeadlessBackend) -> Vec<BackendCall> {
        let calls = backend.calls();
        let first = calls
            .iter()
            .position(|c| *c == BackendCall::BeginFrame)
            .unwrap_or(calls.len());
        calls[first..].to_vec()
    }

    #[test]
    fn delta_time_tracks_clock_readings() {
        let log = Log::default();
        let clock = ManualClock::new();
        let mut engine = engine(HeadlessBackend::new(), &clock);
        engine.start(boxed(Recorder::new(&log))).unwrap();

        for reading in [0.5, 0.75, 0.75, 2.0] {
            clock.set(reading);
            assert_eq!(engine.frame().unwrap(), FrameStatus::Continue);
        }

        let dts: Vec<f32> = log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Ev::Update(dt) => Some(*dt),
                _ => None,
            })
            .collect();
        assert_eq!(dts, [0.5, 0.25, 0.0, 1.25]);
        assert!(dts.iter().all(|dt| *dt >= 0.0));
        assert_eq!(engine.last_frame().map(|t| t.frame_index), Some(3));
    }

    #[test]
    fn max_delta_clamps_long_frames() {
        let clock = ManualClock::new();
        let config = EngineConfig {
            max_delta: Some(0.25),
            ..EngineConfig::default()
        };
        let mut engine = Engine::with_clock(HeadlessBackend::new(), clock.clone(), config);
        engine.start(boxed(Recorder::new(&Log::default()))).unwrap();

        clock.set(3.0);
        engine.frame().unwrap();
        assert_eq!(engine.last_frame().map(|t| t.dt), Some(0.25));
    }

    #[test]
    fn start_follows_startup_sequence() {
        let log = Log::default();
        let mut engine = engine(HeadlessBackend::new(), &ManualClock::new());
        engine.start(boxed(Recorder::new(&log))).unwrap();

        assert_eq!(engine.state(), EngineState::Running);
        assert_eq!(
            engine.backend().calls(),
            [
                BackendCall::QueryDisplaySize,
                BackendCall::CreateWindow {
                    size: DisplaySize::new(1920, 1080),
                    title: "orrery".to_string(),
                },
                BackendCall::SetCursorHidden(true),
                BackendCall::MaximizeWindow,
                BackendCall::SetTargetFrameRate(60),
            ]
        );
        assert_eq!(*log.borrow(), [Ev::Start]);
    }

    #[test]
    fn missing_display_uses_fallback_size() {
        let mut engine = engine(HeadlessBackend::new().without_display(), &ManualClock::new());
        let mut seen = None;
        engine
            .start(|size| {
                seen = Some(size);
                Ok(Box::new(Recorder::default()) as Box<dyn Scene>)
            })
            .unwrap();
        assert_eq!(seen, Some(DisplaySize::new(1280, 720)));
    }

    #[test]
    fn end_to_end_single_scene() {
        let log = Log::default();
        let mut scene = Recorder::new(&log);
        scene.close_on_update = Some(1);

        let mut engine = engine(HeadlessBackend::new(), &ManualClock::new());
        engine.start(boxed(scene)).unwrap();
        assert_eq!(engine.scenes().len(), 1);
        assert_eq!(engine.scenes().current_index(), Some(0));

        assert_eq!(engine.frame().unwrap(), FrameStatus::Continue);
        assert_eq!(engine.frame().unwrap(), FrameStatus::Closing);
        assert_eq!(engine.state(), EngineState::Closing);
        engine.end().unwrap();

        assert_eq!(
            *log.borrow(),
            [Ev::Start, Ev::Update(0.0), Ev::UpdateUi, Ev::Draw, Ev::DrawUi, Ev::End]
        );
        assert_eq!(engine.state(), EngineState::Closed);
        assert!(!engine.backend().is_window_open());
        assert!(matches!(engine.frame(), Err(EngineError::NotRunning(EngineState::Closed))));
    }

    #[test]
    fn close_request_lets_the_frame_finish() {
        let log = Log::default();
        let mut scene = Recorder::new(&log);
        scene.close_on_update = Some(3);

        let mut engine = engine(HeadlessBackend::new(), &ManualClock::new());
        engine.run(boxed(scene)).unwrap();

        assert_eq!(count(&log, &Ev::UpdateUi), 3);
        assert_eq!(count(&log, &Ev::DrawUi), 3);
        assert_eq!(count(&log, &Ev::End), 1);
        assert_eq!(log.borrow().last(), Some(&Ev::End));
        assert_eq!(engine.backend().frames_presented(), 3);
        assert_eq!(engine.backend().calls().last(), Some(&BackendCall::CloseWindow));
    }

    #[test]
    fn external_close_request_is_seen_next_frame() {
        let log = Log::default();
        let mut engine = engine(HeadlessBackend::new(), &ManualClock::new());
        engine.start(boxed(Recorder::new(&log))).unwrap();

        let signal = engine.close_signal();
        engine.frame().unwrap();
        signal.request();
        assert_eq!(engine.frame().unwrap(), FrameStatus::Closing);
        engine.end().unwrap();

        assert_eq!(count(&log, &Ev::Draw), 1);
        assert_eq!(count(&log, &Ev::End), 1);
    }

    #[test]
    fn both_close_sources_in_one_frame() {
        let log = Log::default();
        let mut engine = engine(HeadlessBackend::new(), &ManualClock::new());
        engine.start(boxed(Recorder::new(&log))).unwrap();
        engine.frame().unwrap();

        engine.request_close();
        engine.backend_mut().request_native_close();
        assert_eq!(engine.frame().unwrap(), FrameStatus::Closing);
        assert!(matches!(
            engine.frame(),
            Err(EngineError::NotRunning(EngineState::Closing))
        ));
        engine.end().unwrap();

        assert_eq!(count(&log, &Ev::Update(0.0)), 1);
        assert_eq!(count(&log, &Ev::Draw), 1);
        assert_eq!(count(&log, &Ev::End), 1);
        assert_eq!(engine.backend().frames_presented(), 1);
        let closes = engine
            .backend()
            .calls()
            .iter()
            .filter(|c| **c == BackendCall::CloseWindow)
            .count();
        assert_eq!(closes, 1);
    }

    #[test]
    fn close_requested_while_drawing_still_presents() {
        let log = Log::default();
        let mut engine = engine(HeadlessBackend::new(), &ManualClock::new());
        let mut scene = Recorder::new(&log);
        scene.close_on_draw = Some(engine.close_signal());
        engine.start(boxed(scene)).unwrap();

        assert_eq!(engine.frame().unwrap(), FrameStatus::Continue);
        assert_eq!(count(&log, &Ev::DrawUi), 1);
        assert_eq!(engine.backend().frames_presented(), 1);
        assert_eq!(frame_calls(engine.backend()).last(), Some(&BackendCall::EndFrame));

        assert_eq!(engine.frame().unwrap(), FrameStatus::Closing);
        engine.end().unwrap();
        assert_eq!(count(&log, &Ev::Draw), 1);
        assert_eq!(log.borrow().last(), Some(&Ev::End));
    }

    #[test]
    fn native_close_is_observed() {
        let log = Log::default();
        let backend = HeadlessBackend::new().close_after_frames(2);
        let mut engine = engine(backend, &ManualClock::new());
        engine.run(boxed(Recorder::new(&log))).unwrap();

        assert_eq!(count(&log, &Ev::Draw), 2);
        assert_eq!(count(&log, &Ev::End), 1);
        assert_eq!(engine.state(), EngineState::Closed);
    }

    #[test]
    fn second_start_is_rejected() {
        let mut engine = engine(HeadlessBackend::new(), &ManualClock::new());
        engine.start(boxed(Recorder::default())).unwrap();
        let again = engine.start(boxed(Recorder::default()));
        assert!(matches!(again, Err(EngineError::AlreadyStarted)));
        assert_eq!(engine.scenes().len(), 1);
    }

    #[test]
    fn window_failure_aborts_before_running() {
        let log = Log::default();
        let mut engine = engine(HeadlessBackend::new().failing_window(), &ManualClock::new());
        let result = engine.start(boxed(Recorder::new(&log)));

        assert!(matches!(result, Err(EngineError::Startup(_))));
        assert_eq!(engine.state(), EngineState::Uninitialized);
        assert!(engine.scenes().is_empty());
        assert!(log.borrow().is_empty());
        assert!(matches!(
            engine.frame(),
            Err(EngineError::NotRunning(EngineState::Uninitialized))
        ));
    }

    #[test]
    fn build_failure_releases_the_window() {
        let mut engine = engine(HeadlessBackend::new(), &ManualClock::new());
        let result = engine.start(|_| Err(anyhow!("no world")));
        assert!(matches!(result, Err(EngineError::Startup(_))));
        assert!(!engine.backend().is_window_open());
        assert_eq!(engine.state(), EngineState::Uninitialized);
    }

    #[test]
    fn fullscreen_key_toggles_once_per_press() {
        let mut engine = engine(HeadlessBackend::new(), &ManualClock::new());
        engine.start(boxed(Recorder::default())).unwrap();

        engine.backend_mut().press_key(Key::Q);
        engine.frame().unwrap();
        assert!(!engine.backend().is_fullscreen());

        engine.frame().unwrap();
        assert!(engine.backend().is_fullscreen());

        engine.frame().unwrap();
        assert!(engine.backend().is_fullscreen());
        let toggles = engine
            .backend()
            .calls()
            .iter()
            .filter(|c| **c == BackendCall::ToggleFullscreen)
            .count();
        assert_eq!(toggles, 1);
    }

    #[test]
    fn unread_keys_are_discarded_after_update() {
        let log = Log::default();
        let mut scene = Recorder::new(&log);
        scene.poll = true;

        let mut engine = engine(HeadlessBackend::new(), &ManualClock::new());
        engine.start(boxed(scene)).unwrap();
        engine.backend_mut().press_key(Key::A);
        engine.backend_mut().press_key(Key::B);

        for _ in 0..3 {
            engine.frame().unwrap();
        }

        let polled: Vec<Ev> = log
            .borrow()
            .iter()
            .filter(|e| matches!(e, Ev::Polled(_)))
            .cloned()
            .collect();
        assert_eq!(
            polled,
            [Ev::Polled(None), Ev::Polled(Some(Key::A)), Ev::Polled(None)]
        );
    }

    #[test]
    fn poll_key_reads_each_key_once() {
        let mut engine = engine(HeadlessBackend::new(), &ManualClock::new());
        engine.start(boxed(Recorder::default())).unwrap();
        assert_eq!(engine.poll_key(), None);

        engine.frame().unwrap();
        engine.backend_mut().press_key(Key::Enter);
        engine.frame().unwrap();

        assert_eq!(engine.poll_key(), Some(Key::Enter));
        assert_eq!(engine.poll_key(), None);
    }

    #[test]
    fn draw_calls_follow_frame_order() {
        let mut engine = engine(HeadlessBackend::new(), &ManualClock::new());
        engine.start(boxed(Recorder::default())).unwrap();
        engine.frame().unwrap();

        assert_eq!(
            frame_calls(engine.backend()),
            [
                BackendCall::BeginFrame,
                BackendCall::Begin3d,
                BackendCall::ClearBackground(Color::DARK_GRAY),
                BackendCall::DrawGrid {
                    cells: 500,
                    spacing: 1.0
                },
                BackendCall::Draw { commands: 1 },
                BackendCall::End3d,
                BackendCall::EndFrame,
            ]
        );
        assert_eq!(engine.backend().last_draw().len(), 1);
    }

    #[test]
    fn scene_camera_overrides_fallback() {
        let mut engine = engine(HeadlessBackend::new(), &ManualClock::new());
        engine.start(boxed(Recorder::default())).unwrap();
        engine.frame().unwrap();
        assert_eq!(engine.backend().last_camera(), Some(&Camera3D::default()));

        let cam = Camera3D::looking_at(Vec3::new(0.0, 2.0, -4.0), Vec3::ZERO);
        let mut scene = Recorder::default();
        scene.camera = Some(cam);
        let mut engine = engine_with_scene(scene);
        engine.frame().unwrap();
        assert_eq!(engine.backend().last_camera(), Some(&cam));
        assert_eq!(*engine.camera(), cam);
    }

    fn engine_with_scene(scene: Recorder) -> Engine<HeadlessBackend, ManualClock> {
        let mut engine = engine(HeadlessBackend::new(), &ManualClock::new());
        engine.start(boxed(scene)).unwrap();
        engine
    }

    #[test]
    fn scene_error_stops_the_loop_without_end() {
        let log = Log::default();
        let mut scene = Recorder::new(&log);
        scene.fail_on = Some(ScenePhase::Draw);

        let mut engine = engine(HeadlessBackend::new(), &ManualClock::new());
        let result = engine.run(boxed(scene));

        assert!(matches!(
            result,
            Err(EngineError::Scene {
                phase: ScenePhase::Draw,
                ..
            })
        ));
        assert_eq!(engine.state(), EngineState::Closed);
        assert!(!engine.backend().is_window_open());
        assert_eq!(count(&log, &Ev::End), 0);
        assert_eq!(count(&log, &Ev::DrawUi), 0);
    }

    #[test]
    fn start_error_closes_the_engine() {
        let mut scene = Recorder::default();
        scene.fail_on = Some(ScenePhase::Start);
        let mut engine = engine(HeadlessBackend::new(), &ManualClock::new());
        let result = engine.start(boxed(scene));
        assert!(matches!(
            result,
            Err(EngineError::Scene {
                phase: ScenePhase::Start,
                ..
            })
        ));
        assert_eq!(engine.state(), EngineState::Closed);
    }

    #[test]
    fn failing_end_still_releases_backend() {
        let mut scene = Recorder::default();
        scene.fail_on = Some(ScenePhase::End);
        let mut engine = engine_with_scene(scene);
        engine.request_close();
        assert_eq!(engine.frame().unwrap(), FrameStatus::Closing);

        assert!(engine.end().is_err());
        assert_eq!(engine.state(), EngineState::Closed);
        assert!(!engine.backend().is_window_open());
    }

    #[test]
    fn bounded_registry_reports_capacity() {
        let config = EngineConfig {
            max_scenes: Some(1),
            ..EngineConfig::default()
        };
        let mut engine = Engine::with_clock(HeadlessBackend::new(), ManualClock::new(), config);
        engine.start(boxed(Recorder::default())).unwrap();

        let extra = engine.add_scene(Box::new(Recorder::default()));
        assert!(matches!(
            extra,
            Err(EngineError::Registry(RegistryError::CapacityExceeded { capacity: 1 }))
        ));
        assert_eq!(engine.scenes().current_index(), Some(0));
    }

    #[test]
    fn added_scenes_keep_registration_order() {
        let mut engine = engine_with_scene(Recorder::default());
        assert_eq!(engine.add_scene(Box::new(Recorder::default())).unwrap(), 1);
        assert_eq!(engine.add_scene(Box::new(Recorder::default())).unwrap(), 2);
        assert_eq!(engine.scenes().len(), 3);
        assert!(engine.current_scene().is_ok());
        assert!(matches!(
            engine.scenes().get(3),
            Err(RegistryError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn switching_scenes_starts_each_once() {
        let first = Log::default();
        let second = Log::default();
        let mut engine = engine_with_scene(Recorder::new(&first));
        let index = engine.add_scene(Box::new(Recorder::new(&second))).unwrap();
        assert!(second.borrow().is_empty());

        engine.set_current_scene(index).unwrap();
        assert_eq!(*second.borrow(), [Ev::Start]);
        engine.frame().unwrap();
        assert_eq!(count(&second, &Ev::Draw), 1);
        assert_eq!(count(&first, &Ev::Draw), 0);

        assert!(matches!(
            engine.set_current_scene(7),
            Err(EngineError::Registry(RegistryError::IndexOutOfRange { index: 7, len: 2 }))
        ));
        assert_eq!(engine.scenes().current_index(), Some(index));

        engine.set_current_scene(0).unwrap();
        engine.set_current_scene(index).unwrap();
        assert_eq!(count(&first, &Ev::Start), 1);
        assert_eq!(count(&second, &Ev::Start), 1);
    }

    #[test]
    fn failing_start_on_switch_stops_the_engine() {
        let mut engine = engine_with_scene(Recorder::default());
        let mut broken = Recorder::default();
        broken.fail_on = Some(ScenePhase::Start);
        let index = engine.add_scene(Box::new(broken)).unwrap();

        assert!(matches!(
            engine.set_current_scene(index),
            Err(EngineError::Scene {
                phase: ScenePhase::Start,
                ..
            })
        ));
        assert_eq!(engine.state(), EngineState::Closed);
        assert!(!engine.backend().is_window_open());
    }

    #[test]
    fn report_lists_the_source_chain() {
        let err = EngineError::scene(ScenePhase::Update)(anyhow!("disk full").context("saving level"));
        assert_eq!(report(&err), "scene update failed: saving level: disk full");
        assert_eq!(report(&EngineError::AlreadyStarted), "engine already started");
    }
}
