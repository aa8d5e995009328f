use anyhow::{Result, bail, ensure};

use crate::input::{InputDevice, InputEvent, Key, Keyboard};
use crate::paint::Color;
use crate::render::{Camera3D, DrawCmd, DrawList};

use super::{Backend, DisplaySize};

/// One call made on a `HeadlessBackend`, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    QueryDisplaySize,
    CreateWindow { size: DisplaySize, title: String },
    SetCursorHidden(bool),
    MaximizeWindow,
    SetTargetFrameRate(u32),
    BeginFrame,
    Begin3d,
    ClearBackground(Color),
    DrawGrid { cells: u32, spacing: f32 },
    Draw { commands: usize },
    End3d,
    EndFrame,
    ToggleFullscreen,
    CloseWindow,
}

/// Backend without a window.
///
/// Input is scripted: keys queued with `press_key` are delivered when the next
/// frame is presented, the same way a windowed backend collects events while
/// presenting.
#[derive(Debug)]
pub struct HeadlessBackend {
    display: Option<DisplaySize>,
    fail_window: bool,
    close_after: Option<u64>,

    calls: Vec<BackendCall>,
    keyboard: Keyboard,
    pending: Vec<InputEvent>,

    window_open: bool,
    in_frame: bool,
    fullscreen: bool,
    native_close: bool,
    frames_presented: u64,

    last_camera: Option<Camera3D>,
    last_draw: Vec<DrawCmd>,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self {
            display: Some(DisplaySize::new(1920, 1080)),
            fail_window: false,
            close_after: None,
            calls: Vec::new(),
            keyboard: Keyboard::default(),
            pending: Vec::new(),
            window_open: false,
            in_frame: false,
            fullscreen: false,
            native_close: false,
            frames_presented: 0,
            last_camera: None,
            last_draw: Vec::new(),
        }
    }
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display_size(mut self, size: DisplaySize) -> Self {
        self.display = Some(size);
        self
    }

    /// Display size queries fail.
    pub fn without_display(mut self) -> Self {
        self.display = None;
        self
    }

    /// Window creation fails.
    pub fn failing_window(mut self) -> Self {
        self.fail_window = true;
        self
    }

    /// The platform asks to close once `frames` frames have been presented.
    pub fn close_after_frames(mut self, frames: u64) -> Self {
        self.close_after = Some(frames);
        self
    }

    /// Queues a key press (and release) delivered at the next `end_frame`.
    pub fn press_key(&mut self, key: Key) {
        self.pending.push(InputEvent::press(key));
        self.pending.push(InputEvent::release(key));
    }

    /// Queues a press without a release, so the key stays held.
    pub fn hold_key(&mut self, key: Key) {
        self.pending.push(InputEvent::press(key));
    }

    pub fn release_key(&mut self, key: Key) {
        self.pending.push(InputEvent::release(key));
    }

    /// Simulates the user closing the window.
    pub fn request_native_close(&mut self) {
        self.native_close = true;
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn is_window_open(&self) -> bool {
        self.window_open
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn last_camera(&self) -> Option<&Camera3D> {
        self.last_camera.as_ref()
    }

    /// Commands handed to the most recent `draw` call.
    pub fn last_draw(&self) -> &[DrawCmd] {
        &self.last_draw
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }
}

impl InputDevice for HeadlessBackend {
    fn is_key_pressed(&self, key: Key) -> bool {
        self.keyboard.is_key_pressed(key)
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.keyboard.is_key_down(key)
    }

    fn is_key_buffered(&self) -> bool {
        self.keyboard.is_key_buffered()
    }

    fn read_key(&mut self) -> Option<Key> {
        self.keyboard.read_key()
    }

    fn drain_buffered(&mut self, limit: usize) -> usize {
        self.keyboard.drain_buffered(limit)
    }
}

impl Backend for HeadlessBackend {
    fn query_display_size(&mut self) -> Result<DisplaySize> {
        self.calls.push(BackendCall::QueryDisplaySize);
        match self.display {
            Some(size) => Ok(size),
            None => bail!("no display attached"),
        }
    }

    fn create_window(&mut self, size: DisplaySize, title: &str) -> Result<()> {
        self.calls.push(BackendCall::CreateWindow {
            size,
            title: title.to_string(),
        });
        ensure!(!self.fail_window, "window creation refused");
        ensure!(!size.is_empty(), "window size {}x{} is empty", size.width, size.height);
        self.window_open = true;
        Ok(())
    }

    fn set_cursor_hidden(&mut self, hidden: bool) {
        self.calls.push(BackendCall::SetCursorHidden(hidden));
    }

    fn maximize_window(&mut self) {
        self.calls.push(BackendCall::MaximizeWindow);
    }

    fn set_target_frame_rate(&mut self, fps: u32) {
        self.calls.push(BackendCall::SetTargetFrameRate(fps));
    }

    fn should_close(&self) -> bool {
        self.native_close
    }

    fn begin_frame(&mut self) -> Result<()> {
        self.calls.push(BackendCall::BeginFrame);
        ensure!(self.window_open, "no window to draw into");
        ensure!(!self.in_frame, "begin_frame called twice without end_frame");
        self.in_frame = true;
        Ok(())
    }

    fn begin_3d(&mut self, camera: &Camera3D) {
        self.calls.push(BackendCall::Begin3d);
        self.last_camera = Some(*camera);
    }

    fn clear_background(&mut self, color: Color) {
        self.calls.push(BackendCall::ClearBackground(color));
    }

    fn draw_grid(&mut self, cells: u32, spacing: f32) {
        self.calls.push(BackendCall::DrawGrid { cells, spacing });
    }

    fn draw(&mut self, list: &DrawList) {
        self.calls.push(BackendCall::Draw {
            commands: list.len(),
        });
        self.last_draw = list.items().to_vec();
    }

    fn end_3d(&mut self) {
        self.calls.push(BackendCall::End3d);
    }

    fn end_frame(&mut self) -> Result<()> {
        self.calls.push(BackendCall::EndFrame);
        ensure!(self.in_frame, "end_frame called without begin_frame");
        self.in_frame = false;
        self.frames_presented += 1;

        self.keyboard.end_frame();
        for ev in self.pending.drain(..) {
            self.keyboard.apply_event(ev);
        }

        if self.close_after.is_some_and(|n| self.frames_presented >= n) {
            self.native_close = true;
        }
        Ok(())
    }

    fn toggle_fullscreen(&mut self) {
        self.calls.push(BackendCall::ToggleFullscreen);
        self.fullscreen = !self.fullscreen;
    }

    fn close_window(&mut self) {
        self.calls.push(BackendCall::CloseWindow);
        self.window_open = false;
        self.in_frame = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened() -> HeadlessBackend {
        let mut b = HeadlessBackend::new();
        b.create_window(DisplaySize::new(800, 600), "test").unwrap();
        b
    }

    #[test]
    fn frame_brackets_are_checked() {
        let mut b = opened();
        assert!(b.end_frame().is_err());
        b.begin_frame().unwrap();
        assert!(b.begin_frame().is_err());
        b.end_frame().unwrap();
        assert_eq!(b.frames_presented(), 1);
    }

    #[test]
    fn window_creation_can_fail() {
        let mut b = HeadlessBackend::new().failing_window();
        assert!(b.create_window(DisplaySize::new(800, 600), "x").is_err());
        assert!(!b.is_window_open());
        assert!(b.begin_frame().is_err());
    }

    #[test]
    fn keys_arrive_when_a_frame_is_presented() {
        let mut b = opened();
        b.press_key(Key::Space);
        assert!(!b.is_key_buffered());

        b.begin_frame().unwrap();
        b.end_frame().unwrap();
        assert!(b.is_key_pressed(Key::Space));
        assert_eq!(b.read_key(), Some(Key::Space));

        b.begin_frame().unwrap();
        b.end_frame().unwrap();
        assert!(!b.is_key_pressed(Key::Space));
    }

    #[test]
    fn held_keys_stay_down_across_frames() {
        let mut b = opened();
        b.hold_key(Key::W);
        for _ in 0..3 {
            b.begin_frame().unwrap();
            b.end_frame().unwrap();
        }
        assert!(b.is_key_down(Key::W));
        assert!(!b.is_key_pressed(Key::W));

        b.release_key(Key::W);
        b.begin_frame().unwrap();
        b.end_frame().unwrap();
        assert!(!b.is_key_down(Key::W));
    }

    #[test]
    fn close_after_frames_sets_should_close() {
        let mut b = HeadlessBackend::new().close_after_frames(2);
        b.create_window(DisplaySize::new(800, 600), "x").unwrap();
        for expected in [false, true] {
            b.begin_frame().unwrap();
            b.end_frame().unwrap();
            assert_eq!(b.should_close(), expected);
        }
    }

    #[test]
    fn fullscreen_toggles() {
        let mut b = opened();
        b.toggle_fullscreen();
        assert!(b.is_fullscreen());
        b.toggle_fullscreen();
        assert!(!b.is_fullscreen());
    }
}
