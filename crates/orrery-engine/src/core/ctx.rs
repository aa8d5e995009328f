use glam::Vec3;

use crate::input::{InputDevice, Key};
use crate::paint::Color;
use crate::render::{Camera3D, DrawList};
use crate::time::FrameTime;

use super::close::CloseSignal;

/// Per-frame context passed to `Scene::update` and `Scene::update_ui`.
///
/// Lifetime `'a` is the duration of the engine's update step.
pub struct UpdateCtx<'a> {
    pub time: FrameTime,
    pub input: &'a mut dyn InputDevice,
    pub close: &'a CloseSignal,
}

impl<'a> UpdateCtx<'a> {
    /// Seconds since the previous frame.
    #[inline]
    pub fn dt(&self) -> f32 {
        self.time.dt
    }

    #[inline]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.input.is_key_pressed(key)
    }

    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.input.is_key_down(key)
    }

    /// Takes the next buffered key without blocking.
    ///
    /// Keys left in the buffer when the update step returns are discarded.
    #[inline]
    pub fn poll_key(&mut self) -> Option<Key> {
        self.input.read_key()
    }

    /// Asks the engine to shut down after the current frame.
    #[inline]
    pub fn request_close(&self) {
        self.close.request();
    }
}

/// Per-frame context passed to `Scene::draw` and `Scene::draw_ui`.
///
/// Commands are recorded between the backend's 3D begin/end bracket and
/// submitted after `draw_ui` returns.
pub struct DrawCtx<'a> {
    pub camera: &'a Camera3D,
    pub list: &'a mut DrawList,
}

impl<'a> DrawCtx<'a> {
    pub fn new(camera: &'a Camera3D, list: &'a mut DrawList) -> Self {
        Self { camera, list }
    }

    #[inline]
    pub fn line(&mut self, from: Vec3, to: Vec3, color: Color) {
        self.list.line(from, to, color);
    }

    #[inline]
    pub fn cube(&mut self, center: Vec3, size: Vec3, color: Color) {
        self.list.cube(center, size, color);
    }

    #[inline]
    pub fn sphere(&mut self, center: Vec3, radius: f32, color: Color) {
        self.list.sphere(center, radius, color);
    }
}
