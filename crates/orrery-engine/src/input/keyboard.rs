use std::collections::VecDeque;

use super::device::InputDevice;
use super::frame::InputFrame;
use super::state::InputState;
use super::types::{InputEvent, Key, KeyState};

/// Default number of typed keys kept before new ones are dropped.
pub const DEFAULT_KEY_BUFFER: usize = 64;

/// Keyboard model shared by the backends.
///
/// Combines held-key state, this frame's edges and a bounded buffer of typed keys
/// (presses and OS repeats). When the buffer is full, new keys are dropped.
#[derive(Debug)]
pub struct Keyboard {
    state: InputState,
    frame: InputFrame,
    buffer: VecDeque<Key>,
    capacity: usize,
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_KEY_BUFFER)
    }
}

impl Keyboard {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: InputState::default(),
            frame: InputFrame::default(),
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn apply_event(&mut self, ev: InputEvent) {
        if let InputEvent::Key {
            key,
            state: KeyState::Pressed,
            ..
        } = &ev
        {
            if self.buffer.len() < self.capacity {
                self.buffer.push_back(*key);
            } else {
                log::trace!("key buffer full; dropped {key}");
            }
        }

        self.state.apply_event(&mut self.frame, ev);
    }

    /// Clears per-frame edges. Called by the backend when a frame is presented.
    pub fn end_frame(&mut self) {
        self.frame.clear();
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}

impl InputDevice for Keyboard {
    fn is_key_pressed(&self, key: Key) -> bool {
        self.frame.keys_pressed.contains(&key)
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.state.key_down(key)
    }

    fn is_key_buffered(&self) -> bool {
        !self.buffer.is_empty()
    }

    fn read_key(&mut self) -> Option<Key> {
        self.buffer.pop_front()
    }
}
