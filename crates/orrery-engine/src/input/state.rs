use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, Modifiers};

/// Current keyboard state for a single window.
///
/// Holds "is down" information. Press edges are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an input event to the current state and writes press edges to `frame`.
    pub(crate) fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = m;
            }

            // Keys released while unfocused never reach us.
            InputEvent::Focused(false) => self.keys_down.clear(),
            InputEvent::Focused(true) => {}

            InputEvent::Key {
                key,
                state,
                modifiers,
                ..
            } => {
                self.modifiers = modifiers;

                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(key) {
                            frame.keys_pressed.insert(key);
                        }
                    }
                    KeyState::Released => {
                        self.keys_down.remove(&key);
                    }
                }
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}
