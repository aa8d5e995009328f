use std::collections::HashSet;

use super::types::Key;

/// Keys that went down since the last presented frame.
///
/// Held keys live in `InputState`; this only records the edges.
#[derive(Debug, Default)]
pub(crate) struct InputFrame {
    pub keys_pressed: HashSet<Key>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
    }
}
