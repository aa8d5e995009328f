use super::types::Key;

/// Keyboard polling surface consumed by the engine and handed to scenes.
///
/// Two disjoint channels:
/// - edge/level queries (`is_key_pressed`, `is_key_down`) over this frame's state
/// - a buffer of typed keys, read destructively with `read_key` and flushed by the
///   engine with `drain_buffered` once the scene has had its chance to consume it
pub trait InputDevice {
    /// True only on the frame the key went down.
    fn is_key_pressed(&self, key: Key) -> bool;

    fn is_key_down(&self, key: Key) -> bool;

    fn is_key_buffered(&self) -> bool;

    /// Consumes one buffered key. Never blocks; `None` when the buffer is empty.
    fn read_key(&mut self) -> Option<Key>;

    /// Discards up to `limit` buffered keys and returns how many were discarded.
    fn drain_buffered(&mut self, limit: usize) -> usize {
        let mut drained = 0;
        while drained < limit && self.is_key_buffered() {
            if self.read_key().is_none() {
                break;
            }
            drained += 1;
        }
        drained
    }
}
