use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::input::{InputEvent, Key, KeyState, Modifiers};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Returns `None` for events the keyboard model does not track.
pub(crate) fn translate_window_event(modifiers: Modifiers, event: &WindowEvent) -> Option<InputEvent> {
    match event {
        // winit 0.30: ModifiersChanged carries a wrapper with `.state()`.
        WindowEvent::ModifiersChanged(m) => Some(InputEvent::ModifiersChanged(map_modifiers(m.state()))),

        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::KeyboardInput { event, .. } => {
            let state = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };

            Some(InputEvent::Key {
                key: map_key(event.physical_key),
                state,
                modifiers,
                repeat: event.repeat,
            })
        }

        _ => None,
    }
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

macro_rules! same_name_keys {
    ($code:expr, $($name:ident),* $(,)?) => {
        match $code {
            $(KeyCode::$name => Some(Key::$name),)*
            _ => None,
        }
    };
}

macro_rules! letter_keys {
    ($code:expr, $($code_name:ident => $key:ident),* $(,)?) => {
        match $code {
            $(KeyCode::$code_name => Some(Key::$key),)*
            _ => None,
        }
    };
}

fn map_key(pk: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = pk else {
        // NativeKeyCode has no stable numeric in winit 0.30.
        return Key::Unknown(0);
    };

    match code {
        KeyCode::ShiftLeft | KeyCode::ShiftRight => return Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => return Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => return Key::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => return Key::Meta,
        _ => {}
    }

    same_name_keys!(
        code,
        Escape, Enter, Tab, Backspace, Space,
        ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
        Digit0, Digit1, Digit2, Digit3, Digit4,
        Digit5, Digit6, Digit7, Digit8, Digit9,
        F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    )
    .or_else(|| {
        letter_keys!(
            code,
            KeyA => A, KeyB => B, KeyC => C, KeyD => D, KeyE => E, KeyF => F,
            KeyG => G, KeyH => H, KeyI => I, KeyJ => J, KeyK => K, KeyL => L,
            KeyM => M, KeyN => N, KeyO => O, KeyP => P, KeyQ => Q, KeyR => R,
            KeyS => S, KeyT => T, KeyU => U, KeyV => V, KeyW => W, KeyX => X,
            KeyY => Y, KeyZ => Z,
        )
    })
    .unwrap_or(Key::Unknown(code as u32))
}
